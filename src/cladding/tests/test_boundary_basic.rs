use crate::cladding::{
    BoardPlacement, BoardStatus, CornerClass, classify, trim_boards, trim_boards_with_diagnostics,
};
use crate::geom::{FaceRegion, UvLoop, UvPoint};

fn rect(u0: f64, v0: f64, u1: f64, v1: f64) -> UvLoop {
    UvLoop::new(vec![
        UvPoint::new(u0, v0),
        UvPoint::new(u1, v0),
        UvPoint::new(u1, v1),
        UvPoint::new(u0, v1),
    ])
}

fn board(start_u: f64, end_u: f64, v0: f64, v1: f64) -> BoardPlacement {
    BoardPlacement {
        course_index: 0,
        start_u,
        end_u,
        v0,
        v1,
        scale: (end_u - start_u) / 2400.0,
        status: BoardStatus::Unclassified,
    }
}

fn wall() -> FaceRegion {
    FaceRegion::new(rect(0.0, 0.0, 3000.0, 1000.0), Vec::new())
}

fn wall_with_window() -> FaceRegion {
    FaceRegion::new(
        rect(0.0, 0.0, 3000.0, 1000.0),
        vec![rect(1000.0, 300.0, 2000.0, 700.0)],
    )
}

#[test]
fn board_flush_with_the_outline_is_inside() {
    let b = board(0.0, 2400.0, 0.0, 100.0);
    assert_eq!(classify(&b, &wall()), CornerClass::Inside);

    let kept = trim_boards(vec![b], &wall());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].status, BoardStatus::Inside);
}

#[test]
fn board_outside_the_outline_is_removed() {
    let (kept, diagnostics) =
        trim_boards_with_diagnostics(vec![board(3100.0, 3500.0, 0.0, 100.0)], &wall());
    assert!(kept.is_empty());
    assert_eq!(diagnostics.removed, 1);
    assert_eq!(diagnostics.kept(), 0);
}

#[test]
fn board_straddling_the_outline_is_flagged() {
    let kept = trim_boards(vec![board(2500.0, 3500.0, 900.0, 1100.0)], &wall());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].status, BoardStatus::Boundary);
    assert_eq!(kept[0].end_u, 3500.0);
}

#[test]
fn holes_remove_and_flag_boards() {
    let region = wall_with_window();
    let boards = vec![
        board(1200.0, 1800.0, 400.0, 500.0),
        board(900.0, 1100.0, 400.0, 500.0),
        board(2000.0, 2400.0, 400.0, 500.0),
    ];
    let (kept, diagnostics) = trim_boards_with_diagnostics(boards, &region);

    assert_eq!(diagnostics.removed, 1);
    assert_eq!(diagnostics.boundary, 1);
    assert_eq!(diagnostics.inside, 1);
    assert_eq!(kept[0].status, BoardStatus::Boundary);
    // Corners on the window edge count as material.
    assert_eq!(kept[1].status, BoardStatus::Inside);
}

#[test]
fn corner_test_does_not_see_a_notch_between_corners() {
    // A board bridging a notch keeps all four corners on material; the corner
    // test cannot tell, so the board stays and is not flagged.
    let outer = UvLoop::new(vec![
        UvPoint::new(0.0, 0.0),
        UvPoint::new(3000.0, 0.0),
        UvPoint::new(3000.0, 1000.0),
        UvPoint::new(2000.0, 1000.0),
        UvPoint::new(2000.0, 500.0),
        UvPoint::new(1000.0, 500.0),
        UvPoint::new(1000.0, 1000.0),
        UvPoint::new(0.0, 1000.0),
    ]);
    let region = FaceRegion::new(outer, Vec::new());
    let b = board(500.0, 2500.0, 600.0, 700.0);
    assert_eq!(classify(&b, &region), CornerClass::Inside);
}
