use crate::geom::{ClipSide, UvLoop, UvPoint, clip_loop, clip_to_band};

fn rect(w: f64, h: f64) -> Vec<UvPoint> {
    vec![
        UvPoint::new(0.0, 0.0),
        UvPoint::new(w, 0.0),
        UvPoint::new(w, h),
        UvPoint::new(0.0, h),
    ]
}

fn v_range(loop_: &UvLoop) -> (f64, f64) {
    let b = loop_.bounds().unwrap();
    (b.v_min, b.v_max)
}

#[test]
fn clip_keeps_requested_half_plane() {
    let above = clip_loop(&rect(10.0, 10.0), 4.0, ClipSide::KeepAbove);
    assert_eq!(above.len(), 1);
    assert_eq!(v_range(&above[0]), (4.0, 10.0));
    assert!((above[0].signed_area() - 60.0).abs() < 1e-9);

    let below = clip_loop(&rect(10.0, 10.0), 4.0, ClipSide::KeepBelow);
    assert_eq!(v_range(&below[0]), (0.0, 4.0));
}

#[test]
fn clip_fully_outside_returns_nothing() {
    assert!(clip_loop(&rect(10.0, 10.0), 12.0, ClipSide::KeepAbove).is_empty());
    assert!(clip_loop(&[], 0.0, ClipSide::KeepBelow).is_empty());
}

#[test]
fn clip_treats_near_coincident_vertices_as_inside() {
    let clipped = clip_loop(&rect(10.0, 10.0), 10.0 + 5e-7, ClipSide::KeepAbove);
    assert_eq!(clipped.len(), 1);
    assert!(clipped[0].points().iter().all(|p| p.v >= 10.0));
}

#[test]
fn band_clip_interpolates_slanted_edges() {
    let triangle = vec![
        UvPoint::new(0.0, 0.0),
        UvPoint::new(10.0, 0.0),
        UvPoint::new(0.0, 10.0),
    ];
    let band = clip_to_band(&triangle, 2.0, 4.0);
    assert_eq!(band.len(), 1);
    assert_eq!(v_range(&band[0]), (2.0, 4.0));
    // Trapezoid with widths 8 and 6.
    assert!((band[0].signed_area() - 14.0).abs() < 1e-9);
}

#[test]
fn band_clip_discards_degenerate_slivers() {
    let band = clip_to_band(&rect(10.0, 10.0), 10.0, 12.0);
    assert!(band.iter().all(|l| l.len() >= 3));
    for l in &band {
        assert!(l.signed_area().abs() < 1e-9);
    }
}
