use crate::cladding::{
    StripeLayout, TessellateError, horizontal_segments, tessellate, tessellate_with_diagnostics,
};
use crate::geom::{FaceRegion, UvLoop, UvPoint};

fn loop_of(points: &[(f64, f64)]) -> UvLoop {
    UvLoop::new(points.iter().map(|&p| UvPoint::from(p)).collect())
}

fn rect(u0: f64, v0: f64, u1: f64, v1: f64) -> UvLoop {
    loop_of(&[(u0, v0), (u1, v0), (u1, v1), (u0, v1)])
}

fn layout(step: f64) -> StripeLayout {
    StripeLayout {
        step,
        base_offset: 0.0,
        top_offset: 0.0,
    }
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "{a} != {b}");
}

#[test]
fn rectangle_yields_contiguous_full_width_courses() {
    let region = FaceRegion::new(rect(0.0, 0.0, 3000.0, 1000.0), Vec::new());
    let courses = tessellate(&region, layout(300.0)).unwrap();

    assert_eq!(courses.len(), 4);
    assert_close(courses[0].v0, 0.0);
    assert_close(courses[3].v1, 1000.0);
    assert_close(courses[3].height(), 100.0);
    for pair in courses.windows(2) {
        assert_eq!(pair[0].v1, pair[1].v0);
    }
    for (i, course) in courses.iter().enumerate() {
        assert_eq!(course.index, i);
        assert_eq!(course.segments.len(), 1);
        assert_close(course.segments[0].u_start, 0.0);
        assert_close(course.segments[0].u_end, 3000.0);
        assert_close(course.u_min, 0.0);
        assert_close(course.u_max, 3000.0);
    }
}

#[test]
fn offsets_shrink_the_usable_range() {
    let region = FaceRegion::new(rect(0.0, 0.0, 3000.0, 1000.0), Vec::new());
    let layout = StripeLayout {
        step: 100.0,
        base_offset: 100.0,
        top_offset: 50.0,
    };
    let courses = tessellate(&region, layout).unwrap();
    assert_eq!(courses.len(), 9);
    assert_close(courses[0].v0, 100.0);
    assert_close(courses[8].v1, 950.0);
    assert_close(courses[8].height(), 50.0);
}

#[test]
fn centred_hole_splits_courses_it_crosses() {
    let region = FaceRegion::new(
        rect(0.0, 0.0, 3000.0, 1000.0),
        vec![rect(1000.0, 300.0, 2000.0, 700.0)],
    );
    let courses = tessellate(&region, layout(100.0)).unwrap();
    assert_eq!(courses.len(), 10);

    for course in &courses {
        let crosses_hole = course.v_mid() > 300.0 && course.v_mid() < 700.0;
        if crosses_hole {
            assert_eq!(course.segments.len(), 2, "course {}", course.index);
            assert_close(course.segments[0].u_end, 1000.0);
            assert_close(course.segments[1].u_start, 2000.0);
            assert!(!course.hole_loops.is_empty());
        } else {
            assert_eq!(course.segments.len(), 1, "course {}", course.index);
        }
    }
}

#[test]
fn concave_notch_gives_two_segments_above_it() {
    let outer = loop_of(&[
        (0.0, 0.0),
        (3000.0, 0.0),
        (3000.0, 1000.0),
        (2000.0, 1000.0),
        (2000.0, 500.0),
        (1000.0, 500.0),
        (1000.0, 1000.0),
        (0.0, 1000.0),
    ]);
    let courses = tessellate(&FaceRegion::new(outer, Vec::new()), layout(250.0)).unwrap();
    assert_eq!(courses.len(), 4);
    assert_eq!(courses[1].segments.len(), 1);
    assert_eq!(courses[2].segments.len(), 2);
    assert_close(courses[3].segments[0].u_end, 1000.0);
    assert_close(courses[3].segments[1].u_start, 2000.0);
}

#[test]
fn triangle_segments_narrow_towards_apex() {
    let outer = loop_of(&[(0.0, 0.0), (1000.0, 0.0), (500.0, 1000.0)]);
    let courses = tessellate(&FaceRegion::new(outer, Vec::new()), layout(250.0)).unwrap();
    assert_eq!(courses.len(), 4);
    let first = courses[0].segments[0];
    assert_close(first.u_start, 62.5);
    assert_close(first.u_end, 937.5);
    let widths: Vec<f64> = courses.iter().map(|c| c.segments[0].width()).collect();
    assert!(widths.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn band_consumed_by_a_hole_is_dropped_but_keeps_numbering() {
    let region = FaceRegion::new(
        rect(0.0, 0.0, 3000.0, 1000.0),
        vec![rect(0.0, 300.0, 3000.0, 400.0)],
    );
    let (courses, diagnostics) = tessellate_with_diagnostics(&region, layout(100.0)).unwrap();
    let indices: Vec<usize> = courses.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 4, 5, 6, 7, 8, 9]);
    assert_eq!(diagnostics.bands, 10);
    assert_eq!(diagnostics.segmentless_bands, 1);
    assert_eq!(diagnostics.courses, 9);
}

#[test]
fn horizontal_edges_do_not_cross() {
    let sq = rect(0.0, 0.0, 10.0, 10.0);
    assert!(horizontal_segments(&sq, 10.0).is_empty());
    assert_eq!(horizontal_segments(&sq, 0.0).len(), 1);
}

#[test]
fn zero_height_face_is_insufficient() {
    let flat = loop_of(&[(0.0, 0.0), (10.0, 0.0), (5.0, 0.0)]);
    let err = tessellate(&FaceRegion::new(flat, Vec::new()), layout(10.0)).unwrap_err();
    assert!(matches!(err, TessellateError::InsufficientHeight { .. }));
}

/// 3000 x 2000 L-shape whose notch edge at v = 1000 carries sub-micron noise.
fn noisy_l_shape() -> UvLoop {
    loop_of(&[
        (0.0, 0.0),
        (3000.0, 0.0),
        (3000.0, 1000.0 - 1e-7),
        (1500.0, 1000.0 + 1e-7),
        (1500.0, 2000.0),
        (0.0, 2000.0),
    ])
}

#[test]
fn near_horizontal_edge_on_scan_line_still_pairs() {
    let segs = horizontal_segments(&noisy_l_shape(), 1000.0);
    assert_eq!(segs.len(), 1, "{segs:?}");
    assert_close(segs[0].u_start, 0.0);
    assert_close(segs[0].u_end, 1500.0);
}

#[test]
fn noisy_notch_does_not_drop_the_course_through_it() {
    let region = FaceRegion::new(noisy_l_shape(), Vec::new());
    let courses = tessellate(&region, layout(400.0)).unwrap();
    let indices: Vec<usize> = courses.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(courses[2].segments.len(), 1);
    assert_close(courses[2].segments[0].u_end, 1500.0);
}
