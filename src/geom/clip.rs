//! Half-plane clipping of closed (U,V) loops against horizontal lines.
//!
//! Sutherland-Hodgman against a single edge `v = bound`. Vertices within
//! [`Tolerance::CLIP`] of the bound count as inside so near-coincident
//! vertices do not spawn micro-fragments.

use super::core::Tolerance;
use super::polygon::{UvLoop, UvPoint};

/// Which side of the horizontal line survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipSide {
    /// Keep `v >= bound`.
    KeepAbove,
    /// Keep `v <= bound`.
    KeepBelow,
}

impl ClipSide {
    fn keeps(self, p: UvPoint, bound: f64, tol: Tolerance) -> bool {
        match self {
            Self::KeepAbove => p.v >= bound - tol.eps,
            Self::KeepBelow => p.v <= bound + tol.eps,
        }
    }
}

/// Clip `points` against the half-plane described by `bound` and `side`.
///
/// Returns at most one loop; an empty result means the loop was clipped away
/// entirely. The output is not filtered for vertex count.
#[must_use]
pub fn clip_loop(points: &[UvPoint], bound: f64, side: ClipSide) -> Vec<UvLoop> {
    clip_loop_with_tolerance(points, bound, side, Tolerance::CLIP)
}

#[must_use]
pub fn clip_loop_with_tolerance(
    points: &[UvPoint],
    bound: f64,
    side: ClipSide,
    tol: Tolerance,
) -> Vec<UvLoop> {
    let Some(&last) = points.last() else {
        return Vec::new();
    };

    let mut output = Vec::with_capacity(points.len() + 2);
    let mut prev = last;
    let mut prev_inside = side.keeps(prev, bound, tol);

    for &point in points {
        let inside = side.keeps(point, bound, tol);
        if inside {
            if !prev_inside {
                output.push(intersect_horizontal(prev, point, bound, tol));
            }
            output.push(point);
        } else if prev_inside {
            output.push(intersect_horizontal(prev, point, bound, tol));
        }
        prev = point;
        prev_inside = inside;
    }

    if output.is_empty() {
        Vec::new()
    } else {
        vec![UvLoop::new(output)]
    }
}

/// Bound a loop to the band `[v0, v1]`: lower clip, then upper clip. Loops
/// with fewer than three vertices are discarded.
#[must_use]
pub fn clip_to_band(points: &[UvPoint], v0: f64, v1: f64) -> Vec<UvLoop> {
    clip_loop(points, v0, ClipSide::KeepAbove)
        .iter()
        .flat_map(|l| clip_loop(l.points(), v1, ClipSide::KeepBelow))
        .filter(|l| l.len() >= 3)
        .collect()
}

/// Point on segment `a-b` at `v = bound`. Near-horizontal edges resolve to `a`.
fn intersect_horizontal(a: UvPoint, b: UvPoint, bound: f64, tol: Tolerance) -> UvPoint {
    let dv = b.v - a.v;
    let t = if dv.abs() < tol.eps { 0.0 } else { (bound - a.v) / dv };
    UvPoint::new(a.u + (b.u - a.u) * t, bound)
}
