//! Stripe tessellation: cut a projected face into horizontal courses.
//!
//! The usable V range is split into bands of one course step. Each loop of the
//! face is clipped to the band independently, and the surviving outer material
//! is reduced to horizontal segments at the band's mid-height, net of holes.
//! Bands are numbered from the bottom; a band that yields no material keeps its
//! number, so stagger stays tied to the physical row.

use serde::{Deserialize, Serialize};

use crate::geom::{FaceRegion, Frame, Point3, Tolerance, UvDomain, UvLoop, clip_to_band};

use super::params::ResolvedParams;

/// Narrower pieces are dropped after hole subtraction.
const MIN_SEGMENT_WIDTH: f64 = Tolerance::SEGMENT.eps;
/// Remaining height below which no further band is started.
const MIN_BAND_HEIGHT: f64 = Tolerance::CLIP.eps;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TessellateError {
    #[error("insufficient height for cladding: usable range [{v_min}, {v_max}] is empty")]
    InsufficientHeight { v_min: f64, v_max: f64 },
    #[error("course step must be positive and finite, got {0}")]
    InvalidStep(f64),
}

/// Vertical layout of the bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripeLayout {
    pub step: f64,
    pub base_offset: f64,
    pub top_offset: f64,
}

impl From<&ResolvedParams> for StripeLayout {
    fn from(params: &ResolvedParams) -> Self {
        Self {
            step: params.step,
            base_offset: params.base_offset,
            top_offset: params.top_offset,
        }
    }
}

/// Horizontal interval of solid material, `u_start < u_end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub u_start: f64,
    pub u_end: f64,
}

impl Segment {
    #[must_use]
    pub fn new(u_start: f64, u_end: f64) -> Self {
        Self { u_start, u_end }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.u_end - self.u_start
    }

    fn overlaps(&self, other: &Segment) -> bool {
        other.u_end > self.u_start && other.u_start < self.u_end
    }
}

/// One horizontal row of the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub index: usize,
    pub v0: f64,
    pub v1: f64,
    /// Outer-loop fragments clipped to the band.
    pub outer_loops: Vec<UvLoop>,
    /// Hole fragments clipped to the band.
    pub hole_loops: Vec<UvLoop>,
    pub segments: Vec<Segment>,
    pub u_min: f64,
    pub u_max: f64,
}

impl Course {
    #[must_use]
    pub fn height(&self) -> f64 {
        self.v1 - self.v0
    }

    #[must_use]
    pub fn v_mid(&self) -> f64 {
        0.5 * (self.v0 + self.v1)
    }

    /// Outer fragments mapped back to world space, one polyline per fragment.
    #[must_use]
    pub fn outline_world(&self, frame: &Frame) -> Vec<Vec<Point3>> {
        self.outer_loops
            .iter()
            .map(|l| l.points().iter().map(|p| frame.to_world(*p)).collect())
            .collect()
    }
}

/// Counters collected while tessellating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TessellationDiagnostics {
    pub bands: usize,
    pub courses: usize,
    /// Bands where no outer material survived clipping.
    pub empty_bands: usize,
    /// Bands whose segments were all consumed by holes or rounding.
    pub segmentless_bands: usize,
}

/// Tessellate `region` into courses.
///
/// # Errors
/// [`TessellateError::InsufficientHeight`] when the offsets leave no usable
/// height and [`TessellateError::InvalidStep`] for a non-positive step.
pub fn tessellate(region: &FaceRegion, layout: StripeLayout) -> Result<Vec<Course>, TessellateError> {
    tessellate_with_diagnostics(region, layout).map(|(courses, _)| courses)
}

/// Same as [`tessellate`], also returning band counters.
///
/// # Errors
/// See [`tessellate`].
pub fn tessellate_with_diagnostics(
    region: &FaceRegion,
    layout: StripeLayout,
) -> Result<(Vec<Course>, TessellationDiagnostics), TessellateError> {
    let bounds = region.bounds().unwrap_or(UvDomain::new(0.0, 0.0, 0.0, 0.0));
    let v_min = bounds.v_min + layout.base_offset;
    let v_max = bounds.v_max - layout.top_offset;
    if v_max <= v_min {
        return Err(TessellateError::InsufficientHeight { v_min, v_max });
    }
    if !(layout.step.is_finite() && layout.step > 0.0) {
        return Err(TessellateError::InvalidStep(layout.step));
    }

    let mut diagnostics = TessellationDiagnostics::default();
    let mut courses = Vec::new();
    let mut index = 0_usize;
    let mut v0 = v_min;

    while v0 < v_max - MIN_BAND_HEIGHT {
        let v1 = band_edge(v_min, layout.step, index + 1).min(v_max);
        diagnostics.bands += 1;

        match build_course(region, index, v0, v1) {
            BandOutcome::Course(course) => courses.push(course),
            BandOutcome::NoOuterMaterial => {
                diagnostics.empty_bands += 1;
                log::debug!("band {index} [{v0:.3}, {v1:.3}] has no outer material, skipped");
            }
            BandOutcome::NoSegments => {
                diagnostics.segmentless_bands += 1;
                log::debug!("band {index} [{v0:.3}, {v1:.3}] has no segments at mid-height, skipped");
            }
        }

        v0 = v1;
        index += 1;
    }

    diagnostics.courses = courses.len();
    log::info!(
        "tessellated {} courses from {} bands (step {:.3}, v {:.3}..{:.3})",
        diagnostics.courses,
        diagnostics.bands,
        layout.step,
        v_min,
        v_max
    );
    Ok((courses, diagnostics))
}

#[allow(clippy::cast_precision_loss)]
fn band_edge(v_min: f64, step: f64, index: usize) -> f64 {
    v_min + index as f64 * step
}

enum BandOutcome {
    Course(Course),
    NoOuterMaterial,
    NoSegments,
}

fn build_course(region: &FaceRegion, index: usize, v0: f64, v1: f64) -> BandOutcome {
    let outer_loops = clip_to_band(region.outer.points(), v0, v1);
    if outer_loops.is_empty() {
        return BandOutcome::NoOuterMaterial;
    }
    let hole_loops: Vec<UvLoop> = region
        .holes
        .iter()
        .flat_map(|h| clip_to_band(h.points(), v0, v1))
        .collect();

    let v_mid = 0.5 * (v0 + v1);
    let outer_segments: Vec<Segment> = outer_loops
        .iter()
        .flat_map(|l| horizontal_segments(l, v_mid))
        .collect();
    let hole_segments: Vec<Segment> = hole_loops
        .iter()
        .flat_map(|l| horizontal_segments(l, v_mid))
        .collect();
    let segments = subtract(outer_segments, &hole_segments);

    let Some(first) = segments.first() else {
        return BandOutcome::NoSegments;
    };
    let u_min = first.u_start;
    let u_max = segments.iter().map(|s| s.u_end).fold(first.u_end, f64::max);

    BandOutcome::Course(Course {
        index,
        v0,
        v1,
        outer_loops,
        hole_loops,
        segments,
        u_min,
        u_max,
    })
}

/// Segments where the horizontal line `v` crosses `lp`.
///
/// Vertices within [`Tolerance::CLIP`] of the line are snapped onto it first.
/// Crossings are then collected with a half-open rule (`min <= v < max`) so a
/// vertex on the line is counted once; horizontal edges never cross.
/// Sorted crossings are paired consecutively, which relies on `lp` being simple.
#[must_use]
pub fn horizontal_segments(lp: &UvLoop, v: f64) -> Vec<Segment> {
    let snap = |p_v: f64| if Tolerance::CLIP.approx_eq_f64(p_v, v) { v } else { p_v };

    let mut crossings: Vec<f64> = lp
        .edges()
        .filter_map(|(a, b)| {
            let (av, bv) = (snap(a.v), snap(b.v));
            let dv = bv - av;
            if dv.abs() < Tolerance::CLIP.eps {
                return None;
            }
            let (lo, hi) = if av < bv { (av, bv) } else { (bv, av) };
            if v < lo || v >= hi {
                return None;
            }
            let t = (v - av) / dv;
            Some(a.u + (b.u - a.u) * t)
        })
        .collect();
    crossings.sort_by(f64::total_cmp);

    crossings
        .chunks_exact(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect()
}

/// Subtract every hole segment from `segments`, one hole at a time.
///
/// Result is sorted by start and free of pieces narrower than the segment
/// tolerance.
#[must_use]
pub fn subtract(mut segments: Vec<Segment>, holes: &[Segment]) -> Vec<Segment> {
    segments.sort_by(|a, b| a.u_start.total_cmp(&b.u_start));
    for hole in holes {
        segments = segments
            .into_iter()
            .flat_map(|seg| subtract_one(seg, hole))
            .collect();
    }
    segments.retain(|s| s.width() >= MIN_SEGMENT_WIDTH);
    segments
}

fn subtract_one(seg: Segment, hole: &Segment) -> Vec<Segment> {
    if !seg.overlaps(hole) {
        return vec![seg];
    }
    let left = Segment::new(seg.u_start, hole.u_start.min(seg.u_end));
    let right = Segment::new(hole.u_end.max(seg.u_start), seg.u_end);
    [left, right]
        .into_iter()
        .filter(|piece| piece.width() >= MIN_SEGMENT_WIDTH)
        .collect()
}
