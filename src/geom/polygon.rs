//! Flat polygon representations for faces and their projected loops.
//!
//! A face arrives as a [`FacePolygon`]: one outer loop and any number of hole
//! loops of world-space points on a common plane. Once projected through a
//! [`Frame`](super::Frame) every loop becomes a [`UvLoop`] in the local (U,V)
//! frame and the face becomes a [`FaceRegion`], which is what every later stage
//! works on. Nothing here keeps a reference to a live scene graph.
//!
//! Loops are implicitly closed: the last point connects back to the first.

use serde::{Deserialize, Serialize};

use super::core::{Point3, Tolerance, Vec3};

// ============================================================================
// UvPoint / UvDomain
// ============================================================================

/// A point in the local (U,V) frame of a face.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UvPoint {
    pub u: f64,
    pub v: f64,
}

impl UvPoint {
    #[must_use]
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.u.is_finite() && self.v.is_finite()
    }
}

impl From<(f64, f64)> for UvPoint {
    fn from((u, v): (f64, f64)) -> Self {
        Self::new(u, v)
    }
}

/// Axis-aligned extent in (U,V).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvDomain {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl UvDomain {
    #[must_use]
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    /// Domain covering every point, or `None` when the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = UvPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut domain = Self::new(first.u, first.u, first.v, first.v);
        for p in iter {
            domain.u_min = domain.u_min.min(p.u);
            domain.u_max = domain.u_max.max(p.u);
            domain.v_min = domain.v_min.min(p.v);
            domain.v_max = domain.v_max.max(p.v);
        }
        Some(domain)
    }

    #[must_use]
    pub fn u_span(&self) -> f64 {
        self.u_max - self.u_min
    }

    #[must_use]
    pub fn v_span(&self) -> f64 {
        self.v_max - self.v_min
    }
}

// ============================================================================
// UvLoop
// ============================================================================

/// A closed loop of (U,V) points.
///
/// No validation happens here: loops come either from projecting a face the
/// caller guarantees to be simple, or from clipping such a loop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UvLoop {
    points: Vec<UvPoint>,
}

impl UvLoop {
    #[must_use]
    pub fn new(points: Vec<UvPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[UvPoint] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<UvPoint> {
        self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the closed edge list, including the wrap edge from last to first.
    pub fn edges(&self) -> impl Iterator<Item = (UvPoint, UvPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    #[must_use]
    pub fn bounds(&self) -> Option<UvDomain> {
        UvDomain::from_points(self.points.iter().copied())
    }

    /// Shoelace area. Positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        0.5 * self
            .edges()
            .map(|(a, b)| a.u * b.v - b.u * a.v)
            .sum::<f64>()
    }

    /// Even-odd ray-casting test (ray towards +U).
    ///
    /// Points exactly on an edge are not resolved here; see
    /// [`UvLoop::contains_closed`] and [`UvLoop::contains_open`].
    #[must_use]
    pub fn crossing_test(&self, p: UvPoint) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.v > p.v) == (b.v > p.v) {
                continue;
            }
            let x = (b.u - a.u) * (p.v - a.v) / (b.v - a.v + Tolerance::RAY.eps) + a.u;
            if p.u < x {
                inside = !inside;
            }
        }
        inside
    }

    /// Inside test that counts points on the loop boundary as inside.
    #[must_use]
    pub fn contains_closed(&self, p: UvPoint, tol: Tolerance) -> bool {
        self.on_boundary(p, tol) || self.crossing_test(p)
    }

    /// Inside test that counts points on the loop boundary as outside.
    #[must_use]
    pub fn contains_open(&self, p: UvPoint, tol: Tolerance) -> bool {
        !self.on_boundary(p, tol) && self.crossing_test(p)
    }

    #[must_use]
    pub fn on_boundary(&self, p: UvPoint, tol: Tolerance) -> bool {
        self.points.len() >= 2 && self.edges().any(|(a, b)| point_on_segment(p, a, b, tol))
    }
}

fn point_on_segment(p: UvPoint, a: UvPoint, b: UvPoint, tol: Tolerance) -> bool {
    let ab_u = b.u - a.u;
    let ab_v = b.v - a.v;
    let ap_u = p.u - a.u;
    let ap_v = p.v - a.v;

    let ab_len2 = ab_u * ab_u + ab_v * ab_v;
    if ab_len2 == 0.0 {
        return ap_u.abs() <= tol.eps && ap_v.abs() <= tol.eps;
    }

    // Distance from the supporting line, scaled back to length units.
    let cross = ab_u * ap_v - ab_v * ap_u;
    if cross.abs() > tol.eps * ab_len2.sqrt() {
        return false;
    }

    let dot = ap_u * ab_u + ap_v * ab_v;
    dot >= -tol.eps && dot <= ab_len2 + tol.eps
}

// ============================================================================
// FaceRegion
// ============================================================================

/// A face in local coordinates: one outer loop minus its holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceRegion {
    pub outer: UvLoop,
    #[serde(default)]
    pub holes: Vec<UvLoop>,
}

impl FaceRegion {
    #[must_use]
    pub fn new(outer: UvLoop, holes: Vec<UvLoop>) -> Self {
        Self { outer, holes }
    }

    /// Every loop, outer first.
    pub fn loops(&self) -> impl Iterator<Item = &UvLoop> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Extent over every vertex of every loop.
    #[must_use]
    pub fn bounds(&self) -> Option<UvDomain> {
        UvDomain::from_points(self.loops().flat_map(|l| l.points().iter().copied()))
    }

    /// Whether `p` lies on solid material: inside (or on) the outer loop and
    /// strictly outside every hole.
    #[must_use]
    pub fn contains(&self, p: UvPoint, tol: Tolerance) -> bool {
        self.outer.contains_closed(p, tol) && !self.holes.iter().any(|h| h.contains_open(p, tol))
    }
}

// ============================================================================
// FacePolygon
// ============================================================================

/// A planar face in world coordinates, as handed over by face selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacePolygon {
    pub outer: Vec<Point3>,
    #[serde(default)]
    pub holes: Vec<Vec<Point3>>,
}

impl FacePolygon {
    #[must_use]
    pub fn new(outer: Vec<Point3>, holes: Vec<Vec<Point3>>) -> Self {
        Self { outer, holes }
    }

    /// Every vertex of every loop, outer loop first.
    pub fn vertices(&self) -> impl Iterator<Item = Point3> + '_ {
        self.outer.iter().chain(self.holes.iter().flatten()).copied()
    }

    /// Newell normal of the outer loop, or `None` for a degenerate loop.
    ///
    /// Follows the winding of the outer loop: counter-clockwise when seen from
    /// the returned direction.
    #[must_use]
    pub fn normal(&self) -> Option<Vec3> {
        let n = self.outer.len();
        if n < 3 {
            return None;
        }
        let mut acc = Vec3::ZERO;
        for i in 0..n {
            let a = self.outer[i];
            let b = self.outer[(i + 1) % n];
            acc.x += (a.y - b.y) * (a.z + b.z);
            acc.y += (a.z - b.z) * (a.x + b.x);
            acc.z += (a.x - b.x) * (a.y + b.y);
        }
        acc.normalized()
    }

    /// Direction of the longest edge of the outer loop (not normalized). Ties
    /// resolve to the earliest edge.
    #[must_use]
    pub fn longest_edge_direction(&self) -> Option<Vec3> {
        let n = self.outer.len();
        (0..n)
            .map(|i| self.outer[(i + 1) % n] - self.outer[i])
            .reduce(|best, edge| if edge.length() > best.length() { edge } else { best })
    }
}
