//! Local (U,V) coordinate frame on the plane of a face.
//!
//! U runs along the boards, V up the wall, and the normal points out of the
//! face. The frame is built once per face and then shared read-only by every
//! stage of a generation run; [`Frame::flipped`] produces a new frame rather
//! than mutating an existing one.

use serde::{Deserialize, Serialize};

use super::core::{Point3, Transform, Vec3};
use super::polygon::{FacePolygon, FaceRegion, UvDomain, UvLoop, UvPoint};

/// Serializable snapshot of a frame's origin and axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub origin: [f64; 3],
    pub u_axis: [f64; 3],
    pub v_axis: [f64; 3],
    pub normal: [f64; 3],
}

/// Right-handed orthonormal frame on a face plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    origin: Point3,
    u_axis: Vec3,
    v_axis: Vec3,
    normal: Vec3,
    vertices: Vec<Point3>,
    to_world: Transform,
    to_local: Transform,
}

impl Frame {
    /// Build a frame for `face`.
    ///
    /// The origin is the first outer vertex and U follows `reference_direction`
    /// when given (projected into the face plane), otherwise the longest outer
    /// edge. The face must be planar with at least three non-degenerate
    /// vertices; degenerate input falls back to the world axes instead of
    /// producing NaNs.
    #[must_use]
    pub fn new(face: &FacePolygon, reference_direction: Option<Vec3>) -> Self {
        let origin = face.outer.first().copied().unwrap_or(Point3::ORIGIN);
        let normal = face.normal().unwrap_or(Vec3::Z);

        let u_axis = reference_direction
            .or_else(|| face.longest_edge_direction())
            .and_then(|dir| dir.reject_from(normal).normalized())
            .unwrap_or_else(|| fallback_u_axis(normal));

        let mut v_axis = normal.cross(u_axis).normalized().unwrap_or(Vec3::Y);
        if u_axis.cross(v_axis).dot(normal) < 0.0 {
            v_axis = -v_axis;
        }

        Self::assemble(origin, u_axis, v_axis, normal, face.vertices().collect())
    }

    /// Rebuild the frame of `face`, adopting the stored axes from `record` when
    /// it carries them.
    ///
    /// The stored U is projected into the stored plane and V is recomputed as
    /// `normal x U`, so a drifted or hand-edited record still yields an
    /// orthonormal right-handed frame.
    #[must_use]
    pub fn restore(face: &FacePolygon, record: Option<&FrameRecord>) -> Self {
        let derived = Self::new(face, None);
        let Some(record) = record else {
            return derived;
        };

        let normal = Vec3::from(record.normal)
            .normalized()
            .unwrap_or(derived.normal);
        let u_axis = Vec3::from(record.u_axis)
            .reject_from(normal)
            .normalized();
        let v_axis = u_axis.and_then(|u| normal.cross(u).normalized());
        match (u_axis, v_axis) {
            (Some(u_axis), Some(mut v_axis)) => {
                if u_axis.cross(v_axis).dot(normal) < 0.0 {
                    v_axis = -v_axis;
                }
                Self::assemble(derived.origin, u_axis, v_axis, normal, derived.vertices)
            }
            _ => {
                log::warn!("stored frame axes are degenerate, re-deriving from face");
                derived
            }
        }
    }

    fn assemble(
        origin: Point3,
        u_axis: Vec3,
        v_axis: Vec3,
        normal: Vec3,
        vertices: Vec<Point3>,
    ) -> Self {
        Self {
            origin,
            u_axis,
            v_axis,
            normal,
            vertices,
            to_world: Transform::from_axes(origin, u_axis, v_axis, normal),
            to_local: Transform::rigid_inverse_of_axes(origin, u_axis, v_axis, normal),
        }
    }

    /// Same plane and origin with U reversed; V is recomputed as `normal x U`.
    #[must_use]
    pub fn flipped(&self) -> Self {
        let u_axis = -self.u_axis;
        let v_axis = self.normal.cross(u_axis).normalized().unwrap_or(-self.v_axis);
        Self::assemble(self.origin, u_axis, v_axis, self.normal, self.vertices.clone())
    }

    #[must_use]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    #[must_use]
    pub fn u_axis(&self) -> Vec3 {
        self.u_axis
    }

    #[must_use]
    pub fn v_axis(&self) -> Vec3 {
        self.v_axis
    }

    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// World-to-local placement; the local Z is the offset along the normal.
    #[must_use]
    pub fn to_local_transform(&self) -> Transform {
        self.to_local
    }

    #[must_use]
    pub fn to_world_transform(&self) -> Transform {
        self.to_world
    }

    #[must_use]
    pub fn to_local(&self, point: Point3) -> UvPoint {
        let local = self.to_local.apply_point(point);
        UvPoint::new(local.x, local.y)
    }

    #[must_use]
    pub fn to_world(&self, uv: UvPoint) -> Point3 {
        self.to_world.apply_point(Point3::new(uv.u, uv.v, 0.0))
    }

    /// Local extent of every vertex of the face this frame was built for.
    #[must_use]
    pub fn bounds(&self) -> UvDomain {
        UvDomain::from_points(self.vertices.iter().map(|p| self.to_local(*p)))
            .unwrap_or(UvDomain::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Placement at `(u, v)` with axes U, V, normal.
    #[must_use]
    pub fn transformation_at(&self, u: f64, v: f64) -> Transform {
        let point = self.origin + self.u_axis * u + self.v_axis * v;
        Transform::from_axes(point, self.u_axis, self.v_axis, self.normal)
    }

    /// Project every loop of `face` into this frame.
    #[must_use]
    pub fn project(&self, face: &FacePolygon) -> FaceRegion {
        let project_loop =
            |points: &[Point3]| UvLoop::new(points.iter().map(|p| self.to_local(*p)).collect());
        FaceRegion::new(
            project_loop(&face.outer),
            face.holes.iter().map(|h| project_loop(h)).collect(),
        )
    }

    #[must_use]
    pub fn to_record(&self) -> FrameRecord {
        FrameRecord {
            origin: self.origin.to_array(),
            u_axis: self.u_axis.to_array(),
            v_axis: self.v_axis.to_array(),
            normal: self.normal.to_array(),
        }
    }
}

fn fallback_u_axis(normal: Vec3) -> Vec3 {
    let candidate = if normal.dot(Vec3::X).abs() < 0.9 { Vec3::X } else { Vec3::Y };
    candidate.reject_from(normal).normalized().unwrap_or(Vec3::X)
}
