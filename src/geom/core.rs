use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

/// Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Unit vector in the same direction, or `None` for zero/non-finite input.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }

    /// Remove the component along `normal` (expected to be a unit vector).
    #[must_use]
    pub fn reject_from(self, normal: Self) -> Self {
        self - normal * self.dot(normal)
    }

    #[must_use]
    pub const fn mul_scalar(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        self.mul_scalar(rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Row-major affine 4x4 matrix. Columns 0..3 hold the mapped axes, column 3 the
/// translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [[f64; 4]; 4],
}

impl Transform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Placement whose local X/Y/Z map to `x_axis`/`y_axis`/`z_axis` at `origin`.
    #[must_use]
    pub fn from_axes(origin: Point3, x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        Self {
            m: [
                [x_axis.x, y_axis.x, z_axis.x, origin.x],
                [x_axis.y, y_axis.y, z_axis.y, origin.y],
                [x_axis.z, y_axis.z, z_axis.z, origin.z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Inverse of [`Transform::from_axes`] for an orthonormal frame.
    ///
    /// Uses the transpose of the rotation block, so it is only valid when the
    /// three axes are unit length and mutually perpendicular.
    #[must_use]
    pub fn rigid_inverse_of_axes(origin: Point3, x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        let o = origin.to_vec3();
        Self {
            m: [
                [x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(o)],
                [y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(o)],
                [z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(o)],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            m: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// `self * other`: applies `other` first.
    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        let mut result = Self::identity();
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        result
    }

    #[must_use]
    pub fn translation(self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    #[must_use]
    pub fn apply_point(self, p: Point3) -> Point3 {
        let v = self.apply_vec(p.to_vec3()) + self.translation();
        Point3::new(v.x, v.y, v.z)
    }

    #[must_use]
    pub fn apply_vec(self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    #[must_use]
    pub const fn as_matrix(&self) -> &[[f64; 4]; 4] {
        &self.m
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for the layout pipeline.
///
/// The named constants pin the thresholds each stage relies on:
/// - `Tolerance::CLIP` - band clipping and crossing classification (1e-6)
/// - `Tolerance::SEGMENT` - minimum surviving segment width after hole subtraction (1e-4)
/// - `Tolerance::BOARD` - minimum emitted board length (1e-3)
/// - `Tolerance::RAY` - ray-casting denominator guard (1e-9)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    pub const CLIP: Self = Self { eps: 1e-6 };
    pub const SEGMENT: Self = Self { eps: 1e-4 };
    pub const BOARD: Self = Self { eps: 1e-3 };
    pub const RAY: Self = Self { eps: 1e-9 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_vec3(self, a: Vec3, b: Vec3) -> bool {
        (a - b).length() <= self.eps
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::CLIP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_cross_is_right_handed() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
    }

    #[test]
    fn test_vec3_reject_from_plane_normal() {
        let v = Vec3::new(3.0, 4.0, 5.0);
        assert_eq!(v.reject_from(Vec3::Z), Vec3::new(3.0, 4.0, 0.0));
        assert!(Vec3::ZERO.normalized().is_none());
    }

    #[test]
    fn test_transform_rigid_inverse_round_trips() {
        let origin = Point3::new(10.0, -2.0, 5.0);
        let x = Vec3::new(0.0, 1.0, 0.0);
        let y = Vec3::new(0.0, 0.0, 1.0);
        let z = Vec3::new(1.0, 0.0, 0.0);
        let forward = Transform::from_axes(origin, x, y, z);
        let inverse = Transform::rigid_inverse_of_axes(origin, x, y, z);

        let p = Point3::new(1.5, 2.5, -3.5);
        let back = inverse.apply_point(forward.apply_point(p));
        assert!(p.distance_to(back) < 1e-12);
    }

    #[test]
    fn test_transform_compose_applies_right_operand_first() {
        let place = Transform::from_axes(Point3::new(1.0, 0.0, 0.0), Vec3::X, Vec3::Y, Vec3::Z);
        let stretch = Transform::scale(2.0, 1.0, 1.0);
        let p = (place * stretch).apply_point(Point3::new(3.0, 1.0, 0.0));
        assert_eq!(p, Point3::new(7.0, 1.0, 0.0));
    }
}
