//! Nominal feather-edge board shape.
//!
//! Board-local axes: x along the board, y up the wall, z out of the wall. The
//! thick edge sits at the top of the course.

use crate::geom::{Frame, Point3};

use super::packer::BoardPlacement;
use super::params::ResolvedParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardProfile {
    /// Height of the board (the course step).
    pub step: f64,
    pub t_top: f64,
    pub t_bot: f64,
    pub length: f64,
}

impl From<&ResolvedParams> for BoardProfile {
    fn from(params: &ResolvedParams) -> Self {
        Self {
            step: params.step,
            t_top: params.t_top,
            t_bot: params.t_bot,
            length: params.board_length,
        }
    }
}

impl BoardProfile {
    /// Profile quadrilateral in the x = 0 plane: bottom back, top back, top
    /// face, bottom face.
    #[must_use]
    pub fn cross_section(&self) -> [Point3; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, self.step, 0.0),
            Point3::new(0.0, self.step, self.t_top),
            Point3::new(0.0, 0.0, self.t_bot),
        ]
    }

    /// The cross-section followed by its copy extruded `length` along x.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let section = self.cross_section();
        let mut out = [Point3::ORIGIN; 8];
        for (i, p) in section.iter().enumerate() {
            out[i] = *p;
            out[i + 4] = Point3::new(p.x + self.length, p.y, p.z);
        }
        out
    }

    /// World-space corners of the nominal board placed by `placement`.
    #[must_use]
    pub fn placed_corners(&self, placement: &BoardPlacement, frame: &Frame) -> [Point3; 8] {
        let transform = placement.transform(frame);
        self.corners().map(|p| transform.apply_point(p))
    }

    /// Shared definition name; boards with equal dimensions share one.
    #[must_use]
    pub fn definition_name(&self) -> String {
        format!(
            "FeatherEdge Board W{} T{} B{}",
            round3(self.step),
            round3(self.t_top),
            round3(self.t_bot)
        )
    }

    /// Trapezoid area of the cross-section.
    #[must_use]
    pub fn section_area(&self) -> f64 {
        0.5 * self.step * (self.t_top + self.t_bot)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
