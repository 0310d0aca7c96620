//! Approximate boundary trimming of placed boards.
//!
//! Each board is classified by its four corners against the face region. Boards
//! with every corner on material are kept, boards with none are removed, and
//! the rest are kept and flagged for a precise trim that is not performed here.

use serde::{Deserialize, Serialize};

use crate::geom::{FaceRegion, Tolerance, UvPoint};

use super::packer::BoardPlacement;

/// Classification of a placed board against the face outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardStatus {
    /// Not yet classified (fresh from the packer).
    #[default]
    Unclassified,
    Inside,
    /// Straddles the outline or a hole; needs a precise trim downstream.
    Boundary,
}

/// Result of classifying one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerClass {
    Inside,
    Outside,
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryDiagnostics {
    pub inside: usize,
    pub boundary: usize,
    pub removed: usize,
}

impl BoundaryDiagnostics {
    #[must_use]
    pub fn kept(&self) -> usize {
        self.inside + self.boundary
    }
}

/// Corners of `placement` in (U,V): bottom-left, bottom-right, top-left, top-right.
#[must_use]
pub fn corners(placement: &BoardPlacement) -> [UvPoint; 4] {
    [
        UvPoint::new(placement.start_u, placement.v0),
        UvPoint::new(placement.end_u, placement.v0),
        UvPoint::new(placement.start_u, placement.v1),
        UvPoint::new(placement.end_u, placement.v1),
    ]
}

/// Classify `placement` by how many of its corners lie on material.
#[must_use]
pub fn classify(placement: &BoardPlacement, region: &FaceRegion) -> CornerClass {
    let inside = corners(placement)
        .iter()
        .filter(|c| region.contains(**c, Tolerance::CLIP))
        .count();
    match inside {
        4 => CornerClass::Inside,
        0 => CornerClass::Outside,
        _ => CornerClass::Mixed,
    }
}

/// Drop boards outside `region` and set the status of the survivors.
#[must_use]
pub fn trim_boards(placements: Vec<BoardPlacement>, region: &FaceRegion) -> Vec<BoardPlacement> {
    trim_boards_with_diagnostics(placements, region).0
}

#[must_use]
pub fn trim_boards_with_diagnostics(
    placements: Vec<BoardPlacement>,
    region: &FaceRegion,
) -> (Vec<BoardPlacement>, BoundaryDiagnostics) {
    let mut diagnostics = BoundaryDiagnostics::default();
    let mut kept = Vec::with_capacity(placements.len());

    for mut placement in placements {
        match classify(&placement, region) {
            CornerClass::Inside => {
                diagnostics.inside += 1;
                placement.status = BoardStatus::Inside;
                kept.push(placement);
            }
            CornerClass::Outside => {
                diagnostics.removed += 1;
                log::info!(
                    "removed board outside face: course {} u {:.1}..{:.1}",
                    placement.course_index,
                    placement.start_u,
                    placement.end_u
                );
            }
            CornerClass::Mixed => {
                diagnostics.boundary += 1;
                log::warn!(
                    "board on face boundary, deferred precise trim: course {} u {:.1}..{:.1}",
                    placement.course_index,
                    placement.start_u,
                    placement.end_u
                );
                placement.status = BoardStatus::Boundary;
                kept.push(placement);
            }
        }
    }

    (kept, diagnostics)
}
