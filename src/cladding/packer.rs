//! Course packing: lay boards of a fixed length along each course segment.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::geom::{Frame, Tolerance, Transform};

use super::boundary::BoardStatus;
use super::params::StaggerMode;
use super::stripe::{Course, Segment};

/// Boards ending this close to the segment start are skipped.
const SEGMENT_EPS: f64 = Tolerance::SEGMENT.eps;
/// Shorter clamped boards are not emitted.
const MIN_BOARD_LENGTH: f64 = Tolerance::BOARD.eps;

const MIN_JOINT_CAP: f64 = 0.45;
const MIN_JOINT_FALLBACK: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PackError {
    #[error("board length must be positive, got {0}")]
    InvalidBoardLength(f64),
}

/// Stagger settings shared by every course of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerParams {
    pub mode: StaggerMode,
    pub seed: u64,
    pub min_joint: f64,
}

impl Default for StaggerParams {
    fn default() -> Self {
        Self {
            mode: StaggerMode::None,
            seed: 0,
            min_joint: 200.0,
        }
    }
}

/// A board to be materialized: its course, U range and V band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardPlacement {
    pub course_index: usize,
    pub start_u: f64,
    pub end_u: f64,
    pub v0: f64,
    pub v1: f64,
    /// Factor applied along U to a nominal board to obtain this one.
    pub scale: f64,
    pub status: BoardStatus,
}

impl BoardPlacement {
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end_u - self.start_u
    }

    /// Placement of the nominal board: the frame at `(start_u, v0)` with a
    /// U-only scale applied first.
    #[must_use]
    pub fn transform(&self, frame: &Frame) -> Transform {
        frame
            .transformation_at(self.start_u, self.v0)
            .compose(Transform::scale(self.scale, 1.0, 1.0))
    }

    /// Display name, numbered by course from 1.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Board {}", self.course_index + 1)
    }
}

/// Horizontal offset of the first board of course `index`.
///
/// Pure in `(params, index, board_length)`: the random policy seeds a fresh
/// generator from `seed + index` on every call.
#[must_use]
pub fn stagger_offset(params: &StaggerParams, index: usize, board_length: f64) -> f64 {
    match params.mode {
        StaggerMode::None => 0.0,
        StaggerMode::Half => {
            if index % 2 == 1 {
                board_length / 2.0
            } else {
                0.0
            }
        }
        StaggerMode::Random => random_offset(params, index, board_length),
    }
}

fn random_offset(params: &StaggerParams, index: usize, board_length: f64) -> f64 {
    let mut min_joint = params.min_joint.min(board_length * MIN_JOINT_CAP);
    if min_joint >= board_length {
        min_joint = board_length * MIN_JOINT_FALLBACK;
    }
    let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(index as u64));
    let offset = rng.random::<f64>() * board_length;
    offset.max(min_joint).min(board_length - min_joint)
}

/// Place boards along every segment of `course`.
///
/// # Errors
/// [`PackError::InvalidBoardLength`] unless `board_length` is positive and finite.
pub fn pack_course(
    course: &Course,
    board_length: f64,
    stagger: &StaggerParams,
) -> Result<Vec<BoardPlacement>, PackError> {
    if !(board_length.is_finite() && board_length > 0.0) {
        return Err(PackError::InvalidBoardLength(board_length));
    }

    let offset = stagger_offset(stagger, course.index, board_length);
    let mut placements = Vec::new();
    for segment in &course.segments {
        pack_segment(course, segment, board_length, offset, &mut placements);
    }
    log::debug!(
        "course {}: {} boards over {} segments (offset {offset:.1})",
        course.index,
        placements.len(),
        course.segments.len()
    );
    Ok(placements)
}

/// Pack every course in order.
///
/// # Errors
/// See [`pack_course`].
pub fn pack_courses(
    courses: &[Course],
    board_length: f64,
    stagger: &StaggerParams,
) -> Result<Vec<BoardPlacement>, PackError> {
    let mut placements = Vec::new();
    for course in courses {
        placements.extend(pack_course(course, board_length, stagger)?);
    }
    Ok(placements)
}

fn pack_segment(
    course: &Course,
    segment: &Segment,
    board_length: f64,
    offset: f64,
    out: &mut Vec<BoardPlacement>,
) {
    // Every clamped board would fall under the emit threshold.
    if board_length <= MIN_BOARD_LENGTH {
        return;
    }
    let (left, right) = (segment.u_start, segment.u_end);
    let first = left - offset;

    for n in 0_usize.. {
        let u = board_edge(first, board_length, n);
        if u >= right + board_length {
            break;
        }
        let start = u.max(left);
        let end = (u + board_length).min(right);

        if end <= left - SEGMENT_EPS {
            continue;
        }
        if start >= right - SEGMENT_EPS {
            break;
        }

        let length = end - start;
        if length > MIN_BOARD_LENGTH {
            out.push(BoardPlacement {
                course_index: course.index,
                start_u: start,
                end_u: end,
                v0: course.v0,
                v1: course.v1,
                scale: length / board_length,
                status: BoardStatus::Unclassified,
            });
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn board_edge(first: f64, board_length: f64, n: usize) -> f64 {
    first + n as f64 * board_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_stagger_only_moves_odd_courses() {
        let params = StaggerParams {
            mode: StaggerMode::Half,
            ..StaggerParams::default()
        };
        assert_eq!(stagger_offset(&params, 0, 2400.0), 0.0);
        assert_eq!(stagger_offset(&params, 3, 2400.0), 1200.0);
    }

    #[test]
    fn random_offset_respects_capped_min_joint() {
        // 500 exceeds 0.45 * 1000, so the joint margin is 450.
        let params = StaggerParams {
            mode: StaggerMode::Random,
            seed: 42,
            min_joint: 500.0,
        };
        for index in 0..50 {
            let o = stagger_offset(&params, index, 1000.0);
            assert!((450.0..=550.0).contains(&o), "offset {o} at {index}");
        }
    }

    #[test]
    fn random_offset_is_reproducible_per_index() {
        let params = StaggerParams {
            mode: StaggerMode::Random,
            seed: 1234,
            min_joint: 200.0,
        };
        let first: Vec<f64> = (0..8).map(|i| stagger_offset(&params, i, 2400.0)).collect();
        let second: Vec<f64> = (0..8).rev().map(|i| stagger_offset(&params, i, 2400.0)).collect();
        let second: Vec<f64> = second.into_iter().rev().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn placement_transform_scales_along_u_only() {
        use crate::geom::{FacePolygon, Point3};

        let face = FacePolygon::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3000.0, 0.0, 0.0),
                Point3::new(3000.0, 0.0, 1000.0),
                Point3::new(0.0, 0.0, 1000.0),
            ],
            Vec::new(),
        );
        let frame = Frame::new(&face, None);
        let placement = BoardPlacement {
            course_index: 2,
            start_u: 100.0,
            end_u: 1300.0,
            v0: 200.0,
            v1: 300.0,
            scale: 0.5,
            status: BoardStatus::Unclassified,
        };
        let t = placement.transform(&frame);
        let far_end = t.apply_point(Point3::new(2400.0, 0.0, 0.0));
        assert!(Tolerance::CLIP.approx_eq_vec3(far_end.to_vec3(), Point3::new(1300.0, 0.0, 200.0).to_vec3()));
        let top = t.apply_point(Point3::new(0.0, 100.0, 0.0));
        assert!(Tolerance::CLIP.approx_eq_vec3(top.to_vec3(), Point3::new(100.0, 0.0, 300.0).to_vec3()));
        assert_eq!(placement.label(), "Board 3");
    }
}
