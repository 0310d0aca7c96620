//! Siding parameters and their resolution into concrete layout constants.
//!
//! [`SidingParams`] is the user-facing configuration (all lengths in
//! millimetres, angles in degrees). [`SidingParams::resolve`] turns it into a
//! [`ResolvedParams`] for one face height: course step, bottom thickness and
//! course count, plus an accumulated list of advisory warnings. Warnings never
//! stop resolution; callers decide whether they block generation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::packer::StaggerParams;

/// Default material used when the caller names none.
pub const DEFAULT_MATERIAL_NAME: &str = "Cladding - Wood";

const STEP_FACTOR: f64 = 1.4;
const STEP_MIN: f64 = 40.0;
const STEP_MAX: f64 = 400.0;
const T_BOT_FLOOR: f64 = 2.0;
const T_TOP_MIN: f64 = 8.0;
const T_TOP_MAX: f64 = 40.0;
const BOARD_LENGTH_MIN: f64 = 600.0;
const REMAINDER_FRACTION: f64 = 0.3;
const COURSE_COUNT_MAX: u32 = 600;
const SEED_RANGE: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    #[error("unknown mode `{0}` (expected `board` or `tiling`)")]
    UnknownMode(String),
    #[error("unknown stagger mode `{0}` (expected `none`, `half` or `random`)")]
    UnknownStaggerMode(String),
}

/// How the course step is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Step follows from top thickness and angle.
    #[default]
    Board,
    /// Step follows from a fixed course count.
    Tiling,
}

impl FromStr for Mode {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "board" => Ok(Self::Board),
            "tiling" => Ok(Self::Tiling),
            _ => Err(ParamsError::UnknownMode(s.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Board => "board",
            Self::Tiling => "tiling",
        })
    }
}

/// Horizontal joint offset policy between courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerMode {
    None,
    /// Half a board on odd courses.
    #[default]
    Half,
    /// Seeded per-course offset kept `min_joint` away from board ends.
    Random,
}

impl FromStr for StaggerMode {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "half" => Ok(Self::Half),
            "random" => Ok(Self::Random),
            _ => Err(ParamsError::UnknownStaggerMode(s.to_owned())),
        }
    }
}

impl fmt::Display for StaggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Half => "half",
            Self::Random => "random",
        })
    }
}

/// Preview level-of-detail hint, 0 through 2. Not read by the geometry core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lod(u8);

impl Lod {
    pub const LEVELS: u8 = 3;

    /// Clamps out-of-range levels to the highest one.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::LEVELS - 1))
    }

    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Next level, wrapping back to 0.
    #[must_use]
    pub fn cycled(self) -> Self {
        Self((self.0 + 1) % Self::LEVELS)
    }
}

impl Default for Lod {
    fn default() -> Self {
        Self(2)
    }
}

/// Siding configuration as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidingParams {
    pub mode: Mode,
    /// Thickness at the thick (upper) edge of a board.
    pub t_top: f64,
    /// Thickness at the thin (lower) edge; derived when absent.
    pub t_bot: Option<f64>,
    pub angle_deg: f64,
    pub board_length: f64,
    /// Fixed course count for tiling mode.
    pub course_count: Option<u32>,
    /// Explicit course step for board mode (still clamped).
    pub step: Option<f64>,
    pub reveal: Option<f64>,
    pub min_joint: f64,
    pub stagger_mode: StaggerMode,
    /// Stagger seed; drawn once at resolution when absent.
    pub seed: Option<u64>,
    pub base_offset: f64,
    pub top_offset: f64,
    pub material_name: Option<String>,
    pub lod: Lod,
}

impl Default for SidingParams {
    fn default() -> Self {
        Self {
            mode: Mode::Board,
            t_top: 18.0,
            t_bot: None,
            angle_deg: 15.0,
            board_length: 2400.0,
            course_count: None,
            step: None,
            reveal: None,
            min_joint: 200.0,
            stagger_mode: StaggerMode::Half,
            seed: None,
            base_offset: 0.0,
            top_offset: 0.0,
            material_name: None,
            lod: Lod::default(),
        }
    }
}

impl SidingParams {
    /// Copy with fields replaced by those present in `overrides`, a JSON object
    /// using the same field names.
    ///
    /// # Errors
    /// Returns the deserialization error when an override has the wrong type or
    /// names an unknown mode.
    pub fn with_overrides(&self, overrides: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut merged = serde_json::to_value(self)?;
        if let (Some(base), Some(patch)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in patch {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(merged)
    }

    /// Height left for courses once base and top offsets are taken off.
    #[must_use]
    pub fn usable_height(&self, face_height: f64) -> f64 {
        (face_height - self.base_offset - self.top_offset).max(0.0)
    }

    /// Resolve derived constants for a face of the given local height.
    #[must_use]
    pub fn resolve(&self, face_height: f64) -> ResolvedParams {
        let usable_height = self.usable_height(face_height);
        let angle_rad = self.angle_deg.to_radians();
        let tan = angle_rad.tan();
        let mut warnings = Vec::new();

        let (mut step, raw_t_bot, reveal, course_count) = match self.mode {
            Mode::Board => {
                let mut step = clamp_step(self.step.unwrap_or_else(|| default_step(self.t_top, tan)));
                let t_bot = self
                    .t_bot
                    .unwrap_or_else(|| (self.t_top - step * tan).max(T_BOT_FLOOR));
                // Spread a short remainder over the full courses instead of
                // leaving it as a sliver on top.
                let remainder = usable_height % step;
                let full_courses = (usable_height / step).floor();
                if remainder > 0.0 && remainder < step * REMAINDER_FRACTION && full_courses >= 1.0 {
                    step += remainder / full_courses;
                }
                (step, t_bot, self.reveal, self.course_count)
            }
            Mode::Tiling => {
                let count = self.course_count.unwrap_or(1).clamp(1, COURSE_COUNT_MAX);
                let step = usable_height / f64::from(count);
                (step, self.t_top - step * tan, Some(step), Some(count))
            }
        };

        if raw_t_bot < 0.0 {
            warnings.push(format!("bottom thickness {raw_t_bot:.2} mm is negative"));
        }
        let t_bot = if raw_t_bot < T_BOT_FLOOR {
            warnings.push(format!("bottom thickness raised to {T_BOT_FLOOR} mm floor"));
            T_BOT_FLOOR
        } else {
            raw_t_bot
        };
        if self.t_top <= t_bot {
            warnings.push("top thickness must exceed bottom thickness".to_owned());
        }
        if !(T_TOP_MIN..=T_TOP_MAX).contains(&self.t_top) {
            warnings.push(format!(
                "top thickness {:.2} mm outside {T_TOP_MIN}-{T_TOP_MAX} mm range",
                self.t_top
            ));
        }
        if self.board_length < BOARD_LENGTH_MIN {
            warnings.push(format!(
                "board length {:.1} mm below {BOARD_LENGTH_MIN} mm minimum",
                self.board_length
            ));
        }

        if !step.is_finite() {
            step = 0.0;
        }
        let reveal = reveal.unwrap_or(step);
        let course_count = course_count.unwrap_or_else(|| default_course_count(usable_height, step));

        let seed = self.seed.unwrap_or_else(|| {
            let drawn = rand::rng().random_range(0..SEED_RANGE);
            log::info!("no stagger seed given, drew {drawn}");
            drawn
        });

        for warning in &warnings {
            log::warn!("siding parameters: {warning}");
        }

        ResolvedParams {
            mode: self.mode,
            t_top: self.t_top,
            t_bot,
            angle_deg: self.angle_deg,
            board_length: self.board_length,
            course_count,
            step,
            reveal,
            min_joint: self.min_joint,
            stagger_mode: self.stagger_mode,
            seed,
            base_offset: self.base_offset,
            top_offset: self.top_offset,
            material_name: self
                .material_name
                .clone()
                .unwrap_or_else(|| DEFAULT_MATERIAL_NAME.to_owned()),
            lod: self.lod,
            usable_height,
            warnings,
        }
    }
}

fn default_step(t_top: f64, tan: f64) -> f64 {
    clamp_step(t_top / tan * STEP_FACTOR)
}

fn clamp_step(value: f64) -> f64 {
    if value.is_nan() {
        return STEP_MIN;
    }
    value.clamp(STEP_MIN, STEP_MAX)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn default_course_count(usable_height: f64, step: f64) -> u32 {
    let count = if step > 0.0 { (usable_height / step).max(1.0).ceil() } else { 1.0 };
    count.min(f64::from(u32::MAX)) as u32
}

/// Concrete layout constants for one face.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    pub mode: Mode,
    pub t_top: f64,
    pub t_bot: f64,
    pub angle_deg: f64,
    pub board_length: f64,
    pub course_count: u32,
    /// Course height (reveal) used by the tessellator.
    pub step: f64,
    pub reveal: f64,
    pub min_joint: f64,
    pub stagger_mode: StaggerMode,
    pub seed: u64,
    pub base_offset: f64,
    pub top_offset: f64,
    pub material_name: String,
    pub lod: Lod,
    pub usable_height: f64,
    pub warnings: Vec<String>,
}

impl ResolvedParams {
    /// `true` when resolution produced no warnings.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.warnings.is_empty()
    }

    #[must_use]
    pub fn angle_rad(&self) -> f64 {
        self.angle_deg.to_radians()
    }

    /// Thickness lost across one course.
    #[must_use]
    pub fn delta_t(&self) -> f64 {
        self.step * self.angle_rad().tan()
    }

    #[must_use]
    pub fn height_for_courses(&self) -> f64 {
        f64::from(self.course_count) * self.step
    }

    #[must_use]
    pub fn stagger(&self) -> StaggerParams {
        StaggerParams {
            mode: self.stagger_mode,
            seed: self.seed,
            min_joint: self.min_joint,
        }
    }

    /// Fully populated parameters, as stored alongside generated cladding.
    #[must_use]
    pub fn to_params(&self) -> SidingParams {
        SidingParams {
            mode: self.mode,
            t_top: self.t_top,
            t_bot: Some(self.t_bot),
            angle_deg: self.angle_deg,
            board_length: self.board_length,
            course_count: Some(self.course_count),
            step: Some(self.step),
            reveal: Some(self.reveal),
            min_joint: self.min_joint,
            stagger_mode: self.stagger_mode,
            seed: Some(self.seed),
            base_offset: self.base_offset,
            top_offset: self.top_offset,
            material_name: Some(self.material_name.clone()),
            lod: self.lod,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SidingParams {
        SidingParams {
            seed: Some(7),
            ..SidingParams::default()
        }
    }

    #[test]
    fn default_board_mode_derives_step_and_bottom_thickness() {
        let resolved = seeded().resolve(1000.0);
        let tan = 15.0_f64.to_radians().tan();
        // 18 / tan(15deg) * 1.4 is about 94 mm, well inside the clamp.
        let base_step = 18.0 / tan * 1.4;
        assert!(resolved.step >= base_step);
        assert!(resolved.step < base_step * 1.3);
        assert!((resolved.t_bot - (18.0 - base_step * tan).max(2.0)).abs() < 1e-9);
        assert_eq!(resolved.reveal, resolved.step);
        assert!(resolved.is_valid(), "{:?}", resolved.warnings);
    }

    #[test]
    fn small_remainder_stretches_step() {
        let params = SidingParams {
            step: Some(100.0),
            ..seeded()
        };
        // 1010 leaves a 10 mm remainder, under 30% of a step: spread over 10 courses.
        let resolved = params.resolve(1010.0);
        assert!((resolved.step - 101.0).abs() < 1e-9);
        assert_eq!(resolved.course_count, 10);

        // 1050 leaves 50 mm, which is kept as a short last course.
        let resolved = params.resolve(1050.0);
        assert!((resolved.step - 100.0).abs() < 1e-12);
        assert_eq!(resolved.course_count, 11);
    }

    #[test]
    fn explicit_step_is_clamped() {
        let params = SidingParams {
            step: Some(1000.0),
            ..seeded()
        };
        assert!((params.resolve(4000.0).step - 400.0).abs() < 1e-12);
        let params = SidingParams {
            step: Some(5.0),
            ..seeded()
        };
        assert!((params.resolve(4000.0).step - 40.0).abs() < 1e-12);
    }

    #[test]
    fn tiling_mode_divides_usable_height() {
        let params = SidingParams {
            mode: Mode::Tiling,
            course_count: Some(8),
            base_offset: 100.0,
            top_offset: 100.0,
            ..seeded()
        };
        let resolved = params.resolve(1000.0);
        assert!((resolved.step - 100.0).abs() < 1e-12);
        assert_eq!(resolved.course_count, 8);
        assert_eq!(resolved.reveal, resolved.step);

        let params = SidingParams {
            mode: Mode::Tiling,
            course_count: Some(10_000),
            ..seeded()
        };
        assert_eq!(params.resolve(6000.0).course_count, 600);
    }

    #[test]
    fn thin_top_is_flagged_but_still_resolved() {
        let params = SidingParams {
            t_top: 5.0,
            ..seeded()
        };
        let resolved = params.resolve(1000.0);
        assert!(!resolved.is_valid());
        assert!(resolved.warnings.iter().any(|w| w.contains("top thickness 5.00")));
        assert!(resolved.step >= 40.0);
        assert!((resolved.t_bot - 2.0).abs() < 1e-12);
    }

    #[test]
    fn negative_bottom_thickness_is_warned_and_floored() {
        let params = SidingParams {
            t_bot: Some(-1.0),
            board_length: 500.0,
            ..seeded()
        };
        let resolved = params.resolve(1000.0);
        assert!((resolved.t_bot - 2.0).abs() < 1e-12);
        assert!(resolved.warnings.iter().any(|w| w.contains("negative")));
        assert!(resolved.warnings.iter().any(|w| w.contains("floor")));
        assert!(resolved.warnings.iter().any(|w| w.contains("board length")));
    }

    #[test]
    fn resolution_is_idempotent() {
        let params = seeded();
        assert_eq!(params.resolve(2750.0), params.resolve(2750.0));
    }

    #[test]
    fn modes_parse_case_insensitively_and_reject_unknown() {
        assert_eq!("Tiling".parse::<Mode>(), Ok(Mode::Tiling));
        assert_eq!("random".parse::<StaggerMode>(), Ok(StaggerMode::Random));
        assert_eq!(
            "shingle".parse::<Mode>(),
            Err(ParamsError::UnknownMode("shingle".to_owned()))
        );
        let json = serde_json::json!({ "mode": "shingle" });
        assert!(serde_json::from_value::<SidingParams>(json).is_err());
    }

    #[test]
    fn overrides_merge_over_existing_values() {
        let base = seeded();
        let merged = base
            .with_overrides(&serde_json::json!({ "stagger_mode": "random", "board_length": 3000.0 }))
            .unwrap();
        assert_eq!(merged.stagger_mode, StaggerMode::Random);
        assert!((merged.board_length - 3000.0).abs() < 1e-12);
        assert_eq!(merged.seed, Some(7));
    }

    #[test]
    fn lod_cycles_through_three_levels() {
        let lod = Lod::new(1);
        assert_eq!(lod.cycled().level(), 2);
        assert_eq!(lod.cycled().cycled().level(), 0);
        assert_eq!(Lod::new(9).level(), 2);
    }
}
