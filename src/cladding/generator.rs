//! End-to-end generation: frame, resolution, tessellation, packing, trimming.

use serde_json::{Map, Value};

use crate::geom::{FacePolygon, Frame, Vec3};

use super::board::BoardProfile;
use super::boundary::{BoundaryDiagnostics, trim_boards_with_diagnostics};
use super::packer::{BoardPlacement, PackError, pack_courses};
use super::params::{Mode, ParamsError, ResolvedParams, SidingParams};
use super::record::{GenerationRecord, RecordError};
use super::stripe::{Course, StripeLayout, TessellateError, TessellationDiagnostics, tessellate_with_diagnostics};

/// Inputs whose change invalidates previously derived step and thickness.
const STEP_INPUTS: [&str; 6] = ["mode", "t_top", "angle_deg", "course_count", "base_offset", "top_offset"];
const DERIVED_FIELDS: [&str; 3] = ["step", "t_bot", "reveal"];

#[derive(Debug, thiserror::Error)]
pub enum CladdingError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Tessellate(#[from] TessellateError),
    #[error(transparent)]
    Pack(#[from] PackError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("invalid parameter overrides: {0}")]
    Overrides(#[source] serde_json::Error),
    #[error("parameter warnings rejected: {}", .0.join("; "))]
    RejectedWarnings(Vec<String>),
}

/// What to do when parameter resolution produced warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningPolicy {
    /// Generate anyway; warnings are returned with the result.
    Accept,
    /// Abort with [`CladdingError::RejectedWarnings`].
    #[default]
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Board direction; the longest outer edge when absent.
    pub reference_direction: Option<Vec3>,
    /// Pre-built frame (flipped or restored), overriding `reference_direction`.
    pub frame: Option<Frame>,
    pub warning_policy: WarningPolicy,
    pub face_id: Option<String>,
}

impl GenerateOptions {
    #[must_use]
    pub fn accept_warnings() -> Self {
        Self {
            warning_policy: WarningPolicy::Accept,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationDiagnostics {
    pub tessellation: TessellationDiagnostics,
    pub packed: usize,
    pub boundary: BoundaryDiagnostics,
}

/// Everything a materialization step needs for one face.
#[derive(Debug, Clone)]
pub struct Cladding {
    pub frame: Frame,
    /// Parameters as supplied.
    pub params: SidingParams,
    pub resolved: ResolvedParams,
    pub profile: BoardProfile,
    pub courses: Vec<Course>,
    pub boards: Vec<BoardPlacement>,
    pub diagnostics: GenerationDiagnostics,
    pub warnings: Vec<String>,
    pub face_id: Option<String>,
}

impl Cladding {
    /// Metadata to persist for a later edit.
    #[must_use]
    pub fn record(&self) -> GenerationRecord {
        GenerationRecord::new(self.resolved.to_params(), self.face_id.clone(), self.frame.to_record())
    }

    #[must_use]
    pub fn boundary_boards(&self) -> usize {
        self.diagnostics.boundary.boundary
    }
}

/// Generate cladding for `face`.
///
/// # Errors
/// [`CladdingError::RejectedWarnings`] under [`WarningPolicy::Reject`] when
/// resolution warned, and any tessellation or packing failure. Nothing partial
/// is returned.
pub fn generate(
    face: &FacePolygon,
    params: &SidingParams,
    options: GenerateOptions,
) -> Result<Cladding, CladdingError> {
    run(face, params, options).inspect_err(|e| log::warn!("cladding generation failed: {e}"))
}

/// Re-run generation from a stored record, with `overrides` merged over the
/// stored parameters.
///
/// The frame is restored from the record unless `options.frame` is set. When an
/// override changes an input of the step derivation, the stored derived values
/// are dropped so they are computed afresh.
///
/// # Errors
/// [`CladdingError::Overrides`] for malformed overrides, otherwise as
/// [`generate`].
pub fn regenerate(
    face: &FacePolygon,
    record: &GenerationRecord,
    overrides: Option<&Value>,
    mut options: GenerateOptions,
) -> Result<Cladding, CladdingError> {
    let params = match overrides {
        Some(patch) => record
            .params
            .with_overrides(&effective_overrides(&record.params, patch))
            .map_err(CladdingError::Overrides)?,
        None => record.params.clone(),
    };
    if options.frame.is_none() {
        options.frame = Some(Frame::restore(face, Some(&record.frame)));
    }
    if options.face_id.is_none() {
        options.face_id.clone_from(&record.face_id);
    }
    generate(face, &params, options)
}

fn effective_overrides(stored: &SidingParams, patch: &Value) -> Value {
    let Some(patch) = patch.as_object() else {
        return patch.clone();
    };
    let mut merged: Map<String, Value> = patch.clone();
    if STEP_INPUTS.iter().any(|k| patch.contains_key(*k)) {
        for key in DERIVED_FIELDS {
            merged.entry(key).or_insert(Value::Null);
        }
        let board_mode = match patch.get("mode").and_then(Value::as_str) {
            Some(mode) => mode.parse::<Mode>().is_ok_and(|m| m == Mode::Board),
            None => stored.mode == Mode::Board,
        };
        if board_mode {
            merged.entry("course_count").or_insert(Value::Null);
        }
    }
    Value::Object(merged)
}

fn run(
    face: &FacePolygon,
    params: &SidingParams,
    options: GenerateOptions,
) -> Result<Cladding, CladdingError> {
    let GenerateOptions {
        reference_direction,
        frame,
        warning_policy,
        face_id,
    } = options;

    let frame = frame.unwrap_or_else(|| Frame::new(face, reference_direction));
    let region = frame.project(face);
    let face_height = frame.bounds().v_span();
    log::info!(
        "generating {} cladding: face height {face_height:.1} mm, {} hole(s)",
        params.mode,
        region.holes.len()
    );

    let resolved = params.resolve(face_height);
    if !resolved.is_valid() && warning_policy == WarningPolicy::Reject {
        return Err(CladdingError::RejectedWarnings(resolved.warnings));
    }

    let (courses, tessellation) = tessellate_with_diagnostics(&region, StripeLayout::from(&resolved))?;
    let packed = pack_courses(&courses, resolved.board_length, &resolved.stagger())?;
    let packed_count = packed.len();
    let (boards, boundary) = trim_boards_with_diagnostics(packed, &region);

    log::info!(
        "generated {} boards in {} courses ({} on boundary, {} removed)",
        boards.len(),
        courses.len(),
        boundary.boundary,
        boundary.removed
    );

    Ok(Cladding {
        profile: BoardProfile::from(&resolved),
        warnings: resolved.warnings.clone(),
        frame,
        params: params.clone(),
        resolved,
        courses,
        boards,
        diagnostics: GenerationDiagnostics {
            tessellation,
            packed: packed_count,
            boundary,
        },
        face_id,
    })
}
