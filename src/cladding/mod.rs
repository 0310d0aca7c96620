//! Feather-edge siding layout on a projected face.
//!
//! Stages run in order: [`SidingParams::resolve`], [`tessellate`],
//! [`pack_course`], [`trim_boards`]. [`generate`] chains them for one face.

mod board;
mod boundary;
mod generator;
mod packer;
mod params;
mod record;
mod stripe;

pub use board::BoardProfile;
pub use boundary::{
    BoardStatus, BoundaryDiagnostics, CornerClass, classify, corners, trim_boards,
    trim_boards_with_diagnostics,
};
pub use generator::{
    Cladding, CladdingError, GenerateOptions, GenerationDiagnostics, WarningPolicy, generate,
    regenerate,
};
pub use packer::{
    BoardPlacement, PackError, StaggerParams, pack_course, pack_courses, stagger_offset,
};
pub use params::{
    DEFAULT_MATERIAL_NAME, Lod, Mode, ParamsError, ResolvedParams, SidingParams, StaggerMode,
};
pub use record::{GenerationRecord, RecordError, is_featheredge_json};
pub use stripe::{
    Course, Segment, StripeLayout, TessellateError, TessellationDiagnostics, horizontal_segments,
    subtract, tessellate, tessellate_with_diagnostics,
};

#[cfg(test)]
mod tests;
