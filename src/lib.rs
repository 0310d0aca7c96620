//! Feather-edge (bevel siding) layout for planar wall faces.
//!
//! A face is projected into a local (U,V) frame, cut into horizontal courses
//! and filled with staggered boards. The crate produces placements only; turning
//! them into scene geometry is left to the caller.
//!
//! ```no_run
//! use featheredge::cladding::{GenerateOptions, SidingParams, generate};
//! use featheredge::geom::{FacePolygon, Point3};
//!
//! let wall = FacePolygon::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(3000.0, 0.0, 0.0),
//!         Point3::new(3000.0, 0.0, 1000.0),
//!         Point3::new(0.0, 0.0, 1000.0),
//!     ],
//!     Vec::new(),
//! );
//! let cladding = generate(&wall, &SidingParams::default(), GenerateOptions::default())?;
//! println!("{} boards", cladding.boards.len());
//! # Ok::<(), featheredge::cladding::CladdingError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cladding;
pub mod geom;

pub use cladding::{Cladding, CladdingError, GenerateOptions, SidingParams, generate, regenerate};
pub use geom::{FacePolygon, Frame};

/// Crate version, written into generation records.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
