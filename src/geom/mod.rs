mod clip;
mod core;
mod frame;
mod polygon;

pub use clip::{ClipSide, clip_loop, clip_loop_with_tolerance, clip_to_band};
pub use core::{Point3, Tolerance, Transform, Vec3};
pub use frame::{Frame, FrameRecord};
pub use polygon::{FacePolygon, FaceRegion, UvDomain, UvLoop, UvPoint};

#[cfg(test)]
mod tests;
