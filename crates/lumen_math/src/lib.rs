//! Lumen math - glam re-exports plus the small geometric helpers the
//! tracer needs (intervals, boxes, object transforms).

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use transform::{euler_rotation, Transform, TransformError};

/// Small constant used for parallel/degenerate rejection and to keep
/// secondary rays from re-hitting the surface they start on.
pub const EPSILON: f32 = 1e-5;
