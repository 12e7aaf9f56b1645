//! Lumen Core - the data the ray tracer consumes.
//!
//! This crate provides:
//!
//! - **Textures**: the `Texture` trait with solid, checkerboard and bitmap
//!   implementations
//! - **Frame buffers**: the `FrameSink` trait and an accumulating
//!   `SampleBuffer` that can be saved as an image
//! - **Meshes**: indexed triangle meshes flattened to triangle soups
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{FrameSink, SampleBuffer};
//!
//! let mut frame = SampleBuffer::new(320, 240);
//! frame.add_sample(10, 10, Vec3::ONE, 1.0);
//! frame.save("out.png")?;
//! ```

pub mod framebuffer;
pub mod mesh;
pub mod texture;

// Re-export commonly used types
pub use framebuffer::{color_to_rgba8, FrameError, FrameSink, SampleBuffer};
pub use mesh::Mesh;
pub use texture::{
    BitmapTexture, CheckerboardTexture, SolidTexture, Texture, TextureClip, TextureError, TextureResult,
};
