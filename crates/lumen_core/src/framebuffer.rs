//! Frame buffer the renderer deposits pixels into.
//!
//! The renderer only needs two operations: overwrite a pixel, or fold a
//! weighted sample into a running average. [`SampleBuffer`] is the in-memory
//! implementation used by the CLI and the tests.

use std::path::Path;

use lumen_math::{Vec3, Vec4};
use thiserror::Error;

/// Errors that can occur when exporting a frame.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame buffer {width}x{height} does not match its pixel data")]
    Size { width: u32, height: u32 },

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

/// Destination for rendered pixels.
pub trait FrameSink {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Overwrite a pixel. A shallow write only changes what is displayed and
    /// leaves the accumulated samples alone.
    fn put_pixel(&mut self, x: u32, y: u32, color: Vec3, shallow: bool);

    /// Fold a sample into the pixel's weighted running average.
    fn add_sample(&mut self, x: u32, y: u32, color: Vec3, weight: f32);
}

/// Accumulating RGB frame buffer.
///
/// Each pixel stores the weighted colour sum in `xyz` and the total weight
/// in `w`, so (10, 5, 1, 10) is the colour (1.0, 0.5, 0.1) after ten units
/// of weight.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    width: u32,
    height: u32,
    samples: Vec<Vec4>,
    display: Vec<Vec3>,
}

impl SampleBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            samples: vec![Vec4::ZERO; len],
            display: vec![Vec3::ZERO; len],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Reset the accumulated samples. Unless `shallow`, the displayed image
    /// is filled with `color` as well.
    pub fn clear(&mut self, color: Vec3, shallow: bool) {
        self.samples.fill(Vec4::ZERO);
        if !shallow {
            self.display.fill(color);
        }
    }

    /// Displayed colour at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.index(x, y).map(|i| self.display[i]).unwrap_or(Vec3::ZERO)
    }

    /// Total accumulated weight at (x, y).
    pub fn weight(&self, x: u32, y: u32) -> f32 {
        self.index(x, y).map(|i| self.samples[i].w).unwrap_or(0.0)
    }

    /// Displayed pixels in row-major order.
    pub fn pixels(&self) -> &[Vec3] {
        &self.display
    }

    /// Convert to RGBA bytes, clamping each channel to [0, 1].
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.display.len() * 4);
        for color in &self.display {
            bytes.extend_from_slice(&color_to_rgba8(*color));
        }
        bytes
    }

    /// Write the displayed image to disk; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FrameError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8()).ok_or(
            FrameError::Size {
                width: self.width,
                height: self.height,
            },
        )?;
        image.save(path)?;
        Ok(())
    }
}

impl FrameSink for SampleBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Vec3, shallow: bool) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if shallow {
            self.display[i] = color;
        } else {
            self.samples[i] = Vec4::ZERO;
            self.add_sample(x, y, color, 1.0);
        }
    }

    fn add_sample(&mut self, x: u32, y: u32, color: Vec3, weight: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if weight == 0.0 {
            return;
        }
        let acc = self.samples[i] + (color * weight).extend(weight);
        self.samples[i] = acc;
        self.display[i] = acc.truncate() / acc.w;
    }
}

/// Convert a linear colour to 8-bit RGBA with full alpha.
pub fn color_to_rgba8(color: Vec3) -> [u8; 4] {
    let channel = |c: f32| (255.0 * c.clamp(0.0, 1.0)) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}
