//! 2D textures sampled by materials.
//!
//! The tracer only ever asks a texture for an RGBA value at a UV coordinate.
//! Bitmap textures additionally carry a flag saying whether their texels are
//! colours or tangent-space normals.

use std::path::Path;

use lumen_math::{Vec2, Vec4};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture {width}x{height} needs {expected} texels, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Texture must be at least 1x1")]
    Empty,
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Anything that can be sampled at a UV coordinate.
pub trait Texture: Send + Sync {
    /// RGBA at `uv`. Colour channels are linear, alpha drives transparency.
    fn sample(&self, uv: Vec2) -> Vec4;

    /// True when texels hold tangent-space normals packed into [0, 1].
    fn is_normal_map(&self) -> bool {
        false
    }
}

/// How UVs outside [0, 1] are folded back before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureClip {
    #[default]
    Wrap,
    Clamp,
}

impl TextureClip {
    /// Fold a single coordinate into [0, 1].
    pub fn apply(self, x: f32) -> f32 {
        match self {
            TextureClip::Wrap => x.rem_euclid(1.0),
            TextureClip::Clamp => x.clamp(0.0, 1.0),
        }
    }
}

/// A texture that returns the same value everywhere.
#[derive(Debug, Clone, Copy)]
pub struct SolidTexture {
    pub color: Vec4,
}

impl SolidTexture {
    pub fn new(color: Vec4) -> Self {
        Self { color }
    }
}

impl Texture for SolidTexture {
    fn sample(&self, _uv: Vec2) -> Vec4 {
        self.color
    }
}

/// Procedural two-colour checkerboard.
#[derive(Debug, Clone, Copy)]
pub struct CheckerboardTexture {
    /// Cells per UV unit
    pub scale: f32,
    pub color1: Vec4,
    pub color2: Vec4,
}

impl CheckerboardTexture {
    pub fn new(scale: f32, color1: Vec4, color2: Vec4) -> Self {
        Self { scale, color1, color2 }
    }
}

impl Default for CheckerboardTexture {
    fn default() -> Self {
        Self::new(32.0, Vec4::ONE, Vec4::new(0.0, 0.0, 0.0, 1.0))
    }
}

impl Texture for CheckerboardTexture {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let cell = |t: f32| -> i64 {
            if t > 0.0 {
                (t * self.scale) as i64
            } else {
                (-t * self.scale + 1.0) as i64
            }
        };
        if (cell(uv.x) + cell(uv.y)) & 1 == 1 {
            self.color2
        } else {
            self.color1
        }
    }
}

/// A texture backed by a pixel array, sampled nearest-neighbour.
///
/// Stores pixels in RGBA float format, row-major, row 0 at v = 0.
#[derive(Clone, Debug)]
pub struct BitmapTexture {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
    pub clip: TextureClip,
    normal_map: bool,
}

impl BitmapTexture {
    /// Create a texture from float pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<Vec4>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            clip: TextureClip::Wrap,
            normal_map: false,
        })
    }

    /// Create a texture from 8-bit RGBA bytes.
    ///
    /// Colour textures are converted from sRGB to linear; normal maps are
    /// data and are kept as-is.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8], normal_map: bool) -> TextureResult<Self> {
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| {
                let channel = |v: u8| {
                    if normal_map {
                        v as f32 / 255.0
                    } else {
                        srgb_to_linear(v)
                    }
                };
                Vec4::new(channel(p[0]), channel(p[1]), channel(p[2]), p[3] as f32 / 255.0)
            })
            .collect();
        let mut texture = Self::new(width, height, pixels)?;
        texture.normal_map = normal_map;
        Ok(texture)
    }

    /// Load a texture from an image file on disk.
    pub fn load(path: impl AsRef<Path>, normal_map: bool) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let texture = Self::from_rgba8(width, height, rgba.as_raw(), normal_map)?;

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);
        Ok(texture)
    }

    /// Builder-style clip mode.
    pub fn with_clip(mut self, clip: TextureClip) -> Self {
        self.clip = clip;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> Vec4 {
        let idx = (y * self.width + x) as usize;
        self.pixels.get(idx).copied().unwrap_or(Vec4::new(0.0, 0.0, 0.0, 1.0))
    }
}

impl Texture for BitmapTexture {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let u = self.clip.apply(uv.x);
        let v = self.clip.apply(uv.y);

        // uv is [0,1] so x is [0,width-1]
        let x = (u * (self.width - 1) as f32) as u32;
        let y = (v * (self.height - 1) as f32) as u32;
        self.get_pixel(x.min(self.width - 1), y.min(self.height - 1))
    }

    fn is_normal_map(&self) -> bool {
        self.normal_map
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> BitmapTexture {
        BitmapTexture::new(
            2,
            2,
            vec![
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 1.0, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 1.0, 1.0),
                Vec4::new(1.0, 1.0, 1.0, 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_solid_texture() {
        let tex = SolidTexture::new(Vec4::new(1.0, 0.5, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.3, 0.9)), Vec4::new(1.0, 0.5, 0.0, 1.0));
        assert!(!tex.is_normal_map());
    }

    #[test]
    fn test_checkerboard_alternates() {
        let tex = CheckerboardTexture::new(1.0, Vec4::ONE, Vec4::ZERO);

        assert_eq!(tex.sample(Vec2::new(0.5, 0.5)), Vec4::ONE);
        assert_eq!(tex.sample(Vec2::new(1.5, 0.5)), Vec4::ZERO);
        assert_eq!(tex.sample(Vec2::new(1.5, 1.5)), Vec4::ONE);
    }

    #[test]
    fn test_bitmap_corners() {
        let tex = two_by_two();

        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.99, 0.99)).w, 1.0);
        assert_eq!(tex.sample(Vec2::new(0.999, 0.0)), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_wrap_and_clamp() {
        assert!((TextureClip::Wrap.apply(1.25) - 0.25).abs() < 1e-6);
        assert!((TextureClip::Wrap.apply(-0.25) - 0.75).abs() < 1e-6);
        assert_eq!(TextureClip::Clamp.apply(1.25), 1.0);
        assert_eq!(TextureClip::Clamp.apply(-0.25), 0.0);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let result = BitmapTexture::new(2, 2, vec![Vec4::ONE; 3]);
        assert!(matches!(result, Err(TextureError::SizeMismatch { expected: 4, actual: 3, .. })));
        assert!(matches!(BitmapTexture::new(0, 4, vec![]), Err(TextureError::Empty)));
    }

    #[test]
    fn test_normal_map_bytes_stay_linear() {
        let tex = BitmapTexture::from_rgba8(1, 1, &[128, 128, 255, 255], true).unwrap();
        let n = tex.sample(Vec2::ZERO);

        assert!(tex.is_normal_map());
        assert!((n.x - 128.0 / 255.0).abs() < 1e-6);
        assert!((n.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
