//! Point and area lights.

use lumen_math::Vec3;
use rand::RngCore;

use crate::sampling::random_in_cube;
use crate::Color;

/// A point light, or a cubic area light when `light_size > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub location: Vec3,
    pub color: Color,
    /// Ambient light this light adds everywhere, as a fraction of `color`
    pub ambient: f32,
    /// Whether this light is occluded by objects
    pub shadow: bool,
    /// Edge length of the cube sample positions are jittered in
    pub light_size: f32,
}

impl Light {
    /// White point light at `location`.
    pub fn new(location: Vec3) -> Self {
        Self {
            location,
            color: Color::ONE,
            ambient: 0.1,
            shadow: true,
            light_size: 0.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn with_size(mut self, light_size: f32) -> Self {
        self.light_size = light_size;
        self
    }

    /// Position to aim one shadow ray at.
    pub fn sample_position(&self, rng: &mut dyn RngCore) -> Vec3 {
        if self.light_size > 0.0 {
            self.location + random_in_cube(rng) * self.light_size
        } else {
            self.location
        }
    }
}
