//! Surface materials.

use std::fmt;
use std::sync::Arc;

use lumen_core::{CheckerboardTexture, Texture};
use lumen_math::{Vec2, Vec3, Vec4};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Describes how a surface responds to light.
///
/// The diffuse colour is modulated by the diffuse texture when one is set.
/// Its alpha drives transparency: with a refraction index of exactly 1.0 the
/// surface is a straight blend with whatever lies behind it, otherwise rays
/// are bent through the object.
#[derive(Clone)]
pub struct Material {
    /// Base colour, also used for ambient light; alpha is opacity
    pub diffuse_color: Vec4,
    pub emissive_color: Color,
    pub diffuse_texture: Option<Arc<dyn Texture>>,
    /// Tangent-space normal map
    pub normal_texture: Option<Arc<dyn Texture>>,
    /// 0 = no reflection, 1 = perfect mirror
    pub reflectivity: f32,
    /// Reflection cone angle in radians
    pub reflection_blur: f32,
    pub refraction_index: f32,
    /// Specular exponent
    pub shininess: f32,
    /// Sub-surface scattering strength
    pub scatter: f32,
}

impl Material {
    /// Plain diffuse material.
    pub fn diffuse(color: Vec4) -> Self {
        Self {
            diffuse_color: color,
            ..Self::default()
        }
    }

    /// Diffuse material with a mirror component.
    pub fn reflective(color: Vec4, reflectivity: f32) -> Self {
        Self {
            diffuse_color: color,
            reflectivity,
            ..Self::default()
        }
    }

    /// Mostly transparent material that bends light.
    ///
    /// Pass a colour whose alpha is below 1 or nothing will be refracted.
    pub fn refractive(color: Vec4, refraction_index: f32) -> Self {
        Self {
            diffuse_color: color,
            refraction_index,
            reflectivity: 0.5,
            ..Self::default()
        }
    }

    /// White material with a procedural checkerboard texture.
    pub fn checkerboard(scale: f32, color1: Vec4, color2: Vec4) -> Self {
        Self::default().with_diffuse_texture(Arc::new(CheckerboardTexture::new(scale, color1, color2)))
    }

    /// Grey material that glows with `color`.
    pub fn emissive(color: Color) -> Self {
        Self {
            diffuse_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            emissive_color: color,
            ..Self::default()
        }
    }

    pub fn with_diffuse_texture(mut self, texture: Arc<dyn Texture>) -> Self {
        self.diffuse_texture = Some(texture);
        self
    }

    /// Use `texture` as a tangent-space normal map. Colour textures are
    /// accepted but decoded as sRGB, which skews the normals.
    pub fn with_normal_texture(mut self, texture: Arc<dyn Texture>) -> Self {
        if !texture.is_normal_map() {
            log::warn!("Normal texture was not loaded as a normal map, normals will be skewed");
        }
        self.normal_texture = Some(texture);
        self
    }

    pub fn with_reflection_blur(mut self, radians: f32) -> Self {
        self.reflection_blur = radians;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_scatter(mut self, scatter: f32) -> Self {
        self.scatter = scatter;
        self
    }

    /// True when shading needs texture coordinates.
    #[inline]
    pub fn needs_uv(&self) -> bool {
        self.diffuse_texture.is_some() || self.normal_texture.is_some()
    }

    /// Diffuse colour (with alpha) at `uv`.
    #[inline]
    pub fn diffuse_at(&self, uv: Vec2) -> Vec4 {
        match &self.diffuse_texture {
            Some(texture) => self.diffuse_color * texture.sample(uv),
            None => self.diffuse_color,
        }
    }

    /// Tangent-space normal at `uv`, expanded from [0, 1] to [-1, 1] and
    /// softened toward the surface normal.
    pub fn normal_at(&self, uv: Vec2) -> Option<Vec3> {
        let texture = self.normal_texture.as_ref()?;
        let packed = texture.sample(uv).truncate();
        let normal = packed * 2.0 - Vec3::ONE;
        Some((normal + Vec3::Z).try_normalize().unwrap_or(Vec3::Z))
    }
}

impl Default for Material {
    /// White, opaque, matte.
    fn default() -> Self {
        Self {
            diffuse_color: Vec4::ONE,
            emissive_color: Color::ZERO,
            diffuse_texture: None,
            normal_texture: None,
            reflectivity: 0.0,
            reflection_blur: 0.0,
            refraction_index: 1.0,
            shininess: 25.0,
            scatter: 0.0,
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("diffuse_color", &self.diffuse_color)
            .field("emissive_color", &self.emissive_color)
            .field("diffuse_texture", &self.diffuse_texture.is_some())
            .field("normal_texture", &self.normal_texture.is_some())
            .field("reflectivity", &self.reflectivity)
            .field("reflection_blur", &self.reflection_blur)
            .field("refraction_index", &self.refraction_index)
            .field("shininess", &self.shininess)
            .field("scatter", &self.scatter)
            .finish()
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `i` through a surface with unit normal `n` facing
/// against it, `eta` being the ratio of refraction indices.
///
/// Returns zero on total internal reflection.
#[inline]
pub fn refract(i: Vec3, n: Vec3, eta: f32) -> Vec3 {
    let cos_i = n.dot(i);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * i - (eta * cos_i + k.sqrt()) * n
    }
}
