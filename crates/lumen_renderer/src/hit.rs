//! Intersection results.

use lumen_math::{Mat4, Vec2, Vec3};

use crate::SceneObject;

/// Surface data a primitive reports in its own local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the local ray
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Record of a ray-object intersection.
///
/// A hit only exists when something was struck, so "did collide" is simply
/// `Option<Hit>::is_some()`.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Hit point in the space of the caller
    pub location: Vec3,
    /// Hit point in the local space of `target`
    pub local: Vec3,
    /// Surface normal in the space of the caller
    pub normal: Vec3,
    /// Surface tangent following the `u` texture direction
    pub tangent: Vec3,
    /// Texture coordinates, only filled in when the material needs them
    pub uv: Option<Vec2>,
    /// Object whose material shades this hit
    pub target: &'a SceneObject,
    /// Distance from the ray origin, in the space of the caller
    pub t: f32,
    /// Maps the space `target` lives in (its parent space) to the space of
    /// the caller
    pub target_frame: Mat4,
}

impl<'a> Hit<'a> {
    /// A hit on `target` straight from its geometry, still in its local space.
    pub fn on(target: &'a SceneObject, surface: SurfaceHit) -> Self {
        Self {
            location: surface.point,
            local: surface.point,
            normal: surface.normal,
            tangent: surface.tangent,
            uv: None,
            target,
            t: surface.t,
            target_frame: Mat4::IDENTITY,
        }
    }

    /// Texture coordinates, or the origin when they were never needed.
    #[inline]
    pub fn uv(&self) -> Vec2 {
        self.uv.unwrap_or(Vec2::ZERO)
    }

    /// Fill in the UV from the target's geometry if it is still missing.
    pub fn resolve_uv(&mut self) -> Vec2 {
        let uv = match self.uv {
            Some(uv) => uv,
            None => self.target.uv_at(self.local),
        };
        self.uv = Some(uv);
        uv
    }
}

impl std::fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hit")
            .field("location", &self.location)
            .field("local", &self.local)
            .field("normal", &self.normal)
            .field("uv", &self.uv)
            .field("target", &self.target.name)
            .field("t", &self.t)
            .finish()
    }
}
