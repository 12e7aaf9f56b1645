//! Object transforms for the scene graph.
//!
//! Every scene object owns one of these. Rays are moved into local space with
//! the cached inverse and hits are moved back with the forward matrix.

use glam::{Mat4, Vec3};
use thiserror::Error;

/// Errors raised when configuring a transform.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    #[error("invalid scale {0}: every component must be non-zero")]
    ZeroScale(Vec3),
}

/// Rotation matrix for Euler angles (radians), applied X then Y then Z in
/// matrix order.
pub fn euler_rotation(rotation: Vec3) -> Mat4 {
    Mat4::from_rotation_x(rotation.x) * Mat4::from_rotation_y(rotation.y) * Mat4::from_rotation_z(rotation.z)
}

/// Location, Euler rotation and scale with cached matrices.
///
/// The matrices are rebuilt whenever a component changes. `is_simple()` is
/// true when the transform is a pure translation, which lets callers skip
/// the matrix multiply on the hot path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    location: Vec3,
    rotation: Vec3,
    scale: Vec3,
    matrix: Mat4,
    inverse: Mat4,
    simple: bool,
}

impl Transform {
    /// Pure translation to `location`.
    pub fn new(location: Vec3) -> Self {
        let mut transform = Self {
            location,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            matrix: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
            simple: true,
        };
        transform.rebuild();
        transform
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Local to parent matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Parent to local matrix.
    pub fn inverse(&self) -> Mat4 {
        self.inverse
    }

    /// True when the transform only translates.
    pub fn is_simple(&self) -> bool {
        self.simple
    }

    /// Largest absolute scale component, used to grow bounding radii.
    pub fn max_scale(&self) -> f32 {
        self.scale.abs().max_element()
    }

    pub fn set_location(&mut self, location: Vec3) {
        self.location = location;
        self.rebuild();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.rebuild();
    }

    /// Set the scale. A zero component is rejected and the transform is
    /// left untouched.
    pub fn set_scale(&mut self, scale: Vec3) -> Result<(), TransformError> {
        if scale.x == 0.0 || scale.y == 0.0 || scale.z == 0.0 {
            return Err(TransformError::ZeroScale(scale));
        }
        self.scale = scale;
        self.rebuild();
        Ok(())
    }

    /// Move a parent-space point into local space.
    #[inline]
    pub fn to_local_point(&self, p: Vec3) -> Vec3 {
        if self.simple {
            p - self.location
        } else {
            self.inverse.transform_point3(p)
        }
    }

    /// Move a parent-space direction into local space (not normalised).
    #[inline]
    pub fn to_local_vector(&self, v: Vec3) -> Vec3 {
        if self.simple {
            v
        } else {
            self.inverse.transform_vector3(v)
        }
    }

    /// Move a local-space point into parent space.
    #[inline]
    pub fn to_parent_point(&self, p: Vec3) -> Vec3 {
        if self.simple {
            p + self.location
        } else {
            self.matrix.transform_point3(p)
        }
    }

    /// Move a local-space direction into parent space (not normalised).
    ///
    /// Note: this is the forward matrix, not the inverse transpose, so
    /// normals are only exact under uniform scale.
    #[inline]
    pub fn to_parent_vector(&self, v: Vec3) -> Vec3 {
        if self.simple {
            v
        } else {
            self.matrix.transform_vector3(v)
        }
    }

    fn rebuild(&mut self) {
        self.matrix = Mat4::from_translation(self.location)
            * euler_rotation(self.rotation)
            * Mat4::from_scale(self.scale);
        self.inverse = self.matrix.inverse();
        self.simple = self.rotation == Vec3::ZERO && self.scale == Vec3::ONE;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
