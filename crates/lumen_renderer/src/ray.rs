//! Ray type for the recursive tracer.
//!
//! A ray is an origin, a unit direction and a maximum travel length. The
//! length doubles as the closest-hit bound: every successful intersection
//! shrinks it so farther candidates are pruned.

use lumen_math::{Transform, Vec3};

/// What kind of trace a ray belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RayFlags {
    /// Shadow ray: objects that do not cast shadows are ignored.
    pub shadow: bool,
    /// Global illumination bounce: containers may answer with their bounds.
    pub gi: bool,
    /// Sub-surface scatter bounce.
    pub sss: bool,
    /// Ray starts on a surface and heads inside it; bounding-volume
    /// rejection is skipped.
    pub reverse_normal: bool,
}

/// A ray with origin, unit direction and remaining travel length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray
    origin: Vec3,
    /// Unit direction vector
    direction: Vec3,
    /// How far the ray may travel; shrinks to the closest hit found so far
    pub length: f32,
    pub flags: RayFlags,
    /// Number of transparent surfaces this ray has passed straight through
    pub hops: u32,
}

impl Ray {
    /// Create a new unbounded ray. The direction is normalized.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            length: f32::INFINITY,
            flags: RayFlags::default(),
            hops: 0,
        }
    }

    /// Create a shadow ray that stops at `length`.
    #[inline]
    pub fn shadow(origin: Vec3, direction: Vec3, length: f32) -> Self {
        let mut ray = Self::new(origin, direction).with_length(length);
        ray.flags.shadow = true;
        ray
    }

    /// Builder-style maximum length.
    #[inline]
    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    /// Builder-style flags.
    #[inline]
    pub fn with_flags(mut self, flags: RayFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// The same ray expressed in the local space of `transform`.
    ///
    /// The local length is the distance to the transformed far end point, so
    /// pruning keeps working under scale.
    pub fn to_local(&self, transform: &Transform) -> Ray {
        if transform.is_simple() {
            return Ray {
                origin: self.origin - transform.location(),
                ..*self
            };
        }

        let origin = transform.to_local_point(self.origin);
        let direction = transform.to_local_vector(self.direction).normalize_or_zero();
        let length = if self.length.is_finite() {
            transform.to_local_point(self.at(self.length)).distance(origin)
        } else {
            self.length
        };

        Ray {
            origin,
            direction,
            length,
            ..*self
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(ray.at(0.0), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(ray.at(1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(2.5), Vec3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));

        assert!((ray.direction().length() - 1.0).abs() < 1e-6);
        assert!(ray.length.is_infinite());
        assert_eq!(ray.flags, RayFlags::default());
    }

    #[test]
    fn test_shadow_ray() {
        let ray = Ray::shadow(Vec3::ZERO, Vec3::Y, 5.0);

        assert!(ray.flags.shadow);
        assert_eq!(ray.length, 5.0);
    }

    #[test]
    fn test_to_local_translation() {
        let transform = Transform::new(Vec3::new(0.0, 0.0, -10.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).with_length(20.0);
        let local = ray.to_local(&transform);

        assert_eq!(local.origin(), Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(local.direction(), Vec3::NEG_Z);
        assert_eq!(local.length, 20.0);
    }

    #[test]
    fn test_to_local_scales_length() {
        let mut transform = Transform::default();
        transform.set_scale(Vec3::splat(2.0)).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z).with_length(4.0);
        let local = ray.to_local(&transform);

        assert!((local.origin() - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
        assert!((local.direction() - Vec3::NEG_Z).length() < 1e-5);
        assert!((local.length - 2.0).abs() < 1e-5);
    }
}
