//! Sphere primitive for ray tracing.

use std::f32::consts::PI;

use lumen_math::{Vec2, Vec3, EPSILON};

use crate::{Ray, SurfaceHit};

/// A sphere centred on its object's local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.abs(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Intersect a local-space ray.
    ///
    /// Takes the nearest root beyond `EPSILON`, so a ray starting inside the
    /// sphere finds the far wall.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let origin = ray.origin();
        let direction = ray.direction();

        let b = direction.dot(origin);
        let c = origin.length_squared() - self.radius * self.radius;
        let delta = b * b - c;
        if delta < EPSILON {
            return None;
        }

        let root = delta.sqrt();
        let t1 = -b - root;
        let t2 = -b + root;
        let t = if t1 > EPSILON {
            t1
        } else if t2 > EPSILON {
            t2
        } else {
            return None;
        };
        if t >= ray.length {
            return None;
        }

        let point = ray.at(t);
        Some(SurfaceHit {
            t,
            point,
            normal: point.normalize_or_zero(),
            tangent: Self::tangent(point),
        })
    }

    /// Tangent following the `u` direction of the spherical mapping.
    fn tangent(p: Vec3) -> Vec3 {
        let phi = p.z.atan2(p.x);
        Vec3::new(-phi.sin(), 0.0, phi.cos())
    }

    /// Spherical UV mapping of a local point.
    pub fn uv(&self, p: Vec3) -> Vec2 {
        let p = p / self.radius;
        let u = 0.5 + p.z.atan2(p.x) / (2.0 * PI);
        let v = 0.5 - p.y.clamp(-1.0, 1.0).asin() / PI;
        Vec2::new(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit_from_outside() {
        let sphere = Sphere::new(1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let hit = sphere.intersect(&ray).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!((hit.point - Vec3::Z).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(hit.tangent.dot(hit.normal).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let hit = sphere.intersect(&ray).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss_and_pruning() {
        let sphere = Sphere::new(1.0);

        let beside = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(sphere.intersect(&beside).is_none());

        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(sphere.intersect(&behind).is_none());

        let short = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).with_length(3.0);
        assert!(sphere.intersect(&short).is_none());
    }

    #[test]
    fn test_sphere_uv() {
        let sphere = Sphere::new(2.0);

        let top = sphere.uv(Vec3::new(0.0, 2.0, 0.0));
        assert!((top.y - 0.0).abs() < 1e-5);

        let equator = sphere.uv(Vec3::new(2.0, 0.0, 0.0));
        assert!((equator - Vec2::new(0.5, 0.5)).length() < 1e-5);
    }
}
