//! Bounding volumes used to reject rays before exact intersection.

use lumen_math::{Aabb, Interval, Vec3};

use crate::Ray;

/// A cheap proxy shape centred on an object's local origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoundingVolume {
    /// No bounds: every ray is tested against the geometry.
    #[default]
    None,
    /// Sphere of the given radius.
    Sphere(f32),
    /// Axis-aligned box with the given half extents.
    Box(Vec3),
}

impl BoundingVolume {
    /// Box volume around `aabb`, which must be centred on the origin.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        BoundingVolume::Box(aabb.half_extents())
    }

    /// Returns true if `p` (local space) is inside the volume.
    pub fn contains(&self, p: Vec3) -> bool {
        match *self {
            BoundingVolume::None => true,
            BoundingVolume::Sphere(r) => p.length_squared() <= r * r,
            BoundingVolume::Box(half) => Aabb::from_half_extents(half).contains_point(p),
        }
    }

    /// Radius of a sphere containing the volume, `None` when unbounded.
    pub fn radius(&self) -> Option<f32> {
        match *self {
            BoundingVolume::None => None,
            BoundingVolume::Sphere(r) => Some(r),
            BoundingVolume::Box(half) => Some(half.length()),
        }
    }

    /// Fast test: can `ray` (local space) hit anything inside the volume
    /// before it runs out of length?
    pub fn ray_intersects(&self, ray: &Ray) -> bool {
        if self.contains(ray.origin()) {
            return true;
        }
        self.intersection_distance(ray)
            .is_some_and(|t| t > 0.0 && t < ray.length)
    }

    /// Distance the ray travels before entering the volume, if it does.
    pub fn intersection_distance(&self, ray: &Ray) -> Option<f32> {
        match *self {
            BoundingVolume::None => None,
            BoundingVolume::Sphere(r) => ray_sphere_distance(ray.origin(), ray.direction(), r),
            BoundingVolume::Box(half) => Aabb::from_half_extents(half).hit_distance(
                ray.origin(),
                ray.direction(),
                Interval::new(0.0, f32::INFINITY),
            ),
        }
    }
}

/// Smallest positive `t` where `origin + t * direction` lies on the sphere of
/// `radius` around the origin. `direction` must be unit length.
pub fn ray_sphere_distance(origin: Vec3, direction: Vec3, radius: f32) -> Option<f32> {
    let b = direction.dot(origin);
    let c = origin.length_squared() - radius * radius;
    let delta = b * b - c;
    if delta < 0.0 {
        return None;
    }
    let root = delta.sqrt();
    let t1 = -b - root;
    let t2 = -b + root;
    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_accepts_everything() {
        let bv = BoundingVolume::None;
        let ray = Ray::new(Vec3::new(100.0, 0.0, 0.0), Vec3::X);

        assert!(bv.ray_intersects(&ray));
        assert!(bv.contains(Vec3::splat(1e6)));
        assert_eq!(bv.radius(), None);
        assert_eq!(bv.intersection_distance(&ray), None);
    }

    #[test]
    fn test_sphere_volume() {
        let bv = BoundingVolume::Sphere(1.0);

        let toward = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(bv.ray_intersects(&toward));
        assert!((bv.intersection_distance(&toward).unwrap() - 4.0).abs() < 1e-5);

        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(!bv.ray_intersects(&away));

        // Too short to reach the sphere
        assert!(!bv.ray_intersects(&toward.with_length(3.0)));

        // Starting inside always passes
        let inside = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::Y).with_length(0.01);
        assert!(bv.ray_intersects(&inside));
    }

    #[test]
    fn test_box_volume() {
        let bv = BoundingVolume::Box(Vec3::new(1.0, 2.0, 3.0));

        assert!(bv.contains(Vec3::new(0.9, -1.9, 2.9)));
        assert!(!bv.contains(Vec3::new(1.1, 0.0, 0.0)));
        assert!((bv.radius().unwrap() - 14.0f32.sqrt()).abs() < 1e-5);

        let toward = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X);
        assert!((bv.intersection_distance(&toward).unwrap() - 4.0).abs() < 1e-5);

        let beside = Ray::new(Vec3::new(5.0, 5.0, 0.0), Vec3::NEG_X);
        assert!(!bv.ray_intersects(&beside));
    }

    #[test]
    fn test_ray_sphere_distance_from_inside() {
        let t = ray_sphere_distance(Vec3::ZERO, Vec3::X, 2.0);
        assert!((t.unwrap() - 2.0).abs() < 1e-6);
    }
}
