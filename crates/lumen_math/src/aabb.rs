use crate::{Interval, Vec3};

/// Axis-aligned bounding box, stored as one interval per axis.
///
/// Used as the box variant of an object's bounding volume (centred on the
/// object's local origin) and for vertex bounds during mesh subdivision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self::new(x, y, z)
    }

    /// Box centred on the origin with the given half extents.
    pub fn from_half_extents(half: Vec3) -> Self {
        let half = half.abs();
        Self::from_points(-half, half)
    }

    /// Smallest box containing every point, or `EMPTY` for no points.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        points.into_iter().fold(Aabb::EMPTY, |acc, p| acc.include(*p))
    }

    /// Grow the box so it contains `p`.
    pub fn include(&self, p: Vec3) -> Aabb {
        Aabb {
            x: Interval::new(self.x.min.min(p.x), self.x.max.max(p.x)),
            y: Interval::new(self.y.min.min(p.y), self.y.max.max(p.y)),
            z: Interval::new(self.z.min.min(p.z), self.z.max.max(p.z)),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Returns true if `p` lies strictly inside the box.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.surrounds(p.x) && self.y.surrounds(p.y) && self.z.surrounds(p.z)
    }

    /// Slab test. Returns the entry distance of the ray clipped to `ray_t`,
    /// or `None` when the ray misses the box inside that window.
    pub fn hit_distance(&self, origin: Vec3, direction: Vec3, mut ray_t: Interval) -> Option<f32> {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / direction[axis];
            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t = ray_t.intersect(t0, t1);
            if ray_t.max <= ray_t.min {
                return None;
            }
        }
        Some(ray_t.min)
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// Half the size of the box along each axis.
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.x.size(), self.y.size(), self.z.size()) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_half_extents_is_centred() {
        let aabb = Aabb::from_half_extents(Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(aabb.centroid(), Vec3::ZERO);
        assert_eq!(aabb.half_extents(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_enclosing_points() {
        let points = [
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-3.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        ];
        let aabb = Aabb::enclosing(points.iter());

        assert_eq!(aabb.x, Interval::new(-3.0, 1.0));
        assert_eq!(aabb.y, Interval::new(-2.0, 4.0));
        assert_eq!(aabb.z, Interval::new(0.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
    }

    #[test]
    fn test_aabb_hit_distance() {
        let aabb = Aabb::from_half_extents(Vec3::ONE);
        let window = Interval::new(0.0, 100.0);

        let t = aabb.hit_distance(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, window);
        assert!((t.unwrap_or(-1.0) - 4.0).abs() < 1e-5);

        // Pointing away
        assert!(aabb.hit_distance(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, window).is_none());

        // Passing beside the box
        assert!(aabb.hit_distance(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, window).is_none());

        // Box is further away than the window allows
        assert!(aabb
            .hit_distance(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, Interval::new(0.0, 3.0))
            .is_none());
    }

    #[test]
    fn test_aabb_contains_point_is_strict() {
        let aabb = Aabb::from_half_extents(Vec3::ONE);

        assert!(aabb.contains_point(Vec3::new(0.5, -0.5, 0.9)));
        assert!(!aabb.contains_point(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_flat_box_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        assert!(aabb.y.size() > 0.0);
    }
}
