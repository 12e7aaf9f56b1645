//! Cylinder primitive.

use std::f32::consts::PI;

use lumen_math::{Vec2, Vec3, EPSILON};

use crate::{Ray, SurfaceHit};

/// A cylinder standing on its object's local origin, extending up `height`
/// along +Y. Caps are solid when `capped`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    radius: f32,
    height: f32,
    pub capped: bool,
}

impl Cylinder {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius: radius.abs(),
            height: height.abs(),
            capped: true,
        }
    }

    /// Builder-style cap toggle.
    pub fn with_caps(mut self, capped: bool) -> Self {
        self.capped = capped;
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Intersect a local-space ray.
    ///
    /// The side is found by projecting onto the XZ plane and solving a circle;
    /// caps by intersecting the planes y = 0 and y = height.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let origin = ray.origin();
        let direction = ray.direction();
        let flat_origin = Vec2::new(origin.x, origin.z);
        let flat_direction = Vec2::new(direction.x, direction.z);
        let radius2 = self.radius * self.radius;
        let valid = |t: f32| t > EPSILON && t < ray.length;

        let mut best: Option<(f32, Vec3)> = None;

        // Side
        let a = flat_direction.length_squared();
        if a > 0.0 {
            let b = 2.0 * flat_direction.dot(flat_origin);
            let c = flat_origin.length_squared() - radius2;
            let det = b * b - 4.0 * a * c;
            if det >= EPSILON {
                let root = det.sqrt();
                for t in [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)] {
                    let y = origin.y + direction.y * t;
                    if valid(t) && (0.0..=self.height).contains(&y) && best.map_or(true, |(bt, _)| t < bt) {
                        let p = ray.at(t);
                        best = Some((t, Vec3::new(p.x, 0.0, p.z).normalize_or_zero()));
                    }
                }
            }
        }

        // Caps
        if self.capped && direction.y != 0.0 {
            for (plane_y, normal) in [(0.0, Vec3::NEG_Y), (self.height, Vec3::Y)] {
                let t = (plane_y - origin.y) / direction.y;
                let on_cap = (flat_origin + flat_direction * t).length_squared() <= radius2;
                if valid(t) && on_cap && best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, normal));
                }
            }
        }

        let (t, normal) = best?;
        let point = ray.at(t);
        let tangent = if normal.y == 0.0 {
            Vec3::new(-normal.z, 0.0, normal.x)
        } else {
            Vec3::X
        };

        Some(SurfaceHit {
            t,
            point,
            normal,
            tangent,
        })
    }

    /// Cylindrical UV mapping: u around the axis, v up the height.
    pub fn uv(&self, p: Vec3) -> Vec2 {
        let u = 0.5 + p.z.atan2(p.x) / (2.0 * PI);
        let v = if self.height > 0.0 { p.y / self.height } else { 0.0 };
        Vec2::new(u, v)
    }

    /// Distance from the local origin to the farthest point of the rim.
    pub fn extent(&self) -> f32 {
        (self.radius * self.radius + self.height * self.height).sqrt()
    }
}
