//! Planes, quads and triangles.
//!
//! All three share one intersection routine: a ray-plane solve followed by
//! an edge test for the bounded kinds. Edge tests assume counter-clockwise
//! winding around the normal.

use lumen_math::{Vec2, Vec3, EPSILON};

use crate::{Ray, SurfaceHit};

/// Which part of the plane is solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneKind {
    Infinite,
    Quad,
    Triangle,
}

/// A flat surface in its object's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    kind: PlaneKind,
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    v4: Vec3,
    normal: Vec3,
    /// Texture axes; their lengths set the size of one UV unit
    u_axis: Vec3,
    v_axis: Vec3,
    uv_scale: f32,
}

impl Plane {
    /// Unbounded plane through `point`. `up` orients the texture mapping.
    pub fn infinite(point: Vec3, normal: Vec3, up: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        let mut u_axis = up;
        if up.cross(normal).length_squared() < EPSILON {
            log::warn!("Plane up vector {up} is parallel to its normal {normal}, picking another");
            u_axis = normal.any_orthonormal_vector();
        }
        let v_axis = u_axis.cross(normal);
        Self {
            kind: PlaneKind::Infinite,
            v1: point,
            v2: point + u_axis,
            v3: point + u_axis + v_axis,
            v4: point + v_axis,
            normal,
            u_axis,
            v_axis,
            uv_scale: 1.0,
        }
    }

    /// Quad bounded by four vertices in counter-clockwise order.
    pub fn quad(v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) -> Self {
        Self {
            kind: PlaneKind::Quad,
            v1,
            v2,
            v3,
            v4,
            normal: (v2 - v1).cross(v4 - v1).normalize_or_zero(),
            u_axis: v2 - v1,
            v_axis: v4 - v1,
            uv_scale: 1.0,
        }
    }

    /// Triangle with counter-clockwise vertices.
    pub fn triangle(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self {
            kind: PlaneKind::Triangle,
            v1,
            v2,
            v3,
            v4: v3,
            normal: (v2 - v1).cross(v3 - v1).normalize_or_zero(),
            u_axis: v2 - v1,
            v_axis: v3 - v1,
            uv_scale: 1.0,
        }
    }

    /// Builder-style UV multiplier.
    pub fn with_uv_scale(mut self, uv_scale: f32) -> Self {
        self.uv_scale = uv_scale;
        self
    }

    pub fn kind(&self) -> PlaneKind {
        self.kind
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Corner vertices (the last repeats for triangles, and is synthetic for
    /// infinite planes).
    pub fn vertices(&self) -> [Vec3; 4] {
        [self.v1, self.v2, self.v3, self.v4]
    }

    /// Returns true if `p`, assumed to lie on the plane, is within its
    /// bounds. Infinite planes contain every point.
    pub fn is_inside(&self, p: Vec3) -> bool {
        let edge = |a: Vec3, b: Vec3| (b - a).cross(p - a).dot(self.normal) >= -EPSILON;
        match self.kind {
            PlaneKind::Infinite => true,
            PlaneKind::Quad => {
                edge(self.v1, self.v2) && edge(self.v2, self.v3) && edge(self.v3, self.v4) && edge(self.v4, self.v1)
            }
            PlaneKind::Triangle => edge(self.v1, self.v2) && edge(self.v2, self.v3) && edge(self.v3, self.v1),
        }
    }

    /// Intersect a local-space ray. Both faces are solid.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let denom = ray.direction().dot(self.normal);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.v1 - ray.origin()).dot(self.normal) / denom;
        if t <= EPSILON || t >= ray.length {
            return None;
        }

        let point = ray.at(t);
        if !self.is_inside(point) {
            return None;
        }

        Some(SurfaceHit {
            t,
            point,
            normal: self.normal,
            tangent: self.u_axis.normalize_or_zero(),
        })
    }

    /// Planar UV mapping along the texture axes.
    pub fn uv(&self, p: Vec3) -> Vec2 {
        let q = p - self.v1;
        let u = q.dot(self.u_axis) / self.u_axis.length_squared();
        let v = q.dot(self.v_axis) / self.v_axis.length_squared();
        Vec2::new(u, v) * self.uv_scale
    }

    /// Distance from the local origin to the farthest vertex, `None` for an
    /// infinite plane.
    pub fn extent(&self) -> Option<f32> {
        match self.kind {
            PlaneKind::Infinite => None,
            _ => Some(
                self.vertices()
                    .iter()
                    .map(|v| v.length())
                    .fold(0.0, f32::max),
            ),
        }
    }
}
