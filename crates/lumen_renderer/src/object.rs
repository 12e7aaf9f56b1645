//! Scene objects and the local-space transform wrapper.
//!
//! Every object owns a transform, a material and a bounding volume around a
//! piece of geometry. Intersection always goes through
//! [`SceneObject::intersect`], which moves the ray into local space, rejects
//! it early against the bounding volume, asks the geometry, and maps the hit
//! back. Primitives therefore only ever deal with rays in their own frame.

use std::ptr;
use std::sync::Arc;

use lumen_math::{Transform, Vec2, Vec3};

use crate::{BoundingVolume, Container, Cylinder, Hit, Material, Plane, Ray, Sphere};

/// The shape an object is made of.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere(Sphere),
    Plane(Plane),
    Cylinder(Cylinder),
    Container(Container),
    /// A shared object placed again under this object's transform.
    Reference(Arc<SceneObject>),
}

/// A node of the scene graph.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    transform: Transform,
    pub material: Arc<Material>,
    pub casts_shadows: bool,
    pub bounding_volume: BoundingVolume,
    pub geometry: Geometry,
}

impl SceneObject {
    /// Object at the origin with a default white material.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            material: Arc::new(Material::default()),
            casts_shadows: true,
            bounding_volume: BoundingVolume::None,
            geometry,
        }
    }

    /// Sphere of `radius` centred at `location`.
    pub fn sphere(name: impl Into<String>, location: Vec3, radius: f32) -> Self {
        Self::new(name, Geometry::Sphere(Sphere::new(radius))).with_location(location)
    }

    /// Plane, quad or triangle; its vertices are used as given.
    pub fn plane(name: impl Into<String>, plane: Plane) -> Self {
        Self::new(name, Geometry::Plane(plane))
    }

    /// Capped cylinder whose base sits at `location`, pointing up +Y.
    pub fn cylinder(name: impl Into<String>, location: Vec3, radius: f32, height: f32) -> Self {
        Self::new(name, Geometry::Cylinder(Cylinder::new(radius, height))).with_location(location)
    }

    /// Capped cylinder running from `base` to `top`.
    pub fn cylinder_between(name: impl Into<String>, base: Vec3, top: Vec3, radius: f32) -> Self {
        let axis = top - base;
        let height = axis.length();
        let mut object = Self::cylinder(name, base, radius, height);
        match axis.try_normalize() {
            Some(d) => {
                // Rx(a) * Rz(c) takes +Y to d
                let c = -d.x.clamp(-1.0, 1.0).asin();
                let a = d.z.atan2(d.y);
                object.set_rotation(Vec3::new(a, 0.0, c));
            }
            None => log::warn!("Cylinder '{}' has a degenerate axis, keeping +Y", object.name),
        }
        object
    }

    /// Empty container object.
    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, Geometry::Container(Container::new()))
    }

    /// Place `object` again under a new transform without copying it.
    pub fn reference(name: impl Into<String>, object: Arc<SceneObject>) -> Self {
        let bounding_volume = match object.bounding_radius() {
            Some(r) => BoundingVolume::Sphere(object.location().length() + r),
            None => BoundingVolume::None,
        };
        let mut reference = Self::new(name, Geometry::Reference(object));
        reference.bounding_volume = bounding_volume;
        reference
    }

    // ---------------------------------------------------------------------
    // Builders and setters
    // ---------------------------------------------------------------------

    pub fn with_location(mut self, location: Vec3) -> Self {
        self.set_location(location);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Arc::new(material);
        self
    }

    pub fn with_shared_material(mut self, material: Arc<Material>) -> Self {
        self.material = material;
        self
    }

    pub fn with_casts_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }

    pub fn with_bounding_volume(mut self, bounding_volume: BoundingVolume) -> Self {
        self.bounding_volume = bounding_volume;
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn location(&self) -> Vec3 {
        self.transform.location()
    }

    pub fn set_location(&mut self, location: Vec3) {
        self.transform.set_location(location);
    }

    /// Euler angles in radians.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.set_rotation(rotation);
    }

    /// Set the scale. A zero component is logged and ignored, leaving the
    /// previous transform in place.
    pub fn set_scale(&mut self, scale: Vec3) {
        if let Err(err) = self.transform.set_scale(scale) {
            log::warn!("Ignoring scale on '{}': {}", self.name, err);
        }
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = Arc::new(material);
    }

    /// Give this object and every object below it the same material.
    pub fn set_children_material(&mut self, material: Arc<Material>) {
        self.material = material.clone();
        if let Geometry::Container(container) = &mut self.geometry {
            container.set_children_material(material);
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.geometry {
            Geometry::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.geometry {
            Geometry::Container(container) => Some(container),
            _ => None,
        }
    }

    // ---------------------------------------------------------------------
    // Bounds
    // ---------------------------------------------------------------------

    /// Radius around the local origin that encloses the object, already
    /// grown by the object's scale. `None` means unbounded.
    pub fn bounding_radius(&self) -> Option<f32> {
        let local = match self.bounding_volume.radius() {
            Some(r) => Some(r),
            None => self.geometry_extent(),
        }?;
        Some(local * self.transform.max_scale())
    }

    fn geometry_extent(&self) -> Option<f32> {
        match &self.geometry {
            Geometry::Sphere(sphere) => Some(sphere.radius()),
            Geometry::Plane(plane) => plane.extent(),
            Geometry::Cylinder(cylinder) => Some(cylinder.extent()),
            Geometry::Container(container) => container.bounding_radius(),
            Geometry::Reference(object) => object
                .bounding_radius()
                .map(|r| object.location().length() + r),
        }
    }

    /// Fit a bounding sphere around this object's children. Containers with
    /// an unbounded child end up with no bounding volume.
    pub fn auto_radius(&mut self) {
        if let Geometry::Container(container) = &self.geometry {
            self.bounding_volume = match container.bounding_radius() {
                Some(r) => BoundingVolume::Sphere(r),
                None => BoundingVolume::None,
            };
        }
    }

    /// Number of non-container objects at or below this one.
    pub fn leaf_count(&self) -> usize {
        match &self.geometry {
            Geometry::Container(container) => container.children().iter().map(|c| c.leaf_count()).sum(),
            _ => 1,
        }
    }

    /// Visit every non-container object at or below this one.
    pub fn for_each_leaf<'a>(&'a self, f: &mut dyn FnMut(&'a SceneObject)) {
        match &self.geometry {
            Geometry::Container(container) => {
                for child in container.children() {
                    child.for_each_leaf(f);
                }
            }
            _ => f(self),
        }
    }

    // ---------------------------------------------------------------------
    // Intersection
    // ---------------------------------------------------------------------

    /// Intersect a ray given in this object's parent space.
    ///
    /// On a hit the result is in parent space and `ray.length` shrinks to the
    /// hit distance, so callers testing several objects prune automatically.
    /// The ray's origin and direction are never changed.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Hit<'_>> {
        let mut local = ray.to_local(&self.transform);

        if !local.flags.reverse_normal && !self.bounding_volume.ray_intersects(&local) {
            return None;
        }

        let mut hit = self.intersect_local(&mut local)?;

        if hit.uv.is_none() && hit.target.material.needs_uv() {
            hit.resolve_uv();
        }

        if !ptr::eq(hit.target, self) {
            hit.target_frame = self.transform.matrix() * hit.target_frame;
        }

        if self.transform.is_simple() {
            hit.location += self.transform.location();
        } else {
            hit.location = self.transform.to_parent_point(hit.location);
            hit.normal = self.transform.to_parent_vector(hit.normal).normalize_or_zero();
            hit.tangent = self.transform.to_parent_vector(hit.tangent).normalize_or_zero();
            hit.t = hit.location.distance(ray.origin());
        }

        ray.length = ray.length.min(hit.t);
        Some(hit)
    }

    /// Intersect a ray already in this object's local space.
    fn intersect_local(&self, ray: &mut Ray) -> Option<Hit<'_>> {
        match &self.geometry {
            Geometry::Sphere(sphere) => sphere.intersect(ray).map(|s| Hit::on(self, s)),
            Geometry::Plane(plane) => plane.intersect(ray).map(|s| Hit::on(self, s)),
            Geometry::Cylinder(cylinder) => cylinder.intersect(ray).map(|s| Hit::on(self, s)),
            Geometry::Container(container) => container.intersect(self, ray),
            Geometry::Reference(object) => object.intersect(ray),
        }
    }

    /// Texture coordinates of a point in this object's local space.
    pub fn uv_at(&self, local: Vec3) -> Vec2 {
        match &self.geometry {
            Geometry::Sphere(sphere) => sphere.uv(local),
            Geometry::Plane(plane) => plane.uv(local),
            Geometry::Cylinder(cylinder) => cylinder.uv(local),
            Geometry::Container(_) | Geometry::Reference(_) => Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::{Vec4, EPSILON};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_sphere_distance_and_normal() {
        let center = Vec3::new(1.0, -2.0, -10.0);
        let sphere = SceneObject::sphere("ball", center, 2.0);

        for origin in [Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0), Vec3::new(-3.0, 0.0, -20.0)] {
            let mut ray = Ray::new(origin, center + Vec3::new(0.3, -0.2, 0.1) - origin);
            let hit = sphere.intersect(&mut ray).unwrap();

            let p = origin + hit.t * ray.direction();
            assert!(((p - center).length() - 2.0).abs() < 1e-3);
            assert!(hit.normal.cross((p - center).normalize()).length() < 1e-3);
            assert_eq!(ray.length, hit.t);
        }
    }

    #[test]
    fn test_ray_is_not_moved() {
        let sphere = SceneObject::sphere("ball", Vec3::new(0.0, 0.0, -5.0), 1.0)
            .with_rotation(Vec3::new(0.3, 0.2, 0.1))
            .with_scale(Vec3::splat(2.0));
        let mut ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let before = ray;

        sphere.intersect(&mut ray).unwrap();
        assert_eq!(ray.origin(), before.origin());
        assert_eq!(ray.direction(), before.direction());
        assert!(ray.length < before.length);
    }

    #[test]
    fn test_scaled_sphere_distance_is_parent_space() {
        let sphere = SceneObject::sphere("ball", Vec3::new(0.0, 0.0, -10.0), 1.0)
            .with_scale(Vec3::splat(3.0));
        let mut ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = sphere.intersect(&mut ray).unwrap();
        assert!((hit.t - 7.0).abs() < 1e-4);
        assert!((hit.location - Vec3::new(0.0, 0.0, -7.0)).length() < 1e-4);
        assert!((hit.local - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_rotated_quad() {
        // Quad in the XY plane facing +Z, turned to face +X
        let quad = SceneObject::plane(
            "wall",
            Plane::quad(
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ),
        )
        .with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));

        let mut ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X);
        let hit = quad.intersect(&mut ray).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_zero_scale_is_ignored() {
        let mut sphere = SceneObject::sphere("ball", Vec3::ZERO, 1.0).with_scale(Vec3::splat(2.0));
        sphere.set_scale(Vec3::new(1.0, 0.0, 1.0));

        assert_eq!(sphere.transform().scale(), Vec3::splat(2.0));
    }

    #[test]
    fn test_bounding_volume_rejects_before_geometry() {
        let sphere = SceneObject::sphere("ball", Vec3::new(0.0, 0.0, -5.0), 1.0)
            .with_bounding_volume(BoundingVolume::Sphere(0.5));
        let mut ray = Ray::new(Vec3::new(0.8, 0.0, 0.0), Vec3::NEG_Z);

        assert!(sphere.intersect(&mut ray).is_none());
        assert!(ray.length.is_infinite());
    }

    #[test]
    fn test_uv_resolved_only_when_needed() {
        let plain = SceneObject::sphere("plain", Vec3::new(0.0, 0.0, -5.0), 1.0);
        let mut ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(plain.intersect(&mut ray).unwrap().uv.is_none());

        let textured = plain
            .clone()
            .with_material(Material::checkerboard(4.0, Vec4::ONE, Vec4::ZERO));
        let mut ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(textured.intersect(&mut ray).unwrap().uv.is_some());
    }

    #[test]
    fn test_cylinder_between() {
        let cylinder = SceneObject::cylinder_between("pipe", Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 0.5);
        let mut ray = Ray::new(Vec3::new(0.0, 5.0, -2.0), Vec3::NEG_Y);

        let hit = cylinder.intersect(&mut ray).unwrap();
        assert!((hit.t - 4.5).abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);

        // Nothing past the top
        let mut past = Ray::new(Vec3::new(0.0, 5.0, -4.5), Vec3::NEG_Y);
        assert!(cylinder.intersect(&mut past).is_none());
    }

    #[test]
    fn test_reference_reuses_object() {
        let shared = Arc::new(SceneObject::sphere("ball", Vec3::ZERO, 1.0));
        let copy = SceneObject::reference("copy", shared.clone()).with_location(Vec3::new(3.0, 0.0, -5.0));

        let mut ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z);
        let hit = copy.intersect(&mut ray).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!(ptr::eq(hit.target, shared.as_ref()));
        assert!((hit.target_frame.transform_point3(Vec3::ZERO) - Vec3::new(3.0, 0.0, -5.0)).length() < EPSILON);
    }
}
