//! Composite objects.
//!
//! A container owns its children and answers with the closest hit among
//! them. Cubes, polyhedra, meshes and the scene root are all containers.

use std::ptr;
use std::sync::Arc;

use lumen_math::Mat4;

use crate::{BoundingVolume, Geometry, Hit, Material, Ray, SceneObject};

/// A list of owned child objects.
#[derive(Debug, Clone, Default)]
pub struct Container {
    children: Vec<SceneObject>,
    /// Shade every hit with the owning object's material.
    pub use_container_material: bool,
    /// GI rays starting farther than this many bounding radii away hit the
    /// bounding sphere instead of the children. 0 disables the shortcut.
    pub far_gi_proxy: f32,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `child`.
    pub fn add(&mut self, child: SceneObject) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[SceneObject] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<SceneObject> {
        &mut self.children
    }

    pub fn take_children(&mut self) -> Vec<SceneObject> {
        std::mem::take(&mut self.children)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Give every child (recursively) the same material. References are
    /// shared with other objects and keep theirs.
    pub fn set_children_material(&mut self, material: Arc<Material>) {
        for child in &mut self.children {
            if matches!(child.geometry, Geometry::Reference(_)) {
                continue;
            }
            child.set_children_material(material.clone());
        }
    }

    /// Radius around the container origin enclosing every child, or `None`
    /// if any child is unbounded.
    pub fn bounding_radius(&self) -> Option<f32> {
        self.children.iter().try_fold(0.0f32, |radius, child| {
            let r = child.bounding_radius()?;
            Some(radius.max(child.location().length() + r))
        })
    }

    /// Closest hit among the children of `owner`, for a ray in the owner's
    /// local space.
    pub fn intersect<'a>(&'a self, owner: &'a SceneObject, ray: &mut Ray) -> Option<Hit<'a>> {
        if let Some(hit) = self.far_gi_hit(owner, ray) {
            return Some(hit);
        }

        let mut closest: Option<Hit<'a>> = None;
        for child in &self.children {
            if ray.flags.shadow && !child.casts_shadows {
                continue;
            }
            if let Some(hit) = child.intersect(ray) {
                if closest.map_or(true, |c| hit.t < c.t) {
                    closest = Some(hit);
                }
            }
        }

        let mut hit = closest?;
        if self.use_container_material && !ptr::eq(hit.target, owner) {
            if owner.material.needs_uv() {
                hit.resolve_uv();
            }
            hit.target = owner;
            hit.local = hit.location;
            hit.target_frame = Mat4::IDENTITY;
        }
        Some(hit)
    }

    /// Coarse hit on the bounding sphere for GI rays from far away.
    fn far_gi_hit<'a>(&self, owner: &'a SceneObject, ray: &Ray) -> Option<Hit<'a>> {
        if self.far_gi_proxy <= 0.0 || !ray.flags.gi {
            return None;
        }
        let BoundingVolume::Sphere(radius) = owner.bounding_volume else {
            return None;
        };
        if ray.origin().length() <= self.far_gi_proxy * radius {
            return None;
        }

        let t = owner.bounding_volume.intersection_distance(ray)?;
        if t >= ray.length {
            return None;
        }
        let location = ray.at(t);
        let normal = location.normalize_or_zero();
        Some(Hit {
            location,
            local: location,
            normal,
            tangent: normal.any_orthonormal_vector(),
            uv: None,
            target: owner,
            t,
            target_frame: Mat4::IDENTITY,
        })
    }
}

impl FromIterator<SceneObject> for Container {
    fn from_iter<I: IntoIterator<Item = SceneObject>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Plane;
    use lumen_math::{Vec3, Vec4};

    fn row_of_spheres() -> SceneObject {
        let mut group = SceneObject::container("row");
        let container = group.as_container_mut().unwrap();
        container.add(SceneObject::sphere("far", Vec3::new(0.0, 0.0, -10.0), 1.0));
        container.add(SceneObject::sphere("near", Vec3::new(0.0, 0.0, -5.0), 1.0));
        container.add(SceneObject::sphere("side", Vec3::new(5.0, 0.0, -5.0), 1.0));
        group
    }

    #[test]
    fn test_closest_hit_wins() {
        let group = row_of_spheres();
        let mut ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = group.intersect(&mut ray).unwrap();
        assert_eq!(hit.target.name, "near");
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!((ray.length - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_container_translation() {
        let group = row_of_spheres().with_location(Vec3::new(5.0, 0.0, 0.0));
        let mut ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_Z);

        let hit = group.intersect(&mut ray).unwrap();
        assert_eq!(hit.target.name, "side");
        assert!((hit.location - Vec3::new(10.0, 0.0, -4.0)).length() < 1e-4);
        assert!((hit.local - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_shadow_rays_skip_non_casters() {
        let mut group = SceneObject::container("group");
        let container = group.as_container_mut().unwrap();
        container.add(SceneObject::sphere("ghost", Vec3::new(0.0, 0.0, -5.0), 1.0).with_casts_shadows(false));
        container.add(SceneObject::sphere("wall", Vec3::new(0.0, 0.0, -10.0), 1.0));

        let mut shadow = Ray::shadow(Vec3::ZERO, Vec3::NEG_Z, 100.0);
        assert_eq!(group.intersect(&mut shadow).unwrap().target.name, "wall");

        let mut camera = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(group.intersect(&mut camera).unwrap().target.name, "ghost");
    }

    #[test]
    fn test_container_material_rebinds_target() {
        let mut group = SceneObject::container("box").with_material(Material::diffuse(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        let container = group.as_container_mut().unwrap();
        container.use_container_material = true;
        container.add(SceneObject::plane(
            "face",
            Plane::quad(
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ),
        ));
        let group = group.with_location(Vec3::new(0.0, 0.0, -3.0));

        let mut ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::NEG_Z);
        let hit = group.intersect(&mut ray).unwrap();
        assert_eq!(hit.target.name, "box");
        assert!((hit.local - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(hit.target_frame, Mat4::IDENTITY);
    }

    #[test]
    fn test_auto_radius_encloses_children() {
        let mut group = row_of_spheres();
        group.auto_radius();

        let radius = group.bounding_volume.radius().unwrap();
        assert!((radius - 11.0).abs() < 1e-4);

        group
            .as_container_mut()
            .unwrap()
            .add(SceneObject::plane("floor", Plane::infinite(Vec3::ZERO, Vec3::Y, Vec3::NEG_Z)));
        group.auto_radius();
        assert_eq!(group.bounding_volume, BoundingVolume::None);
    }

    #[test]
    fn test_far_gi_proxy_hits_bounds() {
        let mut group = row_of_spheres();
        group.auto_radius();
        group.as_container_mut().unwrap().far_gi_proxy = 2.0;
        let group = group.with_location(Vec3::new(0.0, 0.0, -100.0));

        let mut gi = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        gi.flags.gi = true;
        let hit = group.intersect(&mut gi).unwrap();
        assert_eq!(hit.target.name, "row");
        assert!((hit.t - 89.0).abs() < 1e-3);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);

        // Ordinary rays still see the real geometry
        let mut camera = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(group.intersect(&mut camera).unwrap().target.name, "near");
    }

    #[test]
    fn test_set_children_material_skips_references() {
        let shared = Arc::new(SceneObject::sphere("shared", Vec3::ZERO, 1.0));
        let mut group = row_of_spheres();
        group
            .as_container_mut()
            .unwrap()
            .add(SceneObject::reference("copy", shared.clone()));

        let red = Arc::new(Material::diffuse(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        group.set_children_material(red.clone());

        for child in group.as_container().unwrap().children() {
            match child.geometry {
                Geometry::Reference(_) => assert!(!Arc::ptr_eq(&child.material, &red)),
                _ => assert!(Arc::ptr_eq(&child.material, &red)),
            }
        }
    }
}
