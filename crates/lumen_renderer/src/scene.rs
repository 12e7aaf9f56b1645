//! The scene: a root container plus lights.

use crate::cluster::cluster;
use crate::{Hit, Light, Ray, SceneObject};

/// Anything that can be added to a scene.
#[derive(Debug, Clone)]
pub enum SceneItem {
    Object(SceneObject),
    Light(Light),
}

impl From<SceneObject> for SceneItem {
    fn from(object: SceneObject) -> Self {
        SceneItem::Object(object)
    }
}

impl From<Light> for SceneItem {
    fn from(light: Light) -> Self {
        SceneItem::Light(light)
    }
}

/// A complete scene, read-only while rendering.
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    root: SceneObject,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            root: SceneObject::container(name.clone()),
            name,
            lights: Vec::new(),
        }
    }

    /// Add an object or a light.
    pub fn add(&mut self, item: impl Into<SceneItem>) {
        match item.into() {
            SceneItem::Object(object) => {
                if let Some(root) = self.root.as_container_mut() {
                    root.add(object);
                }
            }
            SceneItem::Light(light) => self.lights.push(light),
        }
    }

    /// Builder-style [`Scene::add`].
    pub fn with(mut self, item: impl Into<SceneItem>) -> Self {
        self.add(item);
        self
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn root(&self) -> &SceneObject {
        &self.root
    }

    /// Top-level objects.
    pub fn objects(&self) -> &[SceneObject] {
        self.root.as_container().map(|c| c.children()).unwrap_or(&[])
    }

    /// Closest hit in world space. Shrinks `ray.length` like any other
    /// intersection.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Hit<'_>> {
        self.root.intersect(ray)
    }

    /// Group the top-level objects into nested bounding containers.
    pub fn cluster(&mut self, factor: f32) {
        if let Some(root) = self.root.as_container_mut() {
            let before = root.len();
            let objects = root.take_children();
            *root.children_mut() = cluster(objects, factor);
            log::info!("Clustered scene '{}': {} -> {} top-level objects", self.name, before, root.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;

    #[test]
    fn test_add_sorts_lights_from_objects() {
        let scene = Scene::new("test")
            .with(SceneObject::sphere("ball", Vec3::new(0.0, 0.0, -5.0), 1.0))
            .with(Light::new(Vec3::new(0.0, 10.0, 0.0)));

        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.lights().len(), 1);
    }

    #[test]
    fn test_intersect_is_deterministic() {
        let scene = Scene::new("test")
            .with(SceneObject::sphere("a", Vec3::new(0.0, 0.0, -5.0), 1.0))
            .with(SceneObject::sphere("b", Vec3::new(0.5, 0.0, -8.0), 2.0));

        let mut first = Ray::new(Vec3::ZERO, Vec3::new(0.05, 0.02, -1.0));
        let mut second = first;
        let a = scene.intersect(&mut first).unwrap();
        let b = scene.intersect(&mut second).unwrap();

        assert_eq!(a.t, b.t);
        assert_eq!(a.location, b.location);
        assert_eq!(a.normal, b.normal);
    }

    #[test]
    fn test_cluster_keeps_hits() {
        let mut scene = Scene::new("grid");
        for i in 0..20 {
            scene.add(SceneObject::sphere(format!("s{i}"), Vec3::new(i as f32 * 3.0, 0.0, -10.0), 1.0));
        }
        scene.cluster(1.0);

        assert!(scene.objects().len() <= 4);
        let mut ray = Ray::new(Vec3::new(15.0, 0.0, 0.0), Vec3::NEG_Z);
        assert_eq!(scene.intersect(&mut ray).unwrap().target.name, "s5");
    }
}
