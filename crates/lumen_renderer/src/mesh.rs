//! Triangle soups subdivided into container trees.

use lumen_core::Mesh;
use lumen_math::{Aabb, Vec3};

use crate::{BoundingVolume, Plane, SceneObject};

/// Nodes with this many triangles or fewer become leaves.
const LEAF_TRIANGLES: usize = 4;

type Triangle = [Vec3; 3];

/// Build a container tree from a flat triangle soup, three consecutive
/// vertices per triangle (counter-clockwise). Trailing vertices that do not
/// form a whole triangle are ignored.
///
/// The tree is placed at the centroid of the soup; each node is split at
/// the middle of its longest vertex-bounds axis, a triangle going to the
/// side its first vertex lies on. The whole tree shades with the root's
/// material.
pub fn build_mesh(name: impl Into<String>, soup: &[Vec3]) -> SceneObject {
    let name = name.into();
    let triangles: Vec<Triangle> = soup.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();
    if triangles.is_empty() {
        let mut empty = SceneObject::container(name).with_bounding_volume(BoundingVolume::Sphere(0.0));
        if let Some(container) = empty.as_container_mut() {
            container.use_container_material = true;
        }
        return empty;
    }

    let center = vertex_average(&triangles);
    let node = build_node(&name, recenter(triangles, center));
    log::info!("Built mesh '{}' with {} triangles", name, soup.len() / 3);
    node.with_location(center)
}

/// Subdivide an indexed mesh.
pub fn mesh_object(name: impl Into<String>, mesh: &Mesh) -> SceneObject {
    build_mesh(name, &mesh.triangle_soup())
}

fn build_node(name: &str, triangles: Vec<Triangle>) -> SceneObject {
    if triangles.len() <= LEAF_TRIANGLES {
        return leaf(name, triangles);
    }

    let bounds = Aabb::enclosing(triangles.iter().flatten());
    let axis = bounds.longest_axis();
    let split = bounds.centroid()[axis];
    let count = triangles.len();
    let (low, high): (Vec<_>, Vec<_>) = triangles.into_iter().partition(|t| t[0][axis] < split);

    if low.is_empty() || high.is_empty() {
        log::debug!("Mesh node '{}' could not be split ({} triangles), keeping a leaf", name, count);
        let all = if low.is_empty() { high } else { low };
        return leaf(name, all);
    }

    let mut node = SceneObject::container(name);
    if let Some(container) = node.as_container_mut() {
        container.use_container_material = true;
        for half in [low, high] {
            let center = vertex_average(&half);
            let child = build_node(name, recenter(half, center)).with_location(center);
            container.add(child);
        }
    }
    node.auto_radius();
    node
}

fn leaf(name: &str, triangles: Vec<Triangle>) -> SceneObject {
    let radius = triangles
        .iter()
        .flatten()
        .map(|v| v.length())
        .fold(0.0, f32::max);

    let mut node = SceneObject::container(name).with_bounding_volume(BoundingVolume::Sphere(radius));
    if let Some(container) = node.as_container_mut() {
        container.use_container_material = true;
        for [v1, v2, v3] in triangles {
            container.add(SceneObject::plane(name, Plane::triangle(v1, v2, v3)));
        }
    }
    node
}

fn vertex_average(triangles: &[Triangle]) -> Vec3 {
    let sum: Vec3 = triangles.iter().flatten().copied().sum();
    sum / (triangles.len() * 3) as f32
}

fn recenter(triangles: Vec<Triangle>, center: Vec3) -> Vec<Triangle> {
    triangles
        .into_iter()
        .map(|t| t.map(|v| v - center))
        .collect()
}
