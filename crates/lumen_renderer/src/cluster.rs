//! Greedy spatial clustering of flat object lists.
//!
//! Each pass pairs every object with its nearest unpaired neighbour and
//! groups the pair into a sub-container when they are close relative to
//! their size. Repeating the pass builds a loose hierarchy, so a ray tests a
//! handful of bounding spheres instead of every object. Not balanced; each
//! pass is O(n²).

use lumen_math::Vec3;

use crate::{BoundingVolume, SceneObject};

/// Stop once the top level holds this many nodes.
const TARGET_NODES: usize = 4;
/// Guard against pathological inputs that never merge.
const MAX_PASSES: usize = 64;

/// Group `objects` into nested containers.
///
/// Objects without a bounding radius (infinite planes, unbounded
/// containers) cannot be enclosed and are returned at the top level
/// untouched. `factor` scales the merge distance: two nodes merge when their
/// centres are closer than `factor` times the sum of their radii. It doubles
/// after any pass that merged nothing.
pub fn cluster(objects: Vec<SceneObject>, factor: f32) -> Vec<SceneObject> {
    let (mut nodes, unbounded): (Vec<_>, Vec<_>) = objects
        .into_iter()
        .partition(|object| object.bounding_radius().is_some());

    let mut factor = factor.max(f32::MIN_POSITIVE);
    let mut pass = 0;
    while nodes.len() > TARGET_NODES && pass < MAX_PASSES {
        let before = nodes.len();
        let (merged, next) = merge_pass(nodes, factor, pass);
        nodes = next;
        log::debug!(
            "Cluster pass {}: {} -> {} nodes ({} merges, factor {:.2})",
            pass,
            before,
            nodes.len(),
            merged,
            factor
        );
        if merged == 0 {
            factor *= 2.0;
        }
        pass += 1;
    }

    nodes.extend(unbounded);
    nodes
}

/// One greedy nearest-neighbour pass. Returns the merge count and the new
/// node list.
fn merge_pass(nodes: Vec<SceneObject>, factor: f32, pass: usize) -> (usize, Vec<SceneObject>) {
    let locations: Vec<Vec3> = nodes.iter().map(|n| n.location()).collect();
    let radii: Vec<f32> = nodes.iter().map(|n| n.bounding_radius().unwrap_or(0.0)).collect();
    let mut slots: Vec<Option<SceneObject>> = nodes.into_iter().map(Some).collect();
    let mut next = Vec::with_capacity(slots.len());
    let mut merged = 0;

    for i in 0..slots.len() {
        if slots[i].is_none() {
            continue;
        }

        let nearest = (i + 1..slots.len())
            .filter(|&j| slots[j].is_some())
            .map(|j| (j, locations[i].distance(locations[j])))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let partner = nearest
            .filter(|&(j, distance)| distance < factor * (radii[i] + radii[j]))
            .and_then(|(j, _)| slots[j].take());

        let Some(a) = slots[i].take() else { continue };
        match partner {
            Some(b) => {
                next.push(make_cluster(a, b, format!("cluster_{pass}_{merged}")));
                merged += 1;
            }
            None => next.push(a),
        }
    }

    (merged, next)
}

/// Sub-container centred between `a` and `b` holding both.
fn make_cluster(mut a: SceneObject, mut b: SceneObject, name: String) -> SceneObject {
    let center = (a.location() + b.location()) * 0.5;
    a.set_location(a.location() - center);
    b.set_location(b.location() - center);

    let mut node = SceneObject::container(name);
    if let Some(container) = node.as_container_mut() {
        container.add(a);
        container.add(b);
    }
    node.auto_radius();
    node.with_location(center)
}

/// Returns true if every container at or below `object` has a bounding
/// sphere that encloses all of its children's bounding spheres.
pub fn bounds_enclose_children(object: &SceneObject) -> bool {
    let Some(container) = object.as_container() else {
        return true;
    };
    let encloses = match object.bounding_volume {
        BoundingVolume::Sphere(radius) => container.children().iter().all(|child| {
            child
                .bounding_radius()
                .is_some_and(|r| child.location().length() + r <= radius + 1e-3)
        }),
        _ => true,
    };
    encloses && container.children().iter().all(bounds_enclose_children)
}
