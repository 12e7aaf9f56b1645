//! Composite shapes built from bounded planes.

use lumen_math::Vec3;

use crate::{BoundingVolume, Plane, SceneObject};

/// Axis-aligned box centred on `location` with the given half extents.
///
/// The six faces wind outwards and the whole cube shades with one material.
pub fn cube(name: impl Into<String>, location: Vec3, half: Vec3) -> SceneObject {
    let name = name.into();
    let (w, h, d) = (half.x.abs(), half.y.abs(), half.z.abs());
    let x = Vec3::new(w, 0.0, 0.0);
    let y = Vec3::new(0.0, h, 0.0);
    let z = Vec3::new(0.0, 0.0, d);

    // (face centre, first edge, second edge): a x b points outwards
    let faces = [
        (x, y, z),
        (-x, z, y),
        (y, z, x),
        (-y, x, z),
        (z, x, y),
        (-z, y, x),
    ];

    let mut object = SceneObject::container(name.clone())
        .with_bounding_volume(BoundingVolume::Box(Vec3::new(w, h, d)))
        .with_location(location);
    if let Some(container) = object.as_container_mut() {
        container.use_container_material = true;
        for (c, a, b) in faces {
            container.add(SceneObject::plane(
                name.clone(),
                Plane::quad(c - a - b, c + a - b, c + a + b, c - a + b),
            ));
        }
    }
    object
}

/// Closed shape made of arbitrary bounded planes in local space.
pub fn polyhedron(name: impl Into<String>, faces: Vec<Plane>) -> SceneObject {
    let name = name.into();
    let mut object = SceneObject::container(name.clone());
    if let Some(container) = object.as_container_mut() {
        container.use_container_material = true;
        for face in faces {
            container.add(SceneObject::plane(name.clone(), face));
        }
    }
    object.auto_radius();
    object
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ray;

    #[test]
    fn test_cube_faces_point_outwards() {
        let cube = cube("box", Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        for child in cube.as_container().unwrap().children() {
            let crate::Geometry::Plane(plane) = &child.geometry else {
                panic!("cube face is not a plane");
            };
            let [v1, v2, v3, v4] = plane.vertices();
            let center = (v1 + v2 + v3 + v4) / 4.0;
            assert!(plane.normal().dot(center) > 0.0);
        }
    }

    #[test]
    fn test_cube_hit_from_every_side() {
        let cube = cube("box", Vec3::new(0.0, 0.0, -10.0), Vec3::splat(1.0));
        let center = Vec3::new(0.0, 0.0, -10.0);

        for dir in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            let mut ray = Ray::new(center + dir * 5.0, -dir);
            let hit = cube.intersect(&mut ray).unwrap_or_else(|| panic!("missed from {dir}"));
            assert!((hit.t - 4.0).abs() < 1e-4);
            assert!((hit.normal - dir).length() < 1e-4);
            assert_eq!(hit.target.name, "box");
        }
    }

    #[test]
    fn test_cube_bounding_box_rejects() {
        let cube = cube("box", Vec3::ZERO, Vec3::splat(1.0));
        let mut ray = Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z);

        assert!(cube.intersect(&mut ray).is_none());
        assert_eq!(cube.bounding_radius(), Some(3.0f32.sqrt()));
    }

    #[test]
    fn test_polyhedron_tetrahedron() {
        let a = Vec3::new(1.0, 1.0, 1.0);
        let b = Vec3::new(1.0, -1.0, -1.0);
        let c = Vec3::new(-1.0, 1.0, -1.0);
        let d = Vec3::new(-1.0, -1.0, 1.0);
        let tetra = polyhedron(
            "tetra",
            vec![
                Plane::triangle(a, b, c),
                Plane::triangle(a, d, b),
                Plane::triangle(a, c, d),
                Plane::triangle(b, d, c),
            ],
        );

        assert!((tetra.bounding_radius().unwrap() - 3.0f32.sqrt()).abs() < 1e-5);

        let mut ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hit = tetra.intersect(&mut ray).unwrap();
        assert!(hit.normal.z > 0.0);
    }
}
