//! Built-in demo scenes.
//!
//! Each builder returns the scene and a camera placed to frame it. Random
//! placement uses a fixed seed so a scene looks the same on every run.

use std::f32::consts::PI;
use std::sync::Arc;

use lumen_core::Mesh;
use lumen_math::{Vec3, Vec4};
use lumen_renderer::shapes::{cube, polyhedron};
use lumen_renderer::{mesh_object, Camera, Color, Light, Material, Plane, Scene, SceneObject};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Builder = fn() -> (Scene, Camera);

/// Scenes in index order.
pub const SCENES: &[(&str, Builder)] = &[
    ("basic", basic),
    ("objects", objects),
    ("pillars", pillars),
    ("materials", materials),
    ("cubes", cubes),
    ("instances", instances),
    ("frame", frame),
];

/// Build the scene named by `selector`, either its index or its name.
pub fn build(selector: &str) -> Option<(Scene, Camera)> {
    let builder = match selector.parse::<usize>() {
        Ok(index) => SCENES.get(index).map(|(_, builder)| builder),
        Err(_) => SCENES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(selector))
            .map(|(_, builder)| builder),
    }?;
    Some(builder())
}

/// One of the preset looks used by the demo grids: `color` picks the base
/// colour, `kind` the surface type.
pub fn preset_material(color: usize, kind: usize) -> Material {
    let base = match color % 5 {
        0 => Vec4::new(0.9, 0.1, 0.2, 1.0),
        1 => Vec4::new(0.1, 0.9, 0.2, 1.0),
        2 => Vec4::new(0.3, 0.4, 0.9, 1.0),
        3 => Vec4::new(0.5, 0.5, 0.5, 1.0),
        _ => Vec4::ONE,
    };
    let mut material = Material::diffuse(base);

    match kind % 8 {
        0 => material.shininess = 5.0,
        1 => material.diffuse_color.w = 0.5,
        2 => {
            material.emissive_color = material.diffuse_color.truncate() * 0.5;
            material.diffuse_color = Vec4::new(0.5, 0.5, 0.5, 1.0);
        }
        3 => {
            material.reflectivity = 0.1;
            material.refraction_index = 1.25;
            material.diffuse_color *= 0.5;
            material.diffuse_color.w = 0.1;
        }
        4 => {
            material.reflectivity = 0.5;
            material.diffuse_color *= 0.5;
            material.diffuse_color.w = 1.0;
        }
        5 => {
            material.reflectivity = 0.9;
            material.reflection_blur = 0.5;
            material.diffuse_color *= 0.1;
            material.diffuse_color.w = 1.0;
        }
        6 => {
            let tint = (material.diffuse_color + Vec4::ONE) / 2.0;
            material = Material::checkerboard(1.0, tint, Vec4::new(0.1, 0.1, 0.1, 1.0));
        }
        _ => material = material.with_scatter(0.5),
    }
    material
}

fn ground(y: f32) -> SceneObject {
    SceneObject::plane("ground", Plane::infinite(Vec3::new(0.0, y, 0.0), Vec3::Y, Vec3::Z))
}

fn random_rotation(rng: &mut StdRng) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
}

/// Three spheres over a checkerboard floor.
fn basic() -> (Scene, Camera) {
    let checker = Material::checkerboard(1.0, Vec4::ONE, Vec4::new(0.1, 0.1, 0.1, 1.0));
    let scene = Scene::new("Basic")
        .with(Light::new(Vec3::new(-10.0, 30.0, 0.0)))
        .with(SceneObject::sphere("big", Vec3::new(-5.0, -5.0, -50.0), 15.0))
        .with(SceneObject::sphere("checker", Vec3::new(4.0, 3.0, -30.0), 4.0).with_material(checker.clone()))
        .with(
            SceneObject::sphere("green", Vec3::new(-16.0, 8.0, -20.0), 4.0)
                .with_material(Material::diffuse(Vec4::new(0.0, 1.0, 0.0, 1.0))),
        )
        .with(ground(-20.0).with_material(checker));
    (scene, Camera::default())
}

/// One of each primitive: sphere, cube and cylinder.
fn objects() -> (Scene, Camera) {
    let checker = Material::checkerboard(1.0, Vec4::ONE, Vec4::new(0.1, 0.1, 0.1, 1.0));
    let scene = Scene::new("Objects")
        .with(Light::new(Vec3::new(-10.0, 30.0, 0.0)))
        .with(SceneObject::sphere("left", Vec3::new(-10.0, -16.0, -25.0), 4.0))
        .with(
            SceneObject::sphere("mirror", Vec3::new(0.0, -5.0, -30.0), 10.0)
                .with_material(Material::reflective(Vec4::new(0.3, 0.3, 0.4, 1.0), 0.8)),
        )
        .with(SceneObject::sphere("right", Vec3::new(10.0, -16.0, -25.0), 4.0))
        .with(ground(-20.0).with_material(checker))
        .with(
            cube("crate", Vec3::new(-10.0, -18.0, -15.0), Vec3::splat(4.0))
                .with_rotation(Vec3::new(0.0, 2.0, 0.0))
                .with_material(preset_material(3, 4)),
        )
        .with(SceneObject::cylinder("drum", Vec3::new(10.0, -20.0, -15.0), 3.0, 3.0).with_material(preset_material(2, 0)))
        .with(
            SceneObject::sphere("glass", Vec3::new(0.0, -16.0, -15.0), 4.0)
                .with_material(Material::refractive(Vec4::new(0.8, 0.9, 1.0, 0.1), 1.33)),
        );
    let camera = Camera::new(Vec3::new(0.0, -10.0, 1.0)).looking_at(Vec3::new(0.0, -14.0, -20.0));
    (scene, camera)
}

/// A row of pillars lit by a small orange area light. Best with GI.
fn pillars() -> (Scene, Camera) {
    let orange = Color::new(1.0, 0.5, 0.0);
    let mut scene = Scene::new("Pillars");
    scene.add(Light::new(Vec3::new(0.0, 2.0, -15.0)).with_color(orange).with_size(1.0));
    scene.add(
        cube("light", Vec3::new(0.0, 2.0, -15.0), Vec3::new(1.0, 8.0, 1.0))
            .with_material(Material::emissive(orange))
            .with_casts_shadows(false),
    );
    for i in 0..10 {
        let x = -10.0 + i as f32 * 2.0;
        scene.add(cube(format!("pillar_{i}"), Vec3::new(x, 0.0, -10.0), Vec3::new(0.7, 12.0, 0.7)));
    }
    scene.add(SceneObject::sphere("ball", Vec3::new(0.0, 2.0, 0.0), 1.0));
    scene.add(ground(0.0));

    let camera = Camera::new(Vec3::new(-9.2, 3.0, 2.0)).looking_at(Vec3::new(0.0, 2.0, -8.0));
    (scene, camera)
}

/// A grid of small spheres showing every preset material.
fn materials() -> (Scene, Camera) {
    const COLUMNS: i32 = 8;
    const ROWS: i32 = 5;

    let mut rng = StdRng::seed_from_u64(3);
    let mut scene = Scene::new("MaterialSpheres");
    scene.add(Light::new(Vec3::new(-10.0, 30.0, 0.0)).with_color(Color::splat(0.8)).with_size(2.0));
    scene.add(ground(0.0).with_material(Material::checkerboard(
        4.0,
        Vec4::new(0.5, 0.5, 0.5, 1.0),
        Vec4::new(0.1, 0.1, 0.1, 1.0),
    )));

    for i in 0..COLUMNS {
        for j in 0..ROWS {
            let location = Vec3::new(((i - COLUMNS / 2) * 2) as f32, 0.5, ((j - ROWS / 2) * 2) as f32);
            scene.add(
                SceneObject::sphere(format!("sphere_{i}_{j}"), location, 0.5)
                    .with_rotation(random_rotation(&mut rng))
                    .with_material(preset_material((2 + j) as usize, i as usize)),
            );
        }
    }

    let mut camera = Camera::new(Vec3::new(0.0, 4.7, 10.3));
    camera.pitch = -0.6;
    (scene, camera)
}

/// A block of a thousand rotated cubes, clustered into a hierarchy, lit by
/// glowing cylinders.
fn cubes() -> (Scene, Camera) {
    const SIZE: i32 = 10;

    let mut rng = StdRng::seed_from_u64(7);
    let mut scene = Scene::new("Cubes");
    scene.add(Light::new(Vec3::new(-10.0, 30.0, 0.0)).with_color(Color::splat(0.5)));
    scene.add(ground(0.0));

    for i in 0..SIZE {
        for j in 0..SIZE {
            for k in 0..SIZE {
                let location = Vec3::new((i - SIZE / 2) as f32, (j + 2) as f32, (k - SIZE - 5) as f32);
                scene.add(
                    cube(format!("cube_{i}_{j}_{k}"), location, Vec3::splat(0.25))
                        .with_rotation(random_rotation(&mut rng))
                        .with_material(preset_material((i + j + k) as usize, 0)),
                );
            }
        }
    }

    for i in 0..2 {
        for j in 0..2 {
            let location = Vec3::new(((i * 2) - 1) as f32 * 8.0, 0.0, ((j * 2) - 1) as f32 * 8.0 - 10.0);
            let mut glow = preset_material((4 + i + j * 2) as usize, 2);
            glow.emissive_color *= 5.0;
            scene.add(SceneObject::cylinder(format!("lamp_{i}_{j}"), location, 1.1, 3.0).with_material(glow));
        }
    }

    scene.cluster(1.0);
    let camera = Camera::new(Vec3::new(0.0, 4.08, 18.21)).looking_at(Vec3::new(0.0, 5.0, -10.0));
    (scene, camera)
}

/// One subdivided mesh placed many times by reference, in a box with a
/// mirror floor and a glowing ceiling panel.
fn instances() -> (Scene, Camera) {
    const COLUMNS: i32 = 11;
    const ROWS: i32 = 11;

    let mut rng = StdRng::seed_from_u64(11);
    let mut scene = Scene::new("Instances");
    scene.add(Light::new(Vec3::new(0.0, 5.26, 14.12)).with_color(Color::splat(0.5)));
    scene.add(ground(0.0).with_material(Material::reflective(Vec4::new(0.7, 0.8, 0.9, 1.0), 0.0)));

    let mut mesh = Mesh::uv_sphere(0.5, 16, 8);
    mesh.transform(1.0, Vec3::new(0.0, 0.5, 0.0));
    let mut blob = mesh_object("blob", &mesh);
    blob.set_material(preset_material(0, 4));
    let blob = Arc::new(blob);

    let mut copies = SceneObject::container("copies");
    if let Some(container) = copies.as_container_mut() {
        for i in 0..COLUMNS {
            let x = i - COLUMNS / 2;
            // leave an aisle under each strip light
            if x.abs() == 2 {
                continue;
            }
            for j in 0..ROWS {
                let z = j - ROWS / 2;
                let yaw = (rng.gen::<f32>() - 0.5) * PI * 0.3 + 0.4 * PI;
                container.add(
                    SceneObject::reference(format!("blob_{i}_{j}"), Arc::clone(&blob))
                        .with_location(Vec3::new(x as f32 * 1.2, -0.5, z as f32 * 2.0))
                        .with_rotation(Vec3::new(0.0, yaw, 0.0)),
                );
            }
        }
    }
    copies.auto_radius();
    scene.add(copies);

    scene.add(cube("back", Vec3::new(0.0, 0.0, -15.0), Vec3::new(21.0, 15.0, 2.0)));
    scene.add(cube("left", Vec3::new(-10.0, 0.0, 0.0), Vec3::new(2.0, 15.0, 30.0)));
    scene.add(cube("right", Vec3::new(10.0, 0.0, 0.0), Vec3::new(2.0, 15.0, 30.0)));
    scene.add(
        cube("panel", Vec3::new(0.0, 10.0, 0.0), Vec3::new(5.0, 1.0, 5.0))
            .with_material(Material::emissive(Color::splat(0.5)))
            .with_casts_shadows(false),
    );
    scene.add(
        cube("panel_case", Vec3::new(0.0, 10.0, 0.0), Vec3::new(5.5, 0.8, 5.5))
            .with_material(Material::diffuse(Vec4::new(0.3, 0.3, 0.3, 1.0))),
    );
    for (name, x, color) in [("strip_left", -2.4, 5), ("strip_right", 2.4, 6)] {
        scene.add(
            cube(name, Vec3::new(x, 0.0, 0.0), Vec3::new(0.6, 0.5, 20.0))
                .with_rotation(Vec3::new(0.0, 0.0, PI / 4.0))
                .with_material(preset_material(color, 2)),
        );
    }

    let mut camera = Camera::new(Vec3::new(0.0, 5.26, 14.12));
    camera.pitch = -0.5;
    (scene, camera)
}

/// The edges of a box drawn with cylinders around a glass tetrahedron.
fn frame() -> (Scene, Camera) {
    let mut scene = Scene::new("Frame");
    scene.add(Light::new(Vec3::new(-6.0, 12.0, 4.0)).with_size(1.5));
    scene.add(ground(0.0).with_material(Material::checkerboard(
        2.0,
        Vec4::ONE,
        Vec4::new(0.2, 0.2, 0.2, 1.0),
    )));

    let (lo, hi) = (Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 4.0, 2.0));
    let corner = |i: usize| {
        Vec3::new(
            if i & 1 == 0 { lo.x } else { hi.x },
            if i & 2 == 0 { lo.y } else { hi.y },
            if i & 4 == 0 { lo.z } else { hi.z },
        )
    };
    let mut rods = SceneObject::container("rods");
    if let Some(container) = rods.as_container_mut() {
        for a in 0..8usize {
            for bit in [1usize, 2, 4] {
                let b = a | bit;
                if b != a {
                    container.add(SceneObject::cylinder_between(format!("rod_{a}_{b}"), corner(a), corner(b), 0.1));
                }
            }
        }
    }
    rods.set_children_material(Arc::new(preset_material(2, 4)));
    rods.auto_radius();
    scene.add(rods);

    let (a, b, c, d) = (
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, -0.7),
        Vec3::new(-1.0, 1.0, -0.7),
        Vec3::new(0.0, 2.6, 0.0),
    );
    scene.add(
        polyhedron(
            "gem",
            vec![
                Plane::triangle(a, c, b),
                Plane::triangle(a, b, d),
                Plane::triangle(a, d, c),
                Plane::triangle(b, c, d),
            ],
        )
        .with_material(Material::refractive(Vec4::new(0.9, 0.9, 1.0, 0.1), 1.33)),
    );

    let camera = Camera::new(Vec3::new(5.0, 5.0, 8.0)).looking_at(Vec3::new(0.0, 2.0, 0.0));
    (scene, camera)
}
