//! Random sampling helpers.
//!
//! Every function takes the generator explicitly so each render worker can
//! own an independent stream.

use lumen_math::{Quat, Vec3};
use rand::{Rng, RngCore};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point in the cube [-0.5, 0.5]^3.
#[inline]
pub fn random_in_cube(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}

/// Cheap hemisphere direction around `normal`.
///
/// Draws a point in a cube, normalizes it and flips it onto the side of
/// `normal`. Returns the direction and its cosine with the normal. This is
/// not uniform over the hemisphere; the GI estimator relies on this exact
/// distribution.
pub fn random_hemisphere(rng: &mut dyn RngCore, normal: Vec3) -> (Vec3, f32) {
    let direction = loop {
        if let Some(d) = random_in_cube(rng).try_normalize() {
            break d;
        }
    };
    let cos = direction.dot(normal);
    if cos < 0.0 {
        (-direction, -cos)
    } else {
        (direction, cos)
    }
}

/// Randomly tilt `v` by up to `max_angle` radians, spun around `v` itself.
pub fn defocus(v: Vec3, max_angle: f32, rng: &mut dyn RngCore) -> Vec3 {
    let v = v.normalize_or_zero();
    let spin = gen_f32(rng) * std::f32::consts::TAU;
    let tilt = gen_f32(rng) * max_angle;

    let tilted = Quat::from_axis_angle(v.any_orthonormal_vector(), tilt) * v;
    Quat::from_axis_angle(v, spin) * tilted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_hemisphere_stays_on_normal_side() {
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Vec3::new(0.3, 0.9, -0.2).normalize();

        for _ in 0..500 {
            let (d, cos) = random_hemisphere(&mut rng, normal);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(cos >= 0.0);
            assert!((d.dot(normal) - cos).abs() < 1e-5);
        }
    }

    #[test]
    fn test_defocus_stays_within_cone() {
        let mut rng = StdRng::seed_from_u64(3);
        let axis = Vec3::new(0.0, 0.0, -1.0);
        let max_angle = 0.2;

        for _ in 0..500 {
            let d = defocus(axis, max_angle, &mut rng);
            let angle = d.dot(axis).clamp(-1.0, 1.0).acos();
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(angle <= max_angle + 1e-4);
        }
    }

    #[test]
    fn test_defocus_zero_angle_is_identity() {
        let mut rng = StdRng::seed_from_u64(11);
        let d = defocus(Vec3::X, 0.0, &mut rng);
        assert!((d - Vec3::X).length() < 1e-5);
    }
}
