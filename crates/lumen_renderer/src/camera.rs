//! Camera for ray generation.

use lumen_math::{Quat, Vec3, EPSILON};
use rand::RngCore;

use crate::sampling::{defocus, gen_f32};
use crate::{Color, LightingModel, Ray, RenderConfig};

/// Pinhole camera with yaw/pitch orientation and the render settings that
/// travel with it.
///
/// The camera looks down its local -Z with +Y up. Yaw turns around world Y,
/// pitch around the camera's X.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub location: Vec3,
    /// Radians around world Y
    pub yaw: f32,
    /// Radians around camera X; positive looks up
    pub pitch: f32,

    /// Vertical field of view in degrees
    pub fov: f32,
    pub gi_samples: u32,
    pub max_recursion_depth: u32,
    /// Jittered samples per pixel; 0 means one centred sample
    pub super_sample: u32,
    /// Maximum primary-ray jitter angle in radians
    pub defocus_blur: f32,
    pub lq_mode: bool,
    pub lighting_model: LightingModel,
    pub background: Color,
}

impl Camera {
    /// Camera at `location` looking down -Z with default settings.
    pub fn new(location: Vec3) -> Self {
        Self {
            location,
            yaw: 0.0,
            pitch: 0.0,
            fov: 90.0,
            gi_samples: 32,
            max_recursion_depth: 9,
            super_sample: 0,
            defocus_blur: 0.0,
            lq_mode: false,
            lighting_model: LightingModel::Direct,
            background: Color::new(0.1, 0.2, 0.4),
        }
    }

    /// Camera configured from `config`.
    pub fn from_config(location: Vec3, config: &RenderConfig) -> Self {
        let mut camera = Self::new(location);
        camera.apply_config(config);
        camera
    }

    /// Copy the render settings of `config`, keeping position and
    /// orientation.
    pub fn apply_config(&mut self, config: &RenderConfig) {
        self.fov = config.fov;
        self.gi_samples = config.gi_samples;
        self.max_recursion_depth = config.max_recursion_depth;
        self.super_sample = config.super_sample;
        self.defocus_blur = config.defocus_blur;
        self.lq_mode = config.lq_mode;
        self.lighting_model = config.lighting_model;
        self.background = Color::from_array(config.background);
    }

    /// Builder-style [`Camera::look_at`].
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.look_at(target);
        self
    }

    /// Turn to face `target`. Does nothing if the target is the camera's own
    /// location.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(d) = (target - self.location).try_normalize() else {
            return;
        };
        self.pitch = d.y.clamp(-1.0, 1.0).asin();
        self.yaw = (-d.x).atan2(-d.z);
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// Move in camera space: forward along the view, strafe to the right,
    /// up along the camera's up.
    pub fn move_by(&mut self, forward: f32, strafe: f32, up: f32) {
        self.location += self.orientation() * Vec3::new(strafe, up, -forward);
    }

    /// Add to yaw and pitch. Pitch stays short of straight up or down.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - 1e-3;
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-limit, limit);
    }

    /// Primary ray through pixel (`x`, `y`) of a `width` x `height` image,
    /// row 0 at the top.
    ///
    /// Without super-sampling the ray passes through the pixel centre;
    /// otherwise it is jittered inside the pixel.
    pub fn primary_ray(&self, x: u32, y: u32, width: u32, height: u32, rng: &mut dyn RngCore) -> Ray {
        let (jx, jy) = if self.super_sample == 0 {
            (0.5, 0.5)
        } else {
            (gen_f32(rng), gen_f32(rng))
        };

        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let half = (self.fov.to_radians() * 0.5).tan();
        let rx = (2.0 * (x as f32 + jx) / w - 1.0) * half * (w / h);
        let ry = (1.0 - 2.0 * (y as f32 + jy) / h) * half;

        let mut direction = self.orientation() * Vec3::new(rx, ry, -1.0).normalize();
        if self.defocus_blur > EPSILON {
            direction = defocus(direction, self.defocus_blur, rng);
        }
        Ray::new(self.location, direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_center_ray_points_forward() {
        let camera = Camera::default();
        let mut rng = StdRng::seed_from_u64(42);

        // Centre of an even image is the shared corner of four pixels
        let ray = camera.primary_ray(0, 0, 1, 1, &mut rng);
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_corner_rays_follow_fov() {
        let camera = Camera::default();
        let mut rng = StdRng::seed_from_u64(42);

        // Top row points up, left column points left
        let top_left = camera.primary_ray(0, 0, 100, 100, &mut rng);
        assert!(top_left.direction().y > 0.0);
        assert!(top_left.direction().x < 0.0);

        // 90 degrees vertical: the top edge is 45 degrees up
        let edge = camera.primary_ray(50, 0, 101, 100_000, &mut rng);
        let angle = edge.direction().y.atan2(-edge.direction().z);
        assert!((angle - std::f32::consts::FRAC_PI_4).abs() < 1e-3);
    }

    #[test]
    fn test_look_at() {
        let target = Vec3::new(3.0, 4.0, -5.0);
        let camera = Camera::new(Vec3::new(1.0, 1.0, 1.0)).looking_at(target);

        let expected = (target - camera.location).normalize();
        assert!((camera.forward() - expected).length() < 1e-5);
    }

    #[test]
    fn test_move_by_follows_view() {
        let mut camera = Camera::default();
        camera.rotate(std::f32::consts::FRAC_PI_2, 0.0);

        // Yawed 90 degrees left, so forward is -X
        camera.move_by(2.0, 0.0, 0.0);
        assert!((camera.location - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);

        camera.move_by(0.0, 1.0, 3.0);
        assert!((camera.location - Vec3::new(-2.0, 3.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotate_clamps_pitch() {
        let mut camera = Camera::default();
        camera.rotate(0.0, 10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_apply_config() {
        let config = RenderConfig {
            gi_samples: 4,
            lighting_model: LightingModel::Gi,
            background: [1.0, 0.0, 0.0],
            ..RenderConfig::default()
        };
        let camera = Camera::from_config(Vec3::ONE, &config);

        assert_eq!(camera.gi_samples, 4);
        assert_eq!(camera.lighting_model, LightingModel::Gi);
        assert_eq!(camera.background, Color::X);
        assert_eq!(camera.location, Vec3::ONE);
    }

    #[test]
    fn test_defocus_spreads_rays() {
        let mut camera = Camera::default();
        camera.defocus_blur = 0.1;
        let mut rng = StdRng::seed_from_u64(5);

        let a = camera.primary_ray(0, 0, 1, 1, &mut rng);
        let b = camera.primary_ray(0, 0, 1, 1, &mut rng);
        assert_ne!(a.direction(), b.direction());
        assert!(a.direction().dot(Vec3::NEG_Z) > 0.1f32.cos() - 1e-4);
    }
}
