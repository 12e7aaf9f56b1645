//! The recursive shading integrator.
//!
//! [`RenderContext::trace`] finds the closest hit for a ray and shades it:
//! direct lighting with soft and coloured shadows, sampled indirect light
//! with an optional sub-surface term, mirror reflection, straight
//! transparency and refraction. Reflection, refraction and GI bounces call
//! back into `trace`, bounded by the camera's maximum recursion depth.
//!
//! The GI estimator is biased: hemisphere directions come from a normalized
//! cube sample, and grazing samples are discarded with probability
//! `1 - sqrt(cos)` then weighted by `sqrt(cos)`.

use std::f32::consts::PI;
use std::ptr;

use lumen_math::{Vec3, EPSILON};
use rand::RngCore;

use crate::material::{reflect, refract};
use crate::sampling::{defocus, gen_f32, random_hemisphere};
use crate::{Camera, Color, Hit, Light, LightingModel, Ray, RayFlags, Scene, MAX_RECURSION_DEPTH};

/// Offset applied along secondary rays so they leave the surface.
const RAY_OFFSET: f32 = 0.01;
/// Smaller offset for rays continuing through a transparent surface.
const TRANSMISSION_OFFSET: f32 = 0.001;
/// Transparent occluders a shadow ray may pass through.
const MAX_SHADOW_HOPS: u32 = 9;
/// Straight-through transparent surfaces one ray may cross.
const MAX_TRANSPARENT_HOPS: u32 = 32;
/// How far sub-surface rays travel inside an object.
const SSS_DISTANCE: f32 = 2.0;
/// Overall GI strength.
const GI_SCALE: f32 = 1.0;
/// Colour used when a refracted ray never finds its way out.
pub const REFRACTION_ERROR: Color = Color::new(1.0, 0.0, 1.0);

/// Counters collected while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Calls to `trace`
    pub rays: u64,
    /// Deepest recursion level that was actually shaded
    pub max_depth: u32,
    /// Traces cut off by the recursion limit
    pub capped: u64,
}

impl RenderStats {
    pub fn merge(&mut self, other: &RenderStats) {
        self.rays += other.rays;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.capped += other.capped;
    }
}

/// Light arriving from one light at a surface point, before the surface
/// colour is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightSample {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

/// Everything one render worker needs: the scene, the camera settings and
/// its own random stream.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub rng: &'a mut dyn RngCore,
    pub stats: RenderStats,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene, camera: &'a Camera, rng: &'a mut dyn RngCore) -> Self {
        Self {
            scene,
            camera,
            rng,
            stats: RenderStats::default(),
        }
    }

    /// Deepest recursion level traced: the camera's setting, never more
    /// than [`MAX_RECURSION_DEPTH`].
    fn depth_limit(&self) -> u32 {
        self.camera.max_recursion_depth.min(MAX_RECURSION_DEPTH)
    }

    /// Radiance arriving along `ray`.
    ///
    /// `gi_samples` is the number of indirect samples to take at the hit;
    /// 0 disables indirect light for this call.
    pub fn trace(&mut self, ray: Ray, depth: u32, gi_samples: u32) -> Color {
        self.stats.rays += 1;
        if depth > self.depth_limit() {
            self.stats.capped += 1;
            return Color::ZERO;
        }
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let scene = self.scene;
        let mut closest = ray;
        let hit = scene.intersect(&mut closest);

        let model = self.camera.lighting_model;
        if model.is_debug() {
            return hit.map_or(Color::ZERO, |hit| debug_color(model, hit));
        }

        match hit {
            Some(hit) => self.shade(&ray, hit, depth, gi_samples),
            None => self.camera.background,
        }
    }

    fn shade(&mut self, ray: &Ray, mut hit: Hit<'a>, depth: u32, gi_samples: u32) -> Color {
        let scene = self.scene;
        let target = hit.target;
        let material = &target.material;
        let normal = shading_normal(&mut hit);
        let surface = material.diffuse_at(hit.uv());
        let alpha = surface.w;
        let view = -ray.direction();

        let mut ambient = Color::ZERO;
        let mut diffuse = Color::ZERO;
        let mut specular = Color::ZERO;

        if self.camera.lighting_model == LightingModel::Direct || gi_samples == 0 {
            for light in scene.lights() {
                let sample = self.illuminate(light, hit.location, normal, view, material.shininess);
                ambient += sample.ambient;
                diffuse += sample.diffuse;
                specular += sample.specular;
            }
        }

        if gi_samples > 0 {
            let scatter = material.scatter;
            if scatter > 0.0 && !ray.flags.sss && !ray.flags.gi {
                diffuse += self.subsurface(&hit, normal, depth, gi_samples, scatter);
            }
            diffuse += self.gather(&hit, normal, depth, gi_samples) * (1.0 - scatter);
        }

        let mut color = (ambient + diffuse) * surface.truncate() + specular + material.emissive_color;

        if material.reflectivity > 0.0 && depth < self.depth_limit() {
            let mut direction = reflect(ray.direction(), normal);
            if material.reflection_blur > EPSILON {
                direction = defocus(direction, material.reflection_blur, self.rng);
            }
            let reflected = Ray::new(hit.location + direction * RAY_OFFSET, direction);
            color += material.reflectivity * self.trace(reflected, depth + 1, gi_samples);
        }

        if alpha < 1.0 {
            if material.refraction_index == 1.0 {
                if ray.hops < MAX_TRANSPARENT_HOPS {
                    let mut transmitted = Ray::new(hit.location + ray.direction() * TRANSMISSION_OFFSET, ray.direction())
                        .with_flags(ray.flags);
                    transmitted.hops = ray.hops + 1;
                    color += (1.0 - alpha) * self.trace(transmitted, depth, gi_samples);
                }
            } else {
                match self.refraction(ray, &hit, normal, material.refraction_index, depth, gi_samples) {
                    Some(refracted) => color += (1.0 - alpha) * refracted,
                    None => color = REFRACTION_ERROR,
                }
            }
        }

        color
    }

    /// Ambient, diffuse and specular light from `light` at a surface point,
    /// attenuated by whatever lies between the point and the light.
    pub fn illuminate(
        &mut self,
        light: &Light,
        location: Vec3,
        normal: Vec3,
        view: Vec3,
        shininess: f32,
    ) -> LightSample {
        let ambient = light.ambient * light.color;
        let target = light.sample_position(self.rng);
        let to_light = target - location;
        let distance = to_light.length();
        let Some(direction) = to_light.try_normalize() else {
            return LightSample { ambient, ..LightSample::default() };
        };

        let diffuse_power = direction.dot(normal).max(0.0);
        let highlight = reflect(-direction, normal).dot(view);
        let specular_power = if highlight > 0.0 { highlight.powf(shininess) } else { 0.0 };

        if diffuse_power <= EPSILON && specular_power <= EPSILON {
            return LightSample { ambient, ..LightSample::default() };
        }

        let transmission = if light.shadow {
            self.transmission(location, direction, distance)
        } else {
            Color::ONE
        };

        LightSample {
            ambient,
            diffuse: light.color * diffuse_power * transmission,
            specular: light.color * specular_power * transmission,
        }
    }

    /// Fraction of light that survives the trip from `origin` to a light
    /// `distance` away, tinted by transparent occluders.
    fn transmission(&mut self, origin: Vec3, direction: Vec3, distance: f32) -> Color {
        let scene = self.scene;
        let mut transmission = Color::ONE;
        let mut from = origin;
        let mut remaining = distance;

        for _ in 0..MAX_SHADOW_HOPS {
            let mut shadow = Ray::shadow(from + direction * RAY_OFFSET, direction, remaining - RAY_OFFSET);
            if shadow.length <= 0.0 {
                break;
            }
            let Some(occluder) = scene.intersect(&mut shadow) else {
                break;
            };

            let color = occluder.target.material.diffuse_at(occluder.uv());
            transmission *= (1.0 - color.w) * color.truncate();
            if transmission.max_element() < EPSILON {
                return Color::ZERO;
            }
            from = occluder.location;
            remaining -= RAY_OFFSET + occluder.t;
        }

        transmission
    }

    /// Indirect light from `gi_samples` hemisphere samples.
    ///
    /// Every sample is weighted against the camera's full sample count, so a
    /// nested single-sample bounce contributes a fraction of a top-level
    /// gather.
    fn gather(&mut self, hit: &Hit<'a>, normal: Vec3, depth: u32, gi_samples: u32) -> Color {
        let nested = if gi_samples > 1 { 1 } else { 0 };
        let weight = 2.0 * PI * (1.0 / self.camera.gi_samples.max(1) as f32) * GI_SCALE;
        let mut light = Color::ZERO;

        for _ in 0..gi_samples {
            let (direction, cos) = random_hemisphere(self.rng, normal);
            let sqrt_cos = cos.sqrt();
            if gen_f32(self.rng) > sqrt_cos {
                continue;
            }

            let flags = RayFlags { gi: true, ..RayFlags::default() };
            let bounce = Ray::new(hit.location + direction * RAY_OFFSET, direction).with_flags(flags);
            let radiance = self.trace(bounce, depth + 1, nested);
            if radiance.is_nan() {
                log::trace!("Discarding NaN GI sample at {}", hit.location);
                continue;
            }
            light += radiance * weight * sqrt_cos;
        }

        light
    }

    /// Light diffusing through the object: rays cast inwards that come back
    /// out of the same object, weighted by how far they travelled.
    fn subsurface(&mut self, hit: &Hit<'a>, normal: Vec3, depth: u32, gi_samples: u32, scatter: f32) -> Color {
        let scene = self.scene;
        let flags = RayFlags {
            sss: true,
            reverse_normal: true,
            ..RayFlags::default()
        };
        let mut light = Color::ZERO;

        for _ in 0..gi_samples {
            let (direction, _) = random_hemisphere(self.rng, -normal);
            let mut inner = Ray::new(hit.location + direction * RAY_OFFSET, direction)
                .with_length(SSS_DISTANCE)
                .with_flags(flags);
            let cast = inner;
            let Some(exit) = scene.intersect(&mut inner) else {
                continue;
            };
            if !ptr::eq(exit.target, hit.target) {
                continue;
            }

            let distance = exit.t.max(EPSILON);
            let radiance = self.shade(&cast, exit, depth + 1, 0);
            light += radiance * scatter * 10.0 * (0.1 / distance).min(1.0);
        }

        light / gi_samples as f32
    }

    /// Light bent through the hit object. `None` when the refracted ray
    /// cannot find its way out of the object.
    fn refraction(
        &mut self,
        ray: &Ray,
        hit: &Hit<'a>,
        normal: Vec3,
        refraction_index: f32,
        depth: u32,
        gi_samples: u32,
    ) -> Option<Color> {
        let inside = refract(ray.direction(), normal, 1.0 / refraction_index);
        if inside == Vec3::ZERO {
            // Total internal reflection
            return Some(Color::ZERO);
        }

        // Trace against the target alone, in the space it lives in
        let frame = hit.target_frame;
        let to_target = frame.inverse();
        let origin = hit.location + inside * TRANSMISSION_OFFSET;
        let mut local = Ray::new(to_target.transform_point3(origin), to_target.transform_vector3(inside))
            .with_flags(RayFlags { reverse_normal: true, ..RayFlags::default() });
        let exit = hit.target.intersect(&mut local)?;

        let exit_location = frame.transform_point3(exit.location);
        let exit_normal = frame.transform_vector3(exit.normal).normalize_or_zero();
        let outside = refract(inside, -exit_normal, refraction_index);
        if outside == Vec3::ZERO {
            return Some(Color::ZERO);
        }

        let exit_ray = Ray::new(exit_location + outside * TRANSMISSION_OFFSET, outside);
        Some(self.trace(exit_ray, depth + 1, gi_samples))
    }
}

/// Normal used for shading: the geometric normal, bent by the material's
/// normal map when it has one.
fn shading_normal(hit: &mut Hit<'_>) -> Vec3 {
    if hit.target.material.normal_texture.is_none() {
        return hit.normal;
    }
    let uv = hit.resolve_uv();
    let Some(mapped) = hit.target.material.normal_at(uv) else {
        return hit.normal;
    };

    let normal = hit.normal;
    let tangent = hit.tangent;
    let bitangent = normal.cross(tangent);
    (mapped.x * tangent + mapped.y * bitangent + mapped.z * normal)
        .try_normalize()
        .unwrap_or(normal)
}

fn debug_color(model: LightingModel, mut hit: Hit<'_>) -> Color {
    match model {
        LightingModel::Uv => {
            let uv = hit.resolve_uv();
            Color::new(uv.x, uv.y, 0.0)
        }
        LightingModel::Depth => Color::splat(hit.t / 100.0),
        LightingModel::World => hit.location / 100.0,
        LightingModel::Local => hit.local / 5.0,
        LightingModel::Normal => shading_normal(&mut hit),
        LightingModel::Direct | LightingModel::Gi => Color::ZERO,
    }
}
