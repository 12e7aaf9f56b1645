//! Lumen renderer - recursive CPU ray tracing.
//!
//! Scenes are trees of [`SceneObject`]s. Every object carries its own
//! transform, so primitives only ever intersect rays in their local space;
//! containers gather children and answer with the closest hit. The
//! [`RenderContext`] integrator shades hits with direct light, soft and
//! coloured shadows, sampled global illumination, reflection and refraction.
//!
//! Frames are rendered either incrementally with [`Renderer`] or in
//! parallel buckets with [`render_parallel`].

mod bounding;
mod bucket;
pub mod cluster;
mod camera;
mod config;
mod container;
mod cylinder;
mod hit;
mod integrator;
mod light;
mod material;
mod mesh;
mod object;
mod plane;
mod ray;
mod renderer;
pub mod sampling;
mod scene;
pub mod shapes;
mod sphere;

pub use bounding::{ray_sphere_distance, BoundingVolume};
pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use config::{ConfigError, ConfigResult, LightingModel, RenderConfig, MAX_RECURSION_DEPTH};
pub use container::Container;
pub use cylinder::Cylinder;
pub use hit::{Hit, SurfaceHit};
pub use integrator::{LightSample, RenderContext, RenderStats, REFRACTION_ERROR};
pub use light::Light;
pub use material::{reflect, refract, Color, Material};
pub use mesh::{build_mesh, mesh_object};
pub use object::{Geometry, SceneObject};
pub use plane::{Plane, PlaneKind};
pub use ray::{Ray, RayFlags};
pub use renderer::{render_pixel, sample_weight, Renderer};
pub use scene::{Scene, SceneItem};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Transform, Vec2, Vec3, Vec4, EPSILON};
