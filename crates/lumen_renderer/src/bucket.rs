//! Bucket-based parallel rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! with rayon. Every bucket gets its own random stream seeded from the frame
//! seed and the bucket index, so a render is reproducible regardless of how
//! the work is scheduled. Results are written into the frame from the
//! calling thread only.

use lumen_core::FrameSink;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::{render_pixel, sample_weight};
use crate::{Camera, Color, RenderContext, RenderStats, Scene};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets are rendered from the centre outward so the most important part
/// of the image shows up first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    buckets.sort_by(|a, b| {
        let a_center_x = a.x as f32 + a.width as f32 / 2.0;
        let a_center_y = a.y as f32 + a.height as f32 / 2.0;
        let b_center_x = b.x as f32 + b.width as f32 / 2.0;
        let b_center_y = b.y as f32 + b.height as f32 / 2.0;

        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);

        a_dist.total_cmp(&b_dist)
    });
}

/// Seed for one bucket's random stream.
fn bucket_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
    pub stats: RenderStats,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>, stats: RenderStats) -> Self {
        Self { bucket, pixels, stats }
    }

    /// Deposit the pixels into `frame` with the given accumulation weight.
    pub fn write_to(&self, frame: &mut dyn FrameSink, weight: f32) {
        let width = self.bucket.width.max(1) as usize;
        for (i, color) in self.pixels.iter().enumerate() {
            let x = self.bucket.x + (i % width) as u32;
            let y = self.bucket.y + (i / width) as u32;
            frame.add_sample(x, y, *color, weight);
        }
    }
}

/// Render a single bucket of a `width` x `height` frame.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    scene: &Scene,
    camera: &Camera,
    width: u32,
    height: u32,
    seed: u64,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket_seed(seed, bucket.index));
    let mut ctx = RenderContext::new(scene, camera, &mut rng);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(&mut ctx, global_x, global_y, width, height));
        }
    }

    let stats = ctx.stats;
    BucketResult::new(*bucket, pixels, stats)
}

/// Render one full pass in parallel and accumulate it into `frame`.
///
/// Low-quality mode is ignored here: every pixel is traced.
pub fn render_parallel(
    scene: &Scene,
    camera: &Camera,
    frame: &mut dyn FrameSink,
    bucket_size: u32,
    seed: u64,
) -> RenderStats {
    let (width, height) = (frame.width(), frame.height());
    let buckets = generate_buckets(width, height, bucket_size);
    log::debug!("Rendering {}x{} in {} buckets", width, height, buckets.len());

    let results: Vec<BucketResult> = buckets
        .into_par_iter()
        .map(|bucket| render_bucket(&bucket, scene, camera, width, height, seed))
        .collect();

    let weight = sample_weight(camera.super_sample);
    let mut stats = RenderStats::default();
    for result in &results {
        result.write_to(frame, weight);
        stats.merge(&result.stats);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Light, SceneObject};
    use lumen_core::SampleBuffer;
    use lumen_math::Vec3;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
    }

    #[test]
    fn test_bucket_seeds_differ() {
        assert_ne!(bucket_seed(7, 0), bucket_seed(7, 1));
        assert_ne!(bucket_seed(7, 0), bucket_seed(8, 0));
    }

    fn area_lit_ball() -> Scene {
        Scene::new("ball")
            .with(SceneObject::sphere("ball", Vec3::new(0.0, 0.0, -4.0), 1.0))
            .with(Light::new(Vec3::new(-5.0, 5.0, 0.0)).with_size(2.0))
    }

    #[test]
    fn test_parallel_matches_serial_buckets() {
        let scene = area_lit_ball();
        let camera = Camera::default();

        let mut frame = SampleBuffer::new(20, 12);
        let stats = render_parallel(&scene, &camera, &mut frame, 8, 3);
        assert_eq!(stats.rays, 240);

        let mut expected = SampleBuffer::new(20, 12);
        for bucket in generate_buckets(20, 12, 8) {
            render_bucket(&bucket, &scene, &camera, 20, 12, 3).write_to(&mut expected, sample_weight(0));
        }
        assert_eq!(frame.pixels(), expected.pixels());
    }

    #[test]
    fn test_parallel_is_reproducible() {
        let scene = area_lit_ball();
        let camera = Camera::default();

        let mut a = SampleBuffer::new(16, 16);
        let mut b = SampleBuffer::new(16, 16);
        render_parallel(&scene, &camera, &mut a, 4, 11);
        render_parallel(&scene, &camera, &mut b, 4, 11);
        assert_eq!(a.pixels(), b.pixels());
    }
}
