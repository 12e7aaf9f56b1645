//! Progressive frame rendering.
//!
//! [`render_pixel`] turns one pixel into an averaged colour. [`Renderer`]
//! walks the frame in scanline order a budget of pixels at a time, so an
//! interactive caller can render a few thousand pixels, redraw, and carry
//! on where it stopped.

use lumen_core::FrameSink;

use crate::{Color, LightingModel, RenderContext};

/// Average of the camera's samples for pixel (`x`, `y`).
pub fn render_pixel(ctx: &mut RenderContext<'_>, x: u32, y: u32, width: u32, height: u32) -> Color {
    let camera = ctx.camera;
    let samples = camera.super_sample.max(1);
    let gi_samples = if camera.lighting_model == LightingModel::Gi {
        camera.gi_samples
    } else {
        0
    };

    let mut color = Color::ZERO;
    for _ in 0..samples {
        let ray = camera.primary_ray(x, y, width, height, ctx.rng);
        color += ctx.trace(ray, 0, gi_samples);
    }
    color / samples as f32
}

/// Accumulation weight of one pixel result: more samples count for more.
#[inline]
pub fn sample_weight(super_sample: u32) -> f32 {
    0.01 + super_sample as f32
}

/// Incremental renderer with a scanline cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    width: u32,
    height: u32,
    cursor: usize,
    passes_completed: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor: 0,
            passes_completed: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn total_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Index of the next pixel to render.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn passes_completed(&self) -> u32 {
        self.passes_completed
    }

    /// True once the cursor has reached the end of the frame.
    pub fn pass_finished(&self) -> bool {
        self.cursor >= self.total_pixels()
    }

    /// Restart from the first pixel.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Render up to `max_pixels` pixels (the rest of the pass when `None`)
    /// into `frame` and return how many cursor positions were consumed.
    ///
    /// A finished pass starts over only when `auto_reset` is set; otherwise
    /// the call does nothing. In low-quality mode only even pixels are traced
    /// and each result is deposited over its 2x2 block.
    pub fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        frame: &mut dyn FrameSink,
        max_pixels: Option<usize>,
        auto_reset: bool,
    ) -> usize {
        let total = self.total_pixels();
        if self.cursor >= total {
            if !auto_reset {
                return 0;
            }
            self.cursor = 0;
        }

        let budget = max_pixels.unwrap_or(total - self.cursor).min(total - self.cursor);
        let lq_mode = ctx.camera.lq_mode;
        let weight = sample_weight(ctx.camera.super_sample);

        for _ in 0..budget {
            let x = (self.cursor % self.width as usize) as u32;
            let y = (self.cursor / self.width as usize) as u32;
            self.cursor += 1;

            if lq_mode && (x % 2 == 1 || y % 2 == 1) {
                continue;
            }

            let color = render_pixel(ctx, x, y, self.width, self.height);
            frame.add_sample(x, y, color, weight);
            if lq_mode {
                frame.add_sample(x + 1, y, color, weight);
                frame.add_sample(x, y + 1, color, weight);
                frame.add_sample(x + 1, y + 1, color, weight);
            }
        }

        if self.cursor >= total {
            self.passes_completed += 1;
            log::info!("Finished pass {} ({} rays so far)", self.passes_completed, ctx.stats.rays);
        }
        budget
    }
}
