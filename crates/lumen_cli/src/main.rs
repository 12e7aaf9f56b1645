use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use lumen_core::SampleBuffer;
use lumen_renderer::{render_parallel, Camera, RenderConfig, RenderContext, RenderStats, Renderer, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod logger;
mod scenes;

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    if args.list {
        for (index, (name, _)) in scenes::SCENES.iter().enumerate() {
            println!("{index}: {name}");
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path).with_context(|| format!("loading config '{path}'"))?,
        None => RenderConfig::default(),
    };
    args.override_config(&mut config);
    config.validate()?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring worker threads")?;
    }

    let Some((mut scene, mut camera)) = scenes::build(&args.scene) else {
        bail!("unknown scene '{}', try --list", args.scene);
    };
    if let Some(factor) = args.cluster {
        scene.cluster(factor);
    }
    camera.apply_config(&config);
    info!(
        "Scene '{}': {} objects, {} lights",
        scene.name,
        scene.root().leaf_count(),
        scene.lights().len()
    );

    let mut frame = SampleBuffer::new(config.width, config.height);
    frame.clear(camera.background, false);

    let start = Instant::now();
    let stats = if args.serial {
        render_serial(&scene, &camera, &config, &mut frame)
    } else {
        render_buckets(&scene, &camera, &config, &mut frame)
    };
    info!(
        "Rendered {} pass(es) in {:.2?}: {} rays, deepest bounce {}, {} capped",
        config.passes,
        start.elapsed(),
        stats.rays,
        stats.max_depth,
        stats.capped
    );

    frame
        .save(&args.output)
        .with_context(|| format!("saving '{}'", args.output))?;
    info!("Saved {}", args.output);
    Ok(())
}

/// Progressive passes on the calling thread.
fn render_serial(scene: &Scene, camera: &Camera, config: &RenderConfig, frame: &mut SampleBuffer) -> RenderStats {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut ctx = RenderContext::new(scene, camera, &mut rng);
    let mut renderer = Renderer::new(config.width, config.height);
    for _ in 0..config.passes {
        renderer.render(&mut ctx, frame, None, true);
    }
    ctx.stats
}

/// Each pass split into buckets and rendered across the rayon pool.
fn render_buckets(scene: &Scene, camera: &Camera, config: &RenderConfig, frame: &mut SampleBuffer) -> RenderStats {
    let mut stats = RenderStats::default();
    for pass in 0..config.passes {
        let seed = config.seed.wrapping_add(u64::from(pass));
        stats.merge(&render_parallel(scene, camera, frame, config.bucket_size, seed));
        info!("Finished pass {}/{}", pass + 1, config.passes);
    }
    stats
}
