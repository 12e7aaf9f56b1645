use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::{LightingModel, RenderConfig};

/// Log levels accepted on the command line.
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Lighting model names for `--lighting`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Lighting {
    Direct,
    Gi,
    Uv,
    Depth,
    Normal,
    World,
    Local,
}

impl From<Lighting> for LightingModel {
    fn from(lighting: Lighting) -> Self {
        match lighting {
            Lighting::Direct => LightingModel::Direct,
            Lighting::Gi => LightingModel::Gi,
            Lighting::Uv => LightingModel::Uv,
            Lighting::Depth => LightingModel::Depth,
            Lighting::Normal => LightingModel::Normal,
            Lighting::World => LightingModel::World,
            Lighting::Local => LightingModel::Local,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Render a demo scene with the lumen ray tracer")]
pub struct Args {
    /// Scene to render, by index or name
    #[arg(default_value = "0")]
    pub scene: String,

    /// Print the available scenes and exit
    #[arg(long)]
    pub list: bool,

    /// JSON render config; command line flags override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    pub output: String,

    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,

    #[arg(long, help = "Image width in pixels")]
    pub width: Option<u32>,

    #[arg(long, help = "Image height in pixels")]
    pub height: Option<u32>,

    #[arg(short, long, help = "Number of passes to accumulate")]
    pub passes: Option<u32>,

    #[arg(short = 's', long, help = "Jittered samples per pixel")]
    pub super_sample: Option<u32>,

    #[arg(long, help = "Hemisphere samples per GI gather")]
    pub gi_samples: Option<u32>,

    #[arg(long, help = "Lighting model")]
    pub lighting: Option<Lighting>,

    #[arg(long, help = "Seed for the random streams")]
    pub seed: Option<u64>,

    /// Trace every other pixel and fill 2x2 blocks (serial renderer only)
    #[arg(long)]
    pub lq: bool,

    /// Render on the calling thread with the incremental renderer
    #[arg(long)]
    pub serial: bool,

    /// Worker threads for the parallel renderer (defaults to all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Merge nearby objects into bounded clusters before rendering
    #[arg(long)]
    pub cluster: Option<f32>,
}

impl Args {
    /// Apply the command line overrides on top of `config`.
    pub fn override_config(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(passes) = self.passes {
            config.passes = passes;
        }
        if let Some(super_sample) = self.super_sample {
            config.super_sample = super_sample;
        }
        if let Some(gi_samples) = self.gi_samples {
            config.gi_samples = gi_samples;
        }
        if let Some(lighting) = self.lighting {
            config.lighting_model = lighting.into();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.lq {
            config.lq_mode = true;
        }
    }
}
