use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rockfall_config::EffectConfig;
use rockfall_kernel::{EmitterOptions, Rockfall};
use rockfall_render::{DebugTextRenderer, RenderView, Renderer, attribute_uploads};
use rockfall_tools::{EffectInspector, FrameClock, UpdateTimer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rockfall-cli", about = "Headless driver for the rockfall particle effect")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default settings
    Info,
    /// Simulate an effect for a number of frames
    Run {
        #[command(flatten)]
        effect: EffectArgs,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Pace frames in wall-clock time and measure real deltas
        #[arg(long)]
        realtime: bool,
        /// Print the particle table after the last frame
        #[arg(long)]
        dump: bool,
    },
    /// Simulate, then print the state of one particle
    Inspect {
        #[command(flatten)]
        effect: EffectArgs,
        /// Number of frames to simulate first
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Particle index
        #[arg(short, long, default_value = "0")]
        index: usize,
    },
}

#[derive(Args)]
struct EffectArgs {
    /// YAML or JSON effect config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// RNG seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,
    /// Override the particle count
    #[arg(long)]
    count: Option<usize>,
    /// Override the particle lifetime in seconds
    #[arg(long)]
    lifetime: Option<f32>,
}

impl EffectArgs {
    fn build(&self) -> anyhow::Result<Rockfall> {
        let mut config = match &self.config {
            Some(path) => EffectConfig::load(path)?,
            None => demo_config(),
        };
        config.settings.seed = Some(self.seed);
        if let Some(count) = self.count {
            config.settings.particle_count = count;
        }
        if let Some(lifetime) = self.lifetime {
            config.settings.lifetime = lifetime;
        }
        Ok(config.build())
    }
}

/// The falling-rock setup used when no config file is given.
fn demo_config() -> EffectConfig {
    EffectConfig {
        emitter: EmitterOptions {
            origin_pitch: Some(1.5),
            origin_yaw: Some(1.5),
            spread: Some(1.0),
            origin_intensity: Some(5.0),
            origin_position: Some(glam::Vec3::new(0.0, 0.0, 10.0)),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = EffectConfig::default();
            println!("rockfall-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "defaults: particles={} lifetime={}s scene_scale={} stone_size={}",
                config.settings.particle_count,
                config.settings.lifetime,
                config.settings.scene_scale,
                config.settings.stone_size
            );
            println!("min frame delta: {}s", rockfall_kernel::MIN_DELTA_TIME);
        }
        Commands::Run {
            effect,
            frames,
            dt,
            realtime,
            dump,
        } => {
            let mut fx = effect.build()?;
            tracing::info!(frames, dt, realtime, "running rockfall");
            let pace = Duration::try_from_secs_f32(dt).unwrap_or_default();
            let mut clock = if realtime {
                FrameClock::realtime()
            } else {
                FrameClock::fixed(dt)
            };
            let mut timer = UpdateTimer::new(120);
            let mut uploaded_bytes = 0usize;

            for _ in 0..frames {
                if realtime {
                    std::thread::sleep(pace);
                }
                let frame_dt = clock.tick();
                timer.time(&mut fx, frame_dt);

                let dirty = fx.take_dirty();
                uploaded_bytes += attribute_uploads(fx.pool(), dirty)
                    .iter()
                    .map(|u| u.bytes.len())
                    .sum::<usize>();
            }

            println!("{}", EffectInspector::summary(&fx));
            println!(
                "frames={frames} skipped={} update avg={:?} max={:?} per-particle={:?} respawned={} uploaded={} KiB",
                timer.skipped(),
                timer.average(),
                timer.max(),
                timer.per_particle(),
                timer.respawned(),
                uploaded_bytes / 1024
            );
            if let Some(c) = EffectInspector::alive_centroid(&fx) {
                println!("alive centroid=({:.2}, {:.2}, {:.2})", c.x, c.y, c.z);
            }
            println!("state hash={:#018x}", fx.pool().state_hash());
            if dump {
                print!(
                    "{}",
                    DebugTextRenderer::default().render(&fx, &RenderView::default())
                );
            }
            fx.destroy();
        }
        Commands::Inspect {
            effect,
            frames,
            index,
        } => {
            let mut fx = effect.build()?;
            let mut clock = FrameClock::fixed(1.0 / 60.0);
            for _ in 0..frames {
                fx.update(clock.tick());
            }

            println!("{}", EffectInspector::summary(&fx));
            match EffectInspector::inspect_particle(&fx, index) {
                Some(info) => println!("{info}"),
                None => anyhow::bail!(
                    "particle index {index} out of range (pool has {})",
                    fx.particle_count()
                ),
            }
        }
    }

    Ok(())
}
