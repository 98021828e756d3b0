/// DogTV+ scene player - renders synthetic scenes through the canine pipeline
mod config;
mod error;
mod synth;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crate::config::PlayerConfig;
use dogtv_analytics::AudioAnalytics;
use dogtv_audio::AudioPipeline;
use dogtv_core::{Scene, CANINE_HEARING_POLICY};
use std::path::PathBuf;
use synth::SceneSynth;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dogtv-scene-player")]
#[command(about = "Render DogTV+ scenes through the canine audio pipeline", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./dogtv.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene and print the usage statistics as JSON
    Render {
        /// Scene to render (ocean, forest, rain, meadow, fireplace, birdsong, playtime)
        #[arg(short, long, default_value = "ocean")]
        scene: Scene,

        /// Length of the rendered signal in seconds
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,

        /// Seed for the noise layer
        #[arg(long, default_value_t = 0x0D06)]
        seed: u64,
    },
    /// Print the canine hearing frequency table
    Ranges,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dogtv_scene_player=info,dogtv_audio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            seconds,
            seed,
        } => {
            let config = PlayerConfig::load(cli.config.as_deref())
                .context("Failed to load configuration")?;
            let json = render(&config, scene, seconds, seed)?;
            println!("{json}");
        }
        Commands::Ranges => print_ranges(),
    }

    Ok(())
}

/// Render `seconds` of `scene` and return the statistics snapshot as JSON
fn render(config: &PlayerConfig, scene: Scene, seconds: f64, seed: u64) -> anyhow::Result<String> {
    if !seconds.is_finite() || seconds <= 0.0 {
        anyhow::bail!("--seconds must be a positive number, got {seconds}");
    }

    let format = config.format();
    let mut pipeline = AudioPipeline::new(format, config.audio, AudioAnalytics::new())
        .context("Failed to build audio pipeline")?;

    // Changes travel through the control queue like they would from a UI thread
    let controller = pipeline.controller();
    if config.pipeline.optimize_order {
        controller.optimize_pipeline_order()?;
    }
    controller.apply_scene(scene)?;

    let total_frames = (seconds * f64::from(format.sample_rate.as_hz())).round() as usize;
    let block_frames = config.engine.block_frames;
    let channels = format.channel_count();
    info!(
        %scene,
        %format,
        total_frames,
        block_frames,
        "Rendering scene"
    );

    let mut synth = SceneSynth::new(scene, format, config.audio.include_nature_sounds, seed);
    let mut block = vec![0.0f32; block_frames * channels];

    pipeline.analytics_mut().start_session();
    let mut rendered = 0;
    while rendered < total_frames {
        let frames = block_frames.min(total_frames - rendered);
        let samples = &mut block[..frames * channels];
        synth.fill(samples);
        pipeline.process_samples(samples)?;
        rendered += frames;
    }
    pipeline.analytics_mut().end_session();

    debug!(order = %pipeline.stage_order(), "Render finished");

    let analytics = pipeline.into_analytics();
    info!(
        average_volume = analytics.average_volume(),
        average_quality = analytics.average_quality(),
        "Session complete"
    );
    Ok(analytics.statistics().to_json()?)
}

fn print_ranges() {
    println!("{}", CANINE_HEARING_POLICY.name());
    for (range, hz) in CANINE_HEARING_POLICY.entries() {
        println!("  {:<12} {}", range.name(), hz);
    }
}
