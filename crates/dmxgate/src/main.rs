//! dmxgate - drive Art-Net lights from the command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dmxgate_core::{FadeTarget, MemorySink, DEFAULT_FPS};
use dmxgate_lights::{Config, LightSet, Rgb, TurnOn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod logging_setup;

#[derive(Parser)]
#[command(name = "dmxgate")]
#[command(about = "Control DMX lights over Art-Net")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "dmxgate.toml")]
    config: PathBuf,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    /// Record frames instead of sending them
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a light on
    On {
        /// Light name
        light: String,

        /// Brightness (0-255)
        #[arg(short, long)]
        brightness: Option<u8>,

        /// Colour as R,G,B (RGB lights only)
        #[arg(long, value_delimiter = ',')]
        rgb: Option<Vec<u8>>,

        /// Transition in seconds
        #[arg(short, long, value_parser = parse_seconds)]
        transition: Option<Duration>,
    },

    /// Turn a light off
    Off {
        /// Light name
        light: String,

        /// Transition in seconds
        #[arg(short, long, value_parser = parse_seconds)]
        transition: Option<Duration>,
    },

    /// Set a raw channel and send it
    Set {
        /// Channel (1-based)
        channel: usize,

        /// Level (0-255)
        level: i32,
    },

    /// Fade raw channels
    Fade {
        /// Channels, e.g. 1,2,3
        #[arg(long, value_delimiter = ',', required = true)]
        channels: Vec<usize>,

        /// One level for all channels, or one per channel
        #[arg(long, value_delimiter = ',', required = true)]
        target: Vec<u8>,

        /// Duration in seconds
        #[arg(short, long, value_parser = parse_seconds, default_value = "0")]
        duration: Duration,

        /// Steps per second
        #[arg(long, default_value_t = DEFAULT_FPS)]
        fps: u32,
    },

    /// Fade every light off together
    Blackout {
        /// Transition in seconds
        #[arg(short, long, value_parser = parse_seconds)]
        transition: Option<Duration>,
    },

    /// Print the state of every light as JSON
    Status,
}

fn parse_seconds(value: &str) -> std::result::Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|e| format!("'{}' is not a number of seconds: {}", value, e))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid duration '{}': {}", value, e))
}

fn to_rgb(values: &[u8]) -> Result<Rgb> {
    match values {
        [r, g, b] => Ok([*r, *g, *b]),
        _ => bail!("--rgb needs exactly three values, got {}", values.len()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    let _log_guard = logging_setup::init(&config.logging)?;

    let recorder = Arc::new(MemorySink::new());
    let mut lights = if cli.dry_run {
        LightSet::with_sink(&config, recorder.clone())?
    } else {
        LightSet::from_config(&config)?
    };

    match cli.command {
        Commands::On {
            light,
            brightness,
            rgb,
            transition,
        } => {
            let rgb = rgb.as_deref().map(to_rgb).transpose()?;
            let light = lights.light_mut(&light)?;
            if rgb.is_some() && !light.supports_color() {
                bail!("Light '{}' has no colour channels", light.name());
            }
            light
                .turn_on(TurnOn {
                    brightness,
                    rgb,
                    transition,
                })
                .await;
            info!("Light '{}' on", light.name());
        }
        Commands::Off { light, transition } => {
            let light = lights.light_mut(&light)?;
            light.turn_off(transition).await;
            info!("Light '{}' off", light.name());
        }
        Commands::Set { channel, level } => {
            if !lights.gateway().set_channel(channel, level, true) {
                bail!(
                    "Channel {} level {} rejected (universe has {} channels, levels are 0-255)",
                    channel,
                    level,
                    lights.gateway().channel_count()
                );
            }
        }
        Commands::Fade {
            channels,
            target,
            duration,
            fps,
        } => {
            let outcome = lights
                .gateway()
                .fade(&channels, FadeTarget::Levels(target), duration, fps)
                .await;
            info!(
                "Fade finished: {} step(s), {} frame(s) sent",
                outcome.steps, outcome.frames_sent
            );
        }
        Commands::Blackout { transition } => {
            lights.turn_off_all(transition).await;
            info!("All {} light(s) off", lights.len());
        }
        Commands::Status => {
            println!("{}", serde_json::to_string_pretty(&lights.states())?);
        }
    }

    if cli.dry_run {
        info!("Dry run: {} frame(s) recorded, none sent", recorder.len());
    }

    Ok(())
}
