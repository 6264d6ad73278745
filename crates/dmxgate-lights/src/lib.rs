//! dmxgate lights - light entities over an Art-Net gateway
//!
//! Maps named lights onto channel runs of a [`dmxgate_core::ArtNetGateway`]:
//! - **Dimmer**: one channel, brightness only
//! - **RGB**: three consecutive channels, colour scaled by brightness
//!
//! Lights are described in a TOML file (see [`config::Config`]) and built
//! together as a [`LightSet`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use dmxgate_lights::{Config, LightSet, TurnOn};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # async fn run() -> dmxgate_lights::Result<()> {
//! let config = Config::load(Path::new("dmxgate.toml"))?;
//! let mut lights = LightSet::from_config(&config)?;
//!
//! lights
//!     .light_mut("Stage wash")?
//!     .turn_on(TurnOn {
//!         brightness: Some(180),
//!         rgb: Some([255, 120, 0]),
//!         transition: Some(Duration::from_secs(2)),
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod light;
pub mod registry;

pub use color::{normalize_default_color, scale_rgb_to_brightness, Rgb};
pub use config::{Config, LightConfig, LogConfig};
pub use error::{LightError, Result};
pub use light::{ArtnetLight, LightKind, LightState, TurnOn};
pub use registry::LightSet;
