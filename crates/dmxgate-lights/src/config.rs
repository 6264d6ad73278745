//! Gateway and light configuration
//!
//! Loaded from TOML. Everything is validated before a gateway is created,
//! so the core only ever sees in-range channels and levels.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dmxgate_core::{normalize_channel_count, DEFAULT_PORT, MAX_CHANNELS};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::color::Rgb;
use crate::error::{LightError, Result};
use crate::light::LightKind;

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Art-Net node or broadcast address
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Universe size (1-512, rounded up to even)
    pub dmx_channels: u16,
    /// Level every channel starts at
    #[serde(default)]
    pub default_level: u8,
    #[serde(default)]
    pub logging: LogConfig,
    #[serde(default)]
    pub devices: Vec<LightConfig>,
}

/// One light entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// First DMX channel (1-512)
    pub channel: u16,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: LightKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rgb: Option<Rgb>,
}

impl LightConfig {
    /// Dimmer on a single channel
    pub fn dimmer(name: &str, channel: u16) -> Self {
        Self {
            channel,
            name: name.to_string(),
            kind: LightKind::Dimmer,
            default_level: None,
            default_rgb: None,
        }
    }

    /// RGB fixture on three channels starting at `channel`
    pub fn rgb(name: &str, channel: u16) -> Self {
        Self {
            kind: LightKind::Rgb,
            ..Self::dimmer(name, channel)
        }
    }

    pub fn with_default_level(mut self, level: u8) -> Self {
        self.default_level = Some(level);
        self
    }

    pub fn with_default_rgb(mut self, rgb: Rgb) -> Self {
        self.default_rgb = Some(rgb);
        self
    }

    /// Last channel used by this light
    pub fn end_channel(&self) -> usize {
        usize::from(self.channel) + self.kind.channel_width() - 1
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is not set
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
    /// Log to stderr
    #[serde(default = "LogConfig::default_console")]
    pub console: bool,
    /// Also log to this file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LogConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    fn default_console() -> bool {
        true
    }

    /// Configured level, falling back to INFO if it does not parse
    pub fn parse_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or(LevelFilter::INFO)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            console: Self::default_console(),
            file: None,
        }
    }
}

impl Config {
    /// Minimal configuration with no lights
    pub fn new(host: &str, dmx_channels: u16) -> Self {
        Self {
            host: host.to_string(),
            port: DEFAULT_PORT,
            dmx_channels,
            default_level: 0,
            logging: LogConfig::default(),
            devices: Vec::new(),
        }
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Universe size the gateway will actually use
    pub fn channel_count(&self) -> usize {
        normalize_channel_count(usize::from(self.dmx_channels))
    }

    /// Check ranges, names and fixture spans
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(LightError::Invalid("host must not be empty".to_string()));
        }

        if self.dmx_channels == 0 || usize::from(self.dmx_channels) > MAX_CHANNELS {
            return Err(LightError::Invalid(format!(
                "dmx_channels must be 1-{}, got {}",
                MAX_CHANNELS, self.dmx_channels
            )));
        }

        let channel_count = self.channel_count();
        let mut names = HashSet::new();

        for device in &self.devices {
            if device.name.trim().is_empty() {
                return Err(LightError::Invalid(format!(
                    "light on channel {} has no name",
                    device.channel
                )));
            }

            if !names.insert(device.name.as_str()) {
                return Err(LightError::Invalid(format!(
                    "duplicate light name '{}'",
                    device.name
                )));
            }

            if device.channel == 0 || usize::from(device.channel) > MAX_CHANNELS {
                return Err(LightError::Invalid(format!(
                    "light '{}': channel must be 1-{}, got {}",
                    device.name, MAX_CHANNELS, device.channel
                )));
            }

            if device.end_channel() > channel_count {
                return Err(LightError::Invalid(format!(
                    "light '{}' uses channels {}-{} but the universe has {}",
                    device.name,
                    device.channel,
                    device.end_channel(),
                    channel_count
                )));
            }

            if device.default_rgb.is_some() && device.kind != LightKind::Rgb {
                return Err(LightError::Invalid(format!(
                    "light '{}': default_rgb requires type = \"rgb\"",
                    device.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        host = "192.168.1.50"
        dmx_channels = 12
        default_level = 5

        [logging]
        level = "debug"

        [[devices]]
        channel = 1
        name = "Wash"
        type = "rgb"
        default_rgb = [255, 128, 0]

        [[devices]]
        channel = 4
        name = "Spot"
        default_level = 200
    "#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.host, "192.168.1.50");
        assert_eq!(config.port, 6454);
        assert_eq!(config.dmx_channels, 12);
        assert_eq!(config.default_level, 5);
        assert_eq!(config.logging.parse_level(), LevelFilter::DEBUG);
        assert!(config.logging.console);

        assert_eq!(
            config.devices,
            vec![
                LightConfig::rgb("Wash", 1).with_default_rgb([255, 128, 0]),
                LightConfig::dimmer("Spot", 4).with_default_level(200),
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("host = \"10.0.0.1\"\ndmx_channels = 512").unwrap();
        assert_eq!(config, Config::new("10.0.0.1", 512));
        assert_eq!(config.logging.parse_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_odd_count_rounds_up() {
        let config = Config::new("10.0.0.1", 511);
        assert_eq!(config.channel_count(), 512);
    }

    #[test]
    fn test_rejects_channel_count_out_of_range() {
        for count in [0, 513] {
            let config = Config::new("10.0.0.1", count);
            assert!(matches!(config.validate(), Err(LightError::Invalid(_))));
        }
    }

    #[test]
    fn test_rejects_out_of_range_bytes() {
        let result = Config::from_toml_str(
            "host = \"h\"\ndmx_channels = 8\ndefault_level = 256",
        );
        assert!(matches!(result, Err(LightError::Parse(_))));

        let result = Config::from_toml_str(
            r#"
            host = "h"
            dmx_channels = 8
            [[devices]]
            channel = 1
            name = "a"
            type = "rgb"
            default_rgb = [1, 2, 300]
            "#,
        );
        assert!(matches!(result, Err(LightError::Parse(_))));
    }

    #[test]
    fn test_rejects_malformed_color() {
        let result = Config::from_toml_str(
            r#"
            host = "h"
            dmx_channels = 8
            [[devices]]
            channel = 1
            name = "a"
            type = "rgb"
            default_rgb = [1, 2]
            "#,
        );
        assert!(matches!(result, Err(LightError::Parse(_))));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let result = Config::from_toml_str(
            r#"
            host = "h"
            dmx_channels = 8
            [[devices]]
            channel = 1
            name = "a"
            type = "moving-head"
            "#,
        );
        assert!(matches!(result, Err(LightError::Parse(_))));
    }

    #[test]
    fn test_rejects_light_past_universe_end() {
        let mut config = Config::new("h", 4);
        config.devices.push(LightConfig::rgb("a", 3));
        assert!(matches!(config.validate(), Err(LightError::Invalid(_))));

        config.devices[0].channel = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_channel_zero() {
        let mut config = Config::new("h", 4);
        config.devices.push(LightConfig::dimmer("a", 0));
        assert!(matches!(config.validate(), Err(LightError::Invalid(_))));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut config = Config::new("h", 8);
        config.devices.push(LightConfig::dimmer("a", 1));
        config.devices.push(LightConfig::dimmer("a", 2));
        assert!(matches!(config.validate(), Err(LightError::Invalid(_))));
    }

    #[test]
    fn test_rejects_color_on_dimmer() {
        let mut config = Config::new("h", 8);
        config
            .devices
            .push(LightConfig::dimmer("a", 1).with_default_rgb([1, 2, 3]));
        assert!(matches!(config.validate(), Err(LightError::Invalid(_))));
    }

    #[test]
    fn test_unparsable_level_falls_back() {
        let logging = LogConfig {
            level: "loud".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(logging.parse_level(), LevelFilter::INFO);
    }
}
