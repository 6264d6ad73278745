//! Light entities mapped onto gateway channels
//!
//! A light owns a contiguous run of channels: one for a dimmer, three for an
//! RGB fixture. Turning on, off, dimming and colour changes are all fades on
//! that run.

use std::time::Duration;

use dmxgate_core::{ArtNetGateway, FadeOutcome, FadeTarget, DEFAULT_FPS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{normalize_default_color, scale_rgb_to_brightness, Rgb, WHITE};
use crate::config::LightConfig;

/// Kind of fixture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    /// Single intensity channel
    #[default]
    Dimmer,
    /// Red, green and blue on consecutive channels
    Rgb,
}

impl LightKind {
    /// Number of channels this kind occupies
    pub fn channel_width(self) -> usize {
        match self {
            LightKind::Dimmer => 1,
            LightKind::Rgb => 3,
        }
    }
}

/// Request to turn a light on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnOn {
    /// New brightness, or keep the remembered one
    pub brightness: Option<u8>,
    /// New colour (RGB lights), or keep the remembered one
    pub rgb: Option<Rgb>,
    /// Fade duration; `None` snaps
    pub transition: Option<Duration>,
}

/// Serializable view of a light
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub name: String,
    pub kind: LightKind,
    pub is_on: bool,
    pub brightness: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<Rgb>,
    pub dmx_channels: Vec<usize>,
}

/// A dimmer or RGB light driven through the gateway
#[derive(Debug)]
pub struct ArtnetLight {
    gateway: ArtNetGateway,
    name: String,
    kind: LightKind,
    channels: Vec<usize>,
    brightness: u8,
    rgb: Option<Rgb>,
    is_on: bool,
}

impl ArtnetLight {
    /// Create a light and sync its initial level into the gateway.
    ///
    /// The initial state is written without sending, so fixtures do not
    /// flash when lights are set up.
    pub fn new(config: &LightConfig, gateway: ArtNetGateway) -> Self {
        let start = usize::from(config.channel);
        let channels: Vec<usize> = (start..start + config.kind.channel_width()).collect();

        let (brightness, rgb) = match config.kind {
            LightKind::Rgb => {
                let (rgb, brightness) = match config.default_rgb {
                    Some(color) => normalize_default_color(color),
                    None => (
                        WHITE,
                        config
                            .default_level
                            .unwrap_or_else(|| gateway.get_channel_level(start)),
                    ),
                };
                let scaled = scale_rgb_to_brightness(rgb, brightness).map(i32::from);
                gateway.set_channel_group(start, &scaled, false);
                (brightness, Some(rgb))
            }
            LightKind::Dimmer => {
                if let Some(level) = config.default_level {
                    gateway.set_channel(start, i32::from(level), false);
                }
                (gateway.get_channel_level(start), None)
            }
        };

        debug!(
            "Light '{}' ({:?}) on channels {:?}, brightness {}",
            config.name, config.kind, channels, brightness
        );

        Self {
            gateway,
            name: config.name.clone(),
            kind: config.kind,
            channels,
            brightness,
            rgb,
            is_on: brightness > 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Channels driven by this light (1-based)
    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    /// Remembered brightness, kept while the light is off
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Unscaled colour, RGB lights only
    pub fn rgb_color(&self) -> Option<Rgb> {
        self.rgb
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn supports_color(&self) -> bool {
        self.kind == LightKind::Rgb
    }

    pub fn state(&self) -> LightState {
        LightState {
            name: self.name.clone(),
            kind: self.kind,
            is_on: self.is_on,
            brightness: self.brightness,
            rgb_color: self.rgb,
            dmx_channels: self.channels.clone(),
        }
    }

    /// Levels the channels should carry while the light is on
    pub fn on_levels(&self) -> FadeTarget {
        match self.rgb {
            Some(rgb) => FadeTarget::from(scale_rgb_to_brightness(rgb, self.brightness)),
            None => FadeTarget::from(self.brightness),
        }
    }

    /// Turn on, optionally changing brightness and colour
    pub async fn turn_on(&mut self, request: TurnOn) -> FadeOutcome {
        self.is_on = true;
        if let Some(brightness) = request.brightness {
            self.brightness = brightness;
        }
        if self.supports_color() && request.rgb.is_some() {
            self.rgb = request.rgb;
        }

        let target = self.on_levels();
        debug!("Turning on light '{}' -> {:?}", self.name, target);
        self.gateway
            .fade(
                &self.channels,
                target,
                request.transition.unwrap_or_default(),
                DEFAULT_FPS,
            )
            .await
    }

    /// Fade every channel to 0.
    ///
    /// Brightness and colour are remembered for the next `turn_on`.
    pub async fn turn_off(&mut self, transition: Option<Duration>) -> FadeOutcome {
        debug!("Turning off light '{}'", self.name);
        let outcome = self
            .gateway
            .fade(
                &self.channels,
                0u8,
                transition.unwrap_or_default(),
                DEFAULT_FPS,
            )
            .await;
        self.is_on = false;
        outcome
    }

    /// Mark the light off without touching the channels
    pub(crate) fn mark_off(&mut self) {
        self.is_on = false;
    }
}
