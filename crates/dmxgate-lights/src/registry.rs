//! All configured lights sharing one gateway

use std::sync::Arc;
use std::time::Duration;

use dmxgate_core::{ArtNetGateway, FrameSink, DEFAULT_FPS};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{LightError, Result};
use crate::light::{ArtnetLight, LightState};

/// Lights in configuration order, plus the gateway they drive
#[derive(Debug)]
pub struct LightSet {
    gateway: ArtNetGateway,
    lights: Vec<ArtnetLight>,
}

impl LightSet {
    /// Validate `config`, open the UDP gateway and set up every light
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let gateway = ArtNetGateway::connect(
            &config.host,
            config.port,
            config.default_level,
            usize::from(config.dmx_channels),
        )?;
        Ok(Self::with_gateway(config, gateway))
    }

    /// Same as [`LightSet::from_config`] but frames go to `sink`
    pub fn with_sink(config: &Config, sink: Arc<dyn FrameSink>) -> Result<Self> {
        config.validate()?;
        let gateway = ArtNetGateway::with_sink(
            sink,
            config.default_level,
            usize::from(config.dmx_channels),
        );
        Ok(Self::with_gateway(config, gateway))
    }

    fn with_gateway(config: &Config, gateway: ArtNetGateway) -> Self {
        let lights: Vec<ArtnetLight> = config
            .devices
            .iter()
            .map(|device| ArtnetLight::new(device, gateway.clone()))
            .collect();

        info!(
            "Configured {} light(s) on {}",
            lights.len(),
            gateway.destination()
        );

        Self { gateway, lights }
    }

    pub fn gateway(&self) -> &ArtNetGateway {
        &self.gateway
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtnetLight> {
        self.lights.iter()
    }

    /// Look up a light by name
    pub fn get(&self, name: &str) -> Option<&ArtnetLight> {
        self.lights.iter().find(|light| light.name() == name)
    }

    /// Look up a light by name, mutably
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ArtnetLight> {
        self.lights.iter_mut().find(|light| light.name() == name)
    }

    /// Like [`LightSet::get_mut`], failing with `UnknownLight`
    pub fn light_mut(&mut self, name: &str) -> Result<&mut ArtnetLight> {
        self.get_mut(name)
            .ok_or_else(|| LightError::UnknownLight(name.to_string()))
    }

    /// Snapshot of every light
    pub fn states(&self) -> Vec<LightState> {
        self.lights.iter().map(ArtnetLight::state).collect()
    }

    /// Fade every light to 0 at the same time.
    ///
    /// Each light fades as its own task, so lights with overlapping channels
    /// race exactly like separate fades would.
    pub async fn turn_off_all(&mut self, transition: Option<Duration>) {
        let duration = transition.unwrap_or_default();
        let handles: Vec<_> = self
            .lights
            .iter()
            .map(|light| {
                self.gateway
                    .spawn_fade(light.channels().to_vec(), 0u8, duration, DEFAULT_FPS)
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Fade task failed: {}", e);
            }
        }

        for light in &mut self.lights {
            light.mark_off();
        }
    }
}
