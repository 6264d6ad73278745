//! Art-Net gateway
//!
//! Owns the channel buffer and the transport. Every state change that should
//! reach the fixtures serializes the whole universe and sends it as one frame.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::buffer::ChannelBuffer;
use crate::fade::{FadeJob, FadeOutcome, FadeTarget};
use crate::packet::ArtDmxTemplate;
use crate::transport::{FrameSink, UdpSink};
use crate::Result;

struct GatewayInner {
    buffer: ChannelBuffer,
    template: ArtDmxTemplate,
    sink: Arc<dyn FrameSink>,
}

/// Handle to a single-universe Art-Net output.
///
/// Clones share the same buffer and socket, so fades can run as separate
/// tasks while reads and writes continue from anywhere.
#[derive(Clone)]
pub struct ArtNetGateway {
    inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for ArtNetGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtNetGateway")
            .field("destination", &self.inner.sink.describe())
            .field("channels", &self.inner.buffer.len())
            .finish()
    }
}

impl ArtNetGateway {
    /// Create a gateway sending to `host:port` over UDP
    ///
    /// # Arguments
    /// * `host` - Node address or broadcast address
    /// * `port` - Destination port (normally 6454)
    /// * `default_level` - Initial level of every channel
    /// * `channel_count` - Requested universe size, normalized to an even count up to 512
    pub fn connect(host: &str, port: u16, default_level: u8, channel_count: usize) -> Result<Self> {
        let sink = UdpSink::new(host, port)?;
        Ok(Self::with_sink(Arc::new(sink), default_level, channel_count))
    }

    /// Create a gateway writing frames to an arbitrary sink
    pub fn with_sink(sink: Arc<dyn FrameSink>, default_level: u8, channel_count: usize) -> Self {
        let buffer = ChannelBuffer::new(channel_count, default_level);
        let template = ArtDmxTemplate::new(buffer.len());

        info!(
            "Art-Net gateway created: {} channels -> {}",
            buffer.len(),
            sink.describe()
        );

        Self {
            inner: Arc::new(GatewayInner {
                buffer,
                template,
                sink,
            }),
        }
    }

    /// Shared channel buffer
    pub fn buffer(&self) -> &ChannelBuffer {
        &self.inner.buffer
    }

    /// Universe size after normalization
    pub fn channel_count(&self) -> usize {
        self.inner.buffer.len()
    }

    /// Level every channel started at
    pub fn default_level(&self) -> u8 {
        self.inner.buffer.default_level()
    }

    /// Where frames are going
    pub fn destination(&self) -> String {
        self.inner.sink.describe()
    }

    /// The frame `send` would transmit right now
    pub fn frame(&self) -> Vec<u8> {
        self.inner.template.frame(&self.inner.buffer)
    }

    /// Transmit the current state of every channel.
    ///
    /// Failures are logged and returned but never retried.
    pub fn send(&self) -> Result<()> {
        let frame = self.frame();
        match self.inner.sink.send_frame(&frame) {
            Ok(()) => {
                trace!("Sent Art-Net frame ({} bytes)", frame.len());
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to send Art-Net frame to {}: {}",
                    self.inner.sink.describe(),
                    e
                );
                Err(e.into())
            }
        }
    }

    /// Set one channel (1-based).
    ///
    /// Returns whether the write was accepted. With `send_immediately` an
    /// accepted write is transmitted at once; pass false to batch several
    /// writes into one frame.
    pub fn set_channel(&self, channel: usize, level: i32, send_immediately: bool) -> bool {
        if !self.inner.buffer.set_channel(channel, level) {
            debug!("Rejected channel {} level {}", channel, level);
            return false;
        }

        debug!(
            "Setting channel {} to {} with send immediately = {}",
            channel, level, send_immediately
        );
        if send_immediately {
            // Transport failures are already logged
            let _ = self.send();
        }
        true
    }

    /// Set a run of channels starting at `start_channel` (1-based).
    ///
    /// Invalid entries are skipped individually. Returns true when at least
    /// one value was applied; only then is a frame sent.
    pub fn set_channel_group(
        &self,
        start_channel: usize,
        levels: &[i32],
        send_immediately: bool,
    ) -> bool {
        let applied = self.inner.buffer.set_channels(start_channel, levels);
        debug!(
            "Setting {} of {} channel(s) from {} with send immediately = {}",
            applied,
            levels.len(),
            start_channel,
            send_immediately
        );

        if applied == 0 {
            return false;
        }
        if send_immediately {
            let _ = self.send();
        }
        true
    }

    /// Current level of a channel (1-based)
    pub fn get_channel_level(&self, channel: usize) -> u8 {
        self.inner.buffer.get_channel(channel)
    }

    /// Fade `channels` to `target` over `duration`, stepping at `fps`.
    ///
    /// Completes after `max(round(duration * fps), 1)` steps. Each step that
    /// changes a channel sends one frame, and every step sleeps `1 / fps`.
    pub async fn fade(
        &self,
        channels: &[usize],
        target: impl Into<FadeTarget>,
        duration: Duration,
        fps: u32,
    ) -> FadeOutcome {
        let target = target.into();
        let job = FadeJob::new(&self.inner.buffer, channels, &target, duration, fps);
        job.run(self).await
    }

    /// Run a fade as an independent task on the current runtime
    pub fn spawn_fade(
        &self,
        channels: Vec<usize>,
        target: impl Into<FadeTarget>,
        duration: Duration,
        fps: u32,
    ) -> JoinHandle<FadeOutcome> {
        let gateway = self.clone();
        let target = target.into();
        tokio::spawn(async move { gateway.fade(&channels, target, duration, fps).await })
    }
}
