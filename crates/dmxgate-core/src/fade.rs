//! Time-stepped channel fades
//!
//! Each step recomputes every channel from the level it had when the fade
//! started, so rounding never accumulates. Fades touching the same channel
//! are not coordinated: whichever job wrote last before a frame goes out
//! wins that frame.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::buffer::ChannelBuffer;
use crate::gateway::ArtNetGateway;

/// Frame rate used when the caller has no preference
pub const DEFAULT_FPS: u32 = 40;

/// Level(s) a fade moves toward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FadeTarget {
    /// One level for every channel
    Level(u8),
    /// Levels matched to channels by position; the last one repeats
    Levels(Vec<u8>),
}

impl FadeTarget {
    /// Target for the channel at `position` in the fade's channel list
    pub fn level_for(&self, position: usize) -> Option<u8> {
        match self {
            FadeTarget::Level(level) => Some(*level),
            FadeTarget::Levels(levels) => levels.get(position).or(levels.last()).copied(),
        }
    }
}

impl From<u8> for FadeTarget {
    fn from(level: u8) -> Self {
        FadeTarget::Level(level)
    }
}

impl From<Vec<u8>> for FadeTarget {
    fn from(levels: Vec<u8>) -> Self {
        FadeTarget::Levels(levels)
    }
}

impl From<&[u8]> for FadeTarget {
    fn from(levels: &[u8]) -> Self {
        FadeTarget::Levels(levels.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for FadeTarget {
    fn from(levels: [u8; N]) -> Self {
        FadeTarget::Levels(levels.to_vec())
    }
}

/// What a finished fade did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FadeOutcome {
    /// Interpolation steps executed
    pub steps: u32,
    /// Frames handed to the transport successfully
    pub frames_sent: u32,
}

/// Number of steps for a fade, never less than one
pub fn frame_count(duration: Duration, fps: u32) -> u32 {
    let frames = (duration.as_secs_f64() * f64::from(fps.max(1))).round();
    // `as` saturates for out-of-range floats
    (frames as u32).max(1)
}

/// One channel of a fade job
#[derive(Debug, Clone, Copy)]
struct FadeChannel {
    index: usize,
    start: u8,
    target: u8,
}

/// A single in-flight fade
#[derive(Debug)]
pub(crate) struct FadeJob {
    channels: Vec<FadeChannel>,
    frames: u32,
    interval: Duration,
}

impl FadeJob {
    /// Snapshot start levels and resolve per-channel targets.
    ///
    /// Channels outside the universe are dropped from the job.
    pub(crate) fn new(
        buffer: &ChannelBuffer,
        channels: &[usize],
        target: &FadeTarget,
        duration: Duration,
        fps: u32,
    ) -> Self {
        let fps = fps.max(1);
        let channels = channels
            .iter()
            .enumerate()
            .filter_map(|(position, &index)| {
                let Some(start) = buffer.get(index) else {
                    warn!(
                        "Ignoring fade on channel {} (universe has {})",
                        index,
                        buffer.len()
                    );
                    return None;
                };
                let target = target.level_for(position)?;
                Some(FadeChannel {
                    index,
                    start,
                    target,
                })
            })
            .collect();

        Self {
            channels,
            frames: frame_count(duration, fps),
            interval: Duration::from_secs_f64(1.0 / f64::from(fps)),
        }
    }

    pub(crate) fn frames(&self) -> u32 {
        self.frames
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    fn level_at(&self, channel: &FadeChannel, step: u32) -> u8 {
        let start = f64::from(channel.start);
        let increment = (f64::from(channel.target) - start) / f64::from(self.frames);
        (start + increment * f64::from(step)).round().clamp(0.0, 255.0) as u8
    }

    /// Write the levels for `step` and report whether any channel changed
    fn apply_step(&self, buffer: &ChannelBuffer, step: u32) -> bool {
        let mut dirty = false;
        for channel in &self.channels {
            let next = self.level_at(channel, step);
            if buffer.get_channel(channel.index) != next {
                buffer.set_channel(channel.index, i32::from(next));
                dirty = true;
            }
        }
        dirty
    }

    /// Drive the job to completion, one frame per changed step
    pub(crate) async fn run(self, gateway: &ArtNetGateway) -> FadeOutcome {
        let mut outcome = FadeOutcome::default();
        if self.is_empty() {
            debug!("Fade has no channels to move");
            return outcome;
        }

        debug!(
            "Fading {} channel(s) over {} frame(s)",
            self.channels.len(),
            self.frames
        );

        for step in 1..=self.frames {
            if self.apply_step(gateway.buffer(), step) {
                // A dropped frame does not stop the fade; the buffer stays correct
                if gateway.send().is_ok() {
                    outcome.frames_sent += 1;
                }
            } else {
                trace!("Fade step {} unchanged, frame suppressed", step);
            }
            outcome.steps += 1;

            tokio::time::sleep(self.interval).await;
        }

        outcome
    }
}
