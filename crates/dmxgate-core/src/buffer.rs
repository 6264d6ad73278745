//! Channel state for one DMX universe
//!
//! Channels are addressed 1-based, the way they are printed on fixtures.
//! Every slot is an `AtomicU8`, so concurrent fades may write different
//! channels without locking and readers never block.

use std::sync::atomic::{AtomicU8, Ordering};

/// Largest number of channels in a DMX512 universe
pub const MAX_CHANNELS: usize = 512;

/// Clamp a requested channel count to a valid universe size.
///
/// The count is capped at 512 and rounded up to the next even number.
/// A request for zero channels yields the smallest universe, 2.
pub fn normalize_channel_count(requested: usize) -> usize {
    let count = requested.clamp(1, MAX_CHANNELS);
    if count % 2 == 0 {
        count
    } else {
        count + 1
    }
}

/// Fixed-length array of channel levels
#[derive(Debug)]
pub struct ChannelBuffer {
    channels: Box<[AtomicU8]>,
    default_level: u8,
}

impl ChannelBuffer {
    /// Create a buffer with every channel at `default_level`.
    ///
    /// `requested_count` goes through [`normalize_channel_count`].
    pub fn new(requested_count: usize, default_level: u8) -> Self {
        let count = normalize_channel_count(requested_count);
        let channels = (0..count).map(|_| AtomicU8::new(default_level)).collect();
        Self {
            channels,
            default_level,
        }
    }

    /// Number of channels (N)
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Always false, a buffer holds at least two channels
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Level every channel started at
    pub fn default_level(&self) -> u8 {
        self.default_level
    }

    fn slot(&self, index: usize) -> Option<&AtomicU8> {
        index.checked_sub(1).and_then(|i| self.channels.get(i))
    }

    /// Write one channel.
    ///
    /// Returns false and leaves the buffer untouched when `index` is outside
    /// `1..=N` or `level` is outside `0..=255`.
    pub fn set_channel(&self, index: usize, level: i32) -> bool {
        match (self.slot(index), u8::try_from(level)) {
            (Some(slot), Ok(level)) => {
                slot.store(level, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    /// Write a contiguous run starting at `start_index`.
    ///
    /// Positions past the end of the universe and levels outside `0..=255`
    /// are skipped individually. Returns how many values were applied.
    pub fn set_channels(&self, start_index: usize, levels: &[i32]) -> usize {
        levels
            .iter()
            .enumerate()
            .filter(|(offset, level)| {
                start_index
                    .checked_add(*offset)
                    .is_some_and(|index| self.set_channel(index, **level))
            })
            .count()
    }

    /// Current level of a channel, `None` outside `1..=N`
    pub fn get(&self, index: usize) -> Option<u8> {
        self.slot(index).map(|slot| slot.load(Ordering::Relaxed))
    }

    /// Current level of a channel; indices outside `1..=N` read as 0
    pub fn get_channel(&self, index: usize) -> u8 {
        self.get(index).unwrap_or(0)
    }

    /// Copy of all levels, channel 1 first
    pub fn snapshot(&self) -> Vec<u8> {
        self.channels
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect()
    }

    /// Append all levels to `out`, channel 1 first
    pub(crate) fn write_levels(&self, out: &mut Vec<u8>) {
        out.extend(self.channels.iter().map(|slot| slot.load(Ordering::Relaxed)));
    }
}
