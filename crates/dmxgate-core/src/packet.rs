//! ArtDmx packet framing
//!
//! Fixed-universe profile: sequence, physical port and universe are always 0.

use crate::buffer::ChannelBuffer;

/// Art-Net packet ID, null terminated
pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";

/// OpCode for ArtDmx (sent little-endian)
pub const OP_DMX: u16 = 0x5000;

/// Art-Net protocol revision (sent big-endian)
pub const PROTOCOL_VERSION: u16 = 14;

/// Size of the ArtDmx header preceding the channel data
pub const HEADER_LEN: usize = 18;

/// Default Art-Net UDP port
pub const DEFAULT_PORT: u16 = 6454;

/// Immutable ArtDmx header for a universe of a given size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtDmxTemplate {
    header: [u8; HEADER_LEN],
    channel_count: usize,
}

impl ArtDmxTemplate {
    /// Build the header for `channel_count` channels.
    ///
    /// The count must already be normalized (even, at most 512).
    pub fn new(channel_count: usize) -> Self {
        let mut header = [0u8; HEADER_LEN];

        header[0..8].copy_from_slice(ARTNET_ID);
        header[8..10].copy_from_slice(&OP_DMX.to_le_bytes());
        header[10..12].copy_from_slice(&PROTOCOL_VERSION.to_be_bytes());

        // Sequence (12), physical (13) and universe (14..16) stay 0

        // Normalized counts never exceed 512
        let length = channel_count as u16;
        header[16..18].copy_from_slice(&length.to_be_bytes());

        Self {
            header,
            channel_count,
        }
    }

    /// Header bytes
    pub fn header(&self) -> &[u8; HEADER_LEN] {
        &self.header
    }

    /// Number of data bytes following the header
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Total wire length of a frame
    pub fn frame_len(&self) -> usize {
        HEADER_LEN + self.channel_count
    }

    /// Serialize the current buffer state into a complete frame
    pub fn frame(&self, buffer: &ChannelBuffer) -> Vec<u8> {
        let mut packet = Vec::with_capacity(self.frame_len());
        packet.extend_from_slice(&self.header);
        buffer.write_levels(&mut packet);
        packet
    }
}
