//! dmxgate core - Art-Net channel gateway
//!
//! Keeps the authoritative levels of one DMX512 universe and transmits them as
//! ArtDmx frames over UDP whenever they change:
//! - **Buffer**: up to 512 one-byte channels, addressed 1-based
//! - **Packet**: the fixed ArtDmx header (universe 0, no sequencing)
//! - **Gateway**: set / get / send, shared between tasks by cloning
//! - **Fade**: time-stepped transitions, one frame per changed step
//!
//! Transmit only. Nothing is read back from the network.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dmxgate_core::{ArtNetGateway, DEFAULT_FPS};
//! use std::time::Duration;
//!
//! # async fn run() -> dmxgate_core::Result<()> {
//! let gateway = ArtNetGateway::connect("192.168.1.50", 6454, 0, 512)?;
//!
//! // Prime two channels, then send them in one frame
//! gateway.set_channel(1, 255, false);
//! gateway.set_channel(2, 128, false);
//! gateway.send()?;
//!
//! // Dim an RGB fixture on channels 3-5 over half a second
//! gateway
//!     .fade(&[3, 4, 5], [255u8, 64, 0], Duration::from_millis(500), DEFAULT_FPS)
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod error;
pub mod fade;
pub mod gateway;
pub mod packet;
pub mod transport;

pub use buffer::{normalize_channel_count, ChannelBuffer, MAX_CHANNELS};
pub use error::{GatewayError, Result};
pub use fade::{frame_count, FadeOutcome, FadeTarget, DEFAULT_FPS};
pub use gateway::ArtNetGateway;
pub use packet::{ArtDmxTemplate, DEFAULT_PORT, HEADER_LEN};
pub use transport::{FrameSink, MemorySink, UdpSink};
