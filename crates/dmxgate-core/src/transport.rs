//! Frame transport
//!
//! Art-Net is fire-and-forget: a sink writes one datagram per frame and
//! never waits for a reply.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use parking_lot::Mutex;

use crate::{error::GatewayError, Result};

/// Destination for serialized frames
pub trait FrameSink: Send + Sync {
    /// Transmit one complete frame
    fn send_frame(&self, frame: &[u8]) -> io::Result<()>;

    /// Human-readable destination, used in log messages
    fn describe(&self) -> String;
}

/// UDP sink sending every frame to a single host:port
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Resolve `host:port` and open an unconnected socket.
    ///
    /// Broadcast is enabled so a broadcast address may be used as the host.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let target = (host, port)
            .to_socket_addrs()
            .map_err(|e| GatewayError::InvalidTarget(format!("{}:{}: {}", host, port, e)))?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| {
                GatewayError::InvalidTarget(format!("{}:{} has no IPv4 address", host, port))
            })?;

        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_broadcast(true)?;

        Ok(Self { socket, target })
    }

    /// Resolved destination address
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl FrameSink for UdpSink {
    fn send_frame(&self, frame: &[u8]) -> io::Result<()> {
        self.socket.send_to(frame, self.target).map(|_| ())
    }

    fn describe(&self) -> String {
        self.target.to_string()
    }
}

/// Sink that keeps every frame in memory instead of transmitting it
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Mutex<Vec<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames received so far, oldest first
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().clone()
    }

    /// Number of frames received so far
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    /// Most recent frame
    pub fn last(&self) -> Option<Vec<u8>> {
        self.frames.lock().last().cloned()
    }

    /// Drop recorded frames
    pub fn clear(&self) {
        self.frames.lock().clear();
    }
}

impl FrameSink for MemorySink {
    fn send_frame(&self, frame: &[u8]) -> io::Result<()> {
        self.frames.lock().push(frame.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
