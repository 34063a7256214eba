//! UDP telemetry transmitter
//!
//! Sends one datagram per call to a single connected peer. Sends never wait
//! on the network: the socket is non-blocking and a full send buffer counts
//! as a dropped datagram, since the next frame supersedes it anyway.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, trace};

use crate::codec;
use crate::types::TelemetrySample;
use crate::{Result, TelemetryError};

/// Connected, non-blocking UDP sender.
#[derive(Debug, Default)]
pub struct UdpTransmitter {
    socket: Option<UdpSocket>,
    sent: AtomicU64,
    dropped: AtomicU64,
}

impl UdpTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a socket connected to `host:port`.
    ///
    /// A no-op when already started, even if `host`/`port` differ; call
    /// [`stop`](Self::stop) first to retarget. On failure the transmitter
    /// stays inactive.
    pub fn start(&mut self, host: &str, port: u16) -> Result<()> {
        if let Some(socket) = &self.socket {
            debug!(peer = ?socket.peer_addr().ok(), "Transmitter already started");
            return Ok(());
        }

        let target = resolve(host, port)?;
        let local: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let socket = UdpSocket::bind(local).map_err(|e| {
            TelemetryError::connection_failed_with_source("Cannot bind local UDP socket", e)
        })?;
        socket.connect(target).map_err(|e| {
            TelemetryError::connection_failed_with_source(format!("Cannot connect to {}", target), e)
        })?;
        socket.set_nonblocking(true).map_err(|e| {
            TelemetryError::connection_failed_with_source("Cannot make socket non-blocking", e)
        })?;

        info!(%target, "Telemetry transmitter started");
        self.socket = Some(socket);
        Ok(())
    }

    /// Close the socket. Subsequent sends fail with [`TelemetryError::NotStarted`].
    pub fn stop(&mut self) {
        if let Some(socket) = self.socket.take() {
            info!(
                peer = ?socket.peer_addr().ok(),
                sent = self.sent(),
                dropped = self.dropped(),
                "Telemetry transmitter stopped"
            );
        }
    }

    pub fn is_active(&self) -> bool {
        self.socket.is_some()
    }

    /// Submit one datagram without waiting for it to leave.
    ///
    /// A full OS send buffer drops the datagram and still returns `Ok`.
    pub fn send(&self, bytes: &[u8]) -> Result<()> {
        let socket = self.socket.as_ref().ok_or(TelemetryError::NotStarted)?;

        match socket.send(bytes) {
            Ok(_) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                trace!("Send buffer full, datagram dropped");
                Ok(())
            }
            Err(source) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(TelemetryError::Send { source })
            }
        }
    }

    /// Encode and send one sample.
    pub fn send_sample(&self, sample: &TelemetrySample) -> Result<()> {
        self.send(&codec::encode(sample))
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.peer_addr().ok())
    }

    /// Datagrams handed to the OS since creation.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Datagrams lost to a full buffer or a send error since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| TelemetryError::invalid_address(format!("{}:{}", host, port), Some(e)))?;
    addrs.next().ok_or_else(|| TelemetryError::invalid_address(format!("{}:{}", host, port), None))
}
