//! Vehicle motion telemetry over UDP for motion-platform controllers.
//!
//! MotionLink streams the motion state of a simulated vehicle from the game
//! side to a motion controller, one fixed-size datagram per frame, and turns
//! that stream back into samples on the receiving side while tracking whether
//! the link is alive.
//!
//! # Features
//!
//! - **Motion derivation**: local-frame accelerations and angular rates from world poses
//! - **Stable wire format**: 72-byte little-endian packets, one per frame
//! - **Liveness tracking**: `connected` and `running` flags with a 500ms window
//! - **Async consumers**: update events and latest samples as `futures` streams
//!
//! # Quick Start
//!
//! ## Producer
//!
//! ```rust,no_run
//! use motionlink::{MotionLink, TransmitterConfig, PoseSampler, Pose};
//!
//! # fn main() -> motionlink::Result<()> {
//! let transmitter = MotionLink::transmit(&TransmitterConfig::default())?;
//! let mut sampler = PoseSampler::new(&Pose::default());
//!
//! // Once per frame
//! if let Some(sample) = sampler.update(&Pose::default(), 1.0 / 60.0) {
//!     transmitter.send_sample(&sample)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Consumer
//!
//! ```rust,no_run
//! use motionlink::{MotionLink, ReceiverConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let receiver = MotionLink::listen(&ReceiverConfig::default())?;
//!     let mut updates = Box::pin(receiver.updates());
//!
//!     while let Some(update) = updates.next().await {
//!         println!("surge {:.2} heave {:.2}", update.current.surge(), update.current.heave());
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod angle;
pub mod codec;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Motion derivation and bookkeeping
pub mod history;
pub mod sampler;

// Transport
pub mod frontend;
pub mod receiver;
pub mod transmitter;

pub mod config;

// Core exports
pub use error::*;
pub use types::*;

pub use angle::{delta_angle, wrap_angle};
pub use codec::PACKET_SIZE;
pub use config::{ProviderMetadata, ReceiverConfig, TelemetryConfig, TransmitterConfig};
pub use frontend::TelemetryFrontend;
pub use history::{IdentityFilter, SampleFilter, SampleHistory, TelemetryHistory};
pub use receiver::{LinkStatus, ReceiverState, UdpReceiver};
pub use sampler::PoseSampler;
pub use transmitter::UdpTransmitter;

/// Unified entry point for opening either end of a telemetry link.
///
/// # Examples
///
/// ```rust,no_run
/// use motionlink::{MotionLink, ReceiverConfig, TransmitterConfig};
///
/// # fn main() -> motionlink::Result<()> {
/// let receiver = MotionLink::listen(&ReceiverConfig { port: 4444 })?;
/// let transmitter = MotionLink::transmit(&TransmitterConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub struct MotionLink;

impl MotionLink {
    /// Open a transmitter connected to the configured host and port.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host cannot be resolved
    /// - A local socket cannot be opened or connected
    pub fn transmit(config: &TransmitterConfig) -> Result<UdpTransmitter> {
        let mut transmitter = UdpTransmitter::new();
        transmitter.start(&config.host, config.port)?;
        Ok(transmitter)
    }

    /// Bind the configured port and start the receiver thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the thread cannot be spawned.
    pub fn listen(config: &ReceiverConfig) -> Result<UdpReceiver> {
        let mut receiver = UdpReceiver::new();
        receiver.start(config.port)?;
        Ok(receiver)
    }
}
