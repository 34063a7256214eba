//! Producer-side context driven once per simulation frame
//!
//! [`TelemetryFrontend`] bundles everything the sending side needs: the
//! target endpoint, a [`PoseSampler`] for the tracked vehicle, the
//! transmitter and the raw/filtered histories. The host constructs one at
//! startup and calls [`tick`](TelemetryFrontend::tick) from its frame loop.
//!
//! ```no_run
//! use motionlink::{Pose, TelemetryFrontend};
//!
//! # fn main() -> motionlink::Result<()> {
//! let mut frontend = TelemetryFrontend::new(&Pose::default());
//! frontend.set_connection("127.0.0.1", 4444);
//! frontend.activate(true)?;
//!
//! // Per frame:
//! let pose = Pose::default();
//! if let Some(sample) = frontend.tick(&pose, 1.0 / 60.0) {
//!     println!("sent packet {}", sample.packet_id);
//! }
//! # Ok(())
//! # }
//! ```

use tracing::{debug, info, trace, warn};

use crate::config::TransmitterConfig;
use crate::history::{SampleFilter, SampleHistory, TelemetryHistory};
use crate::sampler::PoseSampler;
use crate::transmitter::UdpTransmitter;
use crate::types::{Pose, TelemetrySample};
use crate::{Result, TelemetryError};

/// Explicit producer context: sampler, transmitter and histories for one vehicle.
#[derive(Debug)]
pub struct TelemetryFrontend {
    endpoint: TransmitterConfig,
    sampler: PoseSampler,
    transmitter: UdpTransmitter,
    history: TelemetryHistory,
    active: bool,
    /// Last send failed; failures are logged once per transition
    send_failing: bool,
}

impl TelemetryFrontend {
    /// Create an inactive frontend anchored at the vehicle's current pose.
    pub fn new(initial: &Pose) -> Self {
        Self::with_config(initial, TransmitterConfig::default())
    }

    pub fn with_config(initial: &Pose, endpoint: TransmitterConfig) -> Self {
        Self {
            endpoint,
            sampler: PoseSampler::new(initial),
            transmitter: UdpTransmitter::new(),
            history: TelemetryHistory::new(),
            active: false,
            send_failing: false,
        }
    }

    /// Set the target endpoint. Takes effect on the next activation.
    pub fn set_connection(&mut self, host: impl Into<String>, port: u16) {
        self.endpoint = TransmitterConfig { host: host.into(), port };
    }

    pub fn endpoint(&self) -> &TransmitterConfig {
        &self.endpoint
    }

    /// Start or stop sending. Repeating the current state is a no-op.
    ///
    /// Activation fails if the transmitter cannot open its socket, in which
    /// case the frontend stays inactive.
    pub fn activate(&mut self, active: bool) -> Result<()> {
        if active == self.active {
            debug!(active, "Frontend activation unchanged");
            return Ok(());
        }

        if active {
            self.transmitter.start(&self.endpoint.host, self.endpoint.port)?;
        } else {
            self.transmitter.stop();
        }
        self.active = active;
        self.send_failing = false;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sample the pose, record it and send the filtered sample.
    ///
    /// Returns the sample that was sent, or `None` when the frontend is
    /// inactive or `dt <= 0`. Send failures are logged and never returned.
    pub fn tick(&mut self, pose: &Pose, dt: f32) -> Option<TelemetrySample> {
        if !self.active {
            return None;
        }

        let sample = self.sampler.update(pose, dt)?;
        let filtered = self.history.record(sample);

        let result = self.transmitter.send_sample(&filtered);
        self.note_send_result(filtered.packet_id, result.as_ref().err());
        Some(filtered)
    }

    /// Track send health, logging only when it changes.
    ///
    /// Returns `true` when this result started or ended a run of failures.
    fn note_send_result(&mut self, packet_id: i32, error: Option<&TelemetryError>) -> bool {
        match (error, self.send_failing) {
            (Some(e), false) => {
                warn!(packet_id, dropped = self.transmitter.dropped(), "Telemetry sends failing: {}", e);
                self.send_failing = true;
                true
            }
            (Some(e), true) => {
                trace!(packet_id, "Telemetry send failed: {}", e);
                false
            }
            (None, true) => {
                info!(packet_id, dropped = self.transmitter.dropped(), "Telemetry sends recovered");
                self.send_failing = false;
                true
            }
            (None, false) => false,
        }
    }

    /// Re-anchor the sampler, e.g. after the vehicle is teleported.
    pub fn reset(&mut self, pose: &Pose) {
        self.sampler.reset(pose);
    }

    pub fn set_filter(&mut self, filter: impl SampleFilter + 'static) {
        self.history.set_filter(filter);
    }

    pub fn set_slip_angle(&mut self, slip_angle: f32) {
        self.sampler.set_slip_angle(slip_angle);
    }

    pub fn raw_history(&self) -> &SampleHistory {
        self.history.raw()
    }

    pub fn filtered_history(&self) -> &SampleHistory {
        self.history.filtered()
    }

    pub fn transmitter(&self) -> &UdpTransmitter {
        &self.transmitter
    }
}
