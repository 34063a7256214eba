//! Link liveness tracking for the receiver loop
//!
//! Two flags describe the link:
//!
//! - `connected`: datagrams are arriving
//! - `running`: datagrams carry new packet IDs
//!
//! Both are derived from the time since the last *new* packet ID. A peer
//! that keeps resending the same packet stays connected but stops running
//! once [`LIVENESS_WINDOW`] elapses; a peer that goes silent loses both
//! flags together once the window elapses with nothing to read.
//!
//! [`LivenessTracker`] holds the transition logic and takes the current
//! [`Instant`] as a parameter, so it can be driven without a socket.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::TelemetrySample;

/// Time without a new packet ID after which the link is considered stale.
pub const LIVENESS_WINDOW: Duration = Duration::from_millis(500);

/// Pause after the link goes quiet or a socket error occurs.
pub const IDLE_BACKOFF: Duration = Duration::from_secs(1);

/// Liveness flags shared between the receiver thread and any reader.
///
/// Written only by the receiver thread with release stores; read anywhere
/// with acquire loads.
#[derive(Debug, Default)]
pub struct LinkStatus {
    connected: AtomicBool,
    running: AtomicBool,
}

impl LinkStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Datagrams have been observed within the liveness window.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// New packet IDs have been observed within the liveness window.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn set_connected(&self, value: bool) {
        if self.connected.swap(value, Ordering::AcqRel) != value {
            debug!(connected = value, "Telemetry link connection changed");
        }
    }

    fn set_running(&self, value: bool) {
        if self.running.swap(value, Ordering::AcqRel) != value {
            debug!(running = value, "Telemetry link activity changed");
        }
    }

    pub(crate) fn clear(&self) {
        self.set_connected(false);
        self.set_running(false);
    }
}

/// Externally visible receiver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    /// Never started
    Idle,
    /// Socket bound, no live peer
    Listening,
    /// Peer connected and sending new packet IDs
    Running,
    /// Peer connected but repeating the same packet ID
    Stale,
    /// Stopped after having been started
    Stopped,
}

impl ReceiverState {
    /// Derive the state of an active receiver from its flags.
    pub fn from_status(status: &LinkStatus) -> Self {
        match (status.is_connected(), status.is_running()) {
            (true, true) => ReceiverState::Running,
            (true, false) => ReceiverState::Stale,
            // Running without connected only happens mid-update
            (false, _) => ReceiverState::Listening,
        }
    }
}

/// Outcome of observing one decoded sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// Packet ID differs from the last one seen; `previous` is `None` for the first sample
    New { previous: Option<TelemetrySample> },
    /// Same packet ID as the last sample
    Repeat,
}

/// Drives [`LinkStatus`] from the events of the receive loop.
#[derive(Debug)]
pub struct LivenessTracker<'a> {
    status: &'a LinkStatus,
    last_change: Instant,
    last: Option<TelemetrySample>,
}

impl<'a> LivenessTracker<'a> {
    pub fn new(status: &'a LinkStatus, now: Instant) -> Self {
        Self { status, last_change: now, last: None }
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_change) > LIVENESS_WINDOW
    }

    /// Nothing was available to read.
    ///
    /// Returns `true` when the window has elapsed and the caller should back
    /// off for [`IDLE_BACKOFF`] instead of polling again immediately.
    pub fn on_idle(&mut self, now: Instant) -> bool {
        if self.window_elapsed(now) {
            self.status.set_running(false);
            self.status.set_connected(false);
            true
        } else {
            false
        }
    }

    /// A datagram arrived, whatever its contents.
    pub fn on_datagram(&mut self) {
        self.status.set_connected(true);
    }

    /// A datagram decoded into `sample`.
    pub fn observe(&mut self, sample: TelemetrySample, now: Instant) -> Observation {
        match self.last {
            Some(last) if last.same_packet(&sample) => {
                if self.window_elapsed(now) {
                    self.status.set_running(false);
                }
                Observation::Repeat
            }
            previous => {
                self.status.set_running(true);
                self.last_change = now;
                self.last = Some(sample);
                Observation::New { previous }
            }
        }
    }

    /// A socket operation failed this iteration.
    pub fn on_error(&mut self) {
        self.status.clear();
    }

    /// Last sample with a new packet ID.
    pub fn last_sample(&self) -> Option<&TelemetrySample> {
        self.last.as_ref()
    }
}
