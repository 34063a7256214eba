//! UDP telemetry receiver
//!
//! [`UdpReceiver`] owns one background thread that polls a bound UDP socket,
//! decodes datagrams, tracks link liveness and publishes what it learns:
//!
//! - liveness flags through [`LinkStatus`] (atomics)
//! - the latest sample through a `tokio::sync::watch` channel
//! - `(current, previous)` update events through a `tokio::sync::broadcast` channel
//! - raw and filtered history behind a lock
//!
//! The thread exclusively owns the socket. Everything it publishes is written
//! only by that thread and may be read from any other.
//!
//! # Loop
//!
//! ```text
//! while not cancelled:
//!     recv (short timeout)
//!     ├─ nothing      → window elapsed? clear flags, back off 1s : poll again
//!     ├─ datagram     → connected; decode
//!     │   ├─ bad size → log, discard
//!     │   ├─ new ID   → running, reset window, record, publish, emit update
//!     │   └─ same ID  → window elapsed? not running
//!     └─ socket error → clear flags, back off 1s
//! ```

mod liveness;


pub use liveness::{
    IDLE_BACKOFF, LIVENESS_WINDOW, LinkStatus, LivenessTracker, Observation, ReceiverState,
};

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use futures::{Stream, StreamExt};
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::codec;
use crate::history::{SampleFilter, TelemetryHistory};
use crate::types::{TelemetrySample, TelemetryUpdate};
use crate::{Result, TelemetryError};

/// Receive timeout per poll; bounds how long a stop request waits on the socket.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Largest possible UDP payload, so oversized datagrams are measured, not truncated.
const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Update events buffered per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 256;

/// State shared between the receiver handle and its worker thread.
#[derive(Clone)]
struct Shared {
    status: Arc<LinkStatus>,
    history: Arc<Mutex<TelemetryHistory>>,
    latest: Arc<watch::Sender<Option<TelemetrySample>>>,
    events: broadcast::Sender<TelemetryUpdate>,
}

impl Shared {
    fn publish(&self, sample: TelemetrySample, previous: Option<TelemetrySample>) {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).record(sample);
        self.latest.send_replace(Some(sample));

        if let Some(previous) = previous {
            // No subscribers is fine
            let _ = self.events.send(TelemetryUpdate { current: sample, previous });
        }
    }
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    local_addr: SocketAddr,
}

/// Receives telemetry datagrams on a background thread.
pub struct UdpReceiver {
    shared: Shared,
    latest_rx: watch::Receiver<Option<TelemetrySample>>,
    worker: Option<Worker>,
    stopped: bool,
}

impl UdpReceiver {
    pub fn new() -> Self {
        let (latest_tx, latest_rx) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            shared: Shared {
                status: Arc::new(LinkStatus::new()),
                history: Arc::new(Mutex::new(TelemetryHistory::new())),
                latest: Arc::new(latest_tx),
                events,
            },
            latest_rx,
            worker: None,
            stopped: false,
        }
    }

    /// Bind `port` on all interfaces and start the polling thread.
    ///
    /// Port 0 binds an ephemeral port, see [`local_addr`](Self::local_addr).
    /// Calling this while already listening is a no-op. Bind and spawn
    /// failures are returned; failures inside the loop never are.
    pub fn start(&mut self, port: u16) -> Result<()> {
        if let Some(worker) = &self.worker {
            debug!(addr = %worker.local_addr, "Receiver already listening");
            return Ok(());
        }

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))
            .map_err(|source| TelemetryError::Bind { port, source })?;
        socket.set_read_timeout(Some(POLL_INTERVAL)).map_err(|e| {
            TelemetryError::connection_failed_with_source("Cannot set receive timeout", e)
        })?;
        let local_addr = socket.local_addr().map_err(|source| TelemetryError::Bind { port, source })?;

        let cancel = CancellationToken::new();
        let shared = self.shared.clone();
        let cancel_worker = cancel.clone();

        self.shared.status.clear();
        let handle = std::thread::Builder::new()
            .name("telemetry-receiver".to_string())
            .spawn(move || receive_loop(socket, shared, cancel_worker))
            .map_err(|e| TelemetryError::Thread { details: e.to_string() })?;

        info!(%local_addr, "Telemetry receiver listening");
        self.worker = Some(Worker { cancel, handle, local_addr });
        self.stopped = false;
        Ok(())
    }

    /// Request the loop to exit and wait for it.
    ///
    /// Blocks for at most one poll interval plus whatever the current
    /// iteration is doing. The socket is closed when this returns.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            debug!("Receiver not running, nothing to stop");
            return;
        };

        info!(addr = %worker.local_addr, "Stopping telemetry receiver");
        worker.cancel.cancel();
        if worker.handle.join().is_err() {
            error!("Telemetry receiver thread panicked");
        }

        self.shared.status.clear();
        self.stopped = true;
    }

    /// Bound address while listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.worker.as_ref().map(|w| w.local_addr)
    }

    pub fn is_listening(&self) -> bool {
        self.worker.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.status.is_connected()
    }

    pub fn is_running(&self) -> bool {
        self.shared.status.is_running()
    }

    pub fn state(&self) -> ReceiverState {
        match (&self.worker, self.stopped) {
            (Some(_), _) => ReceiverState::from_status(&self.shared.status),
            (None, true) => ReceiverState::Stopped,
            (None, false) => ReceiverState::Idle,
        }
    }

    /// Shared handle to the liveness flags.
    pub fn status(&self) -> Arc<LinkStatus> {
        Arc::clone(&self.shared.status)
    }

    /// Most recent sample with a new packet ID.
    pub fn latest(&self) -> Option<TelemetrySample> {
        *self.latest_rx.borrow()
    }

    /// Receive update events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryUpdate> {
        self.shared.events.subscribe()
    }

    /// Update events as a stream. Events missed by a lagging consumer are skipped.
    pub fn updates(&self) -> impl Stream<Item = TelemetryUpdate> + 'static {
        BroadcastStream::new(self.subscribe()).filter_map(|event| async move {
            match event {
                Ok(update) => Some(update),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Telemetry update stream lagged");
                    None
                }
            }
        })
    }

    /// Latest-value stream of samples; yields the current sample first if there is one.
    pub fn samples(&self) -> impl Stream<Item = TelemetrySample> + 'static {
        WatchStream::new(self.latest_rx.clone()).filter_map(|opt| async move { opt })
    }

    /// Copy of the raw history, oldest first.
    pub fn raw_history(&self) -> Vec<TelemetrySample> {
        self.shared.history.lock().unwrap_or_else(|e| e.into_inner()).raw().snapshot()
    }

    /// Copy of the filtered history, oldest first.
    pub fn filtered_history(&self) -> Vec<TelemetrySample> {
        self.shared.history.lock().unwrap_or_else(|e| e.into_inner()).filtered().snapshot()
    }

    /// Replace the filter applied to received samples.
    pub fn set_filter(&self, filter: impl SampleFilter + 'static) {
        self.shared.history.lock().unwrap_or_else(|e| e.into_inner()).set_filter(filter);
    }
}

impl Default for UdpReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UdpReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn receive_loop(socket: UdpSocket, shared: Shared, cancel: CancellationToken) {
    let status = Arc::clone(&shared.status);
    let mut tracker = LivenessTracker::new(&status, Instant::now());
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    let mut accepted = 0u64;
    let mut discarded = 0u64;

    debug!("Telemetry receiver thread started");

    while !cancel.is_cancelled() {
        match socket.recv(&mut buf) {
            Ok(len) => {
                tracker.on_datagram();

                let sample = match codec::decode(&buf[..len]) {
                    Ok(sample) => sample,
                    Err(e) => {
                        discarded += 1;
                        warn!("Discarding datagram: {}", e);
                        continue;
                    }
                };
                accepted += 1;

                match tracker.observe(sample, Instant::now()) {
                    Observation::New { previous } => {
                        trace!(packet_id = sample.packet_id, "New telemetry sample");
                        shared.publish(sample, previous);
                    }
                    Observation::Repeat => {
                        trace!(packet_id = sample.packet_id, "Repeated packet ID");
                    }
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                if tracker.on_idle(Instant::now()) {
                    backoff(&cancel, IDLE_BACKOFF);
                }
            }
            Err(e) => {
                warn!("Telemetry receive failed: {}", e);
                tracker.on_error();
                backoff(&cancel, IDLE_BACKOFF);
            }
        }
    }

    status.clear();
    info!(accepted, discarded, "Telemetry receiver thread ended");
}

/// Sleep for `duration`, waking early if cancelled.
fn backoff(cancel: &CancellationToken, duration: Duration) {
    let deadline = Instant::now() + duration;
    while !cancel.is_cancelled() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep((deadline - now).min(POLL_INTERVAL));
    }
}
