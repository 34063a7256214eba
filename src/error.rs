//! Error types for telemetry transport and decoding.
//!
//! All errors implement `std::error::Error` and carry structured context so
//! callers can decide whether to retry.
//!
//! ## Error Categories
//!
//! - **Decode Errors**: Datagrams that are not exactly one packet long
//! - **Address Errors**: Hosts that cannot be resolved to a socket address
//! - **Socket Errors**: Bind, connect and send failures
//! - **Configuration Errors**: Unreadable or malformed YAML configuration
//! - **Thread Errors**: Receiver worker spawn failures
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use motionlink::TelemetryError;
//!
//! let error = TelemetryError::connection_failed("port 4444 unreachable");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Failure to turn a datagram into a [`TelemetrySample`](crate::TelemetrySample).
///
/// Decoding only fails on length; every bit pattern is a valid field value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Datagram size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Failed to open telemetry link: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Cannot resolve telemetry address '{address}'")]
    Address {
        address: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to bind UDP port {port}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Transmitter is not started")]
    NotStarted,

    #[error("Failed to send telemetry datagram")]
    Send {
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Configuration file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {context}: {details}")]
    Config { context: String, details: String },

    #[error("Receiver worker failed: {details}")]
    Thread { details: String },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::Connection { .. } => true,
            TelemetryError::Bind { .. } => true,
            TelemetryError::Send { .. } => true,
            TelemetryError::Thread { .. } => true,
            TelemetryError::Decode(_) => false,
            TelemetryError::Address { .. } => false,
            TelemetryError::NotStarted => false,
            TelemetryError::File { .. } => false,
            TelemetryError::Config { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::Connection { .. } => vec![
                "Check that the motion controller host is reachable",
                "Verify no firewall blocks outbound UDP",
                "Retry once the network interface is up",
            ],
            TelemetryError::Address { .. } => vec![
                "Check the host name or IP address spelling",
                "Use a literal IP address such as 127.0.0.1",
            ],
            TelemetryError::Bind { .. } => vec![
                "Ensure no other process is listening on the port",
                "Choose a different receiver port",
                "Check permissions for binding low port numbers",
            ],
            TelemetryError::NotStarted => vec![
                "Call start() before sending",
                "Activate the frontend before ticking",
            ],
            TelemetryError::Send { .. } => vec![
                "Ignore occasional failures, the next frame supersedes this one",
                "Verify the receiver is running on the target port",
            ],
            TelemetryError::Decode(_) => vec![
                "Check that the sender uses the same packet layout",
                "Verify both ends run compatible protocol versions",
            ],
            TelemetryError::File { .. } => vec![
                "Check the configuration file exists and is readable",
                "Fall back to TelemetryConfig::default()",
            ],
            TelemetryError::Config { .. } => vec![
                "Check the YAML syntax of the configuration file",
                "Remove unknown keys or fix value types",
            ],
            TelemetryError::Thread { .. } => vec![
                "Check system thread limits",
                "Restart the receiver",
            ],
        }
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with an I/O source.
    pub fn connection_failed_with_source(reason: impl Into<String>, source: std::io::Error) -> Self {
        TelemetryError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for unresolvable addresses.
    pub fn invalid_address(address: impl Into<String>, source: Option<std::io::Error>) -> Self {
        TelemetryError::Address { address: address.into(), source }
    }

    /// Helper constructor for configuration file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }

    /// Helper constructor for malformed configuration.
    pub fn config_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        TelemetryError::Config { context: context.into(), details: details.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn size_mismatch_message_reports_both_lengths(actual in 0usize..4096) {
                let err = DecodeError::SizeMismatch { expected: 72, actual };
                let msg = err.to_string();
                prop_assert!(msg.contains("72"));
                prop_assert!(msg.contains(&actual.to_string()));

                let wrapped: TelemetryError = err.into();
                prop_assert_eq!(wrapped.to_string(), msg);
                prop_assert!(!wrapped.is_retryable());
            }

            #[test]
            fn context_survives_formatting(reason in ".*", address in "[a-z.]{1,24}", port in 1u16..=u16::MAX) {
                let connection = TelemetryError::connection_failed(reason.clone());
                prop_assert!(connection.to_string().contains(&reason));

                let addr = TelemetryError::invalid_address(address.clone(), None);
                prop_assert!(addr.to_string().contains(&address));

                let bind = TelemetryError::Bind {
                    port,
                    source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
                };
                prop_assert!(bind.to_string().contains(&port.to_string()));
            }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<TelemetryError>();
        assert_send_sync_static::<DecodeError>();

        let error = TelemetryError::NotStarted;
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn send_errors_expose_io_source() {
        let err = TelemetryError::Send {
            source: std::io::Error::new(std::io::ErrorKind::WouldBlock, "socket buffer full"),
        };
        let source = std::error::Error::source(&err).expect("send error should chain io error");
        assert!(source.to_string().contains("socket buffer full"));
    }

    #[test]
    fn recovery_methods_work() {
        let send = TelemetryError::Send { source: std::io::Error::other("refused") };
        let not_started = TelemetryError::NotStarted;
        let config = TelemetryError::config_error("provider", "bad type");

        assert!(send.is_retryable());
        assert!(!not_started.is_retryable());
        assert!(!config.is_retryable());

        for err in [&send, &not_started, &config] {
            let suggestions = err.recovery_suggestions();
            assert!(!suggestions.is_empty());
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }
}
