//! YAML configuration for the telemetry provider and its endpoints
//!
//! Every section and field has a default, so a partial file (or none at all)
//! still yields a usable configuration:
//!
//! ```yaml
//! provider:
//!   name: My Simulator
//!   version: 1.2.0
//! transmitter:
//!   host: 192.168.1.20
//!   port: 4444
//! receiver:
//!   port: 4444
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Result, TelemetryError};

/// UDP port used by both ends when none is configured.
pub const DEFAULT_PORT: u16 = 4444;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub provider: ProviderMetadata,
    pub transmitter: TransmitterConfig,
    pub receiver: ReceiverConfig,
}

/// Descriptive metadata a host loader shows for this telemetry provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    /// Resource path of the provider icon
    pub icon_image: Option<String>,
    /// Resource path of the provider banner
    pub banner_image: Option<String>,
}

impl Default for ProviderMetadata {
    fn default() -> Self {
        Self {
            name: "MotionLink".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            author: "Unknown".to_string(),
            icon_image: None,
            banner_image: None,
        }
    }
}

/// Where the producer sends datagrams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitterConfig {
    pub host: String,
    pub port: u16,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: DEFAULT_PORT }
    }
}

/// Where the consumer listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub port: u16,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl TelemetryConfig {
    /// Read and parse a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;

        let config = Self::from_yaml_str(&yaml).map_err(|e| match e {
            TelemetryError::Config { details, .. } => {
                TelemetryError::config_error(path.display().to_string(), details)
            }
            other => other,
        })?;

        debug!(path = %path.display(), "Loaded telemetry configuration");
        Ok(config)
    }

    /// Load `path`, falling back to defaults on any failure.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.as_ref().display(),
                    "Using default telemetry configuration: {}", e
                );
                Self::default()
            }
        }
    }

    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml)
            .map_err(|e| TelemetryError::config_error("YAML document", e.to_string()))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml_ng::to_string(self)
            .map_err(|e| TelemetryError::config_error("YAML serialization", e.to_string()))
    }
}
