//! Core types for motion telemetry.
//!
//! - [`TelemetrySample`] is the fixed-layout record carried by every datagram
//! - [`TelemetryUpdate`] pairs a new sample with the one it replaced
//! - [`Pose`] is the world-space input the producer samples each tick
//! - [`FIELDS`] is a static name → accessor table for generic consumers
//!
//! ## Usage Example
//!
//! ```rust
//! use motionlink::types::{TelemetrySample, field};
//!
//! let sample = TelemetrySample { packet_id: 3, acc_y: 0.25, ..Default::default() };
//! let heave = field("Heave").expect("registered field");
//! assert_eq!(heave.read(&sample), 0.25);
//! ```

mod fields;
mod pose;
mod sample;

pub use fields::{FIELDS, FieldDescriptor, FieldRange, FieldRanges, field, field_names};
pub use pose::Pose;
pub use sample::{TelemetrySample, TelemetryUpdate};
