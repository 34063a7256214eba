//! Telemetry sample record shared by producer, wire codec and receiver

/// One motion telemetry sample.
///
/// Field order matches the wire layout (see [`crate::codec`]). Angles are in
/// degrees, angular rates in degrees per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetrySample {
    /// Sequence counter, wraps to 0 after `i32::MAX`
    pub packet_id: i32,

    /// Local-frame linear velocity (slot reserved on the wire, not populated by [`crate::PoseSampler`])
    pub vel_x: f32,
    pub vel_y: f32,
    pub vel_z: f32,

    /// Per-tick change of local-frame velocity
    pub acc_x: f32,
    pub acc_y: f32,
    pub acc_z: f32,

    /// Orientation; pitch and roll are folded by [`crate::angle::wrap_angle`], yaw is not
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,

    pub pitch_vel: f32,
    pub yaw_vel: f32,
    pub roll_vel: f32,

    /// Per-tick change of angular rate
    pub pitch_acc: f32,
    pub yaw_acc: f32,
    pub roll_acc: f32,

    /// Traction loss, supplied externally
    pub slip_angle: f32,
}

impl TelemetrySample {
    /// Folded pitch angle in degrees.
    pub fn pitch_angle(&self) -> f32 {
        self.pitch
    }

    /// Folded roll angle in degrees.
    pub fn roll_angle(&self) -> f32 {
        self.roll
    }

    /// Vertical motion cue (local Y acceleration).
    pub fn heave(&self) -> f32 {
        self.acc_y
    }

    /// Lateral motion cue (local X acceleration).
    pub fn sway(&self) -> f32 {
        self.acc_x
    }

    /// Longitudinal motion cue (local Z acceleration).
    pub fn surge(&self) -> f32 {
        self.acc_z
    }

    /// Whether both samples carry the same sequence number.
    ///
    /// The receiver treats such samples as the same state regardless of the
    /// other fields.
    pub fn same_packet(&self, other: &TelemetrySample) -> bool {
        self.packet_id == other.packet_id
    }
}

/// Update event emitted by the receiver when a new packet ID arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryUpdate {
    /// Newly received sample
    pub current: TelemetrySample,

    /// Sample that was current before this one
    pub previous: TelemetrySample,
}
