//! Static field registry for generic consumers such as graphs and profile editors

use super::TelemetrySample;

/// Name, unit and accessor of one telemetry channel.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    read: fn(&TelemetrySample) -> f64,
}

impl FieldDescriptor {
    const fn new(
        name: &'static str,
        unit: &'static str,
        description: &'static str,
        read: fn(&TelemetrySample) -> f64,
    ) -> Self {
        Self { name, unit, description, read }
    }

    /// Read this field from a sample.
    pub fn read(&self, sample: &TelemetrySample) -> f64 {
        (self.read)(sample)
    }
}

/// Every channel a sample exposes, wire fields first, then derived motion cues.
pub static FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("packetID", "", "Sequence counter", |s| s.packet_id as f64),
    FieldDescriptor::new("velX", "m/s", "Local velocity X", |s| s.vel_x as f64),
    FieldDescriptor::new("velY", "m/s", "Local velocity Y", |s| s.vel_y as f64),
    FieldDescriptor::new("velZ", "m/s", "Local velocity Z", |s| s.vel_z as f64),
    FieldDescriptor::new("accX", "m/s per tick", "Local acceleration X", |s| s.acc_x as f64),
    FieldDescriptor::new("accY", "m/s per tick", "Local acceleration Y", |s| s.acc_y as f64),
    FieldDescriptor::new("accZ", "m/s per tick", "Local acceleration Z", |s| s.acc_z as f64),
    FieldDescriptor::new("pitch", "deg", "Folded pitch", |s| s.pitch as f64),
    FieldDescriptor::new("yaw", "deg", "Yaw", |s| s.yaw as f64),
    FieldDescriptor::new("roll", "deg", "Folded roll", |s| s.roll as f64),
    FieldDescriptor::new("pitchVel", "deg/s", "Pitch rate", |s| s.pitch_vel as f64),
    FieldDescriptor::new("yawVel", "deg/s", "Yaw rate", |s| s.yaw_vel as f64),
    FieldDescriptor::new("rollVel", "deg/s", "Roll rate", |s| s.roll_vel as f64),
    FieldDescriptor::new("pitchAcc", "deg/s per tick", "Pitch rate change", |s| s.pitch_acc as f64),
    FieldDescriptor::new("yawAcc", "deg/s per tick", "Yaw rate change", |s| s.yaw_acc as f64),
    FieldDescriptor::new("rollAcc", "deg/s per tick", "Roll rate change", |s| s.roll_acc as f64),
    FieldDescriptor::new("slipAngle", "deg", "Traction loss", |s| s.slip_angle as f64),
    FieldDescriptor::new("PitchAngle", "deg", "Pitch motion cue", |s| s.pitch_angle() as f64),
    FieldDescriptor::new("RollAngle", "deg", "Roll motion cue", |s| s.roll_angle() as f64),
    FieldDescriptor::new("Heave", "m/s per tick", "Vertical motion cue", |s| s.heave() as f64),
    FieldDescriptor::new("Sway", "m/s per tick", "Lateral motion cue", |s| s.sway() as f64),
    FieldDescriptor::new("Surge", "m/s per tick", "Longitudinal motion cue", |s| s.surge() as f64),
];

/// Look up a field by its exact name.
pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Names of all registered fields, in registry order.
pub fn field_names() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.name)
}

/// Observed value range of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

/// Running min/max of every registered field.
///
/// NaN readings are ignored so one bad frame does not poison the range.
#[derive(Debug, Clone)]
pub struct FieldRanges {
    ranges: Vec<Option<FieldRange>>,
}

impl FieldRanges {
    pub fn new() -> Self {
        Self { ranges: vec![None; FIELDS.len()] }
    }

    /// Fold a sample into the ranges.
    pub fn observe(&mut self, sample: &TelemetrySample) {
        for (slot, descriptor) in self.ranges.iter_mut().zip(FIELDS) {
            let value = descriptor.read(sample);
            if value.is_nan() {
                continue;
            }
            *slot = Some(match *slot {
                Some(range) => FieldRange { min: range.min.min(value), max: range.max.max(value) },
                None => FieldRange { min: value, max: value },
            });
        }
    }

    /// Range of a field, if it has seen at least one non-NaN value.
    pub fn range(&self, name: &str) -> Option<FieldRange> {
        let index = FIELDS.iter().position(|f| f.name == name)?;
        self.ranges.get(index).copied().flatten()
    }

    pub fn reset(&mut self) {
        self.ranges.iter_mut().for_each(|slot| *slot = None);
    }
}

impl Default for FieldRanges {
    fn default() -> Self {
        Self::new()
    }
}
