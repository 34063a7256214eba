//! Sample and pose builders shared by unit tests and benchmarks

#![cfg(any(test, feature = "benchmark"))]

use crate::types::{Pose, TelemetrySample};
use nalgebra::Vector3;

/// A sample whose every field holds a different value derived from `packet_id`.
pub fn distinct_sample(packet_id: i32) -> TelemetrySample {
    let base = (packet_id % 1000) as f32;
    TelemetrySample {
        packet_id,
        vel_x: base + 0.5,
        vel_y: base + 1.5,
        vel_z: base + 2.5,
        acc_x: -base - 3.25,
        acc_y: base + 4.25,
        acc_z: -base - 5.25,
        pitch: 12.5,
        yaw: 270.0 - base / 10.0,
        roll: -33.75,
        pitch_vel: 6.125,
        yaw_vel: -7.125,
        roll_vel: 8.0625,
        pitch_acc: 0.75,
        yaw_acc: -0.875,
        roll_acc: 0.9375,
        slip_angle: 1.0 / 3.0,
    }
}

/// A minimal sample carrying only a packet ID.
pub fn sample_with_id(packet_id: i32) -> TelemetrySample {
    TelemetrySample { packet_id, ..Default::default() }
}

/// A pose at `position` with Euler angles in degrees.
pub fn pose(position: [f32; 3], pitch: f32, yaw: f32, roll: f32) -> Pose {
    Pose::from_euler_degrees(Vector3::from(position), pitch, yaw, roll)
}

/// Poses of a vehicle driving a gentle left-hand circle at 60Hz.
pub fn circling_poses(count: usize) -> Vec<Pose> {
    (0..count)
        .map(|i| {
            let t = i as f32 / 60.0;
            let heading = t * 20.0;
            let radius = 50.0;
            let position = [
                radius * heading.to_radians().sin(),
                0.2 * (t * 3.0).sin(),
                radius * heading.to_radians().cos(),
            ];
            pose(position, 2.0 * (t * 2.0).sin(), heading, -4.0)
        })
        .collect()
}
