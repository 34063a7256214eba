//! Per-tick motion derivation from successive poses
//!
//! [`PoseSampler`] turns the world-space pose of a vehicle into the local-frame
//! quantities a motion platform consumes. It keeps the previous tick's pose and
//! derived values, so one sampler tracks exactly one object.
//!
//! # Derived quantities
//!
//! | field | formula |
//! |---|---|
//! | `acc_*` | `local_velocity - last_local_velocity` |
//! | `pitch`, `roll` | [`wrap_angle`] of the Euler angle |
//! | `yaw` | Euler angle, unfolded |
//! | `*_vel` | [`delta_angle`]`(last_angle, euler_angle) / dt` |
//! | `*_acc` (angular) | `angular_velocity - last_angular_velocity` |
//!
//! Accelerations are per-tick differences and are not divided by `dt`.
//! Downstream motion profiles are tuned against these magnitudes.

use nalgebra::Vector3;
use tracing::trace;

use crate::angle::{delta_angle, wrap_angle};
use crate::types::{Pose, TelemetrySample};

/// Derives one [`TelemetrySample`] per tick from a stream of poses.
#[derive(Debug, Clone)]
pub struct PoseSampler {
    last_position: Vector3<f32>,
    last_pose: Pose,
    last_local_velocity: Vector3<f32>,
    last_angular_velocity: Vector3<f32>,
    /// Angles as emitted last tick (pitch and roll folded)
    last_angles: Vector3<f32>,
    packet_id: i32,
    slip_angle: f32,
}

impl PoseSampler {
    /// Create a sampler anchored at the pose the object currently has.
    pub fn new(initial: &Pose) -> Self {
        Self {
            last_position: initial.position,
            last_pose: *initial,
            last_local_velocity: Vector3::zeros(),
            last_angular_velocity: Vector3::zeros(),
            last_angles: Vector3::zeros(),
            packet_id: 0,
            slip_angle: 0.0,
        }
    }

    /// Re-anchor on a new pose, clearing derived state but keeping the packet counter.
    pub fn reset(&mut self, pose: &Pose) {
        let packet_id = self.packet_id;
        let slip_angle = self.slip_angle;
        *self = Self::new(pose);
        self.packet_id = packet_id;
        self.slip_angle = slip_angle;
    }

    /// Continue numbering after `packet_id` (the next sample carries its successor).
    pub fn with_packet_id(mut self, packet_id: i32) -> Self {
        self.packet_id = packet_id;
        self
    }

    /// Set the traction-loss value carried by subsequent samples.
    pub fn set_slip_angle(&mut self, slip_angle: f32) {
        self.slip_angle = slip_angle;
    }

    /// Packet ID of the most recently produced sample (0 before the first).
    pub fn packet_id(&self) -> i32 {
        self.packet_id
    }

    /// Pose seen on the previous tick.
    pub fn last_pose(&self) -> &Pose {
        &self.last_pose
    }

    /// Derive the sample for this tick.
    ///
    /// Returns `None` without touching any state when `dt <= 0`. NaN inputs are
    /// not sanitized and propagate into the sample.
    pub fn update(&mut self, pose: &Pose, dt: f32) -> Option<TelemetrySample> {
        if dt <= 0.0 {
            trace!(dt, "Skipping tick with non-positive delta time");
            return None;
        }
        let dt_recip = 1.0 / dt;

        let world_velocity = (pose.position - self.last_position) * dt_recip;
        let local_velocity = pose.inverse_transform_direction(&world_velocity);
        let local_acceleration = local_velocity - self.last_local_velocity;

        let euler = pose.euler_degrees();
        let angles = Vector3::new(wrap_angle(euler.x), euler.y, wrap_angle(euler.z));

        let angular_velocity = Vector3::new(
            delta_angle(self.last_angles.x, euler.x),
            delta_angle(self.last_angles.y, euler.y),
            delta_angle(self.last_angles.z, euler.z),
        ) * dt_recip;
        let angular_acceleration = angular_velocity - self.last_angular_velocity;

        self.packet_id = next_packet_id(self.packet_id);

        let sample = TelemetrySample {
            packet_id: self.packet_id,
            vel_x: 0.0,
            vel_y: 0.0,
            vel_z: 0.0,
            acc_x: local_acceleration.x,
            acc_y: local_acceleration.y,
            acc_z: local_acceleration.z,
            pitch: angles.x,
            yaw: angles.y,
            roll: angles.z,
            pitch_vel: angular_velocity.x,
            yaw_vel: angular_velocity.y,
            roll_vel: angular_velocity.z,
            pitch_acc: angular_acceleration.x,
            yaw_acc: angular_acceleration.y,
            roll_acc: angular_acceleration.z,
            slip_angle: self.slip_angle,
        };

        self.last_position = pose.position;
        self.last_pose = *pose;
        self.last_local_velocity = local_velocity;
        self.last_angular_velocity = angular_velocity;
        self.last_angles = angles;

        trace!(packet_id = sample.packet_id, "Sampled pose");
        Some(sample)
    }
}

/// Successor of a packet ID, wrapping from `i32::MAX` to 0.
pub fn next_packet_id(id: i32) -> i32 {
    if id == i32::MAX { 0 } else { id + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{circling_poses, pose};
    use approx::assert_relative_eq;

    #[test]
    fn non_positive_dt_skips_without_state_change() {
        let start = pose([0.0, 0.0, 0.0], 0.0, 0.0, 0.0);
        let mut sampler = PoseSampler::new(&start);
        let moved = pose([1.0, 0.0, 0.0], 5.0, 0.0, 0.0);

        assert!(sampler.update(&moved, 0.0).is_none());
        assert!(sampler.update(&moved, -0.016).is_none());
        assert_eq!(sampler.packet_id(), 0);
        assert_eq!(sampler.last_pose(), &start);
    }

    #[test]
    fn packet_ids_increment_and_wrap_to_zero() {
        let p = Pose::default();
        let mut sampler = PoseSampler::new(&p).with_packet_id(i32::MAX - 1);

        let ids: Vec<i32> = (0..3).map(|_| sampler.update(&p, 0.1).unwrap().packet_id).collect();
        assert_eq!(ids, vec![i32::MAX, 0, 1]);
    }

    #[test]
    fn acceleration_is_per_tick_velocity_delta() {
        let mut sampler = PoseSampler::new(&pose([0.0, 0.0, 0.0], 0.0, 0.0, 0.0));

        // Forward along local +Z at 10 m/s with dt = 0.5
        let first = sampler.update(&pose([0.0, 0.0, 5.0], 0.0, 0.0, 0.0), 0.5).unwrap();
        assert_relative_eq!(first.acc_z, 10.0, epsilon = 1e-4);
        assert_relative_eq!(first.acc_x, 0.0, epsilon = 1e-4);

        // Constant velocity: no change
        let second = sampler.update(&pose([0.0, 0.0, 10.0], 0.0, 0.0, 0.0), 0.5).unwrap();
        assert_relative_eq!(second.acc_z, 0.0, epsilon = 1e-4);

        // Velocity rises to 14 m/s: delta of 4, not 4 / dt
        let third = sampler.update(&pose([0.0, 0.0, 17.0], 0.0, 0.0, 0.0), 0.5).unwrap();
        assert_relative_eq!(third.acc_z, 4.0, epsilon = 1e-4);
        assert_relative_eq!(third.surge(), 4.0, epsilon = 1e-4);
    }

    #[test]
    fn velocity_is_expressed_in_local_frame() {
        // Vehicle yawed 90 degrees drives along world +X, which is its local +Z
        let mut sampler = PoseSampler::new(&pose([0.0, 0.0, 0.0], 0.0, 90.0, 0.0));
        let sample = sampler.update(&pose([2.0, 0.0, 0.0], 0.0, 90.0, 0.0), 1.0).unwrap();

        assert_relative_eq!(sample.acc_z, 2.0, epsilon = 1e-4);
        assert_relative_eq!(sample.acc_x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn pitch_and_roll_fold_but_yaw_does_not() {
        let mut sampler = PoseSampler::new(&Pose::default());
        let sample = sampler.update(&pose([0.0, 0.0, 0.0], -10.0, 300.0, 20.0), 0.1).unwrap();

        assert_relative_eq!(sample.pitch, -10.0, epsilon = 1e-3);
        assert_relative_eq!(sample.roll, 20.0, epsilon = 1e-3);
        assert_relative_eq!(sample.yaw, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn angular_rate_uses_shortest_path_over_dt() {
        let mut sampler = PoseSampler::new(&Pose::default());

        let first = sampler.update(&pose([0.0, 0.0, 0.0], 0.0, 350.0, 0.0), 0.5).unwrap();
        // 0 -> 350 is -10 degrees the short way
        assert_relative_eq!(first.yaw_vel, -20.0, epsilon = 1e-2);
        assert_relative_eq!(first.yaw_acc, -20.0, epsilon = 1e-2);

        let second = sampler.update(&pose([0.0, 0.0, 0.0], 0.0, 10.0, 0.0), 0.5).unwrap();
        // 350 -> 10 is +20 degrees across the wrap
        assert_relative_eq!(second.yaw_vel, 40.0, epsilon = 1e-2);
        assert_relative_eq!(second.yaw_acc, 60.0, epsilon = 1e-2);
    }

    #[test]
    fn folded_pitch_compares_against_raw_euler() {
        let mut sampler = PoseSampler::new(&Pose::default());

        // Nose down 10 degrees: euler 350, folded -10, rate -10 / dt
        let first = sampler.update(&pose([0.0, 0.0, 0.0], -10.0, 0.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(first.pitch_vel, -10.0, epsilon = 1e-2);

        // Holding the attitude yields zero rate even though euler and folded angles differ
        let second = sampler.update(&pose([0.0, 0.0, 0.0], -10.0, 0.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(second.pitch_vel, 0.0, epsilon = 1e-2);
        assert_relative_eq!(second.pitch_acc, 10.0, epsilon = 1e-2);
    }

    #[test]
    fn slip_angle_is_carried_and_linear_velocity_slot_stays_zero() {
        let mut sampler = PoseSampler::new(&Pose::default());
        sampler.set_slip_angle(3.5);

        for p in circling_poses(5) {
            let sample = sampler.update(&p, 1.0 / 60.0).unwrap();
            assert_eq!(sample.slip_angle, 3.5);
            assert_eq!((sample.vel_x, sample.vel_y, sample.vel_z), (0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn nan_pose_propagates() {
        let mut sampler = PoseSampler::new(&Pose::default());
        let bad = Pose { position: Vector3::new(f32::NAN, 0.0, 0.0), ..Pose::default() };
        let sample = sampler.update(&bad, 0.1).unwrap();

        assert!(sample.acc_x.is_nan());
        assert_eq!(sample.packet_id, 1);
    }

    #[test]
    fn reset_keeps_numbering() {
        let mut sampler = PoseSampler::new(&Pose::default());
        sampler.update(&pose([1.0, 0.0, 0.0], 0.0, 0.0, 0.0), 0.1).unwrap();

        sampler.reset(&pose([100.0, 0.0, 0.0], 0.0, 0.0, 0.0));
        let sample = sampler.update(&pose([100.0, 0.0, 0.0], 0.0, 0.0, 0.0), 0.1).unwrap();

        assert_eq!(sample.packet_id, 2);
        assert_relative_eq!(sample.acc_x, 0.0, epsilon = 1e-4);
    }
}
