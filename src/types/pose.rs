//! World-space pose supplied by the host each tick

use nalgebra::{UnitQuaternion, Vector3};

/// World-space position and orientation of the tracked vehicle.
///
/// Axes follow a Y-up convention: X right, Y up, Z forward. Euler angles are
/// decomposed as yaw about Y, then pitch about X, then roll about Z
/// (`R = Ry * Rx * Rz`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self { position, orientation }
    }

    /// Build a pose from Euler angles in degrees.
    pub fn from_euler_degrees(position: Vector3<f32>, pitch: f32, yaw: f32, roll: f32) -> Self {
        let orientation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw.to_radians())
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch.to_radians())
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll.to_radians());
        Self { position, orientation }
    }

    /// Euler angles `(pitch, yaw, roll)` in degrees, each in `[0, 360)`.
    pub fn euler_degrees(&self) -> Vector3<f32> {
        let rotation = self.orientation.to_rotation_matrix();
        let m = rotation.matrix();

        let sin_pitch = (-m[(1, 2)]).clamp(-1.0, 1.0);
        let pitch = sin_pitch.asin();

        // Gimbal lock: roll and yaw share an axis, attribute everything to yaw
        let (yaw, roll) = if sin_pitch.abs() > 0.999_999 {
            ((-m[(2, 0)]).atan2(m[(0, 0)]), 0.0)
        } else {
            (m[(0, 2)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(1, 1)]))
        };

        Vector3::new(positive_degrees(pitch), positive_degrees(yaw), positive_degrees(roll))
    }

    /// Express a world-space direction in the pose's local frame.
    pub fn inverse_transform_direction(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        self.orientation.inverse_transform_vector(direction)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self { position: Vector3::zeros(), orientation: UnitQuaternion::identity() }
    }
}

fn positive_degrees(radians: f32) -> f32 {
    let degrees = radians.to_degrees().rem_euclid(360.0);
    if degrees >= 360.0 { degrees - 360.0 } else { degrees }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_pose_has_zero_angles() {
        let angles = Pose::default().euler_degrees();
        assert_relative_eq!(angles, Vector3::zeros(), epsilon = 1e-4);
    }

    #[test]
    fn euler_angles_round_trip_within_range() {
        let pose = Pose::from_euler_degrees(Vector3::zeros(), 20.0, 130.0, 45.0);
        let angles = pose.euler_degrees();
        assert_relative_eq!(angles.x, 20.0, epsilon = 1e-3);
        assert_relative_eq!(angles.y, 130.0, epsilon = 1e-3);
        assert_relative_eq!(angles.z, 45.0, epsilon = 1e-3);
    }

    #[test]
    fn negative_angles_are_reported_in_positive_range() {
        let pose = Pose::from_euler_degrees(Vector3::zeros(), -10.0, -30.0, -5.0);
        let angles = pose.euler_degrees();
        assert_relative_eq!(angles.x, 350.0, epsilon = 1e-3);
        assert_relative_eq!(angles.y, 330.0, epsilon = 1e-3);
        assert_relative_eq!(angles.z, 355.0, epsilon = 1e-3);
    }

    #[test]
    fn inverse_transform_rotates_into_local_frame() {
        // Yawed 90 degrees: the vehicle's forward axis points along world +X
        let pose = Pose::from_euler_degrees(Vector3::zeros(), 0.0, 90.0, 0.0);
        let local = pose.inverse_transform_direction(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(local, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }
}
