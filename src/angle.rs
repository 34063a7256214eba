//! Angle folding and shortest-path deltas, all in degrees

/// Fold a pitch or roll angle into `[-90, 90]`.
///
/// Angles above 180 are first reflected into `(-180, 0]`; anything whose
/// magnitude still exceeds 90 is then mirrored about ±90, so a vehicle lying
/// on its roof reads close to level instead of close to ±180. This is not a
/// modulo normalization: 200 folds to -20, not -160.
///
/// Yaw must not go through this function.
///
/// ```rust
/// use motionlink::angle::wrap_angle;
///
/// assert_eq!(wrap_angle(135.0), 45.0);
/// assert_eq!(wrap_angle(200.0), -20.0);
/// ```
pub fn wrap_angle(angle: f32) -> f32 {
    let angle = if angle > 180.0 { -180.0 + (angle - 180.0) } else { angle };

    let magnitude = angle.abs();
    if magnitude <= 90.0 {
        return angle;
    }

    let direction = angle / magnitude;
    180.0 * direction - angle
}

/// Signed shortest rotation from `current` to `target`, in `(-180, 180]`.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn fold_reference_values() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(45.0), 45.0);
        assert_eq!(wrap_angle(90.0), 90.0);
        assert_eq!(wrap_angle(135.0), 45.0);
        assert_eq!(wrap_angle(-135.0), -45.0);
        assert_eq!(wrap_angle(180.0), 0.0);
        assert_eq!(wrap_angle(200.0), -20.0);
        assert_eq!(wrap_angle(350.0), -10.0);
    }

    #[test]
    fn fold_differs_from_modulo_normalization() {
        // Modulo would give -160 here
        let modulo = ((200.0f32 + 180.0).rem_euclid(360.0)) - 180.0;
        assert_eq!(modulo, -160.0);
        assert_eq!(wrap_angle(200.0), -20.0);
    }

    #[test]
    fn fold_passes_nan_through() {
        assert!(wrap_angle(f32::NAN).is_nan());
    }

    #[test]
    fn delta_takes_shortest_path() {
        assert_relative_eq!(delta_angle(350.0, 10.0), 20.0, epsilon = 1e-4);
        assert_relative_eq!(delta_angle(10.0, 350.0), -20.0, epsilon = 1e-4);
        assert_relative_eq!(delta_angle(-10.0, 350.0), 0.0, epsilon = 1e-4);
        assert_eq!(delta_angle(0.0, 180.0), 180.0);
        assert_eq!(delta_angle(0.0, -180.0), 180.0);
    }

    proptest! {
        #[test]
        fn fold_of_euler_range_stays_within_quarter_turn(angle in 0.0f32..360.0) {
            let folded = wrap_angle(angle);
            prop_assert!((-90.0..=90.0).contains(&folded), "{} folded to {}", angle, folded);
        }

        #[test]
        fn delta_stays_within_half_turn(current in -720.0f32..720.0, target in -720.0f32..720.0) {
            let delta = delta_angle(current, target);
            prop_assert!(delta > -180.0 - 1e-3 && delta <= 180.0 + 1e-3);
        }
    }
}
