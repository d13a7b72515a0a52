// src/math.rs

//! # Angle Utilities
//!
//! Stateless helpers used by the dynamics model and the controller. All
//! angles are radians.

use nalgebra::{Matrix3, Vector3};
use num_traits::{Float, FloatConst};

/// Wraps an angle into the half-open range `[-π, π)`.
///
/// Uses a true mathematical modulo, so negative inputs wrap the same way
/// positive ones do: `wrap(x + 2πk) == wrap(x)` for any integer `k`.
///
/// ```
/// use free_flight_simulation::math::wrap;
/// use std::f64::consts::PI;
///
/// assert_eq!(wrap(PI), -PI);
/// assert_eq!(wrap(-2.0 * PI), 0.0);
/// ```
pub fn wrap<T: Float + FloatConst>(angle: T) -> T {
    let pi = T::PI();
    let two_pi = pi + pi;
    let mut shifted = (angle + pi) % two_pi;
    if shifted < T::zero() {
        shifted = shifted + two_pi;
    }
    let wrapped = shifted - pi;
    // rounding in the modulo can land exactly on the open bound
    if wrapped >= pi {
        -pi
    } else {
        wrapped
    }
}

/// Wraps each component of a (roll, pitch, yaw) vector into `[-π, π)`.
pub fn wrap_angles(angles: &Vector3<f64>) -> Vector3<f64> {
    angles.map(wrap::<f64>)
}

/// Builds the body to inertial rotation matrix `R_yaw · R_pitch · R_roll`.
///
/// Roll rotates about the body X axis, pitch about Y and yaw about Z.
/// Inputs are radians.
pub fn rotation_matrix(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();

    #[rustfmt::skip]
    let r_roll = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0,  cr, -sr,
        0.0,  sr,  cr,
    );
    #[rustfmt::skip]
    let r_pitch = Matrix3::new(
         cp, 0.0,  sp,
        0.0, 1.0, 0.0,
        -sp, 0.0,  cp,
    );
    #[rustfmt::skip]
    let r_yaw = Matrix3::new(
         cy, -sy, 0.0,
         sy,  cy, 0.0,
        0.0, 0.0, 1.0,
    );

    r_yaw * r_pitch * r_roll
}
