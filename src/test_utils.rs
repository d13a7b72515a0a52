// src/test_utils.rs

//! This module contains utilities for testing.

use nalgebra::Vector3;

/// A constant defining the tolerance within which floating-point values
/// are considered close enough to be equal.
pub const TEST_TOLERANCE: f64 = 1e-6;

/// Checks if two floating point numbers are close enough to be considered
/// equal.
///
/// # Arguments
/// * `target` - The target value.
/// * `value` - The value to compare against the target.
///
/// # Returns
/// `true` if the absolute difference between `target` and `value` is less than
/// `TEST_TOLERANCE`, otherwise `false`.
pub fn value_close(target: f64, value: f64) -> bool {
    (target - value).abs() < TEST_TOLERANCE
}

/// Checks if two floating point numbers are within an explicit tolerance.
pub fn value_within(target: f64, value: f64, tolerance: f64) -> bool {
    (target - value).abs() < tolerance
}

/// Checks if each of the components in a vector is close enough to
/// be considered equal.
///
/// # Arguments
/// * `target` - The target vector.
/// * `value` - The vector to compare against the target.
///
/// # Returns
/// `true` if each component of `target` and `value` is close as per `value_close`,
/// otherwise `false`.
pub fn vector_close(target: Vector3<f64>, value: Vector3<f64>) -> bool {
    value_close(target.x, value.x) && value_close(target.y, value.y) && value_close(target.z, value.z)
}

/// Path of the simulation file shipped with the crate.
pub const SHIPPED_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/quadcopter.yaml");

/// The 1.2 kg vehicle of the shipped simulation file, at rest at `position`.
pub fn reference_vehicle(position: [f64; 3]) -> crate::config::VehicleConfig {
    crate::config::VehicleConfig {
        weight: 1.2,
        length: 0.3,
        radius: 0.1,
        initial_states: crate::config::InitialStates {
            position,
            attitude: [0.0; 3],
        },
        motors: crate::quad::MotorConfig {
            diameter: 10.0,
            pitch: 4.5,
        },
        lift_const: 0.0245,
    }
}

/// Runs `law` against `quad` on the calling thread for `ticks` steps of
/// `dt`, one control update per physics step.
pub fn fly_headless(
    law: &mut impl crate::control::FlightController,
    quad: &crate::quad::Quadcopter,
    target: &crate::control::TargetWaypoint,
    dt: f64,
    ticks: usize,
) {
    for _ in 0..ticks {
        let command = law.update(&quad.state(), target);
        quad.set_motor_speeds(&command).unwrap();
        quad.step(dt).unwrap();
    }
}
