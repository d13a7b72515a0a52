// src/quad/state.rs

//! Twelve-component flight state.

use nalgebra::Vector3;

/// Position, velocity, attitude and angular rate of the vehicle at an instant.
///
/// Snapshots of this type are what the engine hands out; they are plain
/// copies and never alias the engine's own state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlightState {
    /// Position in the inertial frame (m). `z` is never negative.
    pub position: Vector3<f64>,
    /// Linear velocity in the inertial frame (m/s).
    pub velocity: Vector3<f64>,
    /// Roll, pitch and yaw (rad), each wrapped into `[-π, π)`.
    pub attitude: Vector3<f64>,
    /// Angular rate in the body frame (rad/s).
    pub angular_rate: Vector3<f64>,
}

impl FlightState {
    /// Creates a state at rest with the given position and attitude.
    pub fn at_rest(position: Vector3<f64>, attitude: Vector3<f64>) -> Self {
        FlightState {
            position,
            attitude,
            ..Default::default()
        }
    }

    /// Flattens the state as `[p, v, o, w]`.
    pub fn to_array(&self) -> [f64; 12] {
        let mut array = [0.0; 12];
        array[0..3].copy_from_slice(self.position.as_slice());
        array[3..6].copy_from_slice(self.velocity.as_slice());
        array[6..9].copy_from_slice(self.attitude.as_slice());
        array[9..12].copy_from_slice(self.angular_rate.as_slice());
        array
    }

    /// Rebuilds a state from the `[p, v, o, w]` layout.
    pub fn from_array(array: &[f64; 12]) -> Self {
        FlightState {
            position: Vector3::new(array[0], array[1], array[2]),
            velocity: Vector3::new(array[3], array[4], array[5]),
            attitude: Vector3::new(array[6], array[7], array[8]),
            angular_rate: Vector3::new(array[9], array[10], array[11]),
        }
    }

    /// Current roll angle.
    pub fn roll(&self) -> f64 {
        self.attitude.x
    }

    /// Current pitch angle.
    pub fn pitch(&self) -> f64 {
        self.attitude.y
    }

    /// Current yaw angle.
    pub fn yaw(&self) -> f64 {
        self.attitude.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the flattened layout order.
    #[test]
    fn test_state_layout() {
        let state = FlightState {
            position: Vector3::new(1.0, 2.0, 3.0),
            velocity: Vector3::new(4.0, 5.0, 6.0),
            attitude: Vector3::new(0.1, 0.2, 0.3),
            angular_rate: Vector3::new(7.0, 8.0, 9.0),
        };
        let array = state.to_array();

        assert_eq!([1.0, 2.0, 3.0], array[0..3]);
        assert_eq!([0.1, 0.2, 0.3], array[6..9]);
        assert_eq!(state, FlightState::from_array(&array));
        assert_eq!(0.3, state.yaw());
    }
}
