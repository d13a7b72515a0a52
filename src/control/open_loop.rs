// src/control/open_loop.rs

//! Constant rotor command, used to exercise the engine without feedback.

use crate::control::{FlightController, TargetWaypoint};
use crate::quad::{FlightState, ROTOR_COUNT};

/// Controller that ignores the state and always commands the same speeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenLoop {
    command: [f64; ROTOR_COUNT],
}

impl OpenLoop {
    /// Creates a controller that always outputs `command` (rad/s).
    pub fn new(command: [f64; ROTOR_COUNT]) -> Self {
        OpenLoop { command }
    }

    /// Creates a controller commanding the same speed on every rotor.
    pub fn uniform(speed: f64) -> Self {
        Self::new([speed; ROTOR_COUNT])
    }
}

impl FlightController for OpenLoop {
    fn update(&mut self, _state: &FlightState, _target: &TargetWaypoint) -> [f64; ROTOR_COUNT] {
        self.command
    }
}
