// src/control/law.rs

//! Shared interface of the flight controllers and the closed set of
//! controllers the runtime can drive.

use crate::control::{CascadePid, OpenLoop};
use crate::error::SimError;
use crate::math::wrap;
use crate::quad::{FlightState, ROTOR_COUNT};
use nalgebra::Vector3;

/// Desired position and heading of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetWaypoint {
    /// Target position in the inertial frame (m).
    pub position: Vector3<f64>,
    /// Target heading, wrapped into `[-π, π)` (rad).
    pub yaw: f64,
}

impl TargetWaypoint {
    /// Creates a target, wrapping the yaw.
    pub fn new(position: Vector3<f64>, yaw: f64) -> Self {
        TargetWaypoint {
            position,
            yaw: wrap(yaw),
        }
    }

    /// Creates a target from `[x, y, z, yaw]`.
    ///
    /// Fails with `InvalidInput` unless exactly four finite values are given.
    pub fn from_slice(values: &[f64]) -> Result<Self, SimError> {
        let [x, y, z, yaw]: [f64; 4] = values.try_into().map_err(|_| {
            SimError::InvalidInput(format!("expected [x, y, z, yaw], got {} values", values.len()))
        })?;
        if !values.iter().all(|v| v.is_finite()) {
            return Err(SimError::InvalidInput(format!(
                "target values must be finite, got {values:?}"
            )));
        }
        Ok(Self::new(Vector3::new(x, y, z), yaw))
    }

    /// Target that holds the given state's position and heading.
    pub fn hold(state: &FlightState) -> Self {
        Self::new(state.position, state.yaw())
    }
}

/// A trait for controllers that turn the vehicle state and a target into
/// rotor speed commands.
pub trait FlightController {
    /// Runs one control tick.
    ///
    /// - `state`: snapshot of the vehicle.
    /// - `target`: desired position and heading.
    ///
    /// Returns the four rotor speed commands (rad/s).
    fn update(&mut self, state: &FlightState, target: &TargetWaypoint) -> [f64; ROTOR_COUNT];
}

/// The controllers the runtime knows how to drive.
pub enum ControlLaw {
    /// Cascaded position and attitude PID loops.
    Cascade(CascadePid),
    /// Fixed rotor command without feedback.
    OpenLoop(OpenLoop),
}

impl FlightController for ControlLaw {
    fn update(&mut self, state: &FlightState, target: &TargetWaypoint) -> [f64; ROTOR_COUNT] {
        match self {
            ControlLaw::Cascade(law) => law.update(state, target),
            ControlLaw::OpenLoop(law) => law.update(state, target),
        }
    }
}

impl From<CascadePid> for ControlLaw {
    fn from(law: CascadePid) -> Self {
        ControlLaw::Cascade(law)
    }
}

impl From<OpenLoop> for ControlLaw {
    fn from(law: OpenLoop) -> Self {
        ControlLaw::OpenLoop(law)
    }
}
