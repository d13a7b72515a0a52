// src/quad/motors.rs

//! # Rotor Bank
//!
//! Converts commanded rotor speeds into per-rotor thrust with an empirical
//! propeller model:
//!
//! ```text
//! thrust = c · rpm²,   c = 1.857e-11 · diameter² · √pitch
//! ```
//!
//! Rotor speeds are commanded in rad/s. The empirical constant expects
//! revolutions per minute, so every speed goes through
//! [`RAD_PER_SEC_TO_RPM`] before squaring.

use crate::error::SimError;
use std::f64::consts::PI;

/// Number of rotors on the vehicle.
pub const ROTOR_COUNT: usize = 4;

/// Empirical propeller thrust coefficient.
pub const THRUST_COEFFICIENT: f64 = 1.857e-11;

/// Converts a rotor speed in rad/s into revolutions per minute.
pub const RAD_PER_SEC_TO_RPM: f64 = 60.0 / (2.0 * PI);

/// Rotor geometry used to derive the thrust constant.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct MotorConfig {
    /// Propeller diameter.
    pub diameter: f64,
    /// Propeller pitch.
    pub pitch: f64,
}

/// Speeds and thrusts of the four rotors.
///
/// Speeds and thrusts are always replaced together, so a reader never sees
/// a thrust that belongs to a different speed command.
#[derive(Debug, Clone, PartialEq)]
pub struct Motors {
    speeds: [f64; ROTOR_COUNT],
    thrust: [f64; ROTOR_COUNT],
    constant: f64,
}

impl Motors {
    /// Creates a stopped rotor bank for the given propeller geometry.
    pub fn new(config: &MotorConfig) -> Self {
        Motors {
            speeds: [0.0; ROTOR_COUNT],
            thrust: [0.0; ROTOR_COUNT],
            constant: THRUST_COEFFICIENT * config.diameter.powi(2) * config.pitch.sqrt(),
        }
    }

    /// Replaces all rotor speeds (rad/s) and recomputes their thrust.
    ///
    /// Fails with `InvalidInput` when `speeds` does not hold exactly four
    /// values or any value is negative or not a number. On failure the
    /// previous speeds and thrust are kept.
    pub fn set_speeds(&mut self, speeds: &[f64]) -> Result<(), SimError> {
        let speeds: [f64; ROTOR_COUNT] = speeds.try_into().map_err(|_| {
            SimError::InvalidInput(format!(
                "expected {ROTOR_COUNT} rotor speeds, got {}",
                speeds.len()
            ))
        })?;
        if let Some(bad) = speeds.iter().find(|s| !(**s >= 0.0)) {
            return Err(SimError::InvalidInput(format!(
                "rotor speeds must be non-negative, got {bad}"
            )));
        }

        self.thrust = speeds.map(|speed| self.thrust_at(speed));
        self.speeds = speeds;
        Ok(())
    }

    /// Thrust produced by one rotor spinning at `speed` rad/s.
    pub fn thrust_at(&self, speed: f64) -> f64 {
        let rpm = speed * RAD_PER_SEC_TO_RPM;
        self.constant * rpm * rpm
    }

    /// Current rotor speeds (rad/s).
    pub fn speeds(&self) -> [f64; ROTOR_COUNT] {
        self.speeds
    }

    /// Current rotor thrusts.
    pub fn thrust(&self) -> [f64; ROTOR_COUNT] {
        self.thrust
    }

    /// Precomputed thrust constant `c`.
    pub fn constant(&self) -> f64 {
        self.constant
    }
}
