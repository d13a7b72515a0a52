// src/config.rs

//! # Configuration
//!
//! Typed, validated configuration loaded from YAML documents. A loader
//! either returns a complete configuration or a [`ConfigError`]; partially
//! filled configurations never escape.
//!
//! A complete simulation file looks like this:
//!
//! ```yaml
//! vehicle:
//!   weight: 1.2
//!   length: 0.3
//!   radius: 0.1
//!   initial_states:
//!     position: [0.0, 0.0, 0.0]
//!     attitude: [0.0, 0.0, 0.0]   # radians
//!   motors:
//!     diameter: 10.0
//!     pitch: 4.5
//!   lift_const: 0.0245
//! control:
//!   position: { kp: [0.3, 0.3, 1500], ki: [0, 0, 2], kd: [-0.45, -0.45, -1500] }
//!   attitude: { kp: [8000, 8000, 1500], ki: [0, 0, 0], kd: [-3000, -3000, 0] }
//!   limits: { tilt: 0.1745, yaw_rate: 900, rotor: [0, 9000] }
//! simulation:
//!   physics_dt: 0.05
//!   control_dt: 0.005
//!   scale: 1.0
//! waypoints:
//!   - [1, 1, 2, 0]
//!   - [-1, -1, 2, 0]
//! ```

use crate::error::ConfigError;
use crate::pid::PidGains;
use crate::quad::{MotorConfig, DEFAULT_TOLERANCE};
use crate::waypoint::DEFAULT_THRESHOLD;
use serde::Deserialize;
use std::path::Path;

/// Initial position and attitude of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct InitialStates {
    /// Initial position in the inertial frame (m).
    pub position: [f64; 3],
    /// Initial roll, pitch and yaw (rad).
    pub attitude: [f64; 3],
}

/// Physical description of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct VehicleConfig {
    /// Vehicle mass (kg).
    pub weight: f64,
    /// Arm length from the centre to each rotor (m).
    pub length: f64,
    /// Radius of the central body (m).
    pub radius: f64,
    /// Initial position and attitude.
    pub initial_states: InitialStates,
    /// Rotor geometry.
    pub motors: MotorConfig,
    /// Yaw reaction drag coefficient used in torque allocation.
    pub lift_const: f64,
}

impl VehicleConfig {
    /// Parses and validates a standalone vehicle document.
    pub fn from_yaml(document: &str) -> Result<Self, ConfigError> {
        let config: VehicleConfig = serde_yaml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value describes a physical vehicle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("weight", self.weight)?;
        positive("length", self.length)?;
        non_negative("radius", self.radius)?;
        positive("motors.diameter", self.motors.diameter)?;
        non_negative("motors.pitch", self.motors.pitch)?;
        finite("lift_const", self.lift_const)?;
        for value in self.initial_states.position.iter().chain(&self.initial_states.attitude) {
            finite("initial_states", *value)?;
        }
        if self.initial_states.position[2] < 0.0 {
            return Err(ConfigError::Invalid(
                "initial_states.position must not start below the floor".to_string(),
            ));
        }
        Ok(())
    }
}

/// Gains of one three-axis PID loop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PidLoopConfig {
    /// Proportional gains.
    pub kp: [f64; 3],
    /// Integral gains.
    pub ki: [f64; 3],
    /// Derivative gains, applied to the measured rate. Damping needs negative values.
    pub kd: [f64; 3],
    /// Optional bound on the accumulated error of each axis.
    #[serde(default)]
    pub integral_limit: Option<f64>,
}

impl PidLoopConfig {
    /// Neutral gains: unit proportional, no integral or derivative action.
    pub fn new() -> Self {
        PidLoopConfig {
            kp: [1.0; 3],
            ki: [0.0; 3],
            kd: [0.0; 3],
            integral_limit: None,
        }
    }

    /// Gains in the form the PID loop consumes.
    pub fn gains(&self) -> PidGains<f64> {
        PidGains {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            integral_limit: self.integral_limit,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        for value in self.kp.iter().chain(&self.ki).chain(&self.kd) {
            finite(name, *value)?;
        }
        if let Some(limit) = self.integral_limit {
            non_negative(name, limit)?;
        }
        Ok(())
    }
}

impl Default for PidLoopConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Output bounds of the cascade controller.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ControlLimits {
    /// Largest commanded tilt angle, applied symmetrically (rad).
    pub tilt: f64,
    /// Largest yaw channel command, applied symmetrically.
    pub yaw_rate: f64,
    /// Rotor command range `[min, max]` (rad/s).
    pub rotor: [f64; 2],
}

impl Default for ControlLimits {
    fn default() -> Self {
        ControlLimits {
            tilt: 10.0_f64.to_radians(),
            yaw_rate: 900.0,
            rotor: [4000.0, 9000.0],
        }
    }
}

/// Gains and bounds of the cascade controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ControlConfig {
    /// Position loop gains.
    pub position: PidLoopConfig,
    /// Attitude loop gains.
    pub attitude: PidLoopConfig,
    /// Output bounds.
    #[serde(default)]
    pub limits: ControlLimits,
}

impl ControlConfig {
    /// Creates a configuration with neutral gains and the reference limits.
    /// These should be replaced with values tuned for the vehicle.
    ///
    /// ```
    /// use free_flight_simulation::config::ControlConfig;
    ///
    /// let mut config = ControlConfig::new();
    /// config.position.kp = [0.3, 0.3, 1500.0];
    /// config.position.kd = [-0.45, -0.45, -1500.0];
    /// config.attitude.integral_limit = Some(25.0);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks gains and bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.position.validate("control.position")?;
        self.attitude.validate("control.attitude")?;
        non_negative("control.limits.tilt", self.limits.tilt)?;
        non_negative("control.limits.yaw_rate", self.limits.yaw_rate)?;
        let [low, high] = self.limits.rotor;
        non_negative("control.limits.rotor", low)?;
        finite("control.limits.rotor", high)?;
        if low > high {
            return Err(ConfigError::Invalid(format!(
                "control.limits.rotor is inverted: [{low}, {high}]"
            )));
        }
        Ok(())
    }
}

/// Loop timing of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Physics step (s).
    pub physics_dt: f64,
    /// Controller step (s).
    pub control_dt: f64,
    /// Wall-clock stretch factor; 1.0 runs in real time.
    #[serde(default = "unit_scale")]
    pub scale: f64,
    /// Relative tolerance of the adaptive solver.
    #[serde(default = "default_tolerance")]
    pub solver_tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            physics_dt: 5e-2,
            control_dt: 5e-3,
            scale: unit_scale(),
            solver_tolerance: default_tolerance(),
        }
    }
}

/// A complete simulation file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// The vehicle.
    pub vehicle: VehicleConfig,
    /// The controller.
    #[serde(default)]
    pub control: ControlConfig,
    /// Loop timing.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Waypoints as `[x, y, z, yaw]`.
    #[serde(default)]
    pub waypoints: Vec<[f64; 4]>,
    /// Distance at which a waypoint counts as reached (m).
    #[serde(default = "default_threshold")]
    pub waypoint_threshold: f64,
}

impl Config {
    /// Parses and validates a complete simulation document.
    pub fn from_yaml(document: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vehicle.validate()?;
        self.control.validate()?;
        positive("simulation.physics_dt", self.simulation.physics_dt)?;
        positive("simulation.control_dt", self.simulation.control_dt)?;
        positive("simulation.scale", self.simulation.scale)?;
        positive("simulation.solver_tolerance", self.simulation.solver_tolerance)?;
        positive("waypoint_threshold", self.waypoint_threshold)?;
        for waypoint in &self.waypoints {
            for value in waypoint {
                finite("waypoints", *value)?;
            }
        }
        Ok(())
    }
}

/// Reads and validates a simulation file.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let document = std::fs::read_to_string(path)?;
    Config::from_yaml(&document)
}

fn unit_scale() -> f64 {
    1.0
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must be finite, got {value}")))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must be positive, got {value}")))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must not be negative, got {value}")))
    }
}
