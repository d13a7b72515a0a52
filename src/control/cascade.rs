// src/control/cascade.rs

//! # Cascade PID Controller
//!
//! Outer position loop, inner attitude loop and a fixed motor mixer.
//!
//! ## Overview
//!
//! 1. The position loop turns the position error into force demands
//!    `(ux, uy, uz)`. The vertical demand is clipped into the rotor range.
//! 2. The horizontal demands are rotated by the current heading into roll
//!    and pitch targets, each clipped to the tilt limit.
//! 3. The attitude loop turns the attitude error into the torque channels
//!    `(wx, wy, wz)`. The yaw channel error is the wrapped heading error
//!    scaled by [`YAW_ERROR_GAIN`] minus the yaw rate, and its output is
//!    clipped to the yaw limit.
//! 4. The mixer maps `(uz, wx, wy, wz)` onto the four rotors and every
//!    command is clipped into the rotor range.
//!
//! Both loops multiply their derivative gain by the measured rate, so
//! damping gains are negative. Integrals accumulate every tick and are
//! never reset; set `integral_limit` to bound them.

use crate::config::{ControlConfig, ControlLimits};
use crate::control::{FlightController, TargetWaypoint};
use crate::math::wrap;
use crate::pid::{Number, PidTriple};
use crate::quad::{FlightState, ROTOR_COUNT};
use nalgebra::{Matrix4, Vector4};

/// Feed-forward gain on the wrapped heading error.
pub const YAW_ERROR_GAIN: f64 = 0.18;

/// Maps `(uz, wx, wy, wz)` onto the four rotor commands.
#[rustfmt::skip]
const MIXER: [[f64; 4]; ROTOR_COUNT] = [
    [1.0,  1.0,  0.0,  1.0],
    [1.0,  0.0,  1.0, -1.0],
    [1.0, -1.0,  0.0,  1.0],
    [1.0,  0.0, -1.0, -1.0],
];

/// Struct representing the cascaded position/attitude controller.
pub struct CascadePid {
    position: PidTriple<f64>,
    attitude: PidTriple<f64>,
    limits: ControlLimits,
    mixer: Matrix4<f64>,
}

impl CascadePid {
    /// Creates a new controller using the provided configuration.
    pub fn with_config(config: &ControlConfig) -> Self {
        CascadePid {
            position: PidTriple::with_gains(config.position.gains()),
            attitude: PidTriple::with_gains(config.attitude.gains()),
            limits: config.limits,
            mixer: Matrix4::from_fn(|r, c| MIXER[r][c]),
        }
    }

    /// Creates a new controller with neutral gains and the reference limits.
    pub fn new() -> Self {
        Self::with_config(&ControlConfig::new())
    }

    /// Accumulated position error per axis.
    pub fn position_integral(&self) -> [f64; 3] {
        self.position.integral()
    }

    /// Accumulated attitude error per axis.
    pub fn attitude_integral(&self) -> [f64; 3] {
        self.attitude.integral()
    }

    /// Roll and pitch targets for the horizontal demand `(ux, uy)` at heading `yaw`.
    fn tilt_targets(&self, ux: f64, uy: f64, yaw: f64) -> (f64, f64) {
        let (sin, cos) = yaw.sin_cos();
        let tilt = self.limits.tilt;
        let ax = ux * sin - uy * cos;
        let ay = ux * cos + uy * sin;
        (Number::clamp(ax, -tilt, tilt), Number::clamp(ay, -tilt, tilt))
    }
}

impl Default for CascadePid {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightController for CascadePid {
    fn update(&mut self, state: &FlightState, target: &TargetWaypoint) -> [f64; ROTOR_COUNT] {
        let [rotor_min, rotor_max] = self.limits.rotor;

        // Position loop
        let [ux, uy, uz] = self.position.update(
            target.position.into(),
            state.position.into(),
            state.velocity.into(),
        );
        let uz = Number::clamp(uz, rotor_min, rotor_max);

        // Heading frame
        let yaw = state.yaw();
        let (ax, ay) = self.tilt_targets(ux, uy, yaw);

        // Attitude loop, the yaw axis tracks a rate built from the heading error
        let yaw_demand = YAW_ERROR_GAIN * wrap(target.yaw - yaw);
        let [wx, wy, wz] = self.attitude.update(
            [ax, ay, yaw_demand],
            [state.roll(), state.pitch(), state.angular_rate.z],
            state.angular_rate.into(),
        );
        let wz = Number::clamp(wz, -self.limits.yaw_rate, self.limits.yaw_rate);

        let command = self.mixer * Vector4::new(uz, wx, wy, wz);
        let mut speeds = [0.0; ROTOR_COUNT];
        for (speed, value) in speeds.iter_mut().zip(command.iter()) {
            *speed = Number::clamp(*value, rotor_min, rotor_max);
        }
        speeds
    }
}
