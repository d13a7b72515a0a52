// src/quad/dynamics.rs

//! # Rigid-Body Dynamics
//!
//! Equations of motion of the quadrotor and their integration over one
//! physics step.
//!
//! ```text
//! dp/dt = v
//! dv/dt = R(o) · [0, 0, F] / m + [0, 0, -g]
//! do/dt = w
//! dw/dt = J⁻¹ · (τ - w × (J · w))
//! ```
//!
//! with `[F, τx, τy, τz] = A · thrust` for the rotor allocation matrix `A`.
//! Each step is integrated by an adaptive-step solver; afterwards the
//! vehicle is held above the floor and its attitude is wrapped.

use crate::config::VehicleConfig;
use crate::error::SimError;
use crate::math::{rotation_matrix, wrap_angles};
use crate::quad::{FlightState, ROTOR_COUNT};
use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Default relative tolerance handed to the adaptive solver.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Mass properties and thrust allocation of the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    mass: f64,
    inertia: Matrix3<f64>,
    inertia_inv: Matrix3<f64>,
    allocation: Matrix4<f64>,
}

impl RigidBody {
    /// Derives the inertia tensor and allocation matrix from the vehicle.
    ///
    /// The body is a solid sphere of radius `r` with point-mass rotors at
    /// arm length `L`:
    /// `Ix = Iy = 2mr²/5 + 2mL²`, `Iz = 2mr²/5 + 4mL²`.
    pub fn new(config: &VehicleConfig) -> Self {
        let m = config.weight;
        let l = config.length;
        let c = config.lift_const;
        let sphere = 2.0 * m * config.radius.powi(2) / 5.0;
        let ix = sphere + 2.0 * m * l.powi(2);
        let iz = sphere + 4.0 * m * l.powi(2);

        #[rustfmt::skip]
        let allocation = Matrix4::new(
            1.0, 1.0, 1.0, 1.0,
              l, 0.0,  -l, 0.0,
            0.0,   l,  -l, 0.0,
              c,  -c,   c,  -c,
        );

        RigidBody {
            mass: m,
            inertia: Matrix3::from_diagonal(&Vector3::new(ix, ix, iz)),
            // diagonal, so the inverse is element-wise
            inertia_inv: Matrix3::from_diagonal(&Vector3::new(1.0 / ix, 1.0 / ix, 1.0 / iz)),
            allocation,
        }
    }

    /// Vehicle mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Inertia tensor `J`.
    pub fn inertia(&self) -> &Matrix3<f64> {
        &self.inertia
    }

    /// Inverse inertia tensor `J⁻¹`.
    pub fn inertia_inv(&self) -> &Matrix3<f64> {
        &self.inertia_inv
    }

    /// Net lift and body torques `[F, τx, τy, τz]` for the given rotor thrusts.
    pub fn wrench(&self, thrust: &[f64; ROTOR_COUNT]) -> Vector4<f64> {
        self.allocation * Vector4::from_column_slice(thrust)
    }

    /// Time derivative of the flattened state under constant rotor thrust.
    pub fn derivative(&self, state: &[f64; 12], thrust: &[f64; ROTOR_COUNT]) -> [f64; 12] {
        let state = FlightState::from_array(state);
        let wrench = self.wrench(thrust);
        let torque = Vector3::new(wrench[1], wrench[2], wrench[3]);
        let w = state.angular_rate;

        let rotation = rotation_matrix(state.roll(), state.pitch(), state.yaw());
        let acceleration = rotation * Vector3::new(0.0, 0.0, wrench[0]) / self.mass
            + Vector3::new(0.0, 0.0, -GRAVITY);
        let angular_acceleration = self.inertia_inv * (torque - w.cross(&(self.inertia * w)));

        FlightState {
            position: state.velocity,
            velocity: acceleration,
            attitude: w,
            angular_rate: angular_acceleration,
        }
        .to_array()
    }

    /// Advances `state` by `dt` with the rotor thrust held constant.
    ///
    /// After integration the vehicle is kept on or above the floor: a
    /// negative altitude is clamped to zero and any downward velocity is
    /// removed with it. Attitude angles are wrapped into `[-π, π)`.
    pub fn integrate(
        &self,
        state: &FlightState,
        thrust: &[f64; ROTOR_COUNT],
        dt: f64,
        tolerance: f64,
    ) -> Result<FlightState, SimError> {
        let ode = FlightOde {
            body: self,
            thrust: *thrust,
        };

        let result = fast_ode::solve_ivp(
            &ode,
            (0.0, dt),
            fast_ode::Coord(state.to_array()),
            |_, _| true,
            tolerance,
            tolerance * 10.0,
        );

        let mut next = match result {
            fast_ode::IvpResult::FinalTimeReached(coord) => FlightState::from_array(&coord.0),
            _ => {
                return Err(SimError::IntegrationFailed(format!(
                    "solver stopped before t = {dt}"
                )))
            }
        };

        if next.position.z <= 0.0 {
            next.position.z = 0.0;
            next.velocity.z = next.velocity.z.max(0.0);
        }
        next.attitude = wrap_angles(&next.attitude);
        Ok(next)
    }
}

/// Equations of motion with the thrust frozen for one step.
struct FlightOde<'a> {
    body: &'a RigidBody,
    thrust: [f64; ROTOR_COUNT],
}

impl fast_ode::DifferentialEquation<12> for FlightOde<'_> {
    fn ode_dot_y(&self, _t: f64, y: &fast_ode::Coord<12>) -> (fast_ode::Coord<12>, bool) {
        let dot_y = self.body.derivative(&y.0, &self.thrust);
        let finite = dot_y.iter().all(|v| v.is_finite());
        (fast_ode::Coord(dot_y), finite)
    }
}
