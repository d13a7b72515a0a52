// src/quad/quadcopter.rs

//! # Dynamics Engine
//!
//! Owns the flight state and the rotor bank and advances them on a timed
//! thread of its own.
//!
//! ## Sharing
//!
//! The state and the rotor bank each sit behind their own lock. A tick
//! copies the current thrust and state out, integrates without holding any
//! lock, and then swaps the whole new state in. Readers therefore see
//! either the previous or the next state, never a mix of both, and a rotor
//! command lands as one unit between two ticks.

use crate::config::VehicleConfig;
use crate::error::SimError;
use crate::quad::{FlightState, Motors, RigidBody, DEFAULT_TOLERANCE, ROTOR_COUNT};
use crate::runner::{Clock, TickLoop, Timing};
use nalgebra::Vector3;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// State shared between the engine handle and its worker thread.
struct Shared {
    body: RigidBody,
    tolerance: f64,
    state: RwLock<FlightState>,
    motors: Mutex<Motors>,
    clock: Arc<Clock>,
}

impl Shared {
    fn step(&self, dt: f64) -> Result<(), SimError> {
        let thrust = self.motors.lock().thrust();
        let current = *self.state.read();
        let next = self.body.integrate(&current, &thrust, dt, self.tolerance)?;
        *self.state.write() = next;
        Ok(())
    }
}

/// The simulated quadrotor.
///
/// All methods take `&self`, so the engine is normally wrapped in an `Arc`
/// and shared with a controller and any number of observers.
pub struct Quadcopter {
    shared: Arc<Shared>,
    runner: Mutex<TickLoop<()>>,
}

impl Quadcopter {
    /// Creates a vehicle at rest in its configured initial pose with the
    /// rotors stopped.
    pub fn new(config: &VehicleConfig) -> Self {
        Self::build(config, DEFAULT_TOLERANCE)
    }

    /// Creates a vehicle whose solver uses the given relative tolerance.
    pub fn with_tolerance(config: &VehicleConfig, tolerance: f64) -> Self {
        Self::build(config, tolerance)
    }

    fn build(config: &VehicleConfig, tolerance: f64) -> Self {
        let initial = FlightState::at_rest(
            Vector3::from(config.initial_states.position),
            Vector3::from(config.initial_states.attitude),
        );

        Quadcopter {
            shared: Arc::new(Shared {
                body: RigidBody::new(config),
                tolerance,
                state: RwLock::new(initial),
                motors: Mutex::new(Motors::new(&config.motors)),
                clock: Arc::new(Clock::new()),
            }),
            runner: Mutex::new(TickLoop::new("dynamics", ())),
        }
    }

    /// Starts the physics loop.
    ///
    /// - `dt`: simulated seconds integrated per tick.
    /// - `scale`: wall-clock stretch; a tick runs once `dt · scale` wall
    ///   seconds have passed, so 1.0 is real time and 2.0 half speed.
    ///
    /// Fails with `AlreadyRunning` if the loop runs, and with `InvalidInput`
    /// for non-positive `dt` or `scale`.
    pub fn start(&self, dt: f64, scale: f64) -> Result<(), SimError> {
        let timing = Timing::new(dt, scale)?;
        let shared = Arc::clone(&self.shared);
        self.runner
            .lock()
            .start(timing, Arc::clone(&self.shared.clock), move |_| {
                if let Err(e) = shared.step(dt) {
                    log::error!("physics step skipped: {e}");
                }
            })
    }

    /// Stops the physics loop and waits for its thread to exit.
    ///
    /// Idempotent; does nothing when the loop is not running.
    pub fn stop(&self) {
        self.runner.lock().stop();
    }

    /// Whether the physics loop is running.
    pub fn is_running(&self) -> bool {
        self.runner.lock().is_running()
    }

    /// Advances the model by `dt` on the caller's thread.
    ///
    /// Meant for headless use while the loop is stopped; fails with
    /// `AlreadyRunning` otherwise.
    pub fn step(&self, dt: f64) -> Result<(), SimError> {
        // held across the step so the loop cannot start underneath it
        let runner = self.runner.lock();
        if runner.is_running() {
            return Err(SimError::AlreadyRunning("dynamics"));
        }
        Timing::new(dt, 1.0)?;
        self.shared.step(dt)
    }

    /// Relative tolerance of the solver.
    pub fn tolerance(&self) -> f64 {
        self.shared.tolerance
    }

    /// Wall-clock seconds, since construction, last recorded by the loop.
    pub fn time(&self) -> f64 {
        self.shared.clock.last()
    }

    /// Snapshot of the current flight state.
    pub fn state(&self) -> FlightState {
        *self.shared.state.read()
    }

    /// Replaces all four rotor speeds (rad/s) at once.
    ///
    /// Fails with `InvalidInput` unless exactly four non-negative speeds
    /// are given; the rotors keep their previous command on failure.
    pub fn set_motor_speeds(&self, speeds: &[f64]) -> Result<(), SimError> {
        self.shared.motors.lock().set_speeds(speeds)
    }

    /// Snapshot of the commanded rotor speeds.
    pub fn motor_speeds(&self) -> [f64; ROTOR_COUNT] {
        self.shared.motors.lock().speeds()
    }

    /// Snapshot of the rotor thrusts.
    pub fn thrust(&self) -> [f64; ROTOR_COUNT] {
        self.shared.motors.lock().thrust()
    }

    /// Mass properties and allocation of the vehicle.
    pub fn body(&self) -> &RigidBody {
        &self.shared.body
    }
}

impl Drop for Quadcopter {
    fn drop(&mut self) {
        self.stop();
    }
}
