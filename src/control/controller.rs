// src/control/controller.rs

//! # Controller Runtime
//!
//! Drives a [`ControlLaw`] on its own timed thread. Each tick reads a state
//! snapshot from the engine and the current target, runs the law once, and
//! hands the four rotor commands to the engine in a single call.
//!
//! The law, including its integrators, is moved onto the worker while the
//! loop runs and comes back on `stop`; nothing else ever touches it. The
//! target is shared and replaced as one unit.

use crate::control::{ControlLaw, FlightController, TargetWaypoint};
use crate::error::SimError;
use crate::quad::Quadcopter;
use crate::runner::{Clock, TickLoop, Timing};
use parking_lot::Mutex;
use std::sync::Arc;

/// A control law bound to a vehicle.
pub struct Controller {
    quad: Arc<Quadcopter>,
    target: Arc<Mutex<TargetWaypoint>>,
    clock: Arc<Clock>,
    runner: TickLoop<ControlLaw>,
}

impl Controller {
    /// Binds `law` to `quad`. The target starts at the vehicle's current
    /// position and heading, so the vehicle holds until told otherwise.
    pub fn new(law: ControlLaw, quad: Arc<Quadcopter>) -> Self {
        let target = TargetWaypoint::hold(&quad.state());
        Controller {
            quad,
            target: Arc::new(Mutex::new(target)),
            clock: Arc::new(Clock::new()),
            runner: TickLoop::new("controller", law),
        }
    }

    /// Replaces the target with `[x, y, z, yaw]`.
    ///
    /// Fails with `InvalidInput` unless exactly four finite values are
    /// given; the previous target stays in force on failure.
    pub fn update_target(&self, target: &[f64]) -> Result<(), SimError> {
        let target = TargetWaypoint::from_slice(target)?;
        *self.target.lock() = target;
        log::debug!(
            "target set to ({:.2}, {:.2}, {:.2}) yaw {:.2}",
            target.position.x,
            target.position.y,
            target.position.z,
            target.yaw
        );
        Ok(())
    }

    /// Snapshot of the current target.
    pub fn target(&self) -> TargetWaypoint {
        *self.target.lock()
    }

    /// Starts the control loop.
    ///
    /// Same contract as [`Quadcopter::start`], on the controller's own
    /// thread and clock.
    pub fn start(&mut self, dt: f64, scale: f64) -> Result<(), SimError> {
        let timing = Timing::new(dt, scale)?;
        let quad = Arc::clone(&self.quad);
        let target = Arc::clone(&self.target);
        self.runner.start(timing, Arc::clone(&self.clock), move |law| {
            let state = quad.state();
            let target = *target.lock();
            let command = law.update(&state, &target);
            if let Err(e) = quad.set_motor_speeds(&command) {
                log::warn!("rotor command dropped: {e}");
            }
        })
    }

    /// Stops the control loop and waits for its thread to exit.
    ///
    /// Idempotent; does nothing when the loop is not running.
    pub fn stop(&mut self) {
        self.runner.stop();
    }

    /// Whether the control loop is running.
    pub fn is_running(&self) -> bool {
        self.runner.is_running()
    }

    /// Wall-clock seconds, since construction, last recorded by the loop.
    pub fn time(&self) -> f64 {
        self.clock.last()
    }

    /// The control law, while the loop is stopped.
    pub fn law(&self) -> Option<&ControlLaw> {
        self.runner.idle()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControlConfig, InitialStates, PidLoopConfig, VehicleConfig};
    use crate::control::{CascadePid, OpenLoop};
    use crate::quad::MotorConfig;
    use crate::test_utils::*;
    use nalgebra::Vector3;
    use std::thread;
    use std::time::Duration;

    fn vehicle(position: [f64; 3], yaw: f64) -> VehicleConfig {
        VehicleConfig {
            weight: 1.2,
            length: 0.3,
            radius: 0.1,
            initial_states: InitialStates {
                position,
                attitude: [0.0, 0.0, yaw],
            },
            motors: MotorConfig {
                diameter: 10.0,
                pitch: 4.5,
            },
            lift_const: 0.0245,
        }
    }

    /// Test that the target starts at the vehicle's pose.
    #[test]
    fn test_controller_holds_initial_pose() {
        let quad = Arc::new(Quadcopter::new(&vehicle([1.0, 2.0, 3.0], 0.5)));
        let controller = Controller::new(OpenLoop::uniform(0.0).into(), quad);
        let target = controller.target();

        assert!(vector_close(Vector3::new(1.0, 2.0, 3.0), target.position));
        assert!(value_close(0.5, target.yaw));
    }

    /// Test that targets are validated and replaced as a unit.
    #[test]
    fn test_controller_update_target() {
        let quad = Arc::new(Quadcopter::new(&vehicle([0.0; 3], 0.0)));
        let controller = Controller::new(OpenLoop::uniform(0.0).into(), quad);

        controller.update_target(&[1.0, -1.0, 4.0, 7.0]).unwrap();
        let target = controller.target();
        assert!(vector_close(Vector3::new(1.0, -1.0, 4.0), target.position));
        assert!(value_close(7.0 - 2.0 * std::f64::consts::PI, target.yaw));

        assert!(matches!(
            controller.update_target(&[1.0, 2.0, 3.0]),
            Err(SimError::InvalidInput(_))
        ));
        assert_eq!(target, controller.target());
    }

    /// Test that the loop pushes its commands into the engine.
    #[test]
    fn test_controller_drives_motors() {
        let quad = Arc::new(Quadcopter::new(&vehicle([0.0; 3], 0.0)));
        let mut controller = Controller::new(OpenLoop::new([1.0, 2.0, 3.0, 4.0]).into(), Arc::clone(&quad));

        controller.start(1e-3, 1.0).unwrap();
        thread::sleep(Duration::from_millis(50));
        controller.stop();

        assert_eq!([1.0, 2.0, 3.0, 4.0], quad.motor_speeds());
        assert!(controller.time() > 0.0);
    }

    /// Test that rejected commands leave the previous rotor command in place.
    #[test]
    fn test_controller_rejected_command() {
        let quad = Arc::new(Quadcopter::new(&vehicle([0.0; 3], 0.0)));
        quad.set_motor_speeds(&[10.0; 4]).unwrap();
        let mut controller = Controller::new(OpenLoop::uniform(-1.0).into(), Arc::clone(&quad));

        controller.start(1e-3, 1.0).unwrap();
        thread::sleep(Duration::from_millis(20));
        controller.stop();

        assert_eq!([10.0; 4], quad.motor_speeds());
    }

    /// Test the lifecycle and that the law comes back with its state.
    #[test]
    fn test_controller_lifecycle() {
        let quad = Arc::new(Quadcopter::new(&vehicle([0.0; 3], 0.0)));
        let mut config = ControlConfig::new();
        config.position = PidLoopConfig {
            ki: [0.0, 0.0, 1.0],
            ..PidLoopConfig::new()
        };
        let mut controller = Controller::new(CascadePid::with_config(&config).into(), quad);
        controller.update_target(&[0.0, 0.0, 1.0, 0.0]).unwrap();

        controller.stop();
        assert!(controller.law().is_some());

        assert!(controller.start(-1.0, 1.0).is_err());
        controller.start(1e-3, 1.0).unwrap();
        assert!(controller.law().is_none());
        assert_eq!(
            Err(SimError::AlreadyRunning("controller")),
            controller.start(1e-3, 1.0)
        );

        thread::sleep(Duration::from_millis(30));
        controller.stop();
        controller.stop();
        assert!(!controller.is_running());

        match controller.law() {
            Some(ControlLaw::Cascade(law)) => {
                assert!(law.position_integral()[2] > 0.0, "Integral should have accumulated.");
            }
            _ => panic!("Expected the cascade law back."),
        }
    }

    /// Test both loops together: the vehicle lifts off towards a raised target.
    #[test]
    fn test_controller_closed_loop_climb() {
        let quad = Arc::new(Quadcopter::new(&vehicle([0.0; 3], 0.0)));
        let mut config = ControlConfig::new();
        config.position = PidLoopConfig {
            kp: [0.0, 0.0, 1500.0],
            ki: [0.0, 0.0, 2.0],
            kd: [0.0, 0.0, -1500.0],
            integral_limit: None,
        };
        config.attitude = PidLoopConfig {
            kp: [0.0; 3],
            ..PidLoopConfig::new()
        };
        // a floor of zero leaves lift-off to the position loop
        config.limits.rotor = [0.0, 9000.0];
        let mut controller = Controller::new(CascadePid::with_config(&config).into(), Arc::clone(&quad));
        controller.update_target(&[0.0, 0.0, 2.0, 0.0]).unwrap();

        quad.start(1e-3, 1.0).unwrap();
        controller.start(1e-3, 1.0).unwrap();
        thread::sleep(Duration::from_millis(300));
        controller.stop();
        quad.stop();

        let state = quad.state();
        assert!(state.position.z > 0.0, "The vehicle should have lifted off.");
        assert!(state.position.z < 2.0, "The climb should not overshoot this early.");
        assert!(vector_close(Vector3::zeros(), state.attitude));
    }
}
