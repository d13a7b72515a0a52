// src/lib.rs

//! # Quadrotor Flight Simulation
//!
//! This crate simulates the rigid-body flight dynamics of a quadrotor and
//! drives it with a cascaded PID controller (position loop, attitude loop,
//! motor mixer). The physics engine and the controller run as two
//! independently clocked threads that exchange whole-state snapshots and
//! whole rotor commands, so neither loop ever observes a torn value from
//! the other.
//!
//! ```no_run
//! use std::sync::Arc;
//! use free_flight_simulation::control::{CascadePid, ControlLaw, Controller};
//! use free_flight_simulation::config::{ControlConfig, VehicleConfig};
//! use free_flight_simulation::quad::Quadcopter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vehicle = VehicleConfig::from_yaml(
//!     "
//! weight: 1.2
//! length: 0.3
//! radius: 0.1
//! initial_states: { position: [0, 0, 0], attitude: [0, 0, 0] }
//! motors: { diameter: 10.0, pitch: 4.5 }
//! lift_const: 0.0245
//! ",
//! )?;
//! let quad = Arc::new(Quadcopter::new(&vehicle));
//! let law = ControlLaw::Cascade(CascadePid::with_config(&ControlConfig::new()));
//! let mut controller = Controller::new(law, Arc::clone(&quad));
//!
//! quad.start(5e-3, 1.0)?;
//! controller.start(5e-3, 1.0)?;
//! controller.update_target(&[1.0, 1.0, 2.0, 0.0])?;
//!
//! controller.stop();
//! quad.stop();
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod control;
pub mod error;
pub mod logger;
pub mod math;
pub mod pid;
pub mod quad;
mod runner;
pub mod waypoint;

#[doc(inline)]
pub use error::{ConfigError, SimError};

#[cfg(test)]
mod test_utils;
