// src/control.rs

//! # Flight Control
//!
//! Controllers turn a state snapshot and a target waypoint into rotor
//! commands. The runtime [`Controller`] drives any [`ControlLaw`] on its
//! own timed thread against a shared [`Quadcopter`](crate::quad::Quadcopter).

pub mod cascade;
pub use cascade::*;
pub mod controller;
pub use controller::*;
pub mod law;
pub use law::*;
pub mod open_loop;
pub use open_loop::*;
