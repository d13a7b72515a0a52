// src/quad.rs

//! # Quadrotor Model
//!
//! The rigid-body model, its rotor bank and the engine that integrates it on
//! its own timed thread.

pub mod dynamics;
pub use dynamics::*;
pub mod motors;
pub use motors::*;
pub mod quadcopter;
pub use quadcopter::*;
pub mod state;
pub use state::*;
