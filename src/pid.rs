// src/pid.rs

//! # PID Control Module
//!
//! This module provides the compute function, control data structure and
//! three-axis wrapper used by the cascade controller. The computations are
//! generic over the number type so the same control law runs on floats or
//! fixed-point values.

use piddiy::Number as PiddiyNumber;

pub mod axis;
pub use axis::*;
pub mod triple;
pub use triple::*;

/// Custom trait to encapsulate base number requirements.
pub trait Number: PiddiyNumber {
    /// Clamps generic PartialOrd values within a given range.
    fn clamp(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if max < self {
            max
        } else {
            self
        }
    }
}

impl<T: PiddiyNumber> Number for T {}
