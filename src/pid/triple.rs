// src/pid/triple.rs

//! # Three-Axis PID Loop
//!
//! Bundles one PID controller per axis with independent gains and a shared
//! integral policy. The accumulated integral lives inside the loop and is
//! only touched by `update`.

use crate::pid::{compute_axis, AxisControlData, Number};
use piddiy::PidController;

/// Per-axis gains for a three-axis PID loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains<T> {
    /// Proportional gains.
    pub kp: [T; 3],
    /// Integral gains.
    pub ki: [T; 3],
    /// Derivative gains, applied to the measured rate.
    pub kd: [T; 3],
    /// Bound on each axis' accumulated error. `None` means unbounded.
    pub integral_limit: Option<T>,
}

/// Three independent PID controllers driven together.
pub struct PidTriple<T: Number> {
    axes: [PidController<T, AxisControlData<T>>; 3],
    integral_limit: Option<T>,
}

impl<T: Number> PidTriple<T> {
    /// Creates a new loop from per-axis gains with zeroed integrals.
    pub fn with_gains(gains: PidGains<T>) -> Self {
        let axis = |i: usize| {
            let mut pid = PidController::new();
            pid.compute_fn(compute_axis)
                .set_point(T::zero())
                .kp(gains.kp[i])
                .ki(gains.ki[i])
                .kd(gains.kd[i]);
            pid
        };

        PidTriple {
            axes: [axis(0), axis(1), axis(2)],
            integral_limit: gains.integral_limit,
        }
    }

    /// Runs one tick on all three axes.
    ///
    /// - `set_point`: desired value per axis.
    /// - `measurement`: current value per axis.
    /// - `rate`: measured rate per axis, fed to the derivative gains.
    ///
    /// Returns the three control outputs.
    pub fn update(&mut self, set_point: [T; 3], measurement: [T; 3], rate: [T; 3]) -> [T; 3] {
        let mut output = [T::zero(); 3];
        for (i, pid) in self.axes.iter_mut().enumerate() {
            pid.set_point(set_point[i]);
            output[i] = pid.compute(AxisControlData {
                measurement: measurement[i],
                rate: rate[i],
                integral_limit: self.integral_limit,
            });
        }
        output
    }

    /// Accumulated error sum per axis.
    pub fn integral(&self) -> [T; 3] {
        [
            self.axes[0].integral,
            self.axes[1].integral,
            self.axes[2].integral,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn gains() -> PidGains<f64> {
        PidGains {
            kp: [1.0, 2.0, 3.0],
            ki: [0.1, 0.0, 1.0],
            kd: [0.01, -1.0, 0.0],
            integral_limit: None,
        }
    }

    /// Test that each axis uses its own gains.
    #[test]
    fn test_triple_independent_axes() {
        let mut pid = PidTriple::with_gains(gains());
        let output = pid.update([0.5, 1.0, 2.0], [0.0, 0.0, 1.0], [0.1, 0.5, 9.0]);

        assert!(value_close(0.551, output[0]), "x: 0.5 + 0.05 + 0.001.");
        assert!(value_close(1.5, output[1]), "y: 2.0 + 0.0 - 0.5.");
        assert!(value_close(4.0, output[2]), "z: 3.0 + 1.0 + 0.0.");
    }

    /// Test that integrals persist across ticks and start from zero.
    #[test]
    fn test_triple_integral_persists() {
        let mut pid = PidTriple::with_gains(gains());
        assert_eq!([0.0; 3], pid.integral());

        for _ in 0..4 {
            let _ = pid.update([1.0, -1.0, 0.5], [0.0; 3], [0.0; 3]);
        }
        let integral = pid.integral();
        assert!(value_close(4.0, integral[0]));
        assert!(value_close(-4.0, integral[1]));
        assert!(value_close(2.0, integral[2]));
    }

    /// Test that the integral limit applies to every axis.
    #[test]
    fn test_triple_integral_limit() {
        let mut pid = PidTriple::with_gains(PidGains {
            integral_limit: Some(1.5),
            ..gains()
        });
        for _ in 0..10 {
            let _ = pid.update([1.0, -1.0, 0.0], [0.0; 3], [0.0; 3]);
        }
        let integral = pid.integral();
        assert!(value_close(1.5, integral[0]));
        assert!(value_close(-1.5, integral[1]));
        assert!(value_close(0.0, integral[2]));
    }
}
