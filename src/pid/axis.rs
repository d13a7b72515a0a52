// src/pid/axis.rs

//! # Single-Axis PID Control
//!
//! Compute callback for one axis of a per-tick PID loop. The integral
//! accumulates the raw error once per tick (no time scaling) and the
//! derivative term is the measured rate of the controlled quantity rather
//! than a finite difference of the error.

use crate::pid::Number;
use piddiy::PidController;

/// Control data for the per-tick PID compute callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisControlData<T> {
    /// The current value of the controlled quantity.
    pub measurement: T,
    /// The measured rate of the controlled quantity, fed to the derivative gain.
    pub rate: T,
    /// Bound on the accumulated error. `None` lets it grow without limit.
    pub integral_limit: Option<T>,
}

/// Per-tick PID compute callback.
///
/// Returns `(error, integral, derivative)`, where `integral` is the running
/// sum of errors. `PidController::compute` turns these into
/// `kp * error + ki * integral + kd * derivative`, which equals
/// `Kp·e + Ie + Kd·rate` with `Ie += Ki·e` every tick.
pub fn compute_axis<T: Number>(
    pid: &mut PidController<T, AxisControlData<T>>,
    data: AxisControlData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.measurement;
    let accumulated = pid.integral + error;
    let integral = match data.integral_limit {
        Some(limit) => Number::clamp(accumulated, -limit, limit),
        None => accumulated,
    };

    (error, integral, data.rate)
}
