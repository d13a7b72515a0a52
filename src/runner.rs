// src/runner.rs

//! # Timed Polling Loops
//!
//! Both the physics engine and the controller advance on their own thread
//! with the same discipline: yield, read the clock, and once more than
//! `dt · scale` seconds of wall time have passed since the previous tick,
//! run exactly one tick to completion. The stop flag is checked once per
//! iteration, so stopping never interrupts a tick half way.

use crate::error::SimError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Monotonic clock that remembers the last time a loop sampled it.
#[derive(Debug)]
pub(crate) struct Clock {
    origin: Instant,
    last: AtomicU64,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Clock {
            origin: Instant::now(),
            last: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Seconds since the clock was created.
    pub(crate) fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Samples the clock and stores the sample as the latest timestamp.
    pub(crate) fn record(&self) -> f64 {
        let now = self.now();
        self.last.store(now.to_bits(), Ordering::Release);
        now
    }

    /// The latest recorded timestamp.
    pub(crate) fn last(&self) -> f64 {
        f64::from_bits(self.last.load(Ordering::Acquire))
    }
}

/// Validated step size and wall-clock scale of a loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Timing {
    pub(crate) dt: f64,
    pub(crate) scale: f64,
}

impl Timing {
    pub(crate) fn new(dt: f64, scale: f64) -> Result<Self, SimError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidInput(format!("dt must be positive, got {dt}")));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SimError::InvalidInput(format!(
                "scale must be positive, got {scale}"
            )));
        }
        Ok(Timing { dt, scale })
    }

    /// Wall-clock seconds that must pass between two ticks.
    pub(crate) fn period(&self) -> f64 {
        self.dt * self.scale
    }
}

struct Worker<S> {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<S>,
}

/// A Stopped/Running loop owning the private state `S` of its ticks.
///
/// While stopped the state rests here; `start` moves it onto the worker
/// thread and `stop` joins the thread and takes it back.
pub(crate) struct TickLoop<S> {
    name: &'static str,
    idle: Option<S>,
    worker: Option<Worker<S>>,
}

impl<S: Send + 'static> TickLoop<S> {
    pub(crate) fn new(name: &'static str, state: S) -> Self {
        TickLoop {
            name,
            idle: Some(state),
            worker: None,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// The resting state, if the loop is stopped.
    pub(crate) fn idle(&self) -> Option<&S> {
        self.idle.as_ref()
    }

    /// Spawns the worker thread.
    ///
    /// `tick` runs once per elapsed period with exclusive access to the
    /// loop state.
    pub(crate) fn start<F>(&mut self, timing: Timing, clock: Arc<Clock>, mut tick: F) -> Result<(), SimError>
    where
        F: FnMut(&mut S) + Send + 'static,
    {
        if self.worker.is_some() {
            return Err(SimError::AlreadyRunning(self.name));
        }
        let mut state = self.idle.take().ok_or(SimError::WorkerLost(self.name))?;

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let period = timing.period();
        let spawned = thread::Builder::new()
            .name(self.name.to_string())
            .spawn(move || {
                let mut last = clock.record();
                while !stop_flag.load(Ordering::Acquire) {
                    thread::yield_now();
                    let now = clock.record();
                    if now - last > period {
                        tick(&mut state);
                        last = now;
                    }
                }
                state
            });

        match spawned {
            Ok(thread) => {
                log::info!(
                    "{} loop started (dt = {}, scale = {})",
                    self.name,
                    timing.dt,
                    timing.scale
                );
                self.worker = Some(Worker { stop, thread });
                Ok(())
            }
            Err(e) => {
                // the closure, and the state inside it, is dropped with the error
                log::error!("{} loop failed to spawn: {e}", self.name);
                Err(SimError::WorkerLost(self.name))
            }
        }
    }

    /// Signals the worker and blocks until it has exited.
    ///
    /// Does nothing when the loop is not running.
    pub(crate) fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.stop.store(true, Ordering::Release);
        match worker.thread.join() {
            Ok(state) => {
                self.idle = Some(state);
                log::info!("{} loop stopped", self.name);
            }
            Err(_) => log::error!("{} loop panicked", self.name),
        }
    }
}

impl<S> Drop for TickLoop<S> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Release);
            let _ = worker.thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Test that invalid timing is rejected.
    #[test]
    fn test_timing_validation() {
        assert!(Timing::new(0.01, 1.0).is_ok());
        assert!(matches!(Timing::new(0.0, 1.0), Err(SimError::InvalidInput(_))));
        assert!(matches!(Timing::new(0.01, -1.0), Err(SimError::InvalidInput(_))));
        assert!(matches!(Timing::new(f64::NAN, 1.0), Err(SimError::InvalidInput(_))));
        assert_eq!(0.02, Timing::new(0.01, 2.0).unwrap().period());
    }

    /// Test that the loop ticks, keeps its state and hands it back on stop.
    #[test]
    fn test_loop_ticks_and_returns_state() {
        let clock = Arc::new(Clock::new());
        let mut ticks = TickLoop::new("counter", 0_u64);
        ticks
            .start(Timing::new(1e-3, 1.0).unwrap(), Arc::clone(&clock), |count| *count += 1)
            .unwrap();
        assert!(ticks.is_running());

        thread::sleep(Duration::from_millis(100));
        ticks.stop();

        assert!(!ticks.is_running());
        let count = *ticks.idle().unwrap();
        assert!(count > 5, "Loop should have ticked, got {count}.");
        assert!(count < 150, "Loop should respect the period, got {count}.");
        assert!(clock.last() > 0.0);
    }

    /// Test the lifecycle state machine.
    #[test]
    fn test_loop_lifecycle() {
        let clock = Arc::new(Clock::new());
        let timing = Timing::new(1e-3, 1.0).unwrap();
        let mut ticks = TickLoop::new("lifecycle", ());

        ticks.stop();
        assert!(!ticks.is_running(), "Stop before start is a no-op.");

        ticks.start(timing, Arc::clone(&clock), |_| {}).unwrap();
        assert_eq!(
            Err(SimError::AlreadyRunning("lifecycle")),
            ticks.start(timing, Arc::clone(&clock), |_| {})
        );
        assert!(ticks.is_running(), "A rejected start leaves the loop running.");

        ticks.stop();
        ticks.stop();
        assert!(!ticks.is_running());

        ticks.start(timing, clock, |_| {}).unwrap();
        ticks.stop();
    }

    /// Test that the clock never goes backwards.
    #[test]
    fn test_clock_monotonic() {
        let clock = Clock::new();
        let mut previous = clock.last();
        for _ in 0..1000 {
            let now = clock.record();
            assert!(now >= previous);
            previous = now;
        }
    }
}
