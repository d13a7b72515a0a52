// src/waypoint.rs

//! Ordered list of waypoints, advanced as the vehicle reaches each one.

use crate::control::TargetWaypoint;
use crate::quad::FlightState;
use nalgebra::Vector3;

/// Distance at which a waypoint counts as reached (m).
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Feeds waypoints to a controller one at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointSequencer {
    waypoints: Vec<TargetWaypoint>,
    threshold: f64,
    index: usize,
}

impl WaypointSequencer {
    /// Creates a sequencer over `[x, y, z, yaw]` waypoints with the given
    /// reach distance. Headings are wrapped.
    pub fn new(waypoints: &[[f64; 4]], threshold: f64) -> Self {
        WaypointSequencer {
            waypoints: waypoints
                .iter()
                .map(|[x, y, z, yaw]| TargetWaypoint::new(Vector3::new(*x, *y, *z), *yaw))
                .collect(),
            threshold,
            index: 0,
        }
    }

    /// The waypoint being flown to, or `None` once all have been reached.
    pub fn current(&self) -> Option<&TargetWaypoint> {
        self.waypoints.get(self.index)
    }

    /// Number of waypoints reached so far.
    pub fn reached(&self) -> usize {
        self.index
    }

    /// Whether every waypoint has been reached.
    pub fn is_finished(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    /// Advances past the current waypoint if `state` is within the reach
    /// distance of it. Returns whether it advanced.
    pub fn update(&mut self, state: &FlightState) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        let distance = (current.position - state.position).norm();
        if distance > self.threshold {
            return false;
        }

        log::info!(
            "waypoint {}/{} reached at {distance:.2} m",
            self.index + 1,
            self.waypoints.len()
        );
        self.index += 1;
        true
    }
}
