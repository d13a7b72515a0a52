// demos/waypoints.rs

//! Flies the configured waypoints with the cascade controller.
//!
//! This file is not under `examples/`; `Cargo.toml` declares it as the
//! `waypoints` example target, so it runs with
//!
//! ```text
//! cargo run --example waypoints -- config/quadcopter.yaml
//! ```
//!
//! Press Ctrl-C to stop early.

use free_flight_simulation::config;
use free_flight_simulation::control::{CascadePid, Controller};
use free_flight_simulation::logger;
use free_flight_simulation::quad::Quadcopter;
use free_flight_simulation::waypoint::WaypointSequencer;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static RUNNING: AtomicBool = AtomicBool::new(true);

extern "C" fn on_interrupt(_: libc::c_int) {
    RUNNING.store(false, Ordering::SeqCst);
}

// Wall-clock cadence of the status line.
const REPORT_PERIOD: Duration = Duration::from_millis(500);
const POLL_PERIOD: Duration = Duration::from_millis(10);

fn main() -> Result<(), Box<dyn Error>> {
    logger::init(log::LevelFilter::Info)?;
    unsafe {
        libc::signal(libc::SIGINT, on_interrupt as libc::sighandler_t);
    }

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/quadcopter.yaml".to_string());
    let config = config::load(&path)?;
    log::info!("loaded {path} with {} waypoints", config.waypoints.len());

    let quad = Arc::new(Quadcopter::with_tolerance(
        &config.vehicle,
        config.simulation.solver_tolerance,
    ));
    let law = CascadePid::with_config(&config.control);
    let mut controller = Controller::new(law.into(), Arc::clone(&quad));
    let mut route = WaypointSequencer::new(&config.waypoints, config.waypoint_threshold);

    let sim = config.simulation;
    quad.start(sim.physics_dt, sim.scale)?;
    controller.start(sim.control_dt, sim.scale)?;

    let mut since_report = Duration::ZERO;
    let mut advanced = true;
    while RUNNING.load(Ordering::SeqCst) {
        let state = quad.state();
        let Some(target) = route.current() else {
            log::info!("route complete");
            break;
        };
        if advanced {
            let p = target.position;
            controller.update_target(&[p.x, p.y, p.z, target.yaw])?;
        }
        advanced = route.update(&state);

        if since_report >= REPORT_PERIOD {
            log::info!(
                "t = {:6.2} s  p = ({:6.2}, {:6.2}, {:6.2})  rpy = ({:5.2}, {:5.2}, {:5.2})",
                quad.time(),
                state.position.x,
                state.position.y,
                state.position.z,
                state.roll(),
                state.pitch(),
                state.yaw()
            );
            since_report = Duration::ZERO;
        }
        thread::sleep(POLL_PERIOD);
        since_report += POLL_PERIOD;
    }

    controller.stop();
    quad.stop();
    log::info!("simulation stopped");
    Ok(())
}
