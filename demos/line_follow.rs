//! Line-Follow Simulation Demo
//!
//! Runs a calibration pass and the two canned scenarios against a SQLite
//! telemetry file, forwarding best-effort to a local collector if one is
//! listening.
//!
//! Run with: cargo run --example line_follow

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use sendero::remote::RemoteCollector;
use sendero::sim::{lateral_error, position_gauge, LineFollower, NoiseSource, Scenario};
use sendero::telemetry::{SqliteTelemetryStore, TelemetryStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Sendero Line-Follow Simulation ===\n");

    let mut store = SqliteTelemetryStore::open("robot_telemetry.db")?;
    let collector = RemoteCollector::new("http://127.0.0.1:8000");
    let mut robot = LineFollower::new(5, NoiseSource::from_entropy());

    // -------------------------------------------------------------------------
    // 1. Calibration pass (local-only session)
    // -------------------------------------------------------------------------
    println!("1. Calibrating sensor array...");
    let session = robot.calibrate(&mut store)?;
    for channel in 0..robot.sensors().len() {
        if let Some((white, black)) = robot.sensors().calibration(channel) {
            println!("   IR_{}: white={white:.2}, black={black:.2}", channel + 1);
        }
    }
    println!("   Session {session} completed\n");

    // -------------------------------------------------------------------------
    // 2. Scenario runs (dual-sink sessions)
    // -------------------------------------------------------------------------
    let mut last_session = None;
    for scenario in [Scenario::line_hold(), Scenario::line_drift()] {
        println!("2. Scenario: {}", scenario.label());

        for (step, frame) in scenario.frames().iter().enumerate() {
            let error = lateral_error(frame);
            println!("   step {:>2}  [{}]  error {error:+.2}", step + 1, position_gauge(error, 9));
        }

        let report = robot.follow_line(&mut store, &collector, &scenario)?;
        println!(
            "   => session {}: {} steps, {} on track, {} off track, remote {}\n",
            report.session_id(),
            report.steps(),
            report.on_track_steps(),
            report.off_track_steps(),
            if report.remote_live() { "live" } else { "skipped" },
        );
        last_session = Some(report.session_id());
    }

    // -------------------------------------------------------------------------
    // 3. Inspect the recorded trail
    // -------------------------------------------------------------------------
    println!("3. Store statistics for the last session:");
    if let Some(id) = last_session {
        if let Some(session) = store.session(id)? {
            println!("   status:   {}", session.status());
            println!("   readings: {}", store.sensor_readings(id)?.len());
            println!("   commands: {}", store.actuator_commands(id)?.len());
            println!("   events:   {}", store.events(id)?.len());
        }
    }

    println!("\n=== Simulation Complete ===");
    Ok(())
}
