//! End-to-end scenario runs against an unreachable collector
//!
//! The collector URL points at a port nothing listens on, so every run
//! here exercises the degraded local-only path.

use std::net::TcpListener;

use sendero::remote::RemoteCollector;
use sendero::sim::{LineFollower, NoiseSource, Scenario};
use sendero::telemetry::{
    MemoryTelemetryStore, SessionStatus, Severity, SqliteTelemetryStore, TelemetryStore,
};
use sendero::Error;

/// A collector base URL guaranteed to refuse connections.
fn unreachable_collector() -> RemoteCollector {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    RemoteCollector::new(format!("http://127.0.0.1:{port}"))
}

// =============================================================================
// Reference Frame (symmetric, on track)
// =============================================================================

#[test]
fn test_symmetric_frame_reference_run() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::disabled());

    let scenario = Scenario::new("reference", vec![vec![0.9, 0.6, 0.2, 0.6, 0.9]]);
    let report = robot
        .follow_line(&mut store, &unreachable_collector(), &scenario)
        .unwrap();

    assert_eq!(report.steps(), 1);
    assert_eq!(report.on_track_steps(), 1);
    assert_eq!(report.off_track_steps(), 0);
    assert!(!report.remote_live());

    // Normalized readings track the raw frame through the identity
    // calibration (scaled only by the epsilon guard).
    let readings = store.sensor_readings(report.session_id()).unwrap();
    assert_eq!(readings.len(), 5);
    for (reading, raw) in readings.iter().zip([0.9, 0.6, 0.2, 0.6, 0.9]) {
        assert!((reading.value() - raw).abs() < 1e-3);
        assert_eq!(reading.unit(), "norm");
    }
    assert_eq!(readings[0].sensor_type(), "IR_1");
    assert_eq!(readings[4].sensor_type(), "IR_5");

    // Symmetric frame: zero error, zero correction, straight drive.
    let commands = store.actuator_commands(report.session_id()).unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].actuator_type(), "Motor_L");
    assert_eq!(commands[1].actuator_type(), "Motor_R");
    for command in &commands {
        assert!((command.command() - 0.5).abs() < 1e-9);
        assert_eq!(command.status(), "sent");
    }
}

// =============================================================================
// Row Counts and Degradation
// =============================================================================

#[test]
fn test_k_frames_produce_exact_row_counts() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::disabled());

    let scenario = Scenario::line_hold();
    let report = robot
        .follow_line(&mut store, &unreachable_collector(), &scenario)
        .unwrap();

    // K frames: K*N readings and K command pairs, remote entirely down.
    assert_eq!(store.sensor_readings(report.session_id()).unwrap().len(), 50);
    assert_eq!(store.actuator_commands(report.session_id()).unwrap().len(), 20);
    assert_eq!(report.on_track_steps(), 10);
    assert_eq!(report.off_track_steps(), 0);
}

#[test]
fn test_remote_unreachable_run_still_completes() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::disabled());

    let report = robot
        .follow_line(&mut store, &unreachable_collector(), &Scenario::line_hold())
        .unwrap();

    let session = store.session(report.session_id()).unwrap().unwrap();
    assert_eq!(session.status(), SessionStatus::Completed);
    assert!(session.ended_at().is_some());

    // Exactly one degradation warning, recorded at session start.
    let events = store.events(report.session_id()).unwrap();
    let degradations: Vec<_> = events
        .iter()
        .filter(|e| e.event_type() == "collector")
        .collect();
    assert_eq!(degradations.len(), 1);
    assert_eq!(degradations[0].severity(), Severity::Warning);
    assert_eq!(events[0].event_type(), "collector");

    // Lifecycle narration is present alongside it.
    assert!(events.iter().any(|e| e.event_type() == "scenario_start"));
    assert!(events.iter().any(|e| e.event_type() == "scenario_end"));
}

#[test]
fn test_line_drift_goes_off_track() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::disabled());

    let report = robot
        .follow_line(&mut store, &unreachable_collector(), &Scenario::line_drift())
        .unwrap();

    // The last two frames read near-uniform white: the line is lost.
    assert_eq!(report.off_track_steps(), 2);
    assert_eq!(report.on_track_steps(), 8);

    let events = store.events(report.session_id()).unwrap();
    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.event_type() == "line_tracking")
        .collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].message().contains("step 9"));
    assert!(warnings[1].message().contains("step 10"));
}

#[test]
fn test_seeded_noise_run_is_stable() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::seeded(42));

    let report = robot
        .follow_line(&mut store, &unreachable_collector(), &Scenario::line_hold())
        .unwrap();

    // The hold scenario's means sit 0.57..0.64; +-0.05 jitter cannot push
    // them outside the on-track window.
    assert_eq!(report.on_track_steps() + report.off_track_steps(), 10);
    assert_eq!(report.off_track_steps(), 0);
}

// =============================================================================
// Error Path
// =============================================================================

#[test]
fn test_bad_frame_errors_the_session() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::disabled());

    let scenario = Scenario::new("bad frame", vec![vec![0.5, 0.5, 0.5]]);
    let err = robot
        .follow_line(&mut store, &unreachable_collector(), &scenario)
        .unwrap_err();
    assert!(matches!(err, Error::Scenario(_)));

    // All sessions in the store: the run's session must have been ended
    // exactly once, as error, with the failure narrated.
    let session = store.session(sendero::telemetry::SessionId::new(1)).unwrap().unwrap();
    assert_eq!(session.status(), SessionStatus::Error);
    assert!(session.ended_at().is_some());

    let events = store.events(session.id()).unwrap();
    let fault = events.iter().find(|e| e.event_type() == "exception").unwrap();
    assert_eq!(fault.severity(), Severity::Error);
    assert!(fault.message().contains("scenario"));
}

#[test]
fn test_follower_reusable_after_errored_run() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::disabled());
    let collector = unreachable_collector();

    let bad = Scenario::new("bad", vec![vec![0.1]]);
    assert!(robot.follow_line(&mut store, &collector, &bad).is_err());

    // A fresh run on the same follower starts a new session and completes.
    let report = robot
        .follow_line(&mut store, &collector, &Scenario::line_hold())
        .unwrap();
    assert_eq!(
        store.session(report.session_id()).unwrap().unwrap().status(),
        SessionStatus::Completed
    );
}

// =============================================================================
// Calibration Path
// =============================================================================

#[test]
fn test_calibration_session_is_local_only() {
    let mut store = MemoryTelemetryStore::new();
    let mut robot = LineFollower::new(5, NoiseSource::seeded(1));

    let session = robot.calibrate(&mut store).unwrap();

    let record = store.session(session).unwrap().unwrap();
    assert_eq!(record.status(), SessionStatus::Completed);
    assert!(record.ended_at().is_some());

    let events = store.events(session).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), "calibration");
    assert_eq!(events[0].severity(), Severity::Info);

    // No readings or commands are recorded during calibration.
    assert!(store.sensor_readings(session).unwrap().is_empty());
    assert!(store.actuator_commands(session).unwrap().is_empty());
}

// =============================================================================
// SQLite End-to-End
// =============================================================================

#[test]
fn test_full_run_against_sqlite_store() {
    let mut store = SqliteTelemetryStore::open_in_memory().unwrap();
    let mut robot = LineFollower::new(5, NoiseSource::disabled()).with_variant(12);

    robot.calibrate(&mut store).unwrap();
    let report = robot
        .follow_line(&mut store, &unreachable_collector(), &Scenario::line_hold())
        .unwrap();

    let session = store.session(report.session_id()).unwrap().unwrap();
    assert_eq!(session.variant_id(), 12);
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(store.sensor_readings(report.session_id()).unwrap().len(), 50);
    assert_eq!(store.actuator_commands(report.session_id()).unwrap().len(), 20);
}
