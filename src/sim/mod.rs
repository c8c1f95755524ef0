//! Line-follow orchestration
//!
//! Drives one scenario through the control loop step by step, recording
//! every reading, command, and event to the local store (fatal on failure)
//! and forwarding the same trail to the remote collector (best-effort,
//! never fatal).
//!
//! Run lifecycle: `Idle → Running → {Completed, Errored}`, with a separate
//! local-only `Idle → Calibrating → Completed` path for the calibration
//! entry point. Whichever exit is taken, both sessions are ended exactly
//! once.

mod noise;
mod scenario;

pub use noise::NoiseSource;
pub use scenario::Scenario;

use tracing::{debug, info, warn};

use crate::control::{MotorPair, PidController, SensorArray, TrackState};
use crate::remote::{RemoteCollector, RemoteSession};
use crate::telemetry::{SessionId, SessionStatus, Severity, TelemetryStore};
use crate::Result;

/// Fixed control-loop time step in seconds.
const STEP_DT: f64 = 0.1;
/// Forward speed around which steering corrections are applied.
const BASE_SPEED: f64 = 0.5;
/// Amplitude of the per-step raw-reading jitter.
const SENSOR_JITTER: f64 = 0.05;
/// Default scenario gains, tuned for the canned runs.
const DEFAULT_GAINS: (f64, f64, f64) = (0.8, 0.0, 0.2);

/// Compute the signed lateral position error from normalized readings.
///
/// Channel `i` of `n` contributes `(i - (n-1)/2) * (1 - norm[i])`; the sum
/// is normalized by `(n-1)/2` so a line fully under an edge sensor pushes
/// the error toward that side. A single-channel array has no lateral
/// information, so its error is 0.
#[must_use]
pub fn lateral_error(normalized: &[f64]) -> f64 {
    let n = normalized.len();
    if n <= 1 {
        return 0.0;
    }
    let half = (n - 1) as f64 / 2.0;
    let position: f64 = normalized
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64 - half) * (1.0 - value))
        .sum();
    position / half
}

/// Render the sensed line position as a fixed-width ASCII gauge.
///
/// Illustrative console output only - not part of the telemetry contract.
#[must_use]
pub fn position_gauge(error: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let center = (width / 2) as f64;
    let offset = error.mul_add(center, center) as usize;
    let offset = offset.min(width - 1);
    (0..width).map(|i| if i == offset { '|' } else { ' ' }).collect()
}

/// Aggregated statistics for one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    session_id: SessionId,
    remote_live: bool,
    steps: usize,
    on_track_steps: usize,
    off_track_steps: usize,
}

impl RunReport {
    /// Get the local session the run recorded into.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Check whether the remote collector accepted the session.
    #[must_use]
    pub const fn remote_live(&self) -> bool {
        self.remote_live
    }

    /// Number of frames processed.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Number of steps classified on track.
    #[must_use]
    pub const fn on_track_steps(&self) -> usize {
        self.on_track_steps
    }

    /// Number of steps classified off track.
    #[must_use]
    pub const fn off_track_steps(&self) -> usize {
        self.off_track_steps
    }
}

/// Line-follow orchestrator.
///
/// Owns the control-loop components and drives one scenario at a time
/// through them, sequentially and synchronously; step `i`'s motor output
/// depends on step `i-1`'s controller state.
#[derive(Debug)]
pub struct LineFollower {
    sensors: SensorArray,
    pid: PidController,
    motors: MotorPair,
    track: TrackState,
    noise: NoiseSource,
    variant_id: u32,
}

impl LineFollower {
    /// Create a follower with `channels` sensors and the default gains.
    #[must_use]
    pub fn new(channels: usize, noise: NoiseSource) -> Self {
        let (kp, ki, kd) = DEFAULT_GAINS;
        Self {
            sensors: SensorArray::new(channels),
            pid: PidController::new(kp, ki, kd),
            motors: MotorPair::new(),
            track: TrackState::new(),
            noise,
            variant_id: 1,
        }
    }

    /// Set the scenario variant recorded on every session.
    #[must_use]
    pub const fn with_variant(mut self, variant_id: u32) -> Self {
        self.variant_id = variant_id;
        self
    }

    /// Set custom PID gains.
    #[must_use]
    pub const fn with_gains(mut self, kp: f64, ki: f64, kd: f64) -> Self {
        self.pid = PidController::new(kp, ki, kd);
        self
    }

    /// Get the sensor array.
    #[must_use]
    pub const fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    /// Run the calibration-only entry point.
    ///
    /// Opens a local-only session, calibrates every channel against
    /// all-white/all-black references, logs one completion event, and ends
    /// the session as completed. No remote telemetry is attempted.
    ///
    /// # Errors
    ///
    /// Propagates local-store failures; the local trail is required.
    pub fn calibrate<S: TelemetryStore>(&mut self, store: &mut S) -> Result<SessionId> {
        let session = store.create_session(self.variant_id)?;
        info!(%session, "calibration started");

        let white = vec![1.0; self.sensors.len()];
        let black = vec![0.0; self.sensors.len()];
        self.sensors.calibrate(&white, &black, &mut self.noise)?;

        store.append_event(session, "calibration", Severity::Info, "calibration complete")?;
        store.end_session(session, SessionStatus::Completed)?;
        Ok(session)
    }

    /// Drive one scenario through the control loop.
    ///
    /// Opens the local session (fatal if it cannot), attempts the remote
    /// session (best-effort), processes every frame, and ends both sessions
    /// with the status matching the outcome.
    ///
    /// # Errors
    ///
    /// Propagates local-store and scenario-processing failures after
    /// recording them as an error event and ending both sessions with
    /// status `error`.
    pub fn follow_line<S: TelemetryStore>(
        &mut self,
        store: &mut S,
        collector: &RemoteCollector,
        scenario: &Scenario,
    ) -> Result<RunReport> {
        let session = store.create_session(self.variant_id)?;
        let remote = collector.open_session(self.variant_id);

        if remote.is_live() {
            remote.log_event(
                "scenario_start",
                Severity::Info,
                &format!("scenario started: {}", scenario.label()),
            );
        } else {
            store.append_event(
                session,
                "collector",
                Severity::Warning,
                "telemetry collector unreachable, recording locally only",
            )?;
            warn!(%session, "collector unreachable, running local-only");
        }
        store.append_event(
            session,
            "scenario_start",
            Severity::Info,
            &format!("scenario started: {}", scenario.label()),
        )?;

        info!(%session, label = scenario.label(), frames = scenario.len(), "scenario started");
        self.pid.reset();

        match self.run_steps(store, session, &remote, scenario) {
            Ok((on_track_steps, off_track_steps)) => {
                let summary =
                    format!("scenario finished, left the line {off_track_steps} time(s)");
                store.append_event(session, "scenario_end", Severity::Info, &summary)?;
                remote.log_event("scenario_end", Severity::Info, &summary);

                store.end_session(session, SessionStatus::Completed)?;
                remote.end(SessionStatus::Completed);

                info!(%session, on_track_steps, off_track_steps, "scenario completed");
                Ok(RunReport {
                    session_id: session,
                    remote_live: remote.is_live(),
                    steps: scenario.len(),
                    on_track_steps,
                    off_track_steps,
                })
            }
            Err(err) => {
                // Teardown is best effort once the run has failed; the
                // step's error is the one that propagates.
                let message = format!("scenario failed: {err}");
                let _ = store.append_event(session, "exception", Severity::Error, &message);
                remote.log_event("exception", Severity::Error, &message);
                let _ = store.end_session(session, SessionStatus::Error);
                remote.end(SessionStatus::Error);

                warn!(%session, %err, "scenario errored");
                Err(err)
            }
        }
    }

    fn run_steps<S: TelemetryStore>(
        &mut self,
        store: &mut S,
        session: SessionId,
        remote: &RemoteSession,
        scenario: &Scenario,
    ) -> Result<(usize, usize)> {
        let mut on_track_steps = 0;
        let mut off_track_steps = 0;

        for (index, raw) in scenario.frames().iter().enumerate() {
            let step = index + 1;

            let noisy: Vec<f64> = raw
                .iter()
                .map(|value| (value + self.noise.jitter(SENSOR_JITTER)).clamp(0.0, 1.0))
                .collect();
            let normalized = self.sensors.read_normalized(&noisy)?;

            for (channel, value) in normalized.iter().enumerate() {
                let name = format!("IR_{}", channel + 1);
                store.append_sensor(session, &name, *value, "norm")?;
                remote.log_sensor(&name, *value, "norm");
            }

            let error = lateral_error(&normalized);
            let correction = self.pid.update(error, STEP_DT);

            let on_track = self.track.update(&normalized);
            if on_track {
                on_track_steps += 1;
            } else {
                off_track_steps += 1;
                let message = format!("left the line at step {step}");
                store.append_event(session, "line_tracking", Severity::Warning, &message)?;
                remote.log_event("line_tracking", Severity::Warning, &message);
                warn!(%session, step, "off track");
            }

            let (left, right) = self.motors.drive(BASE_SPEED, correction);
            store.append_command(session, "Motor_L", left, "sent")?;
            store.append_command(session, "Motor_R", right, "sent")?;
            remote.log_command("Motor_L", left, "sent");
            remote.log_command("Motor_R", right, "sent");

            debug!(step, error, correction, left, right, on_track, "step processed");
        }

        Ok((on_track_steps, off_track_steps))
    }
}
