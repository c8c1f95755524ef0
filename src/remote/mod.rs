//! Best-effort remote telemetry collector client
//!
//! Forwards the same session/reading/command/event trail to a remote
//! collector over HTTP. Every call is bounded by a short fixed timeout and
//! reports an explicit [`Delivery`] instead of an error: a blocked or
//! failing collector must never stall or abort local processing, so
//! nothing in this module returns `Err`.
//!
//! A session that fails to open remotely comes back *degraded*: every
//! subsequent call on it is a [`Delivery::SkippedDisabled`] no-op for the
//! remainder of the run, and the caller records that degradation once,
//! locally.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::telemetry::{SessionStatus, Severity};

/// Per-call timeout for every collector request.
const HTTP_TIMEOUT: Duration = Duration::from_millis(800);

/// Outcome of one best-effort delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The collector accepted the record.
    Delivered,
    /// The call was attempted and failed (connect, timeout, or non-success
    /// response); the record was discarded.
    SkippedUnreachable,
    /// No live remote session; the call was not attempted.
    SkippedDisabled,
}

impl Delivery {
    /// Check whether the record reached the collector.
    #[must_use]
    pub const fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

#[derive(Deserialize)]
struct SessionCreated {
    id: i64,
}

/// Client for a remote telemetry collector.
///
/// Holds the base URL and a blocking HTTP client with the fixed per-call
/// timeout. Opening a session yields a [`RemoteSession`] that carries the
/// remote session id for the rest of the run.
#[derive(Debug, Clone)]
pub struct RemoteCollector {
    client: Option<Client>,
    base_url: String,
}

impl RemoteCollector {
    /// Create a collector client for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, HTTP_TIMEOUT)
    }

    /// Create a collector client with a custom per-call timeout.
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => Some(client),
            Err(err) => {
                warn!(%err, "collector client build failed, remote telemetry disabled");
                None
            }
        };
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the collector base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attempt to open a remote session.
    ///
    /// On any connect, timeout, non-success, or malformed-body failure the
    /// returned session is degraded and all its operations become
    /// [`Delivery::SkippedDisabled`] no-ops.
    #[must_use]
    pub fn open_session(&self, variant_id: u32) -> RemoteSession {
        let Some(client) = &self.client else {
            return RemoteSession::disabled();
        };

        let url = format!("{}/sessions", self.base_url);
        let response = client.post(&url).json(&json!({ "variant_id": variant_id })).send();
        match response {
            Ok(response) if response.status().is_success() => {
                match response.json::<SessionCreated>() {
                    Ok(body) => {
                        debug!(remote_id = body.id, "remote session open");
                        RemoteSession {
                            client: Some(client.clone()),
                            base_url: self.base_url.clone(),
                            session_id: Some(body.id),
                        }
                    }
                    Err(err) => {
                        warn!(%err, "collector returned malformed session body");
                        RemoteSession::disabled()
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "collector rejected session open");
                RemoteSession::disabled()
            }
            Err(err) => {
                warn!(%err, "collector unreachable");
                RemoteSession::disabled()
            }
        }
    }
}

/// One run's binding to the remote collector.
///
/// Live sessions forward records; degraded or disabled sessions skip every
/// call without touching the network. Per-call failures on a live session
/// are reported as [`Delivery::SkippedUnreachable`] and the session stays
/// live - the next record is attempted again.
#[derive(Debug, Clone)]
pub struct RemoteSession {
    client: Option<Client>,
    base_url: String,
    session_id: Option<i64>,
}

impl RemoteSession {
    /// Create a session that skips every call (calibration path, or a
    /// degraded open).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            client: None,
            base_url: String::new(),
            session_id: None,
        }
    }

    /// Check whether records are being forwarded.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.client.is_some() && self.session_id.is_some()
    }

    /// Get the collector-assigned session id, when live.
    #[must_use]
    pub const fn remote_id(&self) -> Option<i64> {
        self.session_id
    }

    /// Forward one sensor reading.
    pub fn log_sensor(&self, sensor_type: &str, value: f64, unit: &str) -> Delivery {
        self.post(
            "sensors",
            json!({ "sensor_type": sensor_type, "value": value, "unit": unit }),
        )
    }

    /// Forward one actuator command.
    pub fn log_command(&self, actuator_type: &str, command: f64, status: &str) -> Delivery {
        self.post(
            "actuators",
            json!({ "actuator_type": actuator_type, "command": command, "status": status }),
        )
    }

    /// Forward one event.
    pub fn log_event(&self, event_type: &str, severity: Severity, message: &str) -> Delivery {
        self.post(
            "events",
            json!({ "event_type": event_type, "severity": severity.as_str(), "message": message }),
        )
    }

    /// End the remote session with a terminal status.
    pub fn end(&self, status: SessionStatus) -> Delivery {
        self.post("end", json!({ "status": status.as_str() }))
    }

    fn post(&self, suffix: &str, body: serde_json::Value) -> Delivery {
        let (Some(client), Some(session_id)) = (&self.client, self.session_id) else {
            return Delivery::SkippedDisabled;
        };

        let url = format!("{}/sessions/{session_id}/{suffix}", self.base_url);
        match client.post(&url).json(&body).send() {
            Ok(response) if response.status().is_success() => Delivery::Delivered,
            Ok(response) => {
                debug!(status = %response.status(), url, "collector rejected record");
                Delivery::SkippedUnreachable
            }
            Err(err) => {
                debug!(%err, url, "record delivery failed");
                Delivery::SkippedUnreachable
            }
        }
    }
}
