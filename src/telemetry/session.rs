//! Session record - one run of a scenario or calibration pass

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Store-allocated session handle.
///
/// Passed explicitly into every store operation; the handle, not the store,
/// carries the session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(i64);

impl SessionId {
    /// Wrap a raw store row id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw row id.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a session.
///
/// The only legal transition is `Running` to one of the two terminal
/// statuses; there is no path back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Session is open and accepting records.
    Running,
    /// Session ended after a complete run.
    Completed,
    /// Session ended after a run failure.
    Error,
}

impl SessionStatus {
    /// Wire/store representation, exactly `running | completed | error`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Check whether this is a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            other => Err(Error::Storage(format!("unknown session status {other:?}"))),
        }
    }
}

/// Session record: identifies one scenario or calibration run.
///
/// Created in `Running` status with the current timestamp; mutated exactly
/// once, to a terminal status with `ended_at` set, when the run ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    id: SessionId,
    variant_id: u32,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    status: SessionStatus,
}

impl SessionRecord {
    /// Create a running session stamped with the current UTC time.
    #[must_use]
    pub fn new(id: SessionId, variant_id: u32) -> Self {
        Self {
            id,
            variant_id,
            started_at: Utc::now(),
            ended_at: None,
            status: SessionStatus::Running,
        }
    }

    /// Create a builder for reconstructing a session with explicit fields.
    #[must_use]
    pub fn builder(id: SessionId, variant_id: u32) -> SessionRecordBuilder {
        SessionRecordBuilder::new(id, variant_id)
    }

    /// Get the session id.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Get the scenario variant id.
    #[must_use]
    pub const fn variant_id(&self) -> u32 {
        self.variant_id
    }

    /// Get the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get the end timestamp, if the session has ended.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Check whether the session still accepts records.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.status, SessionStatus::Running)
    }

    /// End the session with a terminal status, stamping `ended_at` now.
    ///
    /// The store enforces the single `Running → terminal` transition before
    /// calling this.
    pub fn end(&mut self, status: SessionStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }
}

/// Builder for `SessionRecord`, used by stores reconstructing rows.
#[derive(Debug)]
pub struct SessionRecordBuilder {
    id: SessionId,
    variant_id: u32,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    status: SessionStatus,
}

impl SessionRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(id: SessionId, variant_id: u32) -> Self {
        Self {
            id,
            variant_id,
            started_at: Utc::now(),
            ended_at: None,
            status: SessionStatus::Running,
        }
    }

    /// Set the start timestamp.
    #[must_use]
    pub const fn started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Set the end timestamp.
    #[must_use]
    pub const fn ended_at(mut self, ended_at: Option<DateTime<Utc>>) -> Self {
        self.ended_at = ended_at;
        self
    }

    /// Set the status.
    #[must_use]
    pub const fn status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Build the `SessionRecord`.
    #[must_use]
    pub const fn build(self) -> SessionRecord {
        SessionRecord {
            id: self.id,
            variant_id: self.variant_id,
            started_at: self.started_at,
            ended_at: self.ended_at,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_running() {
        let session = SessionRecord::new(SessionId::new(1), 3);
        assert_eq!(session.status(), SessionStatus::Running);
        assert!(session.is_running());
        assert!(session.ended_at().is_none());
    }

    #[test]
    fn test_end_sets_terminal_state_once() {
        let mut session = SessionRecord::new(SessionId::new(1), 1);
        session.end(SessionStatus::Completed);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(session.ended_at().is_some());
        assert!(session.ended_at().unwrap() >= session.started_at());
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(SessionStatus::Running.as_str(), "running");
        assert_eq!(SessionStatus::Completed.as_str(), "completed");
        assert_eq!(SessionStatus::Error.as_str(), "error");
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            SessionStatus::Running,
            SessionStatus::Completed,
            SessionStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("paused".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Error.is_terminal());
    }
}
