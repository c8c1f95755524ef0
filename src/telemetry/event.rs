//! Event record - discrete state-transition narration

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionId;
use crate::Error;

/// Event severity.
///
/// The taxonomy at the storage boundary is exactly these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected lifecycle transitions (calibration complete, scenario end).
    Info,
    /// Degradations that do not stop the run (line departure, collector
    /// unreachable).
    Warning,
    /// Run-terminating failures.
    Error,
}

impl Severity {
    /// Wire/store representation, exactly `info | warning | error`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(Error::Storage(format!("unknown severity {other:?}"))),
        }
    }
}

/// One discrete event, scoped to a session.
///
/// Append-only; used to narrate state transitions (calibration complete,
/// line departure, scenario end, failures).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    session_id: SessionId,
    timestamp: DateTime<Utc>,
    event_type: String,
    severity: Severity,
    message: String,
}

impl EventRecord {
    /// Create an event stamped with the current UTC time.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        event_type: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            timestamp: Utc::now(),
            event_type: event_type.into(),
            severity,
            message: message.into(),
        }
    }

    /// Create a builder for constructing an event with an explicit timestamp.
    #[must_use]
    pub fn builder(
        session_id: SessionId,
        event_type: impl Into<String>,
        severity: Severity,
    ) -> EventRecordBuilder {
        EventRecordBuilder::new(session_id, event_type, severity)
    }

    /// Get the owning session.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Get the record timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get the event type.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Get the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the free-text message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Builder for `EventRecord`.
#[derive(Debug)]
pub struct EventRecordBuilder {
    session_id: SessionId,
    event_type: String,
    severity: Severity,
    message: String,
    timestamp: DateTime<Utc>,
}

impl EventRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(session_id: SessionId, event_type: impl Into<String>, severity: Severity) -> Self {
        Self {
            session_id,
            event_type: event_type.into(),
            severity,
            message: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Set the free-text message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set an explicit timestamp (store read-back).
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the `EventRecord`.
    #[must_use]
    pub fn build(self) -> EventRecord {
        EventRecord {
            session_id: self.session_id,
            timestamp: self.timestamp,
            event_type: self.event_type,
            severity: self.severity,
            message: self.message,
        }
    }
}
