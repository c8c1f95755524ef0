//! Actuator command record - time-series drive commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionId;

/// One commanded actuator value, scoped to a session.
///
/// Append-only. `actuator_type` identifies the actuator (`"Motor_L"` /
/// `"Motor_R"`), `status` its dispatch state (default `"sent"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActuatorCommand {
    session_id: SessionId,
    actuator_type: String,
    timestamp: DateTime<Utc>,
    command: f64,
    status: String,
}

impl ActuatorCommand {
    /// Create a command record stamped with the current UTC time.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        actuator_type: impl Into<String>,
        command: f64,
        status: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            actuator_type: actuator_type.into(),
            timestamp: Utc::now(),
            command,
            status: status.into(),
        }
    }

    /// Create a builder for constructing a command with an explicit timestamp.
    #[must_use]
    pub fn builder(
        session_id: SessionId,
        actuator_type: impl Into<String>,
        command: f64,
    ) -> ActuatorCommandBuilder {
        ActuatorCommandBuilder::new(session_id, actuator_type, command)
    }

    /// Get the owning session.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Get the actuator identifier.
    #[must_use]
    pub fn actuator_type(&self) -> &str {
        &self.actuator_type
    }

    /// Get the record timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get the commanded value.
    #[must_use]
    pub const fn command(&self) -> f64 {
        self.command
    }

    /// Get the dispatch status label.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }
}

/// Builder for `ActuatorCommand`.
#[derive(Debug)]
pub struct ActuatorCommandBuilder {
    session_id: SessionId,
    actuator_type: String,
    command: f64,
    status: String,
    timestamp: DateTime<Utc>,
}

impl ActuatorCommandBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(session_id: SessionId, actuator_type: impl Into<String>, command: f64) -> Self {
        Self {
            session_id,
            actuator_type: actuator_type.into(),
            command,
            status: "sent".to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Set the dispatch status label.
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set an explicit timestamp (store read-back).
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the `ActuatorCommand`.
    #[must_use]
    pub fn build(self) -> ActuatorCommand {
        ActuatorCommand {
            session_id: self.session_id,
            actuator_type: self.actuator_type,
            timestamp: self.timestamp,
            command: self.command,
            status: self.status,
        }
    }
}
