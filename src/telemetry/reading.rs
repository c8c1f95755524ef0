//! Sensor reading record - time-series normalized channel values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionId;

/// One normalized sensor reading, scoped to a session.
///
/// Append-only. `sensor_type` identifies the channel (e.g. `"IR_1"`) and
/// `timestamp` orders the time series within the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorReading {
    session_id: SessionId,
    sensor_type: String,
    timestamp: DateTime<Utc>,
    value: f64,
    unit: String,
}

impl SensorReading {
    /// Create a reading stamped with the current UTC time.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        sensor_type: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            sensor_type: sensor_type.into(),
            timestamp: Utc::now(),
            value,
            unit: unit.into(),
        }
    }

    /// Create a builder for constructing a reading with an explicit timestamp.
    #[must_use]
    pub fn builder(
        session_id: SessionId,
        sensor_type: impl Into<String>,
        value: f64,
    ) -> SensorReadingBuilder {
        SensorReadingBuilder::new(session_id, sensor_type, value)
    }

    /// Get the owning session.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Get the sensor identifier.
    #[must_use]
    pub fn sensor_type(&self) -> &str {
        &self.sensor_type
    }

    /// Get the record timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get the normalized value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the unit label.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// Builder for `SensorReading`.
#[derive(Debug)]
pub struct SensorReadingBuilder {
    session_id: SessionId,
    sensor_type: String,
    value: f64,
    unit: String,
    timestamp: DateTime<Utc>,
}

impl SensorReadingBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(session_id: SessionId, sensor_type: impl Into<String>, value: f64) -> Self {
        Self {
            session_id,
            sensor_type: sensor_type.into(),
            value,
            unit: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Set the unit label.
    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set an explicit timestamp (store read-back).
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the `SensorReading`.
    #[must_use]
    pub fn build(self) -> SensorReading {
        SensorReading {
            session_id: self.session_id,
            sensor_type: self.sensor_type,
            timestamp: self.timestamp,
            value: self.value,
            unit: self.unit,
        }
    }
}
