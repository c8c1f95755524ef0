//! Telemetry store contract and in-memory backend

use std::collections::HashMap;

use super::{
    ActuatorCommand, EventRecord, SensorReading, SessionId, SessionRecord, SessionStatus, Severity,
};
use crate::{Error, Result};

/// Local durable sink for session-scoped telemetry.
///
/// Every operation takes an explicit [`SessionId`] handle; the store keeps
/// no "current session" state, so distinct runs can share one store without
/// leaking writes into each other's sessions. Within a run there is a
/// single logical writer (`&mut self`), matching the sequential control
/// loop.
///
/// Implementations must commit each append durably before returning, and
/// must enforce the session lifecycle:
/// - appends and ends against an unknown session fail with
///   [`Error::SessionNotFound`];
/// - appends and ends against a session in a terminal status fail with
///   [`Error::SessionClosed`].
pub trait TelemetryStore {
    /// Create a session in `Running` status and return its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage rejects the write; this is
    /// fatal to the caller's run.
    fn create_session(&mut self, variant_id: u32) -> Result<SessionId>;

    /// Transition a running session to a terminal status, stamping
    /// `ended_at` exactly once.
    ///
    /// # Errors
    ///
    /// Fails if `status` is not terminal, the session is unknown, or the
    /// session has already ended.
    fn end_session(&mut self, session_id: SessionId, status: SessionStatus) -> Result<()>;

    /// Append one sensor reading with the current timestamp.
    ///
    /// # Errors
    ///
    /// Fails if the session is unknown, has ended, or the write is rejected.
    fn append_sensor(
        &mut self,
        session_id: SessionId,
        sensor_type: &str,
        value: f64,
        unit: &str,
    ) -> Result<()>;

    /// Append one actuator command with the current timestamp.
    ///
    /// # Errors
    ///
    /// Fails if the session is unknown, has ended, or the write is rejected.
    fn append_command(
        &mut self,
        session_id: SessionId,
        actuator_type: &str,
        command: f64,
        status: &str,
    ) -> Result<()>;

    /// Append one event with the current timestamp.
    ///
    /// # Errors
    ///
    /// Fails if the session is unknown, has ended, or the write is rejected.
    fn append_event(
        &mut self,
        session_id: SessionId,
        event_type: &str,
        severity: Severity,
        message: &str,
    ) -> Result<()>;

    /// Fetch a session record, if it exists.
    ///
    /// # Errors
    ///
    /// Fails only on backing-storage errors; an unknown id is `Ok(None)`.
    fn session(&self, session_id: SessionId) -> Result<Option<SessionRecord>>;

    /// Fetch all sensor readings for a session, in append order.
    ///
    /// # Errors
    ///
    /// Fails only on backing-storage errors.
    fn sensor_readings(&self, session_id: SessionId) -> Result<Vec<SensorReading>>;

    /// Fetch all actuator commands for a session, in append order.
    ///
    /// # Errors
    ///
    /// Fails only on backing-storage errors.
    fn actuator_commands(&self, session_id: SessionId) -> Result<Vec<ActuatorCommand>>;

    /// Fetch all events for a session, in append order.
    ///
    /// # Errors
    ///
    /// Fails only on backing-storage errors.
    fn events(&self, session_id: SessionId) -> Result<Vec<EventRecord>>;
}

/// In-memory telemetry store.
///
/// The default backend for tests and ephemeral runs - data is lost when the
/// store is dropped. For persistence, use
/// [`super::SqliteTelemetryStore`].
#[derive(Debug, Default)]
pub struct MemoryTelemetryStore {
    sessions: HashMap<SessionId, SessionRecord>,
    readings: Vec<SensorReading>,
    commands: Vec<ActuatorCommand>,
    events: Vec<EventRecord>,
    next_id: i64,
}

impl MemoryTelemetryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store holds no sessions or records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
            && self.readings.is_empty()
            && self.commands.is_empty()
            && self.events.is_empty()
    }

    /// Get the number of sessions in the store.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn running_session(&self, session_id: SessionId) -> Result<()> {
        let session = self
            .sessions
            .get(&session_id)
            .ok_or(Error::SessionNotFound(session_id))?;
        if session.is_running() {
            Ok(())
        } else {
            Err(Error::SessionClosed {
                session_id,
                status: session.status(),
            })
        }
    }
}

impl TelemetryStore for MemoryTelemetryStore {
    fn create_session(&mut self, variant_id: u32) -> Result<SessionId> {
        self.next_id += 1;
        let id = SessionId::new(self.next_id);
        self.sessions.insert(id, SessionRecord::new(id, variant_id));
        Ok(id)
    }

    fn end_session(&mut self, session_id: SessionId, status: SessionStatus) -> Result<()> {
        if !status.is_terminal() {
            return Err(Error::Storage(format!(
                "cannot end session {session_id} with non-terminal status {status}"
            )));
        }
        self.running_session(session_id)?;
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.end(status);
        }
        Ok(())
    }

    fn append_sensor(
        &mut self,
        session_id: SessionId,
        sensor_type: &str,
        value: f64,
        unit: &str,
    ) -> Result<()> {
        self.running_session(session_id)?;
        self.readings
            .push(SensorReading::new(session_id, sensor_type, value, unit));
        Ok(())
    }

    fn append_command(
        &mut self,
        session_id: SessionId,
        actuator_type: &str,
        command: f64,
        status: &str,
    ) -> Result<()> {
        self.running_session(session_id)?;
        self.commands
            .push(ActuatorCommand::new(session_id, actuator_type, command, status));
        Ok(())
    }

    fn append_event(
        &mut self,
        session_id: SessionId,
        event_type: &str,
        severity: Severity,
        message: &str,
    ) -> Result<()> {
        self.running_session(session_id)?;
        self.events
            .push(EventRecord::new(session_id, event_type, severity, message));
        Ok(())
    }

    fn session(&self, session_id: SessionId) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.get(&session_id).cloned())
    }

    fn sensor_readings(&self, session_id: SessionId) -> Result<Vec<SensorReading>> {
        Ok(self
            .readings
            .iter()
            .filter(|r| r.session_id() == session_id)
            .cloned()
            .collect())
    }

    fn actuator_commands(&self, session_id: SessionId) -> Result<Vec<ActuatorCommand>> {
        Ok(self
            .commands
            .iter()
            .filter(|c| c.session_id() == session_id)
            .cloned()
            .collect())
    }

    fn events(&self, session_id: SessionId) -> Result<Vec<EventRecord>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.session_id() == session_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_default_empty() {
        let store = MemoryTelemetryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_create_and_read_session() {
        let mut store = MemoryTelemetryStore::new();
        let id = store.create_session(3).unwrap();
        let session = store.session(id).unwrap().unwrap();
        assert_eq!(session.variant_id(), 3);
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let mut store = MemoryTelemetryStore::new();
        let a = store.create_session(1).unwrap();
        let b = store.create_session(1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_append_to_unknown_session_fails() {
        let mut store = MemoryTelemetryStore::new();
        let err = store
            .append_sensor(SessionId::new(99), "IR_1", 0.5, "norm")
            .unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(_)));
    }

    #[test]
    fn test_append_after_end_fails() {
        let mut store = MemoryTelemetryStore::new();
        let id = store.create_session(1).unwrap();
        store.end_session(id, SessionStatus::Completed).unwrap();
        let err = store.append_event(id, "late", Severity::Info, "no").unwrap_err();
        assert!(matches!(err, Error::SessionClosed { .. }));
    }

    #[test]
    fn test_double_end_fails() {
        let mut store = MemoryTelemetryStore::new();
        let id = store.create_session(1).unwrap();
        store.end_session(id, SessionStatus::Completed).unwrap();
        let err = store.end_session(id, SessionStatus::Error).unwrap_err();
        assert!(matches!(err, Error::SessionClosed { .. }));
    }

    #[test]
    fn test_end_with_running_rejected() {
        let mut store = MemoryTelemetryStore::new();
        let id = store.create_session(1).unwrap();
        assert!(store.end_session(id, SessionStatus::Running).is_err());
    }

    #[test]
    fn test_records_scoped_to_session() {
        let mut store = MemoryTelemetryStore::new();
        let a = store.create_session(1).unwrap();
        let b = store.create_session(2).unwrap();
        store.append_sensor(a, "IR_1", 0.1, "norm").unwrap();
        store.append_sensor(b, "IR_1", 0.2, "norm").unwrap();
        store.append_command(a, "Motor_L", 0.5, "sent").unwrap();

        assert_eq!(store.sensor_readings(a).unwrap().len(), 1);
        assert_eq!(store.sensor_readings(b).unwrap().len(), 1);
        assert_eq!(store.actuator_commands(a).unwrap().len(), 1);
        assert!(store.actuator_commands(b).unwrap().is_empty());
    }
}
