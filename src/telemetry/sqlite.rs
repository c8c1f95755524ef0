//! SQLite-backed telemetry store
//!
//! The durable local sink. Schema mirrors the collector's: one `sessions`
//! table plus three append-only record tables with cascade deletes and
//! CHECK-constrained status/severity columns. Every append is committed
//! synchronously before returning - no batching.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{
    ActuatorCommand, EventRecord, SensorReading, SessionId, SessionRecord, SessionStatus, Severity,
    TelemetryStore,
};
use crate::{Error, Result};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS sessions (
      id         INTEGER PRIMARY KEY,
      variant_id INTEGER NOT NULL,
      started_at TEXT NOT NULL,
      ended_at   TEXT,
      status     TEXT NOT NULL CHECK(status IN ('running','completed','error'))
    );

    CREATE TABLE IF NOT EXISTS sensor_readings (
      id          INTEGER PRIMARY KEY AUTOINCREMENT,
      session_id  INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
      sensor_type TEXT NOT NULL,
      timestamp   TEXT NOT NULL,
      value       REAL NOT NULL,
      unit        TEXT
    );

    CREATE TABLE IF NOT EXISTS actuator_commands (
      id            INTEGER PRIMARY KEY AUTOINCREMENT,
      session_id    INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
      actuator_type TEXT NOT NULL,
      timestamp     TEXT NOT NULL,
      command       REAL NOT NULL,
      status        TEXT
    );

    CREATE TABLE IF NOT EXISTS events (
      id         INTEGER PRIMARY KEY AUTOINCREMENT,
      session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
      timestamp  TEXT NOT NULL,
      event_type TEXT NOT NULL,
      severity   TEXT NOT NULL CHECK(severity IN ('info','warning','error')),
      message    TEXT NOT NULL
    );
";

/// SQLite-backed [`TelemetryStore`].
///
/// Timestamps are stored as RFC 3339 text in UTC. SQLite's atomic-write
/// guarantee is the only locking discipline required: within a run the
/// store has a single writer.
#[derive(Debug)]
pub struct SqliteTelemetryStore {
    conn: Connection,
}

impl SqliteTelemetryStore {
    /// Open (creating if necessary) a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be applied.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// Open a transient in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn session_status(&self, session_id: SessionId) -> Result<SessionStatus> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM sessions WHERE id = ?1",
                params![session_id.raw()],
                |row| row.get(0),
            )
            .optional()?;
        status
            .ok_or(Error::SessionNotFound(session_id))?
            .parse::<SessionStatus>()
    }

    fn ensure_running(&self, session_id: SessionId) -> Result<()> {
        match self.session_status(session_id)? {
            SessionStatus::Running => Ok(()),
            status => Err(Error::SessionClosed { session_id, status }),
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| Error::Storage(format!("bad timestamp {raw:?}: {err}")))
}

fn parse_variant(raw: i64) -> Result<u32> {
    u32::try_from(raw).map_err(|_| Error::Storage(format!("bad variant id {raw}")))
}

impl TelemetryStore for SqliteTelemetryStore {
    fn create_session(&mut self, variant_id: u32) -> Result<SessionId> {
        self.conn.execute(
            "INSERT INTO sessions(variant_id, started_at, status) VALUES (?1, ?2, ?3)",
            params![
                i64::from(variant_id),
                Utc::now().to_rfc3339(),
                SessionStatus::Running.as_str()
            ],
        )?;
        Ok(SessionId::new(self.conn.last_insert_rowid()))
    }

    fn end_session(&mut self, session_id: SessionId, status: SessionStatus) -> Result<()> {
        if !status.is_terminal() {
            return Err(Error::Storage(format!(
                "cannot end session {session_id} with non-terminal status {status}"
            )));
        }
        self.ensure_running(session_id)?;
        self.conn.execute(
            "UPDATE sessions SET ended_at = ?1, status = ?2 WHERE id = ?3",
            params![Utc::now().to_rfc3339(), status.as_str(), session_id.raw()],
        )?;
        Ok(())
    }

    fn append_sensor(
        &mut self,
        session_id: SessionId,
        sensor_type: &str,
        value: f64,
        unit: &str,
    ) -> Result<()> {
        self.ensure_running(session_id)?;
        self.conn.execute(
            "INSERT INTO sensor_readings(session_id, sensor_type, timestamp, value, unit)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id.raw(),
                sensor_type,
                Utc::now().to_rfc3339(),
                value,
                unit
            ],
        )?;
        Ok(())
    }

    fn append_command(
        &mut self,
        session_id: SessionId,
        actuator_type: &str,
        command: f64,
        status: &str,
    ) -> Result<()> {
        self.ensure_running(session_id)?;
        self.conn.execute(
            "INSERT INTO actuator_commands(session_id, actuator_type, timestamp, command, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id.raw(),
                actuator_type,
                Utc::now().to_rfc3339(),
                command,
                status
            ],
        )?;
        Ok(())
    }

    fn append_event(
        &mut self,
        session_id: SessionId,
        event_type: &str,
        severity: Severity,
        message: &str,
    ) -> Result<()> {
        self.ensure_running(session_id)?;
        self.conn.execute(
            "INSERT INTO events(session_id, timestamp, event_type, severity, message)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id.raw(),
                Utc::now().to_rfc3339(),
                event_type,
                severity.as_str(),
                message
            ],
        )?;
        Ok(())
    }

    fn session(&self, session_id: SessionId) -> Result<Option<SessionRecord>> {
        let row: Option<(i64, String, Option<String>, String)> = self
            .conn
            .query_row(
                "SELECT variant_id, started_at, ended_at, status FROM sessions WHERE id = ?1",
                params![session_id.raw()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((variant_id, started_at, ended_at, status)) = row else {
            return Ok(None);
        };
        let ended_at = ended_at.as_deref().map(parse_timestamp).transpose()?;
        Ok(Some(
            SessionRecord::builder(session_id, parse_variant(variant_id)?)
                .started_at(parse_timestamp(&started_at)?)
                .ended_at(ended_at)
                .status(status.parse()?)
                .build(),
        ))
    }

    fn sensor_readings(&self, session_id: SessionId) -> Result<Vec<SensorReading>> {
        let mut stmt = self.conn.prepare(
            "SELECT sensor_type, timestamp, value, unit FROM sensor_readings
             WHERE session_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id.raw()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(sensor_type, timestamp, value, unit)| {
                Ok(SensorReading::builder(session_id, sensor_type, value)
                    .unit(unit.unwrap_or_default())
                    .timestamp(parse_timestamp(&timestamp)?)
                    .build())
            })
            .collect()
    }

    fn actuator_commands(&self, session_id: SessionId) -> Result<Vec<ActuatorCommand>> {
        let mut stmt = self.conn.prepare(
            "SELECT actuator_type, timestamp, command, status FROM actuator_commands
             WHERE session_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id.raw()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(actuator_type, timestamp, command, status)| {
                Ok(ActuatorCommand::builder(session_id, actuator_type, command)
                    .status(status.unwrap_or_default())
                    .timestamp(parse_timestamp(&timestamp)?)
                    .build())
            })
            .collect()
    }

    fn events(&self, session_id: SessionId) -> Result<Vec<EventRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT event_type, severity, message, timestamp FROM events
             WHERE session_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id.raw()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(event_type, severity, message, timestamp)| {
                Ok(EventRecord::builder(session_id, event_type, severity.parse()?)
                    .message(message)
                    .timestamp(parse_timestamp(&timestamp)?)
                    .build())
            })
            .collect()
    }
}
