//! Telemetry Recording Schema
//!
//! Session-scoped, append-only telemetry records and the durable stores
//! that hold them.
//!
//! ## Schema Overview
//!
//! ```text
//! SessionRecord (1) ──< SensorReading   (N) [time-series]
//!                  ├──< ActuatorCommand (N) [time-series]
//!                  └──< EventRecord     (N) [state-transition narration]
//! ```
//!
//! Every record belongs to exactly one session, addressed by an explicit
//! [`SessionId`] handle on every store operation — there is no implicit
//! "current session" state, so concurrent runs against one store cannot
//! leak writes into each other's sessions.
//!
//! A session's status transitions only `Running → {Completed, Error}`, and
//! both stores reject appends and ends once a session has reached a
//! terminal status.
//!
//! ## Usage
//!
//! ```rust
//! use sendero::telemetry::{MemoryTelemetryStore, SessionStatus, Severity, TelemetryStore};
//!
//! let mut store = MemoryTelemetryStore::new();
//! let session = store.create_session(1)?;
//!
//! store.append_sensor(session, "IR_1", 0.42, "norm")?;
//! store.append_command(session, "Motor_L", 0.5, "sent")?;
//! store.append_event(session, "scenario_start", Severity::Info, "started")?;
//!
//! store.end_session(session, SessionStatus::Completed)?;
//! # Ok::<(), sendero::Error>(())
//! ```

mod command;
mod event;
mod reading;
mod session;
mod sqlite;
mod store;

pub use command::{ActuatorCommand, ActuatorCommandBuilder};
pub use event::{EventRecord, EventRecordBuilder, Severity};
pub use reading::{SensorReading, SensorReadingBuilder};
pub use session::{SessionId, SessionRecord, SessionRecordBuilder, SessionStatus};
pub use sqlite::SqliteTelemetryStore;
pub use store::{MemoryTelemetryStore, TelemetryStore};
