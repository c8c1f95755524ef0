//! Error types for Sendero
//!
//! Local-storage failures are fatal to a run; remote-sink failures never
//! surface here (see [`crate::remote::Delivery`]).

use thiserror::Error;

use crate::telemetry::{SessionId, SessionStatus};

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Sendero error types
#[derive(Error, Debug)]
pub enum Error {
    /// Local telemetry store unreachable or a write was rejected
    #[error("telemetry store error: {0}")]
    Storage(String),

    /// A record referenced a session the store has never seen
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// A write or end targeted a session that already reached a terminal status
    #[error("session {session_id} is {status}, not running")]
    SessionClosed {
        /// Session the rejected operation targeted
        session_id: SessionId,
        /// Terminal status the session already holds
        status: SessionStatus,
    },

    /// Scenario-processing failure (e.g. frame width does not match the array)
    #[error("scenario error: {0}")]
    Scenario(String),

    /// SQLite error from the durable store
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
