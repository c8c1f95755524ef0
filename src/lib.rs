//! # Sendero: Line-Follow Control & Telemetry Simulator
//!
//! Sendero simulates a line-following robot's control loop and records its
//! behavior as a session-scoped telemetry trail: sensor readings, actuator
//! commands, and discrete events, written to a durable local store and
//! forwarded best-effort to a remote collector.
//!
//! ## Architecture
//!
//! ```text
//! Scenario frames ──> SensorArray ──> TrackState ──┐
//!                          │                       │
//!                          └──> error ──> PID ──> MotorPair
//!                                                  │
//!            LineFollower orchestrates each step ──┤
//!                                                  ▼
//!                    TelemetryStore (local, fatal on failure)
//!                    RemoteSession  (best-effort, never fatal)
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use sendero::sim::{LineFollower, NoiseSource, Scenario};
//! use sendero::remote::RemoteCollector;
//! use sendero::telemetry::MemoryTelemetryStore;
//!
//! let mut store = MemoryTelemetryStore::new();
//! let collector = RemoteCollector::new("http://127.0.0.1:8000");
//!
//! let mut robot = LineFollower::new(5, NoiseSource::seeded(42));
//! robot.calibrate(&mut store)?;
//!
//! let report = robot.follow_line(&mut store, &collector, &Scenario::line_hold())?;
//! println!("off track {} of {} steps", report.off_track_steps(), report.steps());
//! # Ok::<(), sendero::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod control;
pub mod error;
pub mod remote;
pub mod sim;
pub mod telemetry;

pub use error::{Error, Result};
