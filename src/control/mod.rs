//! Control-loop components
//!
//! The pieces of the line-follow loop, leaf-first:
//!
//! ```text
//! raw frame ──> SensorArray ──> normalized [0,1] per channel
//!                                   │
//!                    TrackState ────┤ on/off-track
//!                                   ▼
//!               lateral error ──> PidController ──> steering correction
//!                                                        │
//!                                  MotorPair <───────────┘
//!                                   │
//!                                   └──> (left, right) drive commands
//! ```
//!
//! Every component is deterministic given its state and inputs; the only
//! randomness in the system lives in [`crate::sim::NoiseSource`].

mod motor;
mod pid;
mod sensor;
mod track;

pub use motor::MotorPair;
pub use pid::PidController;
pub use sensor::SensorArray;
pub use track::TrackState;
