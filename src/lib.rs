//! Single-axis PID controller with optional Clegg integration.
//!
//! [`pid::PidController`] times its own updates through an injected
//! [`clock::ElapsedClock`]; the rest of the crate is a closed-loop harness
//! (plant, RK4 runner, event detection, CSV/JSON export) for exercising it.

pub mod clock;
pub mod pid;
pub mod control;
pub mod plant;
pub mod sim;
pub mod io;
pub mod config;
pub mod error;

pub use clock::{ElapsedClock, ManualClock, MonotonicClock};
pub use control::Controller;
pub use error::{Error, Result};
pub use pid::{PidConfig, PidController};
