//! Flagfall Core - Fundamental types for the two-sided game clock
//!
//! This crate defines the primitives shared by every layer:
//! - Time values (ClockTime)
//! - Sides and per-side storage (Side, PerSide)
//! - Time controls and the settings presets (TimeControl)
//! - Errors and the invariant catalogue

pub mod control;
pub mod error;
pub mod invariants;
pub mod side;
pub mod time;

pub use control::*;
pub use error::*;
pub use invariants::{Invariant, InvariantCompliant, InvariantViolation};
pub use side::*;
pub use time::*;
