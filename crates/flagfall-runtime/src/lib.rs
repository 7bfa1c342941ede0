//! Flagfall Runtime - drives a clock engine in real time
//!
//! - `ClockDriver`: tokio task owning the engine, ticking only while a side runs
//! - `ClockHandle`: cloneable command/observe front door
//! - `SharedClock`: lock-guarded engine for synchronous multi-threaded hosts
//! - `init_logging`: tracing subscriber setup

pub mod config;
pub mod driver;
pub mod error;
pub mod shared;
pub mod telemetry;

pub use config::*;
pub use driver::*;
pub use error::*;
pub use shared::*;
pub use telemetry::{init_logging, LogFormat};
