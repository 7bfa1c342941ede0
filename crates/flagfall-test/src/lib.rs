//! Flagfall Test Harness - simulation and fuzzing for the clock engine
//!
//! This crate provides:
//! - Scripted game simulation on simulated time
//! - Seeded random command fuzzing
//! - Invariant checking after every step

pub mod fuzzer;
pub mod simulator;

pub use fuzzer::*;
pub use simulator::*;
