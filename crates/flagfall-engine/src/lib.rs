//! Flagfall Engine - two-sided countdown clock
//!
//! This crate implements the clock state machine:
//! - Per-side budgets that never go below zero
//! - A single running side, switched by presses
//! - Increment credit on every accepted press
//! - Flag fall detection that halts both clocks until reset
//!
//! Time advances only through [`ClockEngine::tick`]; the caller supplies
//! the elapsed interval.

pub mod clock;
pub mod engine;
pub mod event;
pub mod snapshot;

pub use clock::*;
pub use engine::*;
pub use event::*;
pub use snapshot::*;

pub use flagfall_core::{ClockTime, PerSide, Side, TimeControl};
