//! Clock invariants
//!
//! These hold for every reachable engine state. Simulators and property
//! tests evaluate them after each command and tick.
//!
//! # The Five Invariants
//!
//! 1. **Single Active Side** - at most one clock runs at any instant
//! 2. **Non-Negative Time** - remaining time never drops below zero
//! 3. **Expiry Flag Consistent** - a side is expired exactly when it shows zero
//! 4. **Expiry Halts Clock** - once a flag falls nothing runs
//! 5. **Expiry Latched** - a fallen flag stays down until reset
//!
//! ```rust
//! use flagfall_core::invariants::{check_all_invariants, Invariant};
//!
//! let violations = check_all_invariants(|_| Ok(()));
//! assert!(violations.is_empty());
//! assert_eq!(Invariant::all().len(), 5);
//! ```

use std::fmt;

/// Laws of the clock state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Invariant {
    /// CLK-1: at most one of the two sides is active.
    SingleActiveSide = 1,

    /// CLK-2: remaining time is clamped at zero on underflow.
    NonNegativeTime = 2,

    /// CLK-3: `expired[side] == (remaining[side] == 0)`.
    ExpiryFlagConsistent = 3,

    /// CLK-4: when either side has expired, no side is active.
    ExpiryHaltsClock = 4,

    /// CLK-5: an expired side stays expired until the next reset, whatever
    /// commands arrive in between.
    ExpiryLatched = 5,
}

impl Invariant {
    /// Short code (e.g. "CLK-1")
    pub fn code(&self) -> &'static str {
        match self {
            Invariant::SingleActiveSide => "CLK-1",
            Invariant::NonNegativeTime => "CLK-2",
            Invariant::ExpiryFlagConsistent => "CLK-3",
            Invariant::ExpiryHaltsClock => "CLK-4",
            Invariant::ExpiryLatched => "CLK-5",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Invariant::SingleActiveSide => "Single Active Side",
            Invariant::NonNegativeTime => "Non-Negative Time",
            Invariant::ExpiryFlagConsistent => "Expiry Flag Consistent",
            Invariant::ExpiryHaltsClock => "Expiry Halts Clock",
            Invariant::ExpiryLatched => "Expiry Latched",
        }
    }

    pub fn all() -> &'static [Invariant] {
        &[
            Invariant::SingleActiveSide,
            Invariant::NonNegativeTime,
            Invariant::ExpiryFlagConsistent,
            Invariant::ExpiryHaltsClock,
            Invariant::ExpiryLatched,
        ]
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.name())
    }
}

/// Invariant violation with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub invariant: Invariant,
    pub context: String,
}

impl InvariantViolation {
    pub fn new(invariant: Invariant, context: impl Into<String>) -> Self {
        InvariantViolation {
            invariant,
            context: context.into(),
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clock invariant violation: {} - {}", self.invariant, self.context)
    }
}

impl std::error::Error for InvariantViolation {}

/// Run `checker` for every invariant and collect the failures
pub fn check_all_invariants<F>(mut checker: F) -> Vec<InvariantViolation>
where
    F: FnMut(Invariant) -> Result<(), String>,
{
    let mut violations = Vec::new();

    for &invariant in Invariant::all() {
        if let Err(context) = checker(invariant) {
            violations.push(InvariantViolation { invariant, context });
        }
    }

    violations
}

/// Types whose state can be checked against [`Invariant`]s
pub trait InvariantCompliant {
    fn verify_invariants(&self) -> Result<(), Vec<InvariantViolation>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_codes() {
        assert_eq!(Invariant::SingleActiveSide.code(), "CLK-1");
        assert_eq!(Invariant::ExpiryLatched.code(), "CLK-5");
        assert_eq!(Invariant::all().len(), 5);
    }

    #[test]
    fn test_check_all_invariants() {
        let violations = check_all_invariants(|inv| {
            if inv == Invariant::ExpiryHaltsClock {
                Err("top expired while bottom running".to_string())
            } else {
                Ok(())
            }
        });

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].invariant, Invariant::ExpiryHaltsClock);
        assert!(violations[0].to_string().contains("CLK-4"));
    }
}
