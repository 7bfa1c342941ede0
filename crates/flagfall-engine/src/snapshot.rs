//! Read-only view of the engine for renderers

use flagfall_core::invariants::check_all_invariants;
use flagfall_core::{ClockTime, Invariant, InvariantCompliant, InvariantViolation, PerSide, Side};

/// Engine state machine phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", content = "side", rename_all = "snake_case"))]
pub enum Phase {
    /// Both clocks stopped, neither flag down
    Idle,
    /// The given side is counting down
    Running(Side),
    /// The given side ran out of time
    Expired(Side),
}

/// Copy of the engine's observable state at one instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub remaining: PerSide<ClockTime>,
    pub active: Option<Side>,
    pub expired: PerSide<bool>,
}

impl Snapshot {
    pub fn remaining_top(&self) -> ClockTime {
        self.remaining.top
    }

    pub fn remaining_bottom(&self) -> ClockTime {
        self.remaining.bottom
    }

    pub fn expired_top(&self) -> bool {
        self.expired.top
    }

    pub fn expired_bottom(&self) -> bool {
        self.expired.bottom
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// The side whose flag has fallen, if any
    pub fn flagged(&self) -> Option<Side> {
        Side::ALL.into_iter().find(|&s| self.expired[s])
    }

    /// The opponent of the flagged side
    pub fn winner(&self) -> Option<Side> {
        self.flagged().map(Side::opponent)
    }

    pub fn phase(&self) -> Phase {
        match (self.flagged(), self.active) {
            (Some(side), _) => Phase::Expired(side),
            (None, Some(side)) => Phase::Running(side),
            (None, None) => Phase::Idle,
        }
    }

    /// Check the latch across two consecutive observations. `reset_between`
    /// must be true when a reset was issued after `self` was taken.
    pub fn verify_transition(
        &self,
        next: &Snapshot,
        reset_between: bool,
    ) -> Result<(), InvariantViolation> {
        if reset_between {
            return Ok(());
        }
        for side in Side::ALL {
            if self.expired[side] && !next.expired[side] {
                return Err(InvariantViolation::new(
                    Invariant::ExpiryLatched,
                    format!("{} un-expired without a reset", side),
                ));
            }
        }
        Ok(())
    }
}

impl InvariantCompliant for Snapshot {
    fn verify_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        let violations = check_all_invariants(|invariant| match invariant {
            // Option<Side> cannot name both sides; the active side must
            // still have time on it.
            Invariant::SingleActiveSide => match self.active {
                Some(side) if self.remaining[side].is_zero() => {
                    Err(format!("{} active with no time left", side))
                }
                _ => Ok(()),
            },
            // ClockTime is unsigned; nothing can be observed below zero.
            Invariant::NonNegativeTime => Ok(()),
            Invariant::ExpiryFlagConsistent => {
                match Side::ALL
                    .into_iter()
                    .find(|&s| self.expired[s] != self.remaining[s].is_zero())
                {
                    Some(side) => Err(format!(
                        "{} expired={} but remaining={:?}",
                        side, self.expired[side], self.remaining[side]
                    )),
                    None => Ok(()),
                }
            }
            Invariant::ExpiryHaltsClock => match (self.flagged(), self.active) {
                (Some(flagged), Some(active)) => {
                    Err(format!("{} running after {} flagged", active, flagged))
                }
                _ => Ok(()),
            },
            // Needs two observations; see `verify_transition`.
            Invariant::ExpiryLatched => Ok(()),
        });

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
