//! Time control: starting allotment and per-move increment

use std::fmt;
use std::ops::RangeInclusive;

use crate::{ClockError, ClockResult, ClockTime};

/// Whole-minute starting times offered by the settings picker
pub const MINUTE_PRESETS: RangeInclusive<u64> = 1..=90;

/// Whole-second increments offered by the settings picker
pub const INCREMENT_PRESETS: RangeInclusive<u64> = 0..=60;

/// Sub-minute starting times offered alongside the minute presets
pub const SHORT_PRESETS_SECS: [u64; 2] = [10, 30];

/// Starting allotment per side and time credited after each move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTimeControl"))]
pub struct TimeControl {
    initial: ClockTime,
    increment: ClockTime,
}

impl TimeControl {
    pub const DEFAULT_INITIAL: ClockTime = ClockTime::from_secs(300);
    pub const DEFAULT_INCREMENT: ClockTime = ClockTime::ZERO;

    /// Strict constructor: a zero starting time is rejected
    pub fn new(initial: ClockTime, increment: ClockTime) -> ClockResult<Self> {
        if initial.is_zero() {
            return Err(ClockError::NonPositiveInitial);
        }
        Ok(TimeControl { initial, increment })
    }

    /// Strict constructor from fractional seconds
    pub fn try_from_secs(initial_secs: f64, increment_secs: f64) -> ClockResult<Self> {
        let initial = ClockTime::try_from_secs_f64(initial_secs)
            .ok_or(ClockError::InvalidSeconds(initial_secs))?;
        let increment = ClockTime::try_from_secs_f64(increment_secs)
            .ok_or(ClockError::InvalidSeconds(increment_secs))?;
        Self::new(initial, increment)
    }

    /// Lenient constructor. A non-finite or non-positive starting time falls
    /// back to five minutes; a non-finite or negative increment falls back to
    /// zero.
    pub fn from_secs_lossy(initial_secs: f64, increment_secs: f64) -> Self {
        let initial = ClockTime::try_from_secs_f64(initial_secs)
            .filter(|t| !t.is_zero())
            .unwrap_or(Self::DEFAULT_INITIAL);
        let increment =
            ClockTime::try_from_secs_f64(increment_secs).unwrap_or(Self::DEFAULT_INCREMENT);
        TimeControl { initial, increment }
    }

    /// `minutes` + `increment_secs`, with zero minutes falling back to the default
    pub fn from_minutes(minutes: u64, increment_secs: u64) -> Self {
        let initial = if minutes == 0 {
            Self::DEFAULT_INITIAL
        } else {
            ClockTime::from_mins(minutes)
        };
        TimeControl {
            initial,
            increment: ClockTime::from_secs(increment_secs),
        }
    }

    /// 1+0
    pub fn bullet() -> Self {
        Self::from_minutes(1, 0)
    }

    /// 5+0
    pub fn blitz() -> Self {
        Self::from_minutes(5, 0)
    }

    /// 15+10
    pub fn rapid() -> Self {
        Self::from_minutes(15, 10)
    }

    pub fn initial(&self) -> ClockTime {
        self.initial
    }

    pub fn increment(&self) -> ClockTime {
        self.increment
    }

    /// Every starting time the settings picker offers, shortest first
    pub fn initial_presets() -> impl Iterator<Item = ClockTime> {
        SHORT_PRESETS_SECS
            .into_iter()
            .map(ClockTime::from_secs)
            .chain(MINUTE_PRESETS.map(ClockTime::from_mins))
    }

    /// Every increment the settings picker offers
    pub fn increment_presets() -> impl Iterator<Item = ClockTime> {
        INCREMENT_PRESETS.map(ClockTime::from_secs)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        TimeControl {
            initial: Self::DEFAULT_INITIAL,
            increment: Self::DEFAULT_INCREMENT,
        }
    }
}

/// Unchecked wire form; deserialization goes through [`TimeControl::new`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTimeControl {
    initial: ClockTime,
    increment: ClockTime,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTimeControl> for TimeControl {
    type Error = ClockError;

    fn try_from(raw: RawTimeControl) -> ClockResult<Self> {
        TimeControl::new(raw.initial, raw.increment)
    }
}

/// `5+3` for whole minutes, `30s+0` otherwise
impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let initial_secs = self.initial.as_secs_f64();
        let inc = self.increment.as_secs_f64();
        if self.initial.as_micros() % ClockTime::from_secs(60).as_micros() == 0 {
            write!(f, "{}+{}", self.initial.as_secs() / 60, inc)
        } else {
            write!(f, "{}s+{}", initial_secs, inc)
        }
    }
}
