//! Time primitives for Flagfall
//!
//! Remaining time is an unsigned count of microseconds. Decimal tick sizes
//! (0.1s, 0.5s) accumulate exactly, and subtraction saturates at zero so a
//! budget can never go negative.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::time::Duration;

const MICROS_PER_SEC: u64 = 1_000_000;
const MICROS_PER_TENTH: u64 = 100_000;

/// Remaining (or credited) clock time
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u64);

impl ClockTime {
    pub const ZERO: ClockTime = ClockTime(0);
    pub const MAX: ClockTime = ClockTime(u64::MAX);

    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        ClockTime(micros)
    }

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        ClockTime(millis.saturating_mul(1000))
    }

    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        ClockTime(secs.saturating_mul(MICROS_PER_SEC))
    }

    #[inline]
    pub const fn from_mins(mins: u64) -> Self {
        Self::from_secs(mins.saturating_mul(60))
    }

    /// Convert fractional seconds, rounding to the nearest microsecond.
    /// Returns `None` for NaN, infinite or negative input.
    pub fn try_from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        let micros = (secs * MICROS_PER_SEC as f64).round();
        if micros >= u64::MAX as f64 {
            return Some(ClockTime::MAX);
        }
        Some(ClockTime(micros as u64))
    }

    /// Lossy variant of [`ClockTime::try_from_secs_f64`]; invalid input maps to zero
    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        Self::try_from_secs_f64(secs).unwrap_or(ClockTime::ZERO)
    }

    #[inline]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    /// Whole seconds, truncated
    #[inline]
    pub const fn as_secs(self) -> u64 {
        self.0 / MICROS_PER_SEC
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / MICROS_PER_SEC as f64
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn saturating_add(self, rhs: ClockTime) -> Self {
        ClockTime(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub const fn saturating_sub(self, rhs: ClockTime) -> Self {
        ClockTime(self.0.saturating_sub(rhs.0))
    }

    /// Subtract a wall-clock duration, clamping at zero
    #[inline]
    pub fn saturating_sub_duration(self, dt: Duration) -> Self {
        self.saturating_sub(ClockTime::from(dt))
    }

    /// Minutes, seconds and tenths for display. Fractions are truncated.
    pub const fn parts(self) -> (u64, u64, u64) {
        let secs = self.0 / MICROS_PER_SEC;
        let tenths = (self.0 % MICROS_PER_SEC) / MICROS_PER_TENTH;
        (secs / 60, secs % 60, tenths)
    }
}

/// Truncates to whole microseconds; saturates at [`ClockTime::MAX`]
impl From<Duration> for ClockTime {
    fn from(d: Duration) -> Self {
        ClockTime(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
    }
}

impl From<ClockTime> for Duration {
    fn from(t: ClockTime) -> Self {
        Duration::from_micros(t.0)
    }
}

impl Add for ClockTime {
    type Output = ClockTime;

    #[inline]
    fn add(self, rhs: ClockTime) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign for ClockTime {
    #[inline]
    fn add_assign(&mut self, rhs: ClockTime) {
        *self = self.saturating_add(rhs);
    }
}

/// `m:ss`, or `m:ss.t` with the alternate flag (`{:#}`)
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mins, secs, tenths) = self.parts();
        if f.alternate() {
            write!(f, "{}:{:02}.{}", mins, secs, tenths)
        } else {
            write!(f, "{}:{:02}", mins, secs)
        }
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:.3}s)", self.as_secs_f64())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        ClockTime::try_from_secs_f64(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid clock time: {secs}")))
    }
}
