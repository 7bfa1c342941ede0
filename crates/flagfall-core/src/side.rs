//! Player sides

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::ClockError;

/// One of the two clock faces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Top, Side::Bottom];

    /// The other side
    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "t" => Ok(Side::Top),
            "bottom" | "b" => Ok(Side::Bottom),
            _ => Err(ClockError::UnknownSide(s.to_string())),
        }
    }
}

/// A value held once per side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerSide<T> {
    pub top: T,
    pub bottom: T,
}

impl<T> PerSide<T> {
    pub const fn new(top: T, bottom: T) -> Self {
        PerSide { top, bottom }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> PerSide<U> {
        PerSide {
            top: f(self.top),
            bottom: f(self.bottom),
        }
    }

    /// `(side, value)` pairs, top first
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Top, &self.top), (Side::Bottom, &self.bottom)].into_iter()
    }
}

impl<T: Clone> PerSide<T> {
    /// Same value on both sides
    pub fn splat(value: T) -> Self {
        PerSide {
            top: value.clone(),
            bottom: value,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Top.opponent(), Side::Bottom);
        assert_eq!(Side::Bottom.opponent(), Side::Top);
        for side in Side::ALL {
            assert_eq!(side.opponent().opponent(), side);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("top".parse::<Side>().unwrap(), Side::Top);
        assert_eq!(" B ".parse::<Side>().unwrap(), Side::Bottom);
        assert!(matches!(
            "left".parse::<Side>(),
            Err(ClockError::UnknownSide(s)) if s == "left"
        ));
    }

    #[test]
    fn test_per_side_index() {
        let mut values = PerSide::splat(0u32);
        values[Side::Bottom] = 7;
        assert_eq!(values.top, 0);
        assert_eq!(values[Side::Bottom], 7);

        let doubled = values.map(|v| v * 2);
        assert_eq!(doubled.bottom, 14);

        let sides: Vec<Side> = values.iter().map(|(s, _)| s).collect();
        assert_eq!(sides, vec![Side::Top, Side::Bottom]);
    }
}
