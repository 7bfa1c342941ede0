//! Structured fuzz input for the clock engine
//!
//! `FuzzGame` is decoded from raw fuzzer bytes with `arbitrary` and replayed
//! against a fresh engine; any invariant violation is returned to the target,
//! which panics on it.

use std::time::Duration;

use arbitrary::Arbitrary;

use flagfall_core::{InvariantCompliant, InvariantViolation, Side};
use flagfall_engine::{ClockEngine, EngineConfig, PressPolicy, Snapshot};

#[derive(Arbitrary, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzSide {
    Top,
    Bottom,
}

impl From<FuzzSide> for Side {
    fn from(side: FuzzSide) -> Self {
        match side {
            FuzzSide::Top => Side::Top,
            FuzzSide::Bottom => Side::Bottom,
        }
    }
}

#[derive(Arbitrary, Debug, Clone)]
pub enum FuzzCommand {
    Press(FuzzSide),
    Pause,
    Reset,
    Configure { initial_secs: f64, increment_secs: f64 },
    Tick { millis: u16 },
}

#[derive(Arbitrary, Debug, Clone)]
pub struct FuzzGame {
    pub permissive: bool,
    /// Starting time in tenths of a second (zero falls back to the default)
    pub initial_tenths: u16,
    pub commands: Vec<FuzzCommand>,
}

/// Replay `game`, checking every invariant after each command
pub fn run_game(game: &FuzzGame) -> Result<Snapshot, InvariantViolation> {
    let press_policy = if game.permissive {
        PressPolicy::Any
    } else {
        PressPolicy::ActiveOrIdle
    };
    let mut engine = ClockEngine::with_config(EngineConfig {
        press_policy,
        ..EngineConfig::default()
    });
    engine.apply_settings(f64::from(game.initial_tenths) / 10.0, 0.0);

    let mut prev = engine.snapshot();
    for command in &game.commands {
        let reset = matches!(command, FuzzCommand::Reset);
        match *command {
            FuzzCommand::Press(side) => {
                engine.press(side.into());
            }
            FuzzCommand::Pause => {
                engine.pause();
            }
            FuzzCommand::Reset => {
                engine.reset();
            }
            FuzzCommand::Configure {
                initial_secs,
                increment_secs,
            } => {
                engine.configure(initial_secs, increment_secs);
            }
            FuzzCommand::Tick { millis } => {
                engine.tick(Duration::from_millis(u64::from(millis)));
            }
        }

        let snap = engine.snapshot();
        if let Err(mut violations) = snap.verify_invariants() {
            return Err(violations.remove(0));
        }
        prev.verify_transition(&snap, reset)?;
        prev = snap;
    }

    Ok(prev)
}

#[cfg(test)]
mod tests {
    use super::*;

    use arbitrary::Unstructured;

    #[test]
    fn test_run_game_from_bytes() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut u = Unstructured::new(&bytes);
        let game = FuzzGame::arbitrary(&mut u).unwrap();
        assert!(run_game(&game).is_ok());
    }

    #[test]
    fn test_run_game_to_flag() {
        let game = FuzzGame {
            permissive: false,
            initial_tenths: 5,
            commands: vec![
                FuzzCommand::Press(FuzzSide::Top),
                FuzzCommand::Tick { millis: 300 },
                FuzzCommand::Tick { millis: 300 },
                FuzzCommand::Press(FuzzSide::Bottom),
                FuzzCommand::Configure {
                    initial_secs: f64::NAN,
                    increment_secs: -1.0,
                },
            ],
        };

        let snap = run_game(&game).unwrap();
        assert_eq!(snap.flagged(), Some(Side::Bottom));
        assert_eq!(snap.active, None);
    }
}
