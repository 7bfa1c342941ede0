//! Clock Engine - the two-sided countdown state machine

use std::time::Duration;

use flagfall_core::{ClockTime, PerSide, Side, TimeControl};

use crate::{ClockEvent, Phase, SideClock, Snapshot};

/// Which presses the engine accepts while a clock is running
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PressPolicy {
    /// Only the running side (or either side while idle) may press
    #[default]
    ActiveOrIdle,
    /// Either side may press at any time; the presser's opponent runs next
    Any,
}

/// Engine configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Starting allotment and increment
    pub control: TimeControl,
    /// Legal-press policy
    pub press_policy: PressPolicy,
}

impl EngineConfig {
    /// Accept presses from either side at any time
    pub fn permissive() -> Self {
        EngineConfig {
            press_policy: PressPolicy::Any,
            ..Self::default()
        }
    }
}

/// Clock Engine - owns both budgets and every timing rule
///
/// Mutated only through its commands and [`ClockEngine::tick`]; callers must
/// serialize those calls. The engine never reads the wall clock.
pub struct ClockEngine {
    clocks: PerSide<SideClock>,
    /// Running side; `None` while paused, idle or expired
    active: Option<Side>,
    control: TimeControl,
    press_policy: PressPolicy,
}

impl ClockEngine {
    /// Create an engine with the default 5+0 control
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        ClockEngine {
            clocks: PerSide::splat(SideClock::new(config.control.initial())),
            active: None,
            control: config.control,
            press_policy: config.press_policy,
        }
    }

    /// `side` finished its move: credit its increment and start the opponent.
    ///
    /// Ignored once a flag has fallen, and ignored when the press policy
    /// rejects `side`.
    pub fn press(&mut self, side: Side) -> Option<ClockEvent> {
        if let Some(flagged) = self.flagged() {
            tracing::debug!(%side, %flagged, "press ignored: flag already fell");
            return None;
        }
        if self.press_policy == PressPolicy::ActiveOrIdle {
            if let Some(active) = self.active.filter(|&active| active != side) {
                tracing::debug!(%side, %active, "press ignored: not this side's turn");
                return None;
            }
        }

        let credited = self.control.increment();
        self.clocks[side].credit(credited);

        let running = side.opponent();
        let from_idle = self.active.replace(running).is_none();

        Some(ClockEvent::Pressed {
            by: side,
            running,
            credited,
            from_idle,
        })
    }

    /// Stop whichever clock is running. Idempotent.
    pub fn pause(&mut self) -> Option<ClockEvent> {
        self.active.take().map(|side| ClockEvent::Paused { side })
    }

    /// Restore both sides to the configured starting time and stop
    pub fn reset(&mut self) -> ClockEvent {
        let initial = self.control.initial();
        for side in Side::ALL {
            self.clocks[side].reset_to(initial);
        }
        self.active = None;
        ClockEvent::Reset {
            control: self.control,
        }
    }

    /// Store a new control from raw seconds, falling back to defaults for
    /// invalid values. Remaining times are untouched until [`ClockEngine::reset`].
    pub fn configure(&mut self, initial_secs: f64, increment_secs: f64) -> TimeControl {
        let control = TimeControl::from_secs_lossy(initial_secs, increment_secs);
        if ClockTime::try_from_secs_f64(initial_secs).map_or(true, ClockTime::is_zero) {
            tracing::warn!(
                initial_secs,
                fallback = %control.initial(),
                "invalid initial time, using default"
            );
        }
        if ClockTime::try_from_secs_f64(increment_secs).is_none() {
            tracing::warn!(increment_secs, "invalid increment, using zero");
        }
        self.set_control(control);
        control
    }

    /// Store an already-validated control
    pub fn set_control(&mut self, control: TimeControl) {
        self.control = control;
    }

    /// Configure and immediately reapply, as the settings dialog does on save
    pub fn apply_settings(&mut self, initial_secs: f64, increment_secs: f64) -> ClockEvent {
        self.configure(initial_secs, increment_secs);
        self.reset()
    }

    /// Advance simulated time by `dt`.
    /// Returns `Flagged` on the tick that drives the running side to zero.
    ///
    /// Clocks count whole microseconds: any sub-microsecond part of `dt` is
    /// dropped, so drivers should pass deltas of at least 1µs.
    pub fn tick(&mut self, dt: Duration) -> Option<ClockEvent> {
        let side = self.active?;
        if !self.clocks[side].consume(dt) {
            return None;
        }

        self.active = None;
        tracing::info!(%side, "flag fell");
        Some(ClockEvent::Flagged { side })
    }

    pub fn snapshot(&self) -> Snapshot {
        let remaining = self.clocks.map(|c| c.remaining());
        Snapshot {
            remaining,
            active: self.active,
            expired: self.clocks.map(|c| c.is_expired()),
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.flagged(), self.active) {
            (Some(side), _) => Phase::Expired(side),
            (None, Some(side)) => Phase::Running(side),
            (None, None) => Phase::Idle,
        }
    }

    pub fn control(&self) -> TimeControl {
        self.control
    }

    pub fn press_policy(&self) -> PressPolicy {
        self.press_policy
    }

    pub fn remaining(&self, side: Side) -> ClockTime {
        self.clocks[side].remaining()
    }

    pub fn active(&self) -> Option<Side> {
        self.active
    }

    pub fn is_expired(&self, side: Side) -> bool {
        self.clocks[side].is_expired()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    fn flagged(&self) -> Option<Side> {
        Side::ALL.into_iter().find(|&s| self.clocks[s].is_expired())
    }
}

impl Default for ClockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flagfall_core::InvariantCompliant;

    fn secs(s: u64) -> ClockTime {
        ClockTime::from_secs(s)
    }

    fn engine_with(initial_secs: f64, increment_secs: f64) -> ClockEngine {
        let mut engine = ClockEngine::new();
        engine.apply_settings(initial_secs, increment_secs);
        engine
    }

    /// Run `side` down to exactly zero
    fn flag(engine: &mut ClockEngine, side: Side) {
        if engine.active() != Some(side) {
            engine.pause();
            engine.press(side.opponent());
        }
        let remaining = engine.remaining(side);
        engine.tick(remaining.into());
    }

    #[test]
    fn test_sub_microsecond_tick_is_dropped() {
        let mut engine = ClockEngine::new();
        engine.press(Side::Top);

        assert_eq!(engine.tick(Duration::from_nanos(999)), None);
        assert_eq!(engine.remaining(Side::Bottom), secs(300));

        engine.tick(Duration::from_nanos(1_999));
        assert_eq!(
            engine.remaining(Side::Bottom),
            ClockTime::from_micros(299_999_999)
        );
    }

    #[test]
    fn test_new_engine_is_idle_at_default() {
        let engine = ClockEngine::new();
        let snap = engine.snapshot();

        assert_eq!(snap.remaining_top(), secs(300));
        assert_eq!(snap.remaining_bottom(), secs(300));
        assert_eq!(snap.active, None);
        assert!(!snap.expired_top() && !snap.expired_bottom());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_press_from_idle_starts_opponent() {
        let mut engine = ClockEngine::new();

        let event = engine.press(Side::Top);

        assert_eq!(
            event,
            Some(ClockEvent::Pressed {
                by: Side::Top,
                running: Side::Bottom,
                credited: ClockTime::ZERO,
                from_idle: true,
            })
        );
        assert_eq!(engine.phase(), Phase::Running(Side::Bottom));
    }

    #[test]
    fn test_turn_switch_credits_increment() {
        let mut engine = engine_with(60.0, 5.0);
        engine.press(Side::Bottom);
        assert_eq!(engine.active(), Some(Side::Top));
        engine.tick(Duration::from_secs(12));
        let before = engine.remaining(Side::Top);

        let event = engine.press(Side::Top);

        assert_eq!(engine.active(), Some(Side::Bottom));
        assert_eq!(engine.remaining(Side::Top), before + secs(5));
        assert!(matches!(
            event,
            Some(ClockEvent::Pressed { from_idle: false, .. })
        ));
    }

    #[test]
    fn test_turn_switch_without_increment_leaves_time() {
        let mut engine = ClockEngine::new();
        engine.press(Side::Bottom);
        engine.tick(Duration::from_millis(2_300));

        engine.press(Side::Top);

        assert_eq!(engine.remaining(Side::Top), ClockTime::from_millis(297_700));
        assert_eq!(engine.remaining(Side::Bottom), secs(300));
    }

    #[test]
    fn test_out_of_turn_press_is_ignored() {
        let mut engine = ClockEngine::new();
        engine.press(Side::Bottom);
        let before = engine.snapshot();

        assert_eq!(engine.press(Side::Bottom), None);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_permissive_policy_accepts_any_press() {
        let mut engine = ClockEngine::with_config(EngineConfig {
            control: TimeControl::from_minutes(1, 2),
            press_policy: PressPolicy::Any,
        });
        engine.press(Side::Bottom);
        assert_eq!(engine.active(), Some(Side::Top));

        let event = engine.press(Side::Bottom);

        assert!(event.is_some());
        assert_eq!(engine.active(), Some(Side::Top));
        assert_eq!(engine.remaining(Side::Bottom), secs(64));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut engine = ClockEngine::new();
        engine.press(Side::Top);
        engine.tick(Duration::from_millis(700));

        assert_eq!(engine.pause(), Some(ClockEvent::Paused { side: Side::Bottom }));
        let once = engine.snapshot();
        assert_eq!(engine.pause(), None);

        assert_eq!(engine.snapshot(), once);
        assert_eq!(once.active, None);
        assert_eq!(once.remaining_bottom(), ClockTime::from_millis(299_300));
    }

    #[test]
    fn test_reset_restores_configured_initial() {
        let mut engine = ClockEngine::new();
        engine.press(Side::Top);
        engine.tick(Duration::from_secs(30));

        engine.configure(180.0, 5.0);
        // configure alone leaves the clock where it was
        assert_eq!(engine.remaining(Side::Bottom), secs(270));
        assert_eq!(engine.active(), Some(Side::Bottom));

        engine.reset();

        assert_eq!(engine.remaining(Side::Top), secs(180));
        assert_eq!(engine.remaining(Side::Bottom), secs(180));
        assert_eq!(engine.active(), None);
    }

    #[test]
    fn test_tick_accumulates_to_exact_zero() {
        let mut engine = engine_with(5.0, 0.0);
        engine.press(Side::Bottom);

        let mut flagged = Vec::new();
        for _ in 0..10 {
            flagged.extend(engine.tick(Duration::from_millis(500)));
        }

        assert_eq!(flagged, vec![ClockEvent::Flagged { side: Side::Top }]);
        assert_eq!(engine.remaining(Side::Top), ClockTime::ZERO);
        assert!(engine.is_expired(Side::Top));
        assert_eq!(engine.active(), None);

        // An eleventh tick changes nothing
        assert_eq!(engine.tick(Duration::from_millis(500)), None);
        assert_eq!(engine.remaining(Side::Top), ClockTime::ZERO);
        assert_eq!(engine.phase(), Phase::Expired(Side::Top));
    }

    #[test]
    fn test_tick_clamps_at_zero() {
        let mut engine = engine_with(1.0, 0.0);
        engine.press(Side::Top);

        assert_eq!(
            engine.tick(Duration::from_secs(7)),
            Some(ClockEvent::Flagged { side: Side::Bottom })
        );
        assert_eq!(engine.remaining(Side::Bottom), ClockTime::ZERO);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut engine = ClockEngine::new();
        assert_eq!(engine.tick(Duration::from_secs(10)), None);
        assert_eq!(engine.remaining(Side::Top), secs(300));
        assert_eq!(engine.remaining(Side::Bottom), secs(300));
    }

    #[test]
    fn test_presses_ignored_after_flag_fall() {
        let mut engine = engine_with(10.0, 3.0);
        flag(&mut engine, Side::Top);
        let before = engine.snapshot();
        assert!(before.expired_top());

        assert_eq!(engine.press(Side::Top), None);
        assert_eq!(engine.press(Side::Bottom), None);
        assert_eq!(engine.pause(), None);
        engine.configure(60.0, 0.0);

        let after = engine.snapshot();
        assert_eq!(after, before);
        assert_eq!(after.active, None);
    }

    #[test]
    fn test_reset_clears_expiry() {
        let mut engine = engine_with(10.0, 0.0);
        flag(&mut engine, Side::Bottom);
        assert_eq!(engine.phase(), Phase::Expired(Side::Bottom));

        assert_eq!(
            engine.reset(),
            ClockEvent::Reset {
                control: TimeControl::from_secs_lossy(10.0, 0.0)
            }
        );

        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!engine.is_expired(Side::Bottom));
        assert!(engine.press(Side::Top).is_some());
    }

    #[test]
    fn test_configure_falls_back_on_invalid_input() {
        let mut engine = ClockEngine::new();

        let control = engine.configure(-5.0, -2.0);

        assert_eq!(control.initial(), secs(300));
        assert_eq!(control.increment(), ClockTime::ZERO);
        assert_eq!(engine.control(), control);

        let control = engine.configure(f64::NAN, 4.0);
        assert_eq!(control.initial(), secs(300));
        assert_eq!(control.increment(), secs(4));
    }

    #[test]
    fn test_configure_accepts_short_presets() {
        let mut engine = ClockEngine::new();
        engine.apply_settings(10.0, 0.0);
        assert_eq!(engine.remaining(Side::Top), secs(10));
        engine.apply_settings(30.0, 1.5);
        assert_eq!(engine.remaining(Side::Bottom), secs(30));
        assert_eq!(engine.control().increment(), ClockTime::from_millis(1500));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut engine = ClockEngine::new();
        let snap = engine.snapshot();
        engine.press(Side::Top);
        engine.tick(Duration::from_secs(1));

        assert_eq!(snap.active, None);
        assert_eq!(snap.remaining_bottom(), secs(300));
    }

    #[test]
    fn test_snapshots_satisfy_invariants_through_a_game() {
        let mut engine = engine_with(3.0, 1.0);
        let mut prev = engine.snapshot();
        let script: [(Option<Side>, u64); 8] = [
            (Some(Side::Top), 900),
            (Some(Side::Bottom), 400),
            (None, 300),
            (Some(Side::Top), 1_000),
            (Some(Side::Bottom), 2_000),
            (Some(Side::Top), 5_000),
            (Some(Side::Bottom), 100),
            (None, 100),
        ];

        for (press, think_ms) in script {
            match press {
                Some(side) => {
                    engine.press(side);
                }
                None => {
                    engine.pause();
                }
            }
            for _ in 0..(think_ms / 100) {
                engine.tick(Duration::from_millis(100));
                let snap = engine.snapshot();
                assert!(snap.verify_invariants().is_ok(), "{:?}", snap);
                assert!(prev.verify_transition(&snap, false).is_ok());
                prev = snap;
            }
        }

        assert!(prev.flagged().is_some());
    }
}
