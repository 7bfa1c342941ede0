//! Game simulator - scripted games on simulated time
//!
//! Runs a script of presses, pauses and thinking periods against one engine,
//! ticking at a fixed cadence and checking every invariant after each
//! mutation.

use std::time::Duration;

use flagfall_core::{InvariantCompliant, InvariantViolation, Side};
use flagfall_engine::{ClockEngine, ClockEvent, EngineConfig, Snapshot};

/// One scripted action
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Press(Side),
    Pause,
    Reset,
    Configure { initial_secs: f64, increment_secs: f64 },
    /// Let simulated time pass
    Think(Duration),
}

impl Step {
    pub fn think_ms(ms: u64) -> Self {
        Step::Think(Duration::from_millis(ms))
    }
}

/// Simulator configuration
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Driver cadence
    pub tick: Duration,
    pub engine: EngineConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            tick: Duration::from_millis(100),
            engine: EngineConfig::default(),
        }
    }
}

impl SimConfig {
    /// Whole-second ticks, as in the earliest clock displays
    pub fn coarse() -> Self {
        SimConfig {
            tick: Duration::from_secs(1),
            ..Self::default()
        }
    }
}

/// Outcome of a simulated game
#[derive(Clone, Debug)]
pub struct SimulationReport {
    /// Total simulated time
    pub elapsed: Duration,
    /// Every event, stamped with simulated time
    pub events: Vec<(Duration, ClockEvent)>,
    pub ticks: u64,
    pub final_snapshot: Snapshot,
    pub violations: Vec<InvariantViolation>,
}

impl SimulationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Simulated time at which a flag fell, with the flagged side
    pub fn flag_fall(&self) -> Option<(Duration, Side)> {
        self.events.iter().find_map(|(at, event)| match event {
            ClockEvent::Flagged { side } => Some((*at, *side)),
            _ => None,
        })
    }

    pub fn presses(&self) -> usize {
        self.events
            .iter()
            .filter(|(_, e)| matches!(e, ClockEvent::Pressed { .. }))
            .count()
    }
}

/// Drives one engine through a script
pub struct GameSimulator {
    engine: ClockEngine,
    tick: Duration,
    elapsed: Duration,
    ticks: u64,
    events: Vec<(Duration, ClockEvent)>,
    last: Snapshot,
    violations: Vec<InvariantViolation>,
}

impl GameSimulator {
    pub fn new(config: SimConfig) -> Self {
        let engine = ClockEngine::with_config(config.engine);
        let last = engine.snapshot();
        GameSimulator {
            engine,
            tick: config.tick.max(Duration::from_micros(1)),
            elapsed: Duration::ZERO,
            ticks: 0,
            events: Vec::new(),
            last,
            violations: Vec::new(),
        }
    }

    pub fn apply(&mut self, step: Step) {
        match step {
            Step::Press(side) => {
                let event = self.engine.press(side);
                self.record(event);
                self.check(false);
            }
            Step::Pause => {
                let event = self.engine.pause();
                self.record(event);
                self.check(false);
            }
            Step::Reset => {
                let event = self.engine.reset();
                self.record(Some(event));
                self.check(true);
            }
            Step::Configure {
                initial_secs,
                increment_secs,
            } => {
                let control = self.engine.configure(initial_secs, increment_secs);
                self.record(Some(ClockEvent::Configured { control }));
                self.check(false);
            }
            Step::Think(duration) => self.think(duration),
        }
    }

    /// Tick through `duration`; a trailing partial interval is one short tick
    fn think(&mut self, duration: Duration) {
        let mut left = duration;
        while !left.is_zero() {
            let dt = left.min(self.tick);
            left -= dt;
            self.elapsed += dt;
            self.ticks += 1;
            let event = self.engine.tick(dt);
            self.record(event);
            self.check(false);
        }
    }

    pub fn run<I: IntoIterator<Item = Step>>(mut self, steps: I) -> SimulationReport {
        for step in steps {
            self.apply(step);
        }
        self.report()
    }

    pub fn engine(&self) -> &ClockEngine {
        &self.engine
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn report(self) -> SimulationReport {
        SimulationReport {
            elapsed: self.elapsed,
            events: self.events,
            ticks: self.ticks,
            final_snapshot: self.engine.snapshot(),
            violations: self.violations,
        }
    }

    fn record(&mut self, event: Option<ClockEvent>) {
        if let Some(event) = event {
            self.events.push((self.elapsed, event));
        }
    }

    fn check(&mut self, reset_between: bool) {
        let snapshot = self.engine.snapshot();
        if let Err(violations) = snapshot.verify_invariants() {
            self.violations.extend(violations);
        }
        if let Err(violation) = self.last.verify_transition(&snapshot, reset_between) {
            self.violations.push(violation);
        }
        self.last = snapshot;
    }
}
