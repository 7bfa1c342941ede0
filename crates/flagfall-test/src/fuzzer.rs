//! Game fuzzer - seeded random command streams
//!
//! Tests:
//! - Single active side under arbitrary press orders
//! - Expiry latch across presses, pauses and reconfiguration
//! - Configuration fallbacks for garbage input
//! - Both press policies

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flagfall_core::{InvariantViolation, Side};
use flagfall_engine::{ClockEvent, EngineConfig, PressPolicy};

use crate::{GameSimulator, SimConfig, Step};

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Number of generated steps
    pub steps: usize,
    /// Probability of a press (either side)
    pub press_prob: f64,
    /// Probability of a pause
    pub pause_prob: f64,
    /// Probability of a reset
    pub reset_prob: f64,
    /// Probability of a reconfiguration (including invalid values)
    pub configure_prob: f64,
    /// Longest single thinking period
    pub max_think: Duration,
    /// Tick cadence
    pub tick: Duration,
    pub press_policy: PressPolicy,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            steps: 1_000,
            press_prob: 0.4,
            pause_prob: 0.05,
            reset_prob: 0.02,
            configure_prob: 0.03,
            max_think: Duration::from_secs(20),
            tick: Duration::from_millis(100),
            press_policy: PressPolicy::ActiveOrIdle,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            steps: 200,
            ..Self::default()
        }
    }

    /// Heavy fuzzing with short clocks so flags fall often
    pub fn heavy() -> Self {
        FuzzerConfig {
            steps: 20_000,
            press_prob: 0.3,
            reset_prob: 0.01,
            configure_prob: 0.05,
            max_think: Duration::from_secs(90),
            ..Self::default()
        }
    }

    /// Either side may press at any time
    pub fn permissive() -> Self {
        FuzzerConfig {
            press_policy: PressPolicy::Any,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Fuzzing outcome
#[derive(Clone, Debug, Default)]
pub struct FuzzReport {
    pub steps: usize,
    pub presses_accepted: usize,
    pub flag_falls: usize,
    pub resets: usize,
    pub violations: Vec<InvariantViolation>,
}

impl FuzzReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Random game generator
pub struct GameFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
}

impl GameFuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        GameFuzzer { config, rng }
    }

    /// Generate the step stream without running it
    pub fn generate(&mut self) -> Vec<Step> {
        (0..self.config.steps).map(|_| self.next_step()).collect()
    }

    pub fn run(&mut self) -> FuzzReport {
        let steps = self.generate();
        let sim = GameSimulator::new(SimConfig {
            tick: self.config.tick,
            engine: EngineConfig {
                press_policy: self.config.press_policy,
                ..EngineConfig::default()
            },
        });
        let report = sim.run(steps);

        let mut fuzz = FuzzReport {
            steps: self.config.steps,
            violations: report.violations,
            ..FuzzReport::default()
        };
        for (_, event) in &report.events {
            match event {
                ClockEvent::Pressed { .. } => fuzz.presses_accepted += 1,
                ClockEvent::Flagged { .. } => fuzz.flag_falls += 1,
                ClockEvent::Reset { .. } => fuzz.resets += 1,
                _ => {}
            }
        }
        fuzz
    }

    fn next_step(&mut self) -> Step {
        let cfg = &self.config;
        let roll: f64 = self.rng.gen();

        let mut threshold = cfg.press_prob;
        if roll < threshold {
            let side = if self.rng.gen_bool(0.5) {
                Side::Top
            } else {
                Side::Bottom
            };
            return Step::Press(side);
        }
        threshold += cfg.pause_prob;
        if roll < threshold {
            return Step::Pause;
        }
        threshold += cfg.reset_prob;
        if roll < threshold {
            return Step::Reset;
        }
        threshold += cfg.configure_prob;
        if roll < threshold {
            return self.random_configure();
        }

        let max_ms = cfg.max_think.as_millis().max(1) as u64;
        Step::Think(Duration::from_millis(self.rng.gen_range(0..=max_ms)))
    }

    /// Mostly short valid controls, with garbage mixed in
    fn random_configure(&mut self) -> Step {
        let initial_secs = match self.rng.gen_range(0..10) {
            0 => -self.rng.gen_range(0.0..600.0),
            1 => f64::NAN,
            2 => 0.0,
            _ => self.rng.gen_range(1.0..120.0),
        };
        let increment_secs = match self.rng.gen_range(0..10) {
            0 => -self.rng.gen_range(0.0..60.0),
            1 => f64::INFINITY,
            _ => self.rng.gen_range(0.0..10.0),
        };
        Step::Configure {
            initial_secs,
            increment_secs,
        }
    }
}
