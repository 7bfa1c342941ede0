//! Driver configuration

use std::time::Duration;

use flagfall_engine::EngineConfig;

/// Tick driver configuration
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Interval between ticks; also the delta handed to the engine
    pub tick_interval: Duration,
    /// Pending commands before senders wait
    pub command_buffer: usize,
    /// Events retained for slow subscribers
    pub event_buffer: usize,
    /// Engine construction parameters
    pub engine: EngineConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            tick_interval: Duration::from_millis(100),
            command_buffer: 64,
            event_buffer: 64,
            engine: EngineConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Whole-second ticks, for displays without tenths
    pub fn coarse() -> Self {
        DriverConfig {
            tick_interval: Duration::from_secs(1),
            ..Self::default()
        }
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}
