//! Lock-guarded engine for hosts that bring their own timer
//!
//! Every call takes the lock for its whole duration, so commands from any
//! thread are serialized with the host's ticks.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use flagfall_core::{Side, TimeControl};
use flagfall_engine::{ClockEngine, ClockEvent, EngineConfig, Snapshot};

#[derive(Clone, Default)]
pub struct SharedClock {
    inner: Arc<Mutex<ClockEngine>>,
}

impl SharedClock {
    pub fn new(engine: ClockEngine) -> Self {
        SharedClock {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::new(ClockEngine::with_config(config))
    }

    pub fn press(&self, side: Side) -> Option<ClockEvent> {
        self.inner.lock().press(side)
    }

    pub fn pause(&self) -> Option<ClockEvent> {
        self.inner.lock().pause()
    }

    pub fn reset(&self) -> ClockEvent {
        self.inner.lock().reset()
    }

    pub fn configure(&self, initial_secs: f64, increment_secs: f64) -> TimeControl {
        self.inner.lock().configure(initial_secs, increment_secs)
    }

    pub fn apply_settings(&self, initial_secs: f64, increment_secs: f64) -> ClockEvent {
        self.inner.lock().apply_settings(initial_secs, increment_secs)
    }

    pub fn tick(&self, dt: Duration) -> Option<ClockEvent> {
        self.inner.lock().tick(dt)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Run several engine calls under one lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut ClockEngine) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}
