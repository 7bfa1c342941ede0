//! Clock driver - runtime loop owning one engine
//!
//! A single task owns the [`ClockEngine`]. Commands reach it through a
//! bounded channel, so every mutation is serialized with the periodic tick.
//! The tick timer is armed only while a side is running.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{self, MissedTickBehavior};

use flagfall_core::{Side, TimeControl};
use flagfall_engine::{ClockEngine, ClockEvent, Snapshot};

use crate::{DriverConfig, RuntimeError, RuntimeResult};

/// Counters kept by the driver task
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub ticks: u64,
    pub commands: u64,
    pub ignored_commands: u64,
    pub flag_falls: u64,
}

enum Command {
    Press {
        side: Side,
        reply: oneshot::Sender<Option<ClockEvent>>,
    },
    Pause {
        reply: oneshot::Sender<Option<ClockEvent>>,
    },
    Reset {
        reply: oneshot::Sender<ClockEvent>,
    },
    Configure {
        initial_secs: f64,
        increment_secs: f64,
        reply: oneshot::Sender<TimeControl>,
    },
    ApplySettings {
        initial_secs: f64,
        increment_secs: f64,
        reply: oneshot::Sender<ClockEvent>,
    },
    Stats {
        reply: oneshot::Sender<DriverStats>,
    },
    Shutdown {
        reply: oneshot::Sender<DriverStats>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Command result held back until the snapshot has been published
enum Reply {
    Outcome(oneshot::Sender<Option<ClockEvent>>, Option<ClockEvent>),
    Event(oneshot::Sender<ClockEvent>, ClockEvent),
    Control(oneshot::Sender<TimeControl>, TimeControl),
    Stats(oneshot::Sender<DriverStats>),
    Shutdown(oneshot::Sender<DriverStats>),
}

impl Reply {
    /// Dropped receivers are fine: the caller stopped waiting
    fn send(self, stats: &DriverStats) -> Flow {
        match self {
            Reply::Outcome(tx, event) => {
                let _ = tx.send(event);
            }
            Reply::Event(tx, event) => {
                let _ = tx.send(event);
            }
            Reply::Control(tx, control) => {
                let _ = tx.send(control);
            }
            Reply::Stats(tx) => {
                let _ = tx.send(stats.clone());
            }
            Reply::Shutdown(tx) => {
                let _ = tx.send(stats.clone());
                return Flow::Stop;
            }
        }
        Flow::Continue
    }
}

/// Runtime loop state
pub struct ClockDriver {
    engine: ClockEngine,
    tick_interval: Duration,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<ClockEvent>,
    stats: DriverStats,
}

impl ClockDriver {
    /// Spawn the driver onto the current tokio runtime and return a handle.
    ///
    /// The task exits on [`ClockHandle::shutdown`] or once every handle has
    /// been dropped.
    pub fn spawn(config: DriverConfig) -> ClockHandle {
        let engine = ClockEngine::with_config(config.engine);
        // tokio intervals reject a zero period
        let tick_interval = config.tick_interval.max(Duration::from_millis(1));
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
        let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));

        let driver = ClockDriver {
            engine,
            tick_interval,
            commands: command_rx,
            snapshots: snapshot_tx,
            events: event_tx.clone(),
            stats: DriverStats::default(),
        };

        tracing::debug!(?tick_interval, "spawning clock driver");
        tokio::spawn(driver.run());

        ClockHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
        }
    }

    async fn run(mut self) {
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            let running = self.engine.is_running();

            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("all clock handles dropped");
                        break;
                    };
                    let reply = self.handle_command(command);
                    // First tick lands one full interval after the clock starts
                    if !running && self.engine.is_running() {
                        ticker.reset();
                    }
                    // Callers that see the reply must also see the new snapshot
                    self.publish_snapshot();
                    if reply.send(&self.stats) == Flow::Stop {
                        break;
                    }
                }
                _ = ticker.tick(), if running => {
                    self.tick();
                    self.publish_snapshot();
                }
            }
        }

        tracing::debug!(stats = ?self.stats, "clock driver stopped");
    }

    fn tick(&mut self) {
        self.stats.ticks += 1;
        if let Some(event) = self.engine.tick(self.tick_interval) {
            self.stats.flag_falls += 1;
            self.publish_event(event);
        }
    }

    /// Apply one command and return the reply still to be sent
    fn handle_command(&mut self, command: Command) -> Reply {
        self.stats.commands += 1;

        match command {
            Command::Press { side, reply } => {
                let event = self.engine.press(side);
                self.record(event);
                Reply::Outcome(reply, event)
            }
            Command::Pause { reply } => {
                let event = self.engine.pause();
                self.record(event);
                Reply::Outcome(reply, event)
            }
            Command::Reset { reply } => {
                let event = self.engine.reset();
                self.publish_event(event);
                Reply::Event(reply, event)
            }
            Command::Configure {
                initial_secs,
                increment_secs,
                reply,
            } => {
                let control = self.engine.configure(initial_secs, increment_secs);
                self.publish_event(ClockEvent::Configured { control });
                Reply::Control(reply, control)
            }
            Command::ApplySettings {
                initial_secs,
                increment_secs,
                reply,
            } => {
                let control = self.engine.configure(initial_secs, increment_secs);
                self.publish_event(ClockEvent::Configured { control });
                let event = self.engine.reset();
                self.publish_event(event);
                Reply::Event(reply, event)
            }
            Command::Stats { reply } => Reply::Stats(reply),
            Command::Shutdown { reply } => Reply::Shutdown(reply),
        }
    }

    fn record(&mut self, event: Option<ClockEvent>) {
        match event {
            Some(event) => self.publish_event(event),
            None => self.stats.ignored_commands += 1,
        }
    }

    fn publish_event(&self, event: ClockEvent) {
        tracing::debug!(%event, "clock event");
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn publish_snapshot(&self) {
        let snapshot = self.engine.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

/// Cloneable front door to a running [`ClockDriver`]
#[derive(Clone)]
pub struct ClockHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    events: broadcast::Sender<ClockEvent>,
}

impl ClockHandle {
    /// `side` finished its move. `None` when the engine ignored the press.
    pub async fn press(&self, side: Side) -> RuntimeResult<Option<ClockEvent>> {
        self.request(|reply| Command::Press { side, reply }).await
    }

    pub async fn pause(&self) -> RuntimeResult<Option<ClockEvent>> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn reset(&self) -> RuntimeResult<ClockEvent> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Store a new control; returns the control actually applied
    pub async fn configure(
        &self,
        initial_secs: f64,
        increment_secs: f64,
    ) -> RuntimeResult<TimeControl> {
        self.request(|reply| Command::Configure {
            initial_secs,
            increment_secs,
            reply,
        })
        .await
    }

    /// Configure, then reset both sides to the new starting time
    pub async fn apply_settings(
        &self,
        initial_secs: f64,
        increment_secs: f64,
    ) -> RuntimeResult<ClockEvent> {
        self.request(|reply| Command::ApplySettings {
            initial_secs,
            increment_secs,
            reply,
        })
        .await
    }

    pub async fn stats(&self) -> RuntimeResult<DriverStats> {
        self.request(|reply| Command::Stats { reply }).await
    }

    /// Stop the driver and return its final counters
    pub async fn shutdown(&self) -> RuntimeResult<DriverStats> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        *self.snapshots.borrow()
    }

    /// Receiver notified whenever the snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Receiver for events published after this call
    pub fn events(&self) -> broadcast::Receiver<ClockEvent> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> RuntimeResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| RuntimeError::DriverStopped)?;
        response.await.map_err(|_| RuntimeError::DriverStopped)
    }
}
