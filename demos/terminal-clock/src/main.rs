//! Flagfall terminal clock
//!
//! Line-oriented front-end over the clock driver:
//! - one command per line on stdin
//! - a status line whenever the visible time changes
//! - a game-over notice when a flag falls

mod display;
mod input;
mod screen;

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use flagfall_engine::ClockEvent;
use flagfall_runtime::{init_logging, ClockDriver, ClockHandle, DriverConfig, LogFormat};

use input::Input;
use screen::Screen;

struct Options {
    json: bool,
    tick: Duration,
}

fn parse_args() -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        json: false,
        tick: DriverConfig::default().tick_interval,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--tick-ms" => {
                let ms: u64 = args.next().ok_or("--tick-ms needs a value")?.parse()?;
                options.tick = Duration::from_millis(ms);
            }
            "-h" | "--help" => {
                println!("usage: terminal-clock [--json] [--tick-ms <n>]\n\n{}", input::HELP);
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {}", other).into()),
        }
    }
    Ok(options)
}

type Terminal = Screen<io::Stdout, io::Stderr>;

/// Apply one line. Returns false when the user asked to quit.
async fn handle_line(
    handle: &ClockHandle,
    screen: &mut Terminal,
    line: &str,
    pending_reset: &mut bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let parsed = match input::parse(line) {
        Ok(parsed) => parsed,
        Err(message) => {
            screen.notice(&message)?;
            return Ok(true);
        }
    };

    if *pending_reset && !matches!(parsed, Input::Confirm(_)) {
        screen.notice("Reset cancelled.")?;
        *pending_reset = false;
    }

    match parsed {
        Input::Press(side) => {
            if handle.press(side).await?.is_none() {
                screen.notice(&format!("Press from {} ignored.", side))?;
            }
        }
        Input::Pause => {
            handle.pause().await?;
        }
        Input::Reset => {
            screen.notice("Reset the clock? [y/n]")?;
            *pending_reset = true;
        }
        Input::Confirm(yes) => {
            if std::mem::take(pending_reset) && yes {
                handle.reset().await?;
            }
        }
        Input::Settings { initial, increment } => {
            let event = handle
                .apply_settings(initial.as_secs_f64(), increment.as_secs_f64())
                .await?;
            if let ClockEvent::Reset { control } = event {
                screen.notice(&format!("Time control {}", control))?;
            }
        }
        Input::Help => screen.notice(input::HELP)?,
        Input::Quit => return Ok(false),
        Input::Empty => {}
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;
    init_logging(if options.json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    })?;

    let handle = ClockDriver::spawn(DriverConfig {
        tick_interval: options.tick,
        ..DriverConfig::default()
    });
    let mut snapshots = handle.subscribe();
    let mut events = handle.events();
    let mut screen: Terminal = Screen::new(options.json, io::stdout(), io::stderr());

    if !options.json {
        println!("{}\n", input::HELP);
    }
    screen.show(&handle.snapshot())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending_reset = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&handle, &mut screen, &line, &mut pending_reset).await? {
                    break;
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *snapshots.borrow_and_update();
                screen.show(&snapshot)?;
            }
            event = events.recv() => match event {
                Ok(event) => screen.event(&event)?,
                Err(RecvError::Lagged(missed)) => tracing::warn!(missed, "event stream lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    let stats = handle.shutdown().await?;
    tracing::info!(
        ticks = stats.ticks,
        commands = stats.commands,
        flag_falls = stats.flag_falls,
        "clock stopped"
    );
    Ok(())
}
