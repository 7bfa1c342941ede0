//! Output routing
//!
//! Text mode writes status lines and notices to one stream. JSON mode keeps
//! stdout machine-readable: snapshots and events go there as JSON lines and
//! human notices go to the error stream.

use std::io::{self, Write};

use flagfall_engine::{ClockEvent, Snapshot};

use crate::display;

pub struct Screen<O, E> {
    json: bool,
    last_line: Option<String>,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Screen<O, E> {
    pub fn new(json: bool, out: O, err: E) -> Self {
        Screen {
            json,
            last_line: None,
            out,
            err,
        }
    }

    /// Redraw when the visible line changed; every snapshot in JSON mode
    pub fn show(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, snapshot)?;
            return writeln!(self.out);
        }
        let line = display::render_line(snapshot);
        if self.last_line.as_deref() != Some(line.as_str()) {
            writeln!(self.out, "{}", line)?;
            self.last_line = Some(line);
        }
        Ok(())
    }

    pub fn event(&mut self, event: &ClockEvent) -> io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, event)?;
            return writeln!(self.out);
        }
        if let ClockEvent::Flagged { side } = event {
            writeln!(self.out, "{}", display::game_over(*side))?;
        }
        Ok(())
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        if self.json {
            writeln!(self.err, "{}", text)
        } else {
            writeln!(self.out, "{}", text)
        }
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}
