//! Text rendering of snapshots

use flagfall_core::{ClockTime, Side};
use flagfall_engine::Snapshot;

/// Tenths appear once a clock drops below this
const TENTHS_BELOW: ClockTime = ClockTime::from_secs(10);

pub fn format_remaining(t: ClockTime) -> String {
    if t < TENTHS_BELOW {
        format!("{:#}", t)
    } else {
        t.to_string()
    }
}

fn face(snapshot: &Snapshot, side: Side) -> String {
    let marker = if snapshot.expired[side] {
        'X'
    } else if snapshot.active == Some(side) {
        '>'
    } else {
        ' '
    };
    format!("{} {} {}", marker, side, format_remaining(snapshot.remaining[side]))
}

/// `> top 4:59 |   bottom 5:00`
pub fn render_line(snapshot: &Snapshot) -> String {
    format!("{} | {}", face(snapshot, Side::Top), face(snapshot, Side::Bottom))
}

pub fn game_over(flagged: Side) -> String {
    let name = match flagged {
        Side::Top => "Top",
        Side::Bottom => "Bottom",
    };
    format!("Game over: {} player's time is up.", name)
}
