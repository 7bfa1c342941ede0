//! Line commands

use std::time::Duration;

use flagfall_core::Side;

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Press(Side),
    Pause,
    /// Reset needs a y/n confirmation first
    Reset,
    Confirm(bool),
    Settings { initial: Duration, increment: Duration },
    Help,
    Quit,
    Empty,
}

pub fn parse(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Input::Empty);
    };

    let input = match head.to_ascii_lowercase().as_str() {
        "p" | "pause" => Input::Pause,
        "r" | "reset" => Input::Reset,
        "y" | "yes" => Input::Confirm(true),
        "n" | "no" => Input::Confirm(false),
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        "s" | "set" | "settings" => {
            let initial = words
                .next()
                .ok_or_else(|| "usage: s <initial> [increment], e.g. s 5m 3s".to_string())?;
            let initial = parse_duration(initial)?;
            let increment = match words.next() {
                Some(word) => parse_duration(word)?,
                None => Duration::ZERO,
            };
            Input::Settings { initial, increment }
        }
        other => Input::Press(other.parse().map_err(|e| format!("{}", e))?),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument: {}", extra));
    }
    Ok(input)
}

/// humantime durations, or a bare number of minutes as the settings picker offers
fn parse_duration(word: &str) -> Result<Duration, String> {
    if let Ok(minutes) = word.parse::<u64>() {
        let secs = minutes
            .checked_mul(60)
            .ok_or_else(|| format!("{}: too many minutes", word))?;
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(word).map_err(|e| format!("{}: {}", word, e))
}

pub const HELP: &str = "\
Commands:
  t | top        top player ends their move
  b | bottom     bottom player ends their move
  p | pause      stop both clocks
  r | reset      restore the starting time (asks to confirm)
  s <init> [inc] new time control, e.g. `s 5m 3s`, `s 30s`, `s 15`
  q | quit       exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides() {
        assert_eq!(parse("t"), Ok(Input::Press(Side::Top)));
        assert_eq!(parse("  Bottom "), Ok(Input::Press(Side::Bottom)));
        assert!(parse("left").is_err());
    }

    #[test]
    fn test_settings() {
        assert_eq!(
            parse("s 5m 3s"),
            Ok(Input::Settings {
                initial: Duration::from_secs(300),
                increment: Duration::from_secs(3),
            })
        );
        assert_eq!(
            parse("set 30s"),
            Ok(Input::Settings {
                initial: Duration::from_secs(30),
                increment: Duration::ZERO,
            })
        );
        assert_eq!(
            parse("s 15"),
            Ok(Input::Settings {
                initial: Duration::from_secs(900),
                increment: Duration::ZERO,
            })
        );
        assert!(parse("s").is_err());
        assert!(parse("s soon").is_err());
    }

    #[test]
    fn test_oversized_minutes_are_rejected() {
        assert_eq!(
            parse("s 400000000000000000"),
            Err("400000000000000000: too many minutes".to_string())
        );
        assert!(parse("s 5 400000000000000000").is_err());
    }

    #[test]
    fn test_misc() {
        assert_eq!(parse(""), Ok(Input::Empty));
        assert_eq!(parse("r"), Ok(Input::Reset));
        assert_eq!(parse("y"), Ok(Input::Confirm(true)));
        assert_eq!(parse("q"), Ok(Input::Quit));
        assert!(parse("p now").is_err());
    }
}
