//! Command grammar for both controller variants.
//!
//! The first character selects the command (letters case-insensitive). Numeric
//! arguments are trimmed and parsed with `str::parse`; text that does not parse
//! reads as zero, which the range checks downstream then reject.

use crate::error::CommandError;

/// Frequency-variant command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyCommand {
    /// `I`
    Identify,
    /// `?`
    Status,
    /// `1r<rpm>`
    SpindleRun(i32),
    /// `1s`
    SpindleStop,
    /// `2f`
    FeedForward,
    /// `2b`
    FeedReverse,
    /// `2s`
    FeedStop,
    /// `2v<mm/s>`
    FeedVelocity(f32),
}

/// Positioning-variant command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositioningCommand {
    /// `g<inches>`
    GoTo(f32),
    /// `h`
    Home,
    /// `s`
    Stop,
    /// `v<in/s>`
    SetVelocity(f32),
    /// `r`
    ResetEncoder,
    /// `I`
    Identify,
    /// `?`
    Status,
}

impl FrequencyCommand {
    /// Parse a trimmed, non-empty line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let (head, rest) = split_first(line).ok_or(CommandError::UnknownCommand)?;

        match head {
            'I' => Ok(FrequencyCommand::Identify),
            '?' => Ok(FrequencyCommand::Status),
            '1' => {
                let (sub, arg) = split_first(rest).ok_or(CommandError::UnknownSubcommand { axis: 1 })?;
                match sub {
                    'R' => Ok(FrequencyCommand::SpindleRun(int_arg(arg))),
                    'S' => Ok(FrequencyCommand::SpindleStop),
                    _ => Err(CommandError::UnknownSubcommand { axis: 1 }),
                }
            }
            '2' => {
                let (sub, arg) = split_first(rest).ok_or(CommandError::UnknownSubcommand { axis: 2 })?;
                match sub {
                    'F' => Ok(FrequencyCommand::FeedForward),
                    'B' => Ok(FrequencyCommand::FeedReverse),
                    'S' => Ok(FrequencyCommand::FeedStop),
                    'V' => Ok(FrequencyCommand::FeedVelocity(float_arg(arg))),
                    _ => Err(CommandError::UnknownSubcommand { axis: 2 }),
                }
            }
            _ => Err(CommandError::UnknownCommand),
        }
    }
}

impl PositioningCommand {
    /// Parse a trimmed, non-empty line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let (head, arg) = split_first(line).ok_or(CommandError::UnknownCommand)?;

        match head {
            'G' => Ok(PositioningCommand::GoTo(float_arg(arg))),
            'H' => Ok(PositioningCommand::Home),
            'S' => Ok(PositioningCommand::Stop),
            'V' => Ok(PositioningCommand::SetVelocity(float_arg(arg))),
            'R' => Ok(PositioningCommand::ResetEncoder),
            'I' => Ok(PositioningCommand::Identify),
            '?' => Ok(PositioningCommand::Status),
            _ => Err(CommandError::UnknownCommand),
        }
    }
}

/// First character (upper-cased) and the remainder.
fn split_first(text: &str) -> Option<(char, &str)> {
    let mut chars = text.chars();
    let first = chars.next()?;
    Some((first.to_ascii_uppercase(), chars.as_str()))
}

fn int_arg(arg: &str) -> i32 {
    arg.trim().parse().unwrap_or(0)
}

fn float_arg(arg: &str) -> f32 {
    match arg.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_commands() {
        assert_eq!(FrequencyCommand::parse("I"), Ok(FrequencyCommand::Identify));
        assert_eq!(FrequencyCommand::parse("i"), Ok(FrequencyCommand::Identify));
        assert_eq!(FrequencyCommand::parse("?"), Ok(FrequencyCommand::Status));
        assert_eq!(FrequencyCommand::parse("1r3500"), Ok(FrequencyCommand::SpindleRun(3500)));
        assert_eq!(FrequencyCommand::parse("1R 100"), Ok(FrequencyCommand::SpindleRun(100)));
        assert_eq!(FrequencyCommand::parse("1s"), Ok(FrequencyCommand::SpindleStop));
        assert_eq!(FrequencyCommand::parse("2F"), Ok(FrequencyCommand::FeedForward));
        assert_eq!(FrequencyCommand::parse("2b"), Ok(FrequencyCommand::FeedReverse));
        assert_eq!(FrequencyCommand::parse("2s"), Ok(FrequencyCommand::FeedStop));
        assert_eq!(FrequencyCommand::parse("2v25.5"), Ok(FrequencyCommand::FeedVelocity(25.5)));
    }

    #[test]
    fn test_frequency_errors() {
        assert_eq!(FrequencyCommand::parse("x"), Err(CommandError::UnknownCommand));
        assert_eq!(FrequencyCommand::parse("g1"), Err(CommandError::UnknownCommand));
        assert_eq!(FrequencyCommand::parse("1"), Err(CommandError::UnknownSubcommand { axis: 1 }));
        assert_eq!(FrequencyCommand::parse("1x"), Err(CommandError::UnknownSubcommand { axis: 1 }));
        assert_eq!(FrequencyCommand::parse("2q"), Err(CommandError::UnknownSubcommand { axis: 2 }));
    }

    #[test]
    fn test_unparsable_arguments_read_as_zero() {
        assert_eq!(FrequencyCommand::parse("1rfast"), Ok(FrequencyCommand::SpindleRun(0)));
        assert_eq!(FrequencyCommand::parse("1r"), Ok(FrequencyCommand::SpindleRun(0)));
        assert_eq!(FrequencyCommand::parse("2vNaN"), Ok(FrequencyCommand::FeedVelocity(0.0)));
        assert_eq!(PositioningCommand::parse("ginf"), Ok(PositioningCommand::GoTo(0.0)));
        assert_eq!(PositioningCommand::parse("g"), Ok(PositioningCommand::GoTo(0.0)));
    }

    #[test]
    fn test_positioning_commands() {
        assert_eq!(PositioningCommand::parse("g12.5"), Ok(PositioningCommand::GoTo(12.5)));
        assert_eq!(PositioningCommand::parse("G-3"), Ok(PositioningCommand::GoTo(-3.0)));
        assert_eq!(PositioningCommand::parse("h"), Ok(PositioningCommand::Home));
        assert_eq!(PositioningCommand::parse("S"), Ok(PositioningCommand::Stop));
        assert_eq!(PositioningCommand::parse("v0.1"), Ok(PositioningCommand::SetVelocity(0.1)));
        assert_eq!(PositioningCommand::parse("r"), Ok(PositioningCommand::ResetEncoder));
        assert_eq!(PositioningCommand::parse("I"), Ok(PositioningCommand::Identify));
        assert_eq!(PositioningCommand::parse("?"), Ok(PositioningCommand::Status));
        assert_eq!(PositioningCommand::parse("z"), Err(CommandError::UnknownCommand));
    }
}
