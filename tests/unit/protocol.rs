//! Unit tests for line framing, command parsing and response text.

use axis_controller::error::{CommandError, Error};
use axis_controller::protocol::{
    format_line, FrequencyCommand, LineBuffer, PositioningCommand, Response, LINE_CAPACITY,
};
use axis_controller::status::FrequencyStatus;
use axis_controller::Direction;

fn lines(bytes: &[u8]) -> Vec<Result<String, CommandError>> {
    let mut buffer = LineBuffer::new();
    bytes
        .iter()
        .filter_map(|b| buffer.push(*b))
        .map(|r| r.map(|line| line.as_str().to_owned()))
        .collect()
}

#[test]
fn test_framing_matches_serial_terminal() {
    let framed = lines(b"g12.5\r\n\r\n  ?  \n");
    assert_eq!(framed, vec![Ok("g12.5".to_owned()), Ok("?".to_owned())]);
}

#[test]
fn test_long_line_then_recovery() {
    let mut input = vec![b'9'; LINE_CAPACITY * 2];
    input.extend_from_slice(b"\r\nI\r\n");

    let framed = lines(&input);
    assert_eq!(framed, vec![Err(CommandError::LineTooLong), Ok("I".to_owned())]);
}

#[test]
fn test_letters_case_insensitive() {
    for (a, b) in [("g1", "G1"), ("h", "H"), ("s", "S"), ("v1", "V1"), ("r", "R"), ("i", "I")] {
        assert_eq!(PositioningCommand::parse(a), PositioningCommand::parse(b));
    }
    assert_eq!(FrequencyCommand::parse("2V10"), FrequencyCommand::parse("2v10"));
}

#[test]
fn test_arguments_trimmed() {
    assert_eq!(PositioningCommand::parse("g  4.25"), Ok(PositioningCommand::GoTo(4.25)));
    assert_eq!(FrequencyCommand::parse("1r 3500"), Ok(FrequencyCommand::SpindleRun(3500)));
}

#[test]
fn test_partial_numbers_read_as_zero() {
    // `str::parse` is all-or-nothing
    assert_eq!(PositioningCommand::parse("g12.5in"), Ok(PositioningCommand::GoTo(0.0)));
    assert_eq!(FrequencyCommand::parse("1r3500.0"), Ok(FrequencyCommand::SpindleRun(0)));
}

#[test]
fn test_status_line() {
    let status = FrequencyStatus {
        spindle_running: false,
        spindle_rpm: 0,
        feed_moving: true,
        feed_velocity: 120.0,
        feed_direction: Direction::Forward,
    };
    let line = format_line(&Response::FrequencyStatus(status)).unwrap();
    assert_eq!(line.as_str(), "STATUS M1:STOP rpm=0 | M2:MOVING vel=120.0 dir=FWD");
}

#[test]
fn test_range_error_text() {
    let e = Error::from(CommandError::FeedVelocityOutOfRange {
        velocity: 400.1,
        min: 1.0,
        max: 400.0,
    });
    assert_eq!(
        Response::Error(e).to_string(),
        "ERROR M2 velocity out of range (1-400 mm/s): 400.1"
    );
}
