//! Outbound protocol lines.

use core::fmt::{self, Write};

use heapless::String;

use crate::control::{LoopEvent, StopReport};
use crate::error::Error;
use crate::motion::Direction;
use crate::status::{FrequencyStatus, PositionTelemetry, PositioningStatus};

/// Longest outbound line.
pub const OUT_LINE_CAPACITY: usize = 256;

/// One formatted outbound line, terminator not included.
pub type OutLine = String<OUT_LINE_CAPACITY>;

/// Every line the controllers emit. `Display` produces the exact wire text.
#[derive(Debug, Clone, PartialEq)]
pub enum Response<'a> {
    /// `CMD <line>`
    Echo(&'a str),
    /// `ID:<identity>`
    Identity(String<16>),
    /// `ERROR <reason>`
    Error(Error),

    /// `M1_RUN rpm=<n> freq=<f>`
    SpindleRunning {
        /// Accepted speed
        rpm: u16,
        /// Programmed frequency, Hz
        frequency: f32,
    },
    /// `M1_STOPPED`
    SpindleStopped,
    /// `M2_FWD` / `M2_REV`
    FeedRunning(Direction),
    /// `M2_STOPPED`
    FeedStopped,
    /// `M2_VEL_SET vel=<v>`
    FeedVelocitySet(f32),
    /// `STATUS M1:... | M2:...`
    FrequencyStatus(FrequencyStatus),
    /// `HEARTBEAT <n> M1:... | M2:...`
    Heartbeat {
        /// Periods elapsed since start
        count: u32,
        /// Axis summary
        status: FrequencyStatus,
    },

    /// `MOVING encoder: <a> -> <t>` / `MOVING <a> -> <t>`
    Moving {
        /// Position the move starts from
        from: f32,
        /// Requested position
        to: f32,
        /// Position came from the encoder
        closed_loop: bool,
    },
    /// `AT_TARGET <a>` / `AT_TARGET <a> (error: <e> in)`
    AtTarget {
        /// Final position
        position: f32,
        /// Encoder-measured residual error
        error: Option<f32>,
    },
    /// `CORRECTING error: <e> in, moving to <t>`
    Correcting {
        /// Measured error
        error: f32,
        /// Target position
        target: f32,
    },
    /// `STOPPED motor: <m>, encoder: <e>` / `STOPPED <m>`
    Stopped {
        /// Open-loop position at cancellation
        motor: f32,
        /// Encoder position at cancellation
        encoder: Option<f32>,
    },
    /// `HOMED`
    Homed,
    /// `VELOCITY <v>`
    Velocity(f32),
    /// `ENCODER_RESET`
    EncoderReset,
    /// `STATUS <MOVING|IDLE> | ...`
    PositioningStatus(PositioningStatus),
    /// `POS <pos> <vel> <counts> <steps>`
    Position(PositionTelemetry),
}

impl<'a> From<Error> for Response<'a> {
    fn from(e: Error) -> Self {
        Response::Error(e)
    }
}

impl<'a> From<LoopEvent> for Response<'a> {
    fn from(event: LoopEvent) -> Self {
        match event {
            LoopEvent::Moving { from, to, closed_loop } => Response::Moving { from, to, closed_loop },
            LoopEvent::AtTarget { position, error } => Response::AtTarget { position, error },
            LoopEvent::Correcting { error, target } => Response::Correcting { error, target },
        }
    }
}

impl<'a> From<StopReport> for Response<'a> {
    fn from(report: StopReport) -> Self {
        Response::Stopped {
            motor: report.motor,
            encoder: report.encoder,
        }
    }
}

impl fmt::Display for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Echo(line) => write!(f, "CMD {}", line),
            Response::Identity(id) => write!(f, "ID:{}", id),
            Response::Error(e) => write!(f, "ERROR {}", e),

            Response::SpindleRunning { rpm, frequency } => {
                write!(f, "M1_RUN rpm={} freq={:.1}", rpm, frequency)
            }
            Response::SpindleStopped => f.write_str("M1_STOPPED"),
            Response::FeedRunning(direction) => write!(f, "M2_{}", direction.label()),
            Response::FeedStopped => f.write_str("M2_STOPPED"),
            Response::FeedVelocitySet(v) => write!(f, "M2_VEL_SET vel={:.1}", v),
            Response::FrequencyStatus(status) => write!(f, "STATUS {}", status),
            Response::Heartbeat { count, status } => write!(f, "HEARTBEAT {} {}", count, status),

            Response::Moving { from, to, closed_loop: true } => {
                write!(f, "MOVING encoder: {:.3} -> {:.3}", from, to)
            }
            Response::Moving { from, to, closed_loop: false } => {
                write!(f, "MOVING {:.3} -> {:.3}", from, to)
            }
            Response::AtTarget { position, error: None } => write!(f, "AT_TARGET {:.3}", position),
            Response::AtTarget { position, error: Some(e) } => {
                write!(f, "AT_TARGET {:.3} (error: {:.4} in)", position, e)
            }
            Response::Correcting { error, target } => {
                write!(f, "CORRECTING error: {:.4} in, moving to {:.3}", error, target)
            }
            Response::Stopped { motor, encoder: Some(e) } => {
                write!(f, "STOPPED motor: {:.3}, encoder: {:.3}", motor, e)
            }
            Response::Stopped { motor, encoder: None } => write!(f, "STOPPED {:.3}", motor),
            Response::Homed => f.write_str("HOMED"),
            Response::Velocity(v) => write!(f, "VELOCITY {:.2}", v),
            Response::EncoderReset => f.write_str("ENCODER_RESET"),
            Response::PositioningStatus(status) => write!(f, "STATUS {}", status),
            Response::Position(telemetry) => write!(f, "POS {}", telemetry),
        }
    }
}

/// Render a response into a fixed-capacity line.
///
/// Returns `None` if the text does not fit.
pub fn format_line(response: &Response<'_>) -> Option<OutLine> {
    let mut line = OutLine::new();
    write!(line, "{}", response).ok()?;
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CommandError, MotionError};

    #[test]
    fn test_frequency_lines() {
        assert_eq!(
            Response::SpindleRunning { rpm: 3500, frequency: 375_000.0 }.to_string(),
            "M1_RUN rpm=3500 freq=375000.0"
        );
        assert_eq!(Response::FeedRunning(Direction::Forward).to_string(), "M2_FWD");
        assert_eq!(Response::FeedRunning(Direction::Reverse).to_string(), "M2_REV");
        assert_eq!(Response::FeedVelocitySet(25.0).to_string(), "M2_VEL_SET vel=25.0");
    }

    #[test]
    fn test_positioning_lines() {
        assert_eq!(
            Response::Moving { from: 0.0, to: 12.5, closed_loop: true }.to_string(),
            "MOVING encoder: 0.000 -> 12.500"
        );
        assert_eq!(
            Response::AtTarget { position: 12.503, error: Some(-0.003) }.to_string(),
            "AT_TARGET 12.503 (error: -0.0030 in)"
        );
        assert_eq!(
            Response::Correcting { error: 0.0712, target: 12.5 }.to_string(),
            "CORRECTING error: 0.0712 in, moving to 12.500"
        );
        assert_eq!(
            Response::Stopped { motor: 1.0, encoder: None }.to_string(),
            "STOPPED 1.000"
        );
        assert_eq!(Response::Velocity(0.5).to_string(), "VELOCITY 0.50");
    }

    #[test]
    fn test_error_lines() {
        let line = Response::from(Error::from(CommandError::UnknownCommand)).to_string();
        assert_eq!(line, "ERROR Unknown command");

        let line = Response::from(Error::from(MotionError::HomeActive { axis: 2 })).to_string();
        assert_eq!(line, "ERROR M2_HOME_ACTIVE");
    }

    #[test]
    fn test_identity() {
        let id: String<16> = String::try_from("ESP32B").unwrap();
        assert_eq!(Response::Identity(id).to_string(), "ID:ESP32B");
    }

    #[test]
    fn test_stop_report() {
        let report = StopReport { motor: 2.0, encoder: Some(1.996) };
        assert_eq!(Response::from(report).to_string(), "STOPPED motor: 2.000, encoder: 1.996");
    }

    #[test]
    fn test_format_line() {
        let line = format_line(&Response::Echo("g12.5")).unwrap();
        assert_eq!(line.as_str(), "CMD g12.5");
    }
}
