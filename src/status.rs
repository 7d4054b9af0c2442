//! Status snapshots and the periodic report timer.
//!
//! The snapshot types render the body of their protocol line through
//! `Display`; [`Response`](crate::protocol::Response) adds the prefix.

use core::fmt;

use crate::motion::Direction;

/// Fixed-period timer over a wrapping millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTimer {
    period_ms: u32,
    last_ms: u32,
}

impl StatusTimer {
    /// Start a timer; the first report is due one period after `now_ms`.
    pub fn new(period_ms: u32, now_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: now_ms,
        }
    }

    /// Whether a report is due, restarting the period if so.
    pub fn due(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_ms) >= self.period_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Report period.
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }
}

/// Frequency-variant axis summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyStatus {
    /// Spindle pulses enabled.
    pub spindle_running: bool,
    /// Last accepted spindle speed.
    pub spindle_rpm: u16,
    /// Feed pulses enabled.
    pub feed_moving: bool,
    /// Feed velocity, mm/s.
    pub feed_velocity: f32,
    /// Feed direction.
    pub feed_direction: Direction,
}

impl fmt::Display for FrequencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M1:{} rpm={} | M2:{} vel={:.1} dir={}",
            if self.spindle_running { "RUN" } else { "STOP" },
            self.spindle_rpm,
            if self.feed_moving { "MOVING" } else { "STOP" },
            self.feed_velocity,
            self.feed_direction.label(),
        )
    }
}

/// Encoder part of a positioning status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderReading {
    /// Position, inches.
    pub position: f32,
    /// Raw 4x count.
    pub counts: i32,
}

/// Positioning-variant summary for the `?` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositioningStatus {
    /// Step engine enabled.
    pub moving: bool,
    /// Open-loop position, inches.
    pub motor_position: f32,
    /// Open-loop step count.
    pub motor_steps: i32,
    /// Encoder reading, `None` in open-loop mode.
    pub encoder: Option<EncoderReading>,
    /// Commanded velocity, in/s.
    pub velocity: f32,
    /// Target position, inches.
    pub target: f32,
}

impl PositioningStatus {
    /// Encoder minus open-loop position.
    pub fn drift(&self) -> Option<f32> {
        self.encoder.map(|encoder| encoder.position - self.motor_position)
    }
}

impl fmt::Display for PositioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Motor: {:.3} in ({} steps) | ",
            if self.moving { "MOVING" } else { "IDLE" },
            self.motor_position,
            self.motor_steps,
        )?;
        match (self.encoder, self.drift()) {
            (Some(encoder), Some(drift)) => write!(
                f,
                "Encoder: {:.3} in ({} counts) | Error: {:.4} in | ",
                encoder.position, encoder.counts, drift,
            )?,
            _ => f.write_str("Encoder: NOT DETECTED | ")?,
        }
        write!(f, "Vel: {:.2} in/s | Target: {:.3} in", self.velocity, self.target)
    }
}

/// Periodic `POS` telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionTelemetry {
    /// Encoder position (open-loop position without an encoder), inches.
    pub position: f32,
    /// Smoothed encoder velocity, in/s.
    pub velocity: f32,
    /// Raw encoder count.
    pub counts: i32,
    /// Open-loop step count.
    pub steps: i32,
}

impl fmt::Display for PositionTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} {:.3} {} {}",
            self.position, self.velocity, self.counts, self.steps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_period() {
        let mut timer = StatusTimer::new(100, 0);
        assert!(!timer.due(99));
        assert!(timer.due(100));
        assert!(!timer.due(150));
        assert!(timer.due(200));
    }

    #[test]
    fn test_timer_wraps() {
        let mut timer = StatusTimer::new(100, u32::MAX - 20);
        assert!(!timer.due(u32::MAX));
        assert!(timer.due(79));
    }

    #[test]
    fn test_frequency_status_text() {
        let status = FrequencyStatus {
            spindle_running: true,
            spindle_rpm: 3500,
            feed_moving: false,
            feed_velocity: 120.0,
            feed_direction: Direction::Reverse,
        };
        assert_eq!(
            status.to_string(),
            "M1:RUN rpm=3500 | M2:STOP vel=120.0 dir=REV"
        );
    }

    #[test]
    fn test_positioning_status_text() {
        let mut status = PositioningStatus {
            moving: false,
            motor_position: 12.5,
            motor_steps: 13618,
            encoder: Some(EncoderReading {
                position: 12.498,
                counts: 3404,
            }),
            velocity: 0.0492,
            target: 12.5,
        };
        assert_eq!(
            status.to_string(),
            "IDLE | Motor: 12.500 in (13618 steps) | Encoder: 12.498 in (3404 counts) | \
             Error: -0.0020 in | Vel: 0.05 in/s | Target: 12.500 in"
        );
        let drift = status.drift().unwrap();
        assert!((drift + 0.002).abs() < 1e-4);

        status.encoder = None;
        assert_eq!(status.drift(), None);
        assert_eq!(
            status.to_string(),
            "IDLE | Motor: 12.500 in (13618 steps) | Encoder: NOT DETECTED | \
             Vel: 0.05 in/s | Target: 12.500 in"
        );
    }

    #[test]
    fn test_position_telemetry_text() {
        let telemetry = PositionTelemetry {
            position: 1.0,
            velocity: 0.0492,
            counts: 272,
            steps: 1089,
        };
        assert_eq!(telemetry.to_string(), "1.000 0.049 272 1089");
    }
}
