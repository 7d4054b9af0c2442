//! Spindle + feed controller.

use embedded_hal::digital::{InputPin, OutputPin};
use heapless::String;

use crate::config::FrequencyConfig;
use crate::control::{FeedAxis, SpindleAxis};
use crate::error::{Error, Result};
use crate::motion::{Direction, PulseOutput};
use crate::protocol::{FrequencyCommand, LineBuffer, LineWriter, Response};
use crate::status::{FrequencyStatus, StatusTimer};

use super::emit;

/// Dispatcher for the frequency variant (M1 spindle, M2 feed).
pub struct FrequencyController<SP, SD, FP, FD, FH>
where
    SP: PulseOutput,
    SD: OutputPin,
    FP: PulseOutput,
    FD: OutputPin,
    FH: InputPin,
{
    identity: String<16>,
    spindle: SpindleAxis<SP, SD>,
    feed: FeedAxis<FP, FD, FH>,
    line: LineBuffer,
    heartbeat: StatusTimer,
    heartbeats: u32,
    dropped: u32,
}

impl<SP, SD, FP, FD, FH> FrequencyController<SP, SD, FP, FD, FH>
where
    SP: PulseOutput,
    SD: OutputPin,
    FP: PulseOutput,
    FD: OutputPin,
    FH: InputPin,
{
    /// Assemble the controller from its axes.
    pub fn new(
        config: &FrequencyConfig,
        spindle: SpindleAxis<SP, SD>,
        feed: FeedAxis<FP, FD, FH>,
        now_ms: u32,
    ) -> Self {
        Self {
            identity: config.identity.clone(),
            spindle,
            feed,
            line: LineBuffer::new(),
            heartbeat: StatusTimer::new(config.status_period_ms, now_ms),
            heartbeats: 0,
            dropped: 0,
        }
    }

    /// Process one inbound byte, answering any line it completes.
    pub fn feed_byte<W: LineWriter>(&mut self, byte: u8, out: &mut W) {
        match self.line.push(byte) {
            Some(Ok(line)) => self.handle_line(&line, out),
            Some(Err(e)) => emit(out, &Response::Error(e.into()), &mut self.dropped),
            None => {}
        }
    }

    /// Echo and execute one trimmed, non-empty line.
    pub fn handle_line<W: LineWriter>(&mut self, line: &str, out: &mut W) {
        emit(out, &Response::Echo(line), &mut self.dropped);

        let response = FrequencyCommand::parse(line)
            .map_err(Error::from)
            .and_then(|command| self.execute(command))
            .unwrap_or_else(Response::Error);
        emit(out, &response, &mut self.dropped);
    }

    /// Home auto-stop and heartbeat. Call once per loop pass.
    pub fn poll<W: LineWriter>(&mut self, now_ms: u32, out: &mut W) {
        match self.feed.check_home_stop() {
            Ok(true) => emit(out, &Response::FeedStopped, &mut self.dropped),
            Ok(false) => {}
            Err(e) => emit(out, &Response::Error(e), &mut self.dropped),
        }

        if self.heartbeat.due(now_ms) {
            self.heartbeats = self.heartbeats.wrapping_add(1);
            let response = Response::Heartbeat {
                count: self.heartbeats,
                status: self.status(),
            };
            emit(out, &response, &mut self.dropped);
        }
    }

    fn execute(&mut self, command: FrequencyCommand) -> Result<Response<'static>> {
        let response = match command {
            FrequencyCommand::Identify => Response::Identity(self.identity.clone()),
            FrequencyCommand::Status => Response::FrequencyStatus(self.status()),
            FrequencyCommand::SpindleRun(rpm) => {
                let frequency = self.spindle.run_rpm(rpm)?;
                Response::SpindleRunning {
                    rpm: self.spindle.rpm(),
                    frequency,
                }
            }
            FrequencyCommand::SpindleStop => {
                self.spindle.stop()?;
                Response::SpindleStopped
            }
            FrequencyCommand::FeedForward => {
                self.feed.run(Direction::Forward)?;
                Response::FeedRunning(Direction::Forward)
            }
            FrequencyCommand::FeedReverse => {
                self.feed.run(Direction::Reverse)?;
                Response::FeedRunning(Direction::Reverse)
            }
            FrequencyCommand::FeedStop => {
                self.feed.stop()?;
                Response::FeedStopped
            }
            FrequencyCommand::FeedVelocity(velocity) => {
                Response::FeedVelocitySet(self.feed.set_velocity(velocity)?)
            }
        };
        Ok(response)
    }

    /// Axis summary.
    pub fn status(&self) -> FrequencyStatus {
        FrequencyStatus {
            spindle_running: self.spindle.is_running(),
            spindle_rpm: self.spindle.rpm(),
            feed_moving: self.feed.is_moving(),
            feed_velocity: self.feed.velocity(),
            feed_direction: self.feed.direction(),
        }
    }

    /// Spindle axis.
    pub fn spindle(&self) -> &SpindleAxis<SP, SD> {
        &self.spindle
    }

    /// Feed axis.
    pub fn feed(&self) -> &FeedAxis<FP, FD, FH> {
        &self.feed
    }

    /// Heartbeat periods elapsed.
    pub fn heartbeats(&self) -> u32 {
        self.heartbeats
    }

    /// Output lines dropped because the transport was full.
    pub fn dropped_lines(&self) -> u32 {
        self.dropped
    }
}
