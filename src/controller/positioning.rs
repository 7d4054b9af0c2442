//! Closed-loop positioning controller.

use embedded_hal::digital::{InputPin, OutputPin};
use heapless::String;

use crate::config::PositioningConfig;
use crate::control::{ClosedLoopController, ResetButton};
use crate::error::{Error, Result};
use crate::motion::TickTimer;
use crate::protocol::{LineBuffer, LineWriter, PositioningCommand, Response};
use crate::status::StatusTimer;

use super::emit;

/// Dispatcher for the positioning variant (M3).
pub struct PositioningController<'a, STEP, DIR, HOME, TIMER, BTN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    HOME: InputPin,
    TIMER: TickTimer,
    BTN: InputPin,
{
    identity: String<16>,
    axis: ClosedLoopController<'a, STEP, DIR, HOME, TIMER>,
    button: ResetButton<BTN>,
    line: LineBuffer,
    report: StatusTimer,
    dropped: u32,
}

impl<'a, STEP, DIR, HOME, TIMER, BTN> PositioningController<'a, STEP, DIR, HOME, TIMER, BTN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    HOME: InputPin,
    TIMER: TickTimer,
    BTN: InputPin,
{
    /// Assemble the controller. Pass a button over
    /// [`NotConnected`](crate::control::NotConnected) when none is fitted.
    pub fn new(
        config: &PositioningConfig,
        axis: ClosedLoopController<'a, STEP, DIR, HOME, TIMER>,
        button: ResetButton<BTN>,
        now_ms: u32,
    ) -> Self {
        Self {
            identity: config.identity.clone(),
            axis,
            button,
            line: LineBuffer::new(),
            report: StatusTimer::new(config.status_period_ms, now_ms),
            dropped: 0,
        }
    }

    /// Process one inbound byte, answering any line it completes.
    pub fn feed_byte<W: LineWriter>(&mut self, byte: u8, now_ms: u32, out: &mut W) {
        match self.line.push(byte) {
            Some(Ok(line)) => self.handle_line(&line, now_ms, out),
            Some(Err(e)) => emit(out, &Response::Error(e.into()), &mut self.dropped),
            None => {}
        }
    }

    /// Echo and execute one trimmed, non-empty line.
    pub fn handle_line<W: LineWriter>(&mut self, line: &str, now_ms: u32, out: &mut W) {
        emit(out, &Response::Echo(line), &mut self.dropped);

        let response = PositioningCommand::parse(line)
            .map_err(Error::from)
            .and_then(|command| self.execute(command, now_ms))
            .unwrap_or_else(Response::Error);
        emit(out, &response, &mut self.dropped);
    }

    /// Completion events, alarms, the reset button and `POS` telemetry.
    /// Call once per loop pass.
    pub fn poll<W: LineWriter>(&mut self, now_ms: u32, out: &mut W) {
        match self.axis.poll(now_ms) {
            Ok(Some(event)) => emit(out, &event.into(), &mut self.dropped),
            Ok(None) => {}
            Err(e) => emit(out, &Response::Error(e), &mut self.dropped),
        }

        match self.button.poll(now_ms) {
            Ok(true) => {
                self.axis.reset_encoder();
                emit(out, &Response::EncoderReset, &mut self.dropped);
            }
            Ok(false) => {}
            Err(_) => warn!("reset button read failed"),
        }

        if self.report.due(now_ms) {
            let telemetry = self.axis.telemetry();
            emit(out, &Response::Position(telemetry), &mut self.dropped);
        }
    }

    fn execute(&mut self, command: PositioningCommand, now_ms: u32) -> Result<Response<'static>> {
        let response = match command {
            PositioningCommand::GoTo(target) => self.axis.go_to(target, now_ms)?.into(),
            PositioningCommand::Home => {
                self.axis.home()?;
                Response::Homed
            }
            PositioningCommand::Stop => self.axis.stop(now_ms)?.into(),
            PositioningCommand::SetVelocity(velocity) => {
                Response::Velocity(self.axis.set_velocity(velocity)?)
            }
            PositioningCommand::ResetEncoder => {
                self.axis.reset_encoder();
                Response::EncoderReset
            }
            PositioningCommand::Identify => Response::Identity(self.identity.clone()),
            PositioningCommand::Status => Response::PositioningStatus(self.axis.status()),
        };
        Ok(response)
    }

    /// Positioning axis.
    pub fn axis(&self) -> &ClosedLoopController<'a, STEP, DIR, HOME, TIMER> {
        &self.axis
    }

    /// Positioning axis, mutably.
    pub fn axis_mut(&mut self) -> &mut ClosedLoopController<'a, STEP, DIR, HOME, TIMER> {
        &mut self.axis
    }

    /// Output lines dropped because the transport was full.
    pub fn dropped_lines(&self) -> u32 {
        self.dropped
    }
}
