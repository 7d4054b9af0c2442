//! Closed-loop positioning with encoder correction.
//!
//! A move runs open-loop on the [`StepEngine`]. When it completes, the axis
//! settles for `correction_settle_ms`, compares the target against the encoder
//! and either reports arrival, issues a slow correction move, or aborts with an
//! alarm:
//!
//! ```text
//! Idle -> Moving -> Settling -> Idle (at target)
//!                      |  ^
//!                      v  |
//!                   Correcting
//!
//! Settling -> Idle + alarm (error > max, or rounds exhausted)
//! ```
//!
//! Nothing here blocks; [`poll`](ClosedLoopController::poll) must be called
//! from the cooperative loop.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{ControlConfig, InchesPerSec, MechanicalConstraints, PositioningConfig};
use crate::encoder::{EncoderTracker, QuadratureDecoder};
use crate::error::{CommandError, HardwareError, MotionError, Result};
use crate::motion::{Direction, StepEngine, TickTimer};
use crate::status::{EncoderReading, PositionTelemetry, PositioningStatus};

use super::{is_asserted, DirectionPin};

/// Motor number of the positioning axis in protocol messages.
const AXIS: u8 = 3;

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopState {
    /// No move in progress.
    Idle,
    /// Open-loop move at the base velocity.
    Moving,
    /// Correction move at the reduced velocity.
    Correcting,
    /// Segment complete, waiting for the mechanics to settle.
    Settling {
        /// Clock value when the segment completed.
        since_ms: u32,
    },
}

/// Outcome of a move request or of a poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopEvent {
    /// Move started.
    Moving {
        /// Position the move starts from, inches.
        from: f32,
        /// Requested position, inches.
        to: f32,
        /// `from` was read from the encoder.
        closed_loop: bool,
    },
    /// Axis is within tolerance of the target.
    AtTarget {
        /// Final position, inches.
        position: f32,
        /// Encoder-measured residual error, after a closed-loop check.
        error: Option<f32>,
    },
    /// Correction move started.
    Correcting {
        /// Error being corrected, inches.
        error: f32,
        /// Target position, inches.
        target: f32,
    },
}

/// Position at cancellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopReport {
    /// Open-loop position, inches.
    pub motor: f32,
    /// Encoder position, inches (`None` in open-loop mode).
    pub encoder: Option<f32>,
}

/// Closed-loop positioning axis.
///
/// Borrows the interrupt-shared step engine and decoder; owns the DIR pin,
/// the home sensor and the tick timer.
pub struct ClosedLoopController<'a, STEP, DIR, HOME, TIMER>
where
    STEP: OutputPin,
    DIR: OutputPin,
    HOME: InputPin,
    TIMER: TickTimer,
{
    engine: &'a StepEngine<STEP>,
    decoder: &'a QuadratureDecoder,
    dir: DirectionPin<DIR>,
    home: HOME,
    timer: TIMER,
    constraints: MechanicalConstraints,
    control: ControlConfig,
    encoder_enabled: bool,
    tracker: EncoderTracker,
    state: LoopState,
    target_position: f32,
    base_velocity: f32,
    velocity: f32,
    step_interval_us: u32,
    rounds: u8,
}

impl<'a, STEP, DIR, HOME, TIMER> ClosedLoopController<'a, STEP, DIR, HOME, TIMER>
where
    STEP: OutputPin,
    DIR: OutputPin,
    HOME: InputPin,
    TIMER: TickTimer,
{
    /// Create an idle controller and program the timer for the default
    /// velocity.
    pub fn new(
        engine: &'a StepEngine<STEP>,
        decoder: &'a QuadratureDecoder,
        dir: DIR,
        home: HOME,
        timer: TIMER,
        config: &PositioningConfig,
        now_ms: u32,
    ) -> Result<Self> {
        let constraints = MechanicalConstraints::from_config(config);
        let control = config.control;
        let base_velocity = control.default_velocity.0;

        let mut controller = Self {
            engine,
            decoder,
            dir: DirectionPin::new(dir, config.mechanics.invert_direction),
            home,
            timer,
            constraints,
            control,
            encoder_enabled: config.encoder_enabled,
            tracker: EncoderTracker::new(
                constraints.inches_per_count,
                control.velocity_smoothing,
                now_ms,
            ),
            state: LoopState::Idle,
            target_position: 0.0,
            base_velocity,
            velocity: base_velocity,
            step_interval_us: 0,
            rounds: 0,
        };
        controller.dir.set(Direction::Forward)?;
        controller.program_velocity(base_velocity)?;

        info!(
            "closed loop axis ready: {} steps/in, encoder {}",
            constraints.steps_per_inch,
            config.encoder_enabled
        );
        Ok(controller)
    }

    /// Start an absolute move to `target` inches.
    ///
    /// Supersedes any move in progress. Rejected without side effects when
    /// the move is in reverse and the home sensor is asserted.
    pub fn go_to(&mut self, target: f32, now_ms: u32) -> Result<LoopEvent> {
        self.sample(now_ms);
        let actual = self.actual_position();
        let error = target - actual;

        if libm::fabsf(error) <= self.constraints.tolerance_in {
            self.engine.halt()?;
            self.sync_steps_to_encoder();
            self.target_position = target;
            self.state = LoopState::Idle;
            return Ok(LoopEvent::AtTarget {
                position: actual,
                error: None,
            });
        }

        let direction = Direction::from_error(error);
        if direction == Direction::Reverse && is_asserted(&mut self.home)? {
            warn!("reverse move refused: home sensor asserted");
            return Err(MotionError::HomeActive { axis: AXIS }.into());
        }

        // stop fully applies before the new segment is written
        self.engine.halt()?;
        self.sync_steps_to_encoder();

        self.dir.set(direction)?;
        self.program_velocity(self.base_velocity)?;

        let current = self.engine.current_steps();
        let target_steps = current.wrapping_add(self.constraints.inches_to_steps(error));
        self.engine
            .start(target_steps, direction, self.constraints.tolerance_steps)?;

        self.target_position = target;
        self.rounds = 0;
        self.state = LoopState::Moving;
        debug!("move {} -> {} ({} steps)", actual, target, target_steps);

        Ok(LoopEvent::Moving {
            from: actual,
            to: target,
            closed_loop: self.encoder_enabled,
        })
    }

    /// Advance the state machine. Call once per cooperative loop pass.
    ///
    /// Alarms are returned as errors; the axis is already stopped and idle
    /// when one is returned.
    pub fn poll(&mut self, now_ms: u32) -> Result<Option<LoopEvent>> {
        self.sample(now_ms);

        if self.engine.take_complete() {
            match self.state {
                LoopState::Moving | LoopState::Correcting if self.encoder_enabled => {
                    self.state = LoopState::Settling { since_ms: now_ms };
                }
                LoopState::Moving | LoopState::Correcting => {
                    self.state = LoopState::Idle;
                    return Ok(Some(LoopEvent::AtTarget {
                        position: self.motor_position(),
                        error: None,
                    }));
                }
                // completion of a segment that was superseded
                _ => {}
            }
        }

        if let LoopState::Settling { since_ms } = self.state {
            if now_ms.wrapping_sub(since_ms) >= self.control.correction_settle_ms {
                return self.check_correction().map(Some);
            }
        }

        Ok(None)
    }

    fn check_correction(&mut self) -> Result<LoopEvent> {
        let actual = self.tracker.position();
        let error = self.target_position - actual;
        let magnitude = libm::fabsf(error);

        if magnitude <= self.constraints.tolerance_in {
            self.state = LoopState::Idle;
            info!("at target {} (error {})", actual, error);
            return Ok(LoopEvent::AtTarget {
                position: actual,
                error: Some(error),
            });
        }

        if magnitude > self.constraints.max_error_in {
            self.abort()?;
            warn!("alarm: position error {} exceeds max", error);
            return Err(MotionError::PositionErrorTooLarge {
                error,
                target: self.target_position,
                actual,
            }
            .into());
        }

        if self.rounds >= self.control.max_correction_rounds {
            self.abort()?;
            warn!("alarm: no convergence after {} rounds", self.rounds);
            return Err(MotionError::CorrectionLimit {
                rounds: self.rounds,
                error,
            }
            .into());
        }

        let direction = Direction::from_error(error);
        if direction == Direction::Reverse && is_asserted(&mut self.home)? {
            self.abort()?;
            return Err(MotionError::HomeActive { axis: AXIS }.into());
        }

        self.rounds += 1;
        self.sync_steps_to_encoder();
        self.dir.set(direction)?;

        let scaled = InchesPerSec(self.base_velocity) * self.control.correction_velocity_scale;
        let correction_velocity =
            libm::fmaxf(scaled.value(), self.control.min_correction_velocity.value());
        self.program_velocity(correction_velocity)?;

        // zero tolerance: the full correction is always stepped out
        let current = self.engine.current_steps();
        let target_steps = current.wrapping_add(self.constraints.inches_to_steps(error));
        self.engine.start(target_steps, direction, 0)?;
        self.state = LoopState::Correcting;
        debug!("correction round {}: {} in", self.rounds, error);

        Ok(LoopEvent::Correcting {
            error,
            target: self.target_position,
        })
    }

    /// Cancel any motion. Idempotent.
    ///
    /// The axis is idle afterwards even if STEP could not be driven low.
    pub fn stop(&mut self, now_ms: u32) -> Result<StopReport> {
        self.sample(now_ms);
        self.state = LoopState::Idle;
        self.engine.halt()?;

        Ok(StopReport {
            motor: self.motor_position(),
            encoder: self.encoder_enabled.then(|| self.tracker.position()),
        })
    }

    /// Stop and declare the current position zero, for steps and encoder.
    pub fn home(&mut self) -> Result<()> {
        self.engine.zero()?;
        self.decoder.reset();
        self.tracker.reset();
        self.target_position = 0.0;
        self.rounds = 0;
        self.state = LoopState::Idle;
        info!("homed");
        Ok(())
    }

    /// Zero the encoder only. Step count and motion are untouched.
    pub fn reset_encoder(&mut self) {
        self.decoder.reset();
        self.tracker.reset();
    }

    /// Set the base velocity in in/s.
    ///
    /// A running open-loop move picks up the new rate at the next tick; a
    /// correction keeps its reduced rate.
    pub fn set_velocity(&mut self, velocity: f32) -> Result<f32> {
        let valid = velocity.is_finite() && velocity > 0.0;
        if !valid {
            return Err(CommandError::VelocityNotPositive(velocity).into());
        }

        self.base_velocity = velocity;
        if self.state == LoopState::Moving {
            self.program_velocity(velocity)?;
        } else if self.state == LoopState::Idle {
            self.velocity = velocity;
        }
        Ok(velocity)
    }

    /// Snapshot for the `?` command.
    pub fn status(&self) -> PositioningStatus {
        let snapshot = self.engine.snapshot();
        PositioningStatus {
            moving: snapshot.in_motion,
            motor_position: self.constraints.steps_to_inches(snapshot.current_steps),
            motor_steps: snapshot.current_steps,
            encoder: self.encoder_enabled.then(|| EncoderReading {
                position: self.tracker.position(),
                counts: self.tracker.counts(),
            }),
            velocity: self.velocity,
            target: self.target_position,
        }
    }

    /// Periodic telemetry.
    pub fn telemetry(&self) -> PositionTelemetry {
        let steps = self.engine.current_steps();
        if self.encoder_enabled {
            PositionTelemetry {
                position: self.tracker.position(),
                velocity: self.tracker.velocity_smoothed(),
                counts: self.tracker.counts(),
                steps,
            }
        } else {
            PositionTelemetry {
                position: self.constraints.steps_to_inches(steps),
                velocity: 0.0,
                counts: 0,
                steps,
            }
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Last requested target, inches.
    #[inline]
    pub fn target_position(&self) -> f32 {
        self.target_position
    }

    /// Base velocity for new moves, in/s.
    #[inline]
    pub fn base_velocity(&self) -> f32 {
        self.base_velocity
    }

    /// Velocity the timer is programmed for, in/s.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Step interval the timer is programmed for, microseconds.
    #[inline]
    pub fn step_interval_us(&self) -> u32 {
        self.step_interval_us
    }

    /// Correction rounds used by the current move.
    #[inline]
    pub fn correction_rounds(&self) -> u8 {
        self.rounds
    }

    /// Whether encoder feedback is in use.
    #[inline]
    pub fn encoder_enabled(&self) -> bool {
        self.encoder_enabled
    }

    /// Encoder position at the last sample, inches.
    #[inline]
    pub fn encoder_position(&self) -> f32 {
        self.tracker.position()
    }

    /// Open-loop position, inches.
    pub fn motor_position(&self) -> f32 {
        self.constraints.steps_to_inches(self.engine.current_steps())
    }

    /// Derived conversion factors.
    #[inline]
    pub fn constraints(&self) -> &MechanicalConstraints {
        &self.constraints
    }

    /// Access the tick timer.
    #[inline]
    pub fn timer(&self) -> &TIMER {
        &self.timer
    }

    fn sample(&mut self, now_ms: u32) {
        if self.encoder_enabled {
            self.tracker.sample(self.decoder.counts(), now_ms);
        }
    }

    fn actual_position(&self) -> f32 {
        if self.encoder_enabled {
            self.tracker.position()
        } else {
            self.motor_position()
        }
    }

    fn sync_steps_to_encoder(&self) {
        if self.encoder_enabled {
            let steps = self.constraints.inches_to_steps(self.tracker.position());
            self.engine.set_current_steps(steps);
        }
    }

    fn program_velocity(&mut self, velocity: f32) -> Result<()> {
        let interval = self.constraints.step_interval_us(velocity);
        // two ticks per step
        self.timer
            .set_period_us(interval / 2)
            .map_err(|_| HardwareError::Timer)?;
        self.velocity = velocity;
        self.step_interval_us = interval;
        Ok(())
    }

    fn abort(&mut self) -> Result<()> {
        self.state = LoopState::Idle;
        self.engine.halt().map(|_| ())
    }
}
