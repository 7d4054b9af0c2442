//! Tick-driven step engine for positioning axes.
//!
//! The interrupt handler calls [`StepEngine::on_tick`] once per timer tick.
//! Two ticks make one step: the first raises STEP, the second lowers it and
//! counts the step. All state crossing the interrupt boundary lives in a
//! single [`MotionState`] record guarded by a critical section.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

use crate::error::{HardwareError, Result};

use super::Direction;

/// Cross-context state of one positioning axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionState {
    /// Commanded position in steps.
    pub target_steps: i32,
    /// Position in steps, advanced only on completed pulses.
    pub current_steps: i32,
    /// Direction of the current segment.
    pub direction: Direction,
    /// Engine enabled.
    pub in_motion: bool,
    /// STEP output is high (first half of a pulse).
    pub pin_high: bool,
    /// Segment finished; cleared when the cooperative side takes it.
    pub complete: bool,
    /// Remaining error (in steps) treated as arrived.
    pub tolerance_steps: i32,
}

impl MotionState {
    /// Zeroed, idle state.
    pub const fn new() -> Self {
        Self {
            target_steps: 0,
            current_steps: 0,
            direction: Direction::Forward,
            in_motion: false,
            pin_high: false,
            complete: false,
            tolerance_steps: 0,
        }
    }

    /// Steps still to go (signed).
    #[inline]
    pub fn remaining(&self) -> i32 {
        self.target_steps.wrapping_sub(self.current_steps)
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Output action produced by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseEdge {
    /// Nothing to do.
    Idle,
    /// Drive STEP high.
    Rising,
    /// Drive STEP low; a step was counted.
    Falling,
    /// Drive STEP low; the half pulse was abandoned by a stop.
    Released,
    /// Segment reached tolerance; STEP low, complete flag raised.
    Finished,
}

impl PulseEdge {
    /// STEP level after this edge, `None` when the pin is left alone.
    #[inline]
    pub fn level(self) -> Option<bool> {
        match self {
            PulseEdge::Idle => None,
            PulseEdge::Rising => Some(true),
            PulseEdge::Falling | PulseEdge::Released | PulseEdge::Finished => Some(false),
        }
    }
}

/// One timer tick of the step engine as a pure state transition.
///
/// Allocation-free, constant time.
pub fn step_tick(state: &mut MotionState) -> PulseEdge {
    if !state.in_motion {
        if state.pin_high {
            state.pin_high = false;
            return PulseEdge::Released;
        }
        return PulseEdge::Idle;
    }

    if state.remaining().unsigned_abs() <= state.tolerance_steps.unsigned_abs() {
        state.in_motion = false;
        state.pin_high = false;
        state.complete = true;
        return PulseEdge::Finished;
    }

    if !state.pin_high {
        state.pin_high = true;
        PulseEdge::Rising
    } else {
        state.pin_high = false;
        state.current_steps = state.current_steps.wrapping_add(state.direction.sign());
        PulseEdge::Falling
    }
}

/// Step engine shared between the tick interrupt and the cooperative loop.
///
/// `new` is `const` so the engine can live in a `static`:
///
/// ```rust,ignore
/// static AXIS: StepEngine<StepPin> = StepEngine::new();
///
/// #[interrupt]
/// fn TIMER0() {
///     AXIS.on_tick();
/// }
/// ```
pub struct StepEngine<STEP> {
    state: Mutex<Cell<MotionState>>,
    step_pin: Mutex<RefCell<Option<STEP>>>,
}

impl<STEP> StepEngine<STEP> {
    /// Create an idle engine without a STEP pin.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(MotionState::new())),
            step_pin: Mutex::new(RefCell::new(None)),
        }
    }

    /// Copy of the shared state.
    pub fn snapshot(&self) -> MotionState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Current step count.
    pub fn current_steps(&self) -> i32 {
        critical_section::with(|cs| self.state.borrow(cs).get().current_steps)
    }

    /// Whether the engine is enabled.
    pub fn is_moving(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).get().in_motion)
    }

    /// Take the motion-complete flag, clearing it.
    pub fn take_complete(&self) -> bool {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let complete = state.complete;
            state.complete = false;
            cell.set(state);
            complete
        })
    }

    fn update<R>(&self, f: impl FnOnce(&mut MotionState) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let result = f(&mut state);
            cell.set(state);
            result
        })
    }
}

impl<STEP: OutputPin> StepEngine<STEP> {
    /// Install the STEP pin, driving it low.
    ///
    /// The pin is not installed if it cannot be driven.
    pub fn attach(&self, mut pin: STEP) -> Result<()> {
        pin.set_low().map_err(|_| HardwareError::Pin)?;
        critical_section::with(|cs| {
            self.step_pin.borrow_ref_mut(cs).replace(pin);
        });
        Ok(())
    }

    /// Interrupt entry point: advance one tick and drive STEP.
    ///
    /// Never blocks, allocates or logs. Pin errors are not reported from
    /// interrupt context.
    pub fn on_tick(&self) -> PulseEdge {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let edge = step_tick(&mut state);
            cell.set(state);

            if let Some(level) = edge.level() {
                if let Some(pin) = self.step_pin.borrow_ref_mut(cs).as_mut() {
                    let _ = if level { pin.set_high() } else { pin.set_low() };
                }
            }
            edge
        })
    }

    /// Disable the engine: motion and completion flags cleared, STEP low.
    ///
    /// Fully applied before returning, so a following [`start`](Self::start)
    /// never inherits a half pulse. Returns the state at cancellation.
    ///
    /// The engine is disabled even when driving STEP low fails.
    pub fn halt(&self) -> Result<MotionState> {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            state.in_motion = false;
            state.complete = false;
            state.pin_high = false;
            cell.set(state);

            if let Some(pin) = self.step_pin.borrow_ref_mut(cs).as_mut() {
                pin.set_low().map_err(|_| HardwareError::Pin)?;
            }
            Ok(state)
        })
    }

    /// Halt, then write a new segment and enable the engine.
    pub fn start(&self, target_steps: i32, direction: Direction, tolerance_steps: i32) -> Result<()> {
        self.halt()?;
        self.update(|state| {
            state.target_steps = target_steps;
            state.direction = direction;
            state.tolerance_steps = tolerance_steps;
            state.in_motion = true;
        });
        Ok(())
    }

    /// Overwrite the step count (encoder re-sync).
    pub fn set_current_steps(&self, steps: i32) {
        self.update(|state| state.current_steps = steps);
    }

    /// Halt and zero both step count and target.
    pub fn zero(&self) -> Result<()> {
        self.halt()?;
        self.update(|state| {
            state.current_steps = 0;
            state.target_steps = 0;
        });
        Ok(())
    }
}

impl<STEP> Default for StepEngine<STEP> {
    fn default() -> Self {
        Self::new()
    }
}
