//! 4x quadrature decoding.

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::digital::InputPin;

/// Count change indexed by `(previous << 2) | current`, where each state is
/// the 2-bit code `(a << 1) | b`.
///
/// Transitions between Gray-adjacent states count ±1. Repeated states and
/// double transitions (a missed edge) count 0.
pub const QUAD_TABLE: [i8; 16] = [
    0, -1, 1, 0, //
    1, 0, 0, -1, //
    -1, 0, 0, 1, //
    0, 1, -1, 0,
];

/// Count change for one transition between 2-bit channel states.
#[inline]
pub fn decode(previous: u8, current: u8) -> i8 {
    QUAD_TABLE[(((previous & 0b11) << 2) | (current & 0b11)) as usize]
}

#[inline]
fn code(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | b as u8
}

#[derive(Debug, Clone, Copy)]
struct DecoderState {
    counts: i32,
    last_ab: u8,
}

/// Edge-driven quadrature counter shared with the edge interrupt.
///
/// ```rust,ignore
/// static ENCODER: QuadratureDecoder = QuadratureDecoder::new();
///
/// #[interrupt]
/// fn GPIO() {
///     ENCODER.on_edge(enc_a.is_high(), enc_b.is_high());
/// }
/// ```
pub struct QuadratureDecoder {
    state: Mutex<Cell<DecoderState>>,
}

impl QuadratureDecoder {
    /// Zeroed decoder, channels assumed low.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(DecoderState { counts: 0, last_ab: 0 })),
        }
    }

    /// Seed the previous state from the resting channel levels.
    pub fn prime(&self, a: bool, b: bool) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            state.last_ab = code(a, b);
            cell.set(state);
        });
    }

    /// Interrupt entry point: decode the new channel levels.
    ///
    /// Returns the count change (-1, 0 or +1).
    pub fn on_edge(&self, a: bool, b: bool) -> i8 {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let current = code(a, b);
            let delta = decode(state.last_ab, current);
            state.counts = state.counts.wrapping_add(delta as i32);
            state.last_ab = current;
            cell.set(state);
            delta
        })
    }

    /// Read both channel pins and decode.
    ///
    /// A failed pin read skips the edge.
    pub fn on_pin_edge<A: InputPin, B: InputPin>(&self, a: &mut A, b: &mut B) -> i8 {
        match (a.is_high(), b.is_high()) {
            (Ok(a), Ok(b)) => self.on_edge(a, b),
            _ => 0,
        }
    }

    /// Raw 4x count.
    pub fn counts(&self) -> i32 {
        critical_section::with(|cs| self.state.borrow(cs).get().counts)
    }

    /// Zero the count. The channel state is kept so the next edge decodes.
    pub fn reset(&self) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            state.counts = 0;
            cell.set(state);
        });
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}
