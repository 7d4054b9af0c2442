//! Outbound transport seam.

use core::fmt;

use heapless::{Deque, String};

/// Outbound line failure. The line is dropped; controller state is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Output buffer full.
    Full,
    /// Link is down.
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Full => write!(f, "Output buffer full"),
            TransportError::Closed => write!(f, "Transport closed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}

/// Sink for `\n`-terminated lines. Implementations append the terminator.
///
/// Must not block longer than it takes to queue the line.
pub trait LineWriter {
    /// Queue one line.
    fn write_line(&mut self, line: &str) -> Result<(), TransportError>;
}

impl<W: LineWriter + ?Sized> LineWriter for &mut W {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        (**self).write_line(line)
    }
}

/// Bounded queue drained by a UART driver.
impl<const L: usize, const N: usize> LineWriter for Deque<String<L>, N> {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut queued = String::new();
        queued.push_str(line).map_err(|_| TransportError::Full)?;
        self.push_back(queued).map_err(|_| TransportError::Full)
    }
}

/// Unbounded capture, for host tooling and tests.
#[cfg(feature = "std")]
impl LineWriter for std::vec::Vec<std::string::String> {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.push(line.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deque_reports_full() {
        let mut queue: Deque<String<16>, 2> = Deque::new();
        assert!(queue.write_line("HOMED").is_ok());
        assert!(queue.write_line("M1_STOPPED").is_ok());
        assert_eq!(queue.write_line("M2_STOPPED"), Err(TransportError::Full));

        assert_eq!(queue.pop_front().unwrap().as_str(), "HOMED");
    }

    #[test]
    fn test_deque_rejects_oversized_line() {
        let mut queue: Deque<String<4>, 2> = Deque::new();
        assert_eq!(queue.write_line("ENCODER_RESET"), Err(TransportError::Full));
        assert!(queue.is_empty());
    }
}
