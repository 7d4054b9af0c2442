//! Line-based serial protocol.
//!
//! Inbound bytes are framed into lines by [`LineBuffer`], parsed into a
//! per-variant command, and answered with one [`Response`] line written
//! through a [`LineWriter`].

mod command;
mod line;
mod response;
mod transport;

pub use command::{FrequencyCommand, PositioningCommand};
pub use line::{Line, LineBuffer, LINE_CAPACITY};
pub use response::{format_line, OutLine, Response, OUT_LINE_CAPACITY};
pub use transport::{LineWriter, TransportError};
