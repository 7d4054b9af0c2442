//! Protocol dispatchers, one per controller variant.
//!
//! A dispatcher owns the axes of its variant, frames inbound bytes into
//! lines, echoes each line, and answers it with exactly one response. Its
//! `poll` emits the unsolicited lines (completion events, alarms and the
//! periodic report).

mod frequency;
mod positioning;

pub use frequency::FrequencyController;
pub use positioning::PositioningController;

use crate::protocol::{format_line, LineWriter, Response};

/// Write one response. A line that cannot be queued is dropped and counted.
fn emit<W: LineWriter>(out: &mut W, response: &Response<'_>, dropped: &mut u32) {
    let queued = match format_line(response) {
        Some(line) => out.write_line(&line).is_ok(),
        None => false,
    };
    if !queued {
        *dropped = dropped.wrapping_add(1);
        warn!("output line dropped ({} total)", *dropped);
    }
}
