//! # Sources and the pull contract.
//!
//! This module provides the element-producing types:
//! - [`Pull`] - sealed trait with `next(ctx)` and `close()`
//! - [`ChannelSource`] - mpsc receiver + own cancellation scope (may suspend)
//! - [`RangeSource`] - inclusive integer counter (never suspends)
//! - [`SliceSource`] - borrowed slice cursor (never suspends)
//! - [`State`] - lifecycle state shared by all three
//!
//! ## Wait conditions per source
//! ```text
//!                  caller token     own scope       data / end
//! ChannelSource    select! branch   select! branch  recv() branch
//! RangeSource      entry check*     close() only    counter
//! SliceSource      entry check*     close() only    cursor
//!
//! * only with Config::check_token_on_entry
//! ```

mod channel;
mod lifecycle;
mod pull;
mod range;
mod slice;

use tokio::sync::mpsc;

pub use channel::{channel, ChannelSource};
pub use lifecycle::State;
pub use pull::{drain, Pull};
pub use range::RangeSource;
pub use slice::SliceSource;

/// Creates a source over the receiving half of an mpsc channel.
pub fn from_channel<R>(rx: mpsc::Receiver<R>) -> ChannelSource<R> {
    ChannelSource::new(rx)
}

/// Creates a source yielding `start + 1 ..= end_inclusive`.
pub fn from_range(start: i64, end_inclusive: i64) -> RangeSource {
    RangeSource::new(start, end_inclusive)
}

/// Creates a source over a borrowed slice.
pub fn from_slice<R>(items: &[R]) -> SliceSource<'_, R> {
    SliceSource::new(items)
}
