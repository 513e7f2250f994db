//! # Range-backed source.
//!
//! [`RangeSource`] counts through an inclusive `i64` interval. `from_range(start, end)` yields
//! `start + 1, start + 2, ..., end`: the cursor starts one below the first element.
//!
//! ## Rules
//! - Never suspends; the returned future completes on first poll.
//! - The caller's token is ignored unless the entry check is enabled
//!   ([`Config::check_token_on_entry`]). Even then it is read once at entry.
//! - Exhaustion is sticky and carries the context `"range has no more elements"`.
//! - The cursor never moves past `end`, so `end == i64::MAX` cannot overflow.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::IterError,
    events::Bus,
    item::Item,
    sources::{
        lifecycle::{Lifecycle, State},
        pull::{sealed, Pull},
    },
};

const EXHAUSTED: &str = "range has no more elements";

/// Source counting up to an inclusive bound.
#[derive(Debug)]
pub struct RangeSource {
    current: i64,
    end: i64,
    check_token: bool,
    life: Lifecycle,
}

impl RangeSource {
    /// Creates a source yielding `start + 1 ..= end`.
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            current: start,
            end,
            check_token: false,
            life: Lifecycle::new("range"),
        }
    }

    /// Creates a source inheriting the entry-check flag from `cfg`.
    pub fn with_defaults(start: i64, end: i64, cfg: &Config) -> Self {
        Self::new(start, end).with_entry_check(cfg.check_token_on_entry)
    }

    /// Returns a source that checks the caller's token before producing.
    pub fn with_entry_check(mut self, enabled: bool) -> Self {
        self.check_token = enabled;
        self
    }

    /// Sets the name reported in events.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.life.set_name(name.into());
        self
    }

    /// Publishes lifecycle events to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.life.set_bus(bus);
        self
    }

    /// Last produced value (or `start` before the first call).
    pub fn current(&self) -> i64 {
        self.current
    }

    /// Inclusive upper bound.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of elements still to be produced.
    pub fn remaining(&self) -> u64 {
        if self.current < self.end {
            self.end.abs_diff(self.current)
        } else {
            0
        }
    }
}

impl sealed::Sealed for RangeSource {}

#[async_trait]
impl Pull for RangeSource {
    type Value = i64;

    async fn next(&mut self, ctx: &CancellationToken) -> Result<Item<i64>, IterError> {
        if let Some(err) = self.life.admit(ctx, self.check_token) {
            return Err(self.life.fail(err));
        }

        if self.current < self.end {
            self.current += 1;
            let item = Item::Value(self.current);
            self.life.deliver(&item);
            return Ok(item);
        }
        Err(self.life.fail(IterError::NoSuchElement.context(EXHAUSTED)))
    }

    fn state(&self) -> State {
        self.life.state()
    }

    fn close(&mut self) {
        self.life.halt();
        self.life.close();
    }
}
