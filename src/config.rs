//! # Source configuration.
//!
//! Provides [`Config`], the shared defaults for building sources.
//!
//! Config is used in three ways:
//! 1. **Channel sources**: [`channel`](crate::channel) sizes the mpsc buffer from it
//! 2. **Synchronous sources**: `RangeSource::with_defaults` / `SliceSource::with_defaults`
//!    inherit the entry-check flag
//! 3. **Event bus**: `Bus::new(cfg.bus_capacity_clamped())`
//!
//! ## Sentinel values
//! - `channel_capacity = 0` → clamped to 1 (tokio rejects zero-capacity channels)
//! - `bus_capacity = 0` → clamped to 1
//!
//! # Example
//! ```
//! use pullsource::Config;
//!
//! let mut cfg = Config::default();
//! cfg.channel_capacity = 0;
//! cfg.check_token_on_entry = true;
//!
//! assert_eq!(cfg.channel_capacity_clamped(), 1);
//! ```

/// Shared defaults for sources and the event bus.
///
/// ## Field semantics
/// - `channel_capacity`: Buffer size of channels built by [`channel`](crate::channel)
/// - `check_token_on_entry`: Whether range/slice sources honour the caller's token
/// - `bus_capacity`: Event bus ring buffer size
#[derive(Clone, Debug)]
pub struct Config {
    /// Buffer size for channels created through [`channel`](crate::channel).
    pub channel_capacity: usize,

    /// Whether synchronous sources check the caller's token before producing.
    ///
    /// - `false` = the token is ignored (range/slice never suspend, so there is nothing to
    ///   interrupt)
    /// - `true` = a cancelled token yields `CancelledSubscription` at entry; the check is never
    ///   repeated mid-call
    pub check_token_on_entry: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` messages skip older events.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn channel_capacity_clamped(&self) -> usize {
        self.channel_capacity.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `channel_capacity = 1024`
    /// - `check_token_on_entry = false`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            check_token_on_entry: false,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.channel_capacity_clamped(), 1024);
        assert_eq!(cfg.bus_capacity_clamped(), 1024);
        assert!(!cfg.check_token_on_entry);
    }

    #[test]
    fn zero_capacities_clamp_to_one() {
        let cfg = Config {
            channel_capacity: 0,
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.channel_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
