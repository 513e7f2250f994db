//! # Lifecycle events emitted by sources.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Source events**: terminal transitions, disposal and in-band errors
//! - **Subscriber events**: delivery problems inside the [`SubscriberSet`](crate::SubscriberSet)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, source name,
//! reasons, and the number of elements delivered.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use pullsource::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::SourceExhausted)
//!     .with_source("orders")
//!     .with_position(3);
//!
//! assert_eq!(ev.kind, EventKind::SourceExhausted);
//! assert_eq!(ev.source.as_deref(), Some("orders"));
//! assert_eq!(ev.position, Some(3));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of source events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Source terminal transitions ===
    /// Source ran out of elements (on entering the state).
    ///
    /// Sets:
    /// - `source`: source name
    /// - `position`: elements delivered so far
    SourceExhausted,

    /// Consumer's token cancelled the source (on entering the state).
    ///
    /// Sets:
    /// - `source`: source name
    /// - `position`: elements delivered so far
    SubscriptionCancelled,

    /// Source's own scope was cancelled (on entering the state).
    ///
    /// Sets:
    /// - `source`: source name
    /// - `position`: elements delivered so far
    IteratorCancelled,

    /// Source was disposed via `close()`.
    ///
    /// Sets:
    /// - `source`: source name
    /// - `position`: elements delivered so far
    SourceClosed,

    // === In-band data ===
    /// Source delivered an element that classified as an error.
    ///
    /// Sets:
    /// - `source`: source name
    /// - `position`: index of the element (1-based)
    /// - `reason`: error message
    ErrorItem,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the source (or subscriber), if applicable.
    pub source: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Number of elements delivered by the source so far.
    pub position: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            source: None,
            reason: None,
            position: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a source name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches the number of elements delivered.
    #[inline]
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    /// `true` for the terminal transitions of a source.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SourceExhausted
                | EventKind::SubscriptionCancelled
                | EventKind::IteratorCancelled
        )
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
