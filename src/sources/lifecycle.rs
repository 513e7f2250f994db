//! # Per-source lifecycle bookkeeping.
//!
//! Tracks the [`State`] of one source, counts delivered elements, and publishes
//! lifecycle events to an optional [`Bus`].
//!
//! ## State machine
//! ```text
//!            ┌──► Exhausted                (NoSuchElement)
//! Active ────┼──► CancelledBySubscription  (caller's token)
//!            └──► CancelledByIterator      (source's own scope / close)
//! ```
//!
//! ## Rules
//! - **Sticky** lifecycles (range, slice): there is no transition back to `Active`, and the
//!   first transition out of `Active` publishes exactly **one** terminal event.
//! - **Latest-outcome** lifecycles (channel): the state follows the most recent `next`
//!   result. A delivered element returns the state to `Active`; a terminal event is
//!   published each time the state changes to a different terminal state.
//! - Repeating the current terminal result publishes nothing.
//! - `SourceClosed` is published at most once.
//! - Every in-band error element publishes `ErrorItem`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    error::{ErrorKind, IterError},
    events::{Bus, Event, EventKind},
    item::Item,
};

/// Observable state of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// May still produce elements.
    Active,
    /// Ran out of elements.
    ///
    /// Final for range and slice sources. A channel source reports the outcome of its most
    /// recent call, so it may leave this state if a later call produces an element.
    Exhausted,
    /// Stopped because the consumer's token was cancelled.
    CancelledBySubscription,
    /// Stopped because the source cancelled itself or was closed.
    CancelledByIterator,
}

impl State {
    /// `true` for every state except [`State::Active`].
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, State::Active)
    }
}

impl From<ErrorKind> for State {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Exhausted => State::Exhausted,
            ErrorKind::CancelledBySubscription => State::CancelledBySubscription,
            ErrorKind::CancelledByIterator => State::CancelledByIterator,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Lifecycle {
    name: Arc<str>,
    bus: Option<Bus>,
    state: State,
    sticky: bool,
    delivered: u64,
    closed: bool,
}

impl Lifecycle {
    /// Lifecycle whose first terminal state is final.
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name: Arc::from(name),
            bus: None,
            state: State::Active,
            sticky: true,
            delivered: 0,
            closed: false,
        }
    }

    /// Lifecycle whose state tracks the most recent outcome.
    pub(crate) fn latest(name: &'static str) -> Self {
        Self {
            sticky: false,
            ..Self::new(name)
        }
    }

    pub(crate) fn set_name(&mut self, name: Arc<str>) {
        self.name = name;
    }

    pub(crate) fn set_bus(&mut self, bus: Bus) {
        self.bus = Some(bus);
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn state(&self) -> State {
        self.state
    }

    pub(crate) fn delivered(&self) -> u64 {
        self.delivered
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    fn can_leave(&self, to: State) -> bool {
        self.state == State::Active || (!self.sticky && self.state != to)
    }

    /// Entry gate for synchronous sources.
    ///
    /// Returns the sticky cancellation of a cancelled source, or a fresh subscription
    /// cancellation when `check_token` is set and `ctx` is cancelled. `Active` and `Exhausted`
    /// fall through so the cursor reports exhaustion itself.
    pub(crate) fn admit(&self, ctx: &CancellationToken, check_token: bool) -> Option<IterError> {
        match self.state {
            State::CancelledBySubscription => Some(IterError::CancelledSubscription),
            State::CancelledByIterator => Some(IterError::CancelledIterator),
            State::Active if check_token && ctx.is_cancelled() => {
                Some(IterError::CancelledSubscription)
            }
            State::Active | State::Exhausted => None,
        }
    }

    /// Records a produced element.
    pub(crate) fn deliver<T>(&mut self, item: &Item<T>) {
        if !self.sticky {
            self.state = State::Active;
        }
        self.delivered += 1;
        if let Item::Error(err) = item {
            self.publish(
                Event::new(EventKind::ErrorItem)
                    .with_position(self.delivered)
                    .with_reason(err.to_string()),
            );
        }
    }

    /// Records a terminal result and hands the error back to the caller.
    pub(crate) fn fail(&mut self, err: IterError) -> IterError {
        let to = State::from(err.kind());
        if self.can_leave(to) {
            self.state = to;
            let kind = match to {
                State::CancelledBySubscription => EventKind::SubscriptionCancelled,
                State::CancelledByIterator => EventKind::IteratorCancelled,
                State::Exhausted | State::Active => EventKind::SourceExhausted,
            };
            self.publish(Event::new(kind).with_position(self.delivered));
        }
        err
    }

    /// Moves the source to `CancelledByIterator` without publishing a terminal event.
    ///
    /// A sticky lifecycle only moves when still `Active`.
    pub(crate) fn halt(&mut self) {
        if self.can_leave(State::CancelledByIterator) {
            self.state = State::CancelledByIterator;
        }
    }

    /// Records disposal; publishes `SourceClosed` once.
    pub(crate) fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.publish(Event::new(EventKind::SourceClosed).with_position(self.delivered));
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev.with_source(Arc::clone(&self.name)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_transition_wins() {
        let mut life = Lifecycle::new("test");
        let _ = life.fail(IterError::CancelledSubscription);
        let _ = life.fail(IterError::NoSuchElement);
        assert_eq!(life.state(), State::CancelledBySubscription);
    }

    #[test]
    fn admit_is_sticky_for_cancellation_only() {
        let ctx = CancellationToken::new();
        let mut life = Lifecycle::new("test");
        assert!(life.admit(&ctx, true).is_none());

        ctx.cancel();
        assert_eq!(life.admit(&ctx, false), None);
        assert_eq!(
            life.admit(&ctx, true),
            Some(IterError::CancelledSubscription)
        );

        let _ = life.fail(IterError::NoSuchElement);
        assert_eq!(life.admit(&ctx, true), None);
    }

    #[test]
    fn latest_outcome_can_return_to_active() {
        let mut life = Lifecycle::latest("test");
        let _ = life.fail(IterError::CancelledSubscription);
        assert_eq!(life.state(), State::CancelledBySubscription);

        life.deliver(&Item::Value(5));
        assert_eq!(life.state(), State::Active);

        let _ = life.fail(IterError::CancelledSubscription);
        let _ = life.fail(IterError::NoSuchElement);
        assert_eq!(life.state(), State::Exhausted);

        life.halt();
        assert_eq!(life.state(), State::CancelledByIterator);
    }

    #[test]
    fn sticky_halt_keeps_exhaustion() {
        let mut life = Lifecycle::new("test");
        let _ = life.fail(IterError::NoSuchElement);
        life.halt();
        assert_eq!(life.state(), State::Exhausted);
    }

    #[tokio::test]
    async fn latest_outcome_publishes_per_state_change() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        let mut life = Lifecycle::latest("ticks");
        life.set_bus(bus);
        let _ = life.fail(IterError::CancelledSubscription);
        let _ = life.fail(IterError::CancelledSubscription);
        life.deliver(&Item::Value(1));
        let _ = life.fail(IterError::CancelledSubscription);

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::SubscriptionCancelled);
        let again = rx.recv().await.unwrap();
        assert_eq!(again.kind, EventKind::SubscriptionCancelled);
        assert_eq!(again.position, Some(1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn publishes_once_per_transition() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        let mut life = Lifecycle::new("orders");
        life.set_bus(bus);
        life.deliver(&Item::Value(1));
        let _ = life.fail(IterError::NoSuchElement);
        let _ = life.fail(IterError::NoSuchElement);
        life.close();
        life.close();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::SourceExhausted);
        assert_eq!(first.position, Some(1));
        assert_eq!(first.source.as_deref(), Some("orders"));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, EventKind::SourceClosed);
        assert!(rx.try_recv().is_err());
    }
}
