//! # Channel-backed source.
//!
//! [`ChannelSource`] wraps a [`tokio::sync::mpsc::Receiver`] and owns a private
//! cancellation scope. Each [`next`](Pull::next) waits for the first of:
//!
//! ```text
//! next(ctx)
//!   select! {
//!     ctx.cancelled()      ─► Err(CancelledSubscription)   consumer walked away
//!     scope.cancelled()    ─► Err(CancelledIterator)       producer stopped
//!     rx.recv() = Some(r)  ─► Ok(classify(r))
//!     rx.recv() = None     ─► Err(NoSuchElement)           closed and drained
//!   }
//! ```
//!
//! ## Rules
//! - **No priority**: when several branches are ready, `select!` picks one at random.
//!   A cancelled source with buffered elements may still deliver some of them.
//! - **Cancel safe**: losing the race never drops an element; `recv` is cancel safe.
//! - **Scope release**: the scope is cancelled by [`cancel`](ChannelSource::cancel),
//!   [`close`](Pull::close), or when the source is dropped (via [`DropGuard`]).
//!   Exhaustion and subscription cancellation leave it untouched.
//! - **No stickiness**: terminal results are not cached; each call races afresh, and
//!   [`state`](Pull::state) reports the outcome of the most recent call.
//! - **Disposal is final**: after [`close`](Pull::close) every call returns
//!   `CancelledIterator`, and buffered elements are discarded.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    config::Config,
    error::IterError,
    events::Bus,
    item::{Classify, Item},
    sources::{
        lifecycle::{Lifecycle, State},
        pull::{sealed, Pull},
    },
};

/// Source pulling elements from an mpsc channel.
///
/// ## Example
/// ```
/// use tokio::sync::mpsc;
/// use tokio_util::sync::CancellationToken;
/// use pullsource::{from_channel, Pull};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (tx, rx) = mpsc::channel(4);
/// let mut src = from_channel(rx);
/// tx.send(7_i32).await.unwrap();
/// drop(tx);
///
/// let ctx = CancellationToken::new();
/// assert_eq!(src.next(&ctx).await.unwrap().into_value(), Some(7));
/// assert!(src.next(&ctx).await.unwrap_err().is_exhausted());
/// # }
/// ```
#[derive(Debug)]
pub struct ChannelSource<R> {
    rx: mpsc::Receiver<R>,
    scope: CancellationToken,
    _release: DropGuard,
    life: Lifecycle,
}

impl<R> ChannelSource<R> {
    /// Creates a source with a fresh, independent scope.
    pub fn new(rx: mpsc::Receiver<R>) -> Self {
        Self::with_scope(rx, CancellationToken::new())
    }

    /// Creates a source whose scope is a child of `parent`.
    ///
    /// Cancelling `parent` cancels the source; cancelling the source never affects `parent`.
    pub fn with_parent(rx: mpsc::Receiver<R>, parent: &CancellationToken) -> Self {
        Self::with_scope(rx, parent.child_token())
    }

    fn with_scope(rx: mpsc::Receiver<R>, scope: CancellationToken) -> Self {
        let release = scope.clone().drop_guard();
        Self {
            rx,
            scope,
            _release: release,
            life: Lifecycle::latest("channel"),
        }
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

    /// Cancels the source's own scope (producer-side stop).
    pub fn cancel(&self) {
        self.scope.cancel();
    }

    /// Returns a handle to the source's scope.
    ///
    /// Lets the producer stop the source while the consumer holds it.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.scope.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }

    pub fn name(&self) -> &str {
        self.life.name()
    }

    /// Number of elements delivered so far.
    pub fn delivered(&self) -> u64 {
        self.life.delivered()
    }
}

impl<R> sealed::Sealed for ChannelSource<R> {}

#[async_trait]
impl<R> Pull for ChannelSource<R>
where
    R: Classify + Send,
    R::Value: Send,
{
    type Value = R::Value;

    async fn next(&mut self, ctx: &CancellationToken) -> Result<Item<R::Value>, IterError> {
        if self.life.is_closed() {
            return Err(self.life.fail(IterError::CancelledIterator));
        }

        let outcome = tokio::select! {
            _ = ctx.cancelled() => Err(IterError::CancelledSubscription),
            _ = self.scope.cancelled() => Err(IterError::CancelledIterator),
            next = self.rx.recv() => next.map(Classify::classify).ok_or(IterError::NoSuchElement),
        };

        match outcome {
            Ok(item) => {
                self.life.deliver(&item);
                Ok(item)
            }
            Err(e) => Err(self.life.fail(e)),
        }
    }

    fn state(&self) -> State {
        self.life.state()
    }

    fn close(&mut self) {
        self.scope.cancel();
        self.rx.close();
        self.life.halt();
        self.life.close();
    }
}

/// Builds a bounded channel and a source over its receiving half.
///
/// The buffer size comes from [`Config::channel_capacity_clamped`].
pub fn channel<R>(cfg: &Config) -> (mpsc::Sender<R>, ChannelSource<R>) {
    let (tx, rx) = mpsc::channel(cfg.channel_capacity_clamped());
    (tx, ChannelSource::new(rx))
}
