//! # Slice-backed source.
//!
//! [`SliceSource`] walks a borrowed slice front to back. The slice is never copied; each
//! element is cloned when produced and run through [`Classify`], so a slice of `Result`s
//! yields in-band errors.
//!
//! ## Rules
//! - Never suspends; the returned future completes on first poll.
//! - The borrow keeps the slice immutable while the source is alive.
//! - The caller's token is ignored unless the entry check is enabled.
//! - Exhaustion is sticky and carries the context `"slice has no more elements"`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

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

const EXHAUSTED: &str = "slice has no more elements";

/// Source walking a borrowed slice.
#[derive(Debug)]
pub struct SliceSource<'a, R> {
    items: &'a [R],
    pos: usize,
    check_token: bool,
    life: Lifecycle,
}

impl<'a, R> SliceSource<'a, R> {
    pub fn new(items: &'a [R]) -> Self {
        Self {
            items,
            pos: 0,
            check_token: false,
            life: Lifecycle::new("slice"),
        }
    }

    /// Creates a source inheriting the entry-check flag from `cfg`.
    pub fn with_defaults(items: &'a [R], cfg: &Config) -> Self {
        Self::new(items).with_entry_check(cfg.check_token_on_entry)
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

    /// Index of the next element to produce.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.pos)
    }
}

impl<R> sealed::Sealed for SliceSource<'_, R> {}

#[async_trait]
impl<'a, R> Pull for SliceSource<'a, R>
where
    R: Classify + Clone + Sync,
    R::Value: Send,
{
    type Value = R::Value;

    async fn next(&mut self, ctx: &CancellationToken) -> Result<Item<R::Value>, IterError> {
        if let Some(err) = self.life.admit(ctx, self.check_token) {
            return Err(self.life.fail(err));
        }

        match self.items.get(self.pos) {
            Some(raw) => {
                self.pos += 1;
                let item = raw.clone().classify();
                self.life.deliver(&item);
                Ok(item)
            }
            None => Err(self.life.fail(IterError::NoSuchElement.context(EXHAUSTED))),
        }
    }

    fn state(&self) -> State {
        self.life.state()
    }

    fn close(&mut self) {
        self.life.halt();
        self.life.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::events::EventKind;

    #[tokio::test]
    async fn yields_in_index_order() {
        let data = vec![10_u32, 20, 30];
        let ctx = CancellationToken::new();
        let mut src = SliceSource::new(&data);

        for expected in &data {
            assert_eq!(src.next(&ctx).await.unwrap().into_value(), Some(*expected));
        }
        assert!(src.next(&ctx).await.unwrap_err().is_exhausted());
        assert_eq!(src.position(), 3);
    }

    #[tokio::test]
    async fn empty_slice_exhausts_immediately() {
        let data: [i32; 0] = [];
        let ctx = CancellationToken::new();
        let mut src = SliceSource::new(&data);

        let err = src.next(&ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert_eq!(err.to_string(), "slice has no more elements: no such element");
        assert_eq!(src.state(), State::Exhausted);
    }

    #[tokio::test]
    async fn exhaustion_is_idempotent() {
        let data = ["only"];
        let ctx = CancellationToken::new();
        let mut src = SliceSource::new(&data);
        let _ = src.next(&ctx).await;

        for _ in 0..3 {
            assert!(src.next(&ctx).await.unwrap_err().is_exhausted());
        }
        assert_eq!(src.position(), 1);
        assert_eq!(src.remaining(), 0);
    }

    #[tokio::test]
    async fn error_elements_are_delivered_as_items() {
        let data: Vec<Result<i32, IterError>> = vec![Ok(1), Err(IterError::NoSuchElement), Ok(3)];
        let ctx = CancellationToken::new();
        let mut src = SliceSource::new(&data);

        assert!(src.next(&ctx).await.unwrap().is_value());
        // An exhaustion error stored as data is not end-of-stream.
        assert!(src.next(&ctx).await.unwrap().is_error());
        assert_eq!(src.next(&ctx).await.unwrap().into_value(), Some(3));
        assert!(src.next(&ctx).await.unwrap_err().is_exhausted());
    }

    #[tokio::test]
    async fn entry_check_honours_token() {
        let data = [1, 2, 3];
        let ctx = CancellationToken::new();
        ctx.cancel();

        let mut src = SliceSource::with_defaults(
            &data,
            &Config {
                check_token_on_entry: true,
                ..Config::default()
            },
        );
        let err = src.next(&ctx).await.unwrap_err();
        assert_eq!(err, IterError::CancelledSubscription);
        assert_eq!(src.position(), 0);

        let mut lenient = SliceSource::new(&data);
        assert!(lenient.next(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn close_stops_active_slice() {
        let data = [1, 2, 3];
        let ctx = CancellationToken::new();
        let mut src = SliceSource::new(&data);
        let _ = src.next(&ctx).await;

        src.close();
        src.close();
        assert_eq!(src.state(), State::CancelledByIterator);
        for _ in 0..2 {
            assert_eq!(src.next(&ctx).await.unwrap_err(), IterError::CancelledIterator);
        }
        assert_eq!(src.position(), 1);
    }

    #[tokio::test]
    async fn close_keeps_exhaustion() {
        let data = [1];
        let ctx = CancellationToken::new();
        let mut src = SliceSource::new(&data);
        let _ = src.next(&ctx).await;
        let _ = src.next(&ctx).await;

        src.close();
        assert_eq!(src.state(), State::Exhausted);
        assert!(src.next(&ctx).await.unwrap_err().is_exhausted());
    }

    #[tokio::test]
    async fn publishes_error_item_events() {
        let bus = Bus::new(8);
        let mut events = bus.subscribe();
        let data: Vec<Result<i32, IterError>> =
            vec![Err(IterError::CancelledIterator.context("torn"))];
        let mut src = SliceSource::new(&data).with_name("rows").with_bus(bus);
        let ctx = CancellationToken::new();

        let _ = src.next(&ctx).await;
        let _ = src.next(&ctx).await;

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ErrorItem);
        assert_eq!(ev.reason.as_deref(), Some("torn: iterator cancelled"));
        assert_eq!(ev.position, Some(1));
        assert_eq!(events.recv().await.unwrap().kind, EventKind::SourceExhausted);
    }
}
