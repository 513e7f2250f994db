//! # The pull contract shared by every source.
//!
//! [`Pull`] has a single production operation, [`next`](Pull::next), and an explicit disposal
//! operation, [`close`](Pull::close). The trait is sealed: exactly three implementations exist,
//! [`ChannelSource`](crate::ChannelSource), [`RangeSource`](crate::RangeSource) and
//! [`SliceSource`](crate::SliceSource).
//!
//! ## Outcomes of `next`
//! ```text
//! Ok(Item::Value(v))                 element produced
//! Ok(Item::Error(e))                 element produced; it happens to be an error (in-band)
//! Err(e) where e.kind() ==
//!   ErrorKind::Exhausted               no more elements
//!   ErrorKind::CancelledBySubscription caller's token cancelled
//!   ErrorKind::CancelledByIterator     source's own scope cancelled
//! ```
//!
//! A caller wanting a timeout wraps the call in `tokio::time::timeout` or cancels its own
//! token from a timer; `next` has no deadline of its own.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{error::IterError, item::Item, sources::lifecycle::State};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// # Pull-based, cancelable element source.
///
/// `next` takes `&mut self`: a source has a single consumer, and calls are serialized.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use pullsource::{from_range, Pull};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let ctx = CancellationToken::new();
/// let mut src = from_range(0, 2);
///
/// assert_eq!(src.next(&ctx).await.unwrap().into_value(), Some(1));
/// assert_eq!(src.next(&ctx).await.unwrap().into_value(), Some(2));
/// assert!(src.next(&ctx).await.unwrap_err().is_exhausted());
/// # }
/// ```
#[async_trait]
pub trait Pull: sealed::Sealed + Send {
    /// Type carried by produced [`Item::Value`]s.
    type Value: Send;

    /// Produces the next element, or the reason iteration stopped.
    ///
    /// `ctx` is the subscription's token. It is distinct from any scope the source owns.
    async fn next(&mut self, ctx: &CancellationToken) -> Result<Item<Self::Value>, IterError>;

    /// Current lifecycle state.
    ///
    /// Range and slice sources keep their first terminal state. A channel source reports
    /// the outcome of its most recent call.
    fn state(&self) -> State;

    /// Disposes the source and releases any scope it owns.
    ///
    /// Idempotent. Subsequent `next` calls report `CancelledByIterator`, except that an
    /// already exhausted range or slice source keeps reporting exhaustion.
    fn close(&mut self);
}

/// Pulls from `src` until it is exhausted and collects every produced item.
///
/// In-band errors are collected like values. A cancellation is returned as `Err`, dropping
/// the items gathered so far.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use pullsource::{drain, from_slice};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let data = ["a", "b"];
/// let mut src = from_slice(&data);
/// let items = drain(&mut src, &CancellationToken::new()).await.unwrap();
///
/// let values: Vec<_> = items.into_iter().filter_map(|i| i.into_value()).collect();
/// assert_eq!(values, vec!["a", "b"]);
/// # }
/// ```
pub async fn drain<P>(
    src: &mut P,
    ctx: &CancellationToken,
) -> Result<Vec<Item<P::Value>>, IterError>
where
    P: Pull + ?Sized,
{
    let mut out = Vec::new();
    loop {
        match src.next(ctx).await {
            Ok(item) => out.push(item),
            Err(e) if e.is_exhausted() => return Ok(out),
            Err(e) => return Err(e),
        }
    }
}
