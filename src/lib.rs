//! # pullsource
//!
//! **pullsource** gives heterogeneous data sources one pull-based contract:
//! *"give me the next element, or tell me why you can't"*.
//!
//! It is the element-production primitive for reactive-stream style consumers. A consumer
//! repeatedly calls [`Pull::next`] with its own [`CancellationToken`](tokio_util::sync::CancellationToken)
//! until it sees a terminal error. Subscriptions, operators and schedulers live elsewhere.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//!     │ ChannelSource │   │  RangeSource  │   │  SliceSource  │
//!     │ mpsc + scope  │   │ current / end │   │ &[R] + cursor │
//!     └───────┬───────┘   └───────┬───────┘   └───────┬───────┘
//!             └─────────────┬─────┴───────────────────┘
//!                           ▼
//!              Pull::next(&ctx) -> Result<Item<V>, IterError>
//!                           │
//!          ┌────────────────┼──────────────────────────┐
//!          ▼                ▼                          ▼
//!   Ok(Item::Value)   Ok(Item::Error)          Err(IterError)
//!                     (in-band error)   kind(): Exhausted
//!                                               CancelledBySubscription
//!                                               CancelledByIterator
//!
//!   optional: .with_bus(bus) ──► Bus ──► relay() ──► SubscriberSet ──► Subscribe
//! ```
//!
//! ### Three ways to stop
//! | Kind                        | Who stopped                    | Raised by              |
//! |-----------------------------|--------------------------------|------------------------|
//! | `Exhausted`                 | nobody, the data ran out       | all sources            |
//! | `CancelledBySubscription`   | the consumer (its token)       | channel; range/slice with entry check |
//! | `CancelledByIterator`       | the producer (source's scope)  | channel; any source after `close()`   |
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------|---------------------------------------------|
//! | **Sources**       | Channel, range and slice behind one sealed contract.      | [`Pull`], [`ChannelSource`], [`RangeSource`], [`SliceSource`] |
//! | **Items**         | Value/error wrapper and the classification rule.          | [`Item`], [`Classify`]                      |
//! | **Errors**        | Terminal signals with a matchable kind.                   | [`IterError`], [`ErrorKind`]                |
//! | **Events**        | Lifecycle events on a broadcast bus.                      | [`Event`], [`Bus`]                          |
//! | **Subscriber API**| Hook into source lifecycle (logging, metrics).            | [`Subscribe`], [`SubscriberSet`]            |
//! | **Configuration** | Shared defaults for sources and the bus.                  | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use pullsource::{channel, Config, ErrorKind, Pull};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (tx, mut src) = channel::<i32>(&Config::default());
//!     let subscription = CancellationToken::new();
//!
//!     tx.send(1).await?;
//!     tx.send(2).await?;
//!     drop(tx);
//!
//!     loop {
//!         match src.next(&subscription).await {
//!             Ok(item) => println!("got {item:?}"),
//!             Err(e) if e.kind() == ErrorKind::Exhausted => break,
//!             Err(e) => return Err(e.into()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod item;
mod sources;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{ErrorKind, IterError};
pub use events::{Bus, Event, EventKind};
pub use item::{classify, BoxError, Classify, Item, Plain};
pub use sources::{
    channel, drain, from_channel, from_range, from_slice, ChannelSource, Pull, RangeSource,
    SliceSource, State,
};
pub use subscribers::{relay, Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
