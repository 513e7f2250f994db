//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the plumbing that delivers
//! source events broadcast through the [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//!   Source ── publish(Event) ──► Bus ──► relay() ──► SubscriberSet
//!                                                        │
//!                                             ┌──────────┼──────────┐
//!                                             ▼          ▼          ▼
//!                                         LogWriter   Metrics    Custom ...
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use pullsource::{relay, Bus, Subscribe, SubscriberSet};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = Bus::default();
//! let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//! let set = Arc::new(SubscriberSet::new(subs, bus.clone()));
//! let stop = CancellationToken::new();
//! let _forwarder = relay(&bus, set, stop.clone());
//! // attach `bus` to sources with `.with_bus(bus.clone())`
//! # }
//! ```

#[cfg(feature = "logging")]
mod log;
mod relay;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use relay::relay;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
