//! # Routes source events to subscribers.
//!
//! [`SubscriberSet`] owns one bounded queue and one worker task per subscriber. Each event is
//! offered only to the subscribers whose [`Subscribe::accepts`] returns `true`, so a subscriber
//! interested in a single source never spends queue capacity on the others.
//!
//! ```text
//! emit(event)
//!   for each route:
//!     accepts(event)? ── no ──► skip
//!        │ yes
//!        ▼
//!     try_send ── Full/Closed ──► SubscriberOverflow on the bus
//!        │ ok
//!        ▼
//!     [queue] ──► pump ──► on_event()
//!                   └────► panic ──► SubscriberPanicked on the bus
//! ```
//!
//! ## Rules
//! - Events reach one subscriber in emit order; there is no order across subscribers.
//! - `emit` never waits: a full queue drops the event for that subscriber only.
//! - An overflow report that itself overflows is not reported again.
//! - A panicking subscriber is reported and keeps receiving events. The handler runs under
//!   `AssertUnwindSafe`, so its own state may be left inconsistent by the panic.

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

struct Route {
    sub: Arc<dyn Subscribe>,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Per-subscriber queues and workers fed from one event stream.
///
/// Must be created inside a tokio runtime.
pub struct SubscriberSet {
    routes: Vec<Route>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber.
    ///
    /// Overflow and panic reports are published to `bus`.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut routes = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
            workers.push(tokio::spawn(pump(Arc::clone(&sub), rx, bus.clone())));
            routes.push(Route { sub, tx });
        }
        Self {
            routes,
            workers,
            bus,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Offers a copy of `event` to every interested subscriber.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Offers a shared `event` to every interested subscriber.
    pub fn emit_arc(&self, event: Arc<Event>) {
        for route in self.routes.iter().filter(|r| r.sub.accepts(&event)) {
            let Err(err) = route.tx.try_send(Arc::clone(&event)) else {
                continue;
            };
            if event.is_subscriber_overflow() {
                continue;
            }
            let reason = match err {
                TrySendError::Full(_) => "full",
                TrySendError::Closed(_) => "closed",
            };
            self.bus
                .publish(Event::subscriber_overflow(route.sub.name(), reason));
        }
    }

    /// Closes every queue and waits for the workers to handle what they already hold.
    pub async fn shutdown(self) {
        drop(self.routes);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

async fn pump(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        if let Err(payload) = handled {
            bus.publish(Event::subscriber_panicked(
                sub.name(),
                panic_reason(payload.as_ref()),
            ));
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&'static str>()
        .map(|msg| (*msg).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::events::EventKind;

    #[derive(Default)]
    struct Recorder {
        only: Option<&'static str>,
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().unwrap().push(ev.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }

        fn accepts(&self, ev: &Event) -> bool {
            self.only.is_none() || ev.source.as_deref() == self.only
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _ev: &Event) {
            panic!("subscriber blew up");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    struct Stuck;

    #[async_trait]
    impl Subscribe for Stuck {
        async fn on_event(&self, _ev: &Event) {
            std::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn delivers_in_order_per_subscriber() {
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![rec.clone() as Arc<dyn Subscribe>], Bus::new(8));
        assert_eq!(set.len(), 1);

        set.emit(&Event::new(EventKind::ErrorItem));
        set.emit(&Event::new(EventKind::SourceExhausted));
        set.shutdown().await;

        let seen = rec.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![EventKind::ErrorItem, EventKind::SourceExhausted]);
    }

    #[tokio::test]
    async fn routes_by_source_name() {
        let orders = Arc::new(Recorder {
            only: Some("orders"),
            ..Recorder::default()
        });
        let all = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![
            orders.clone() as Arc<dyn Subscribe>,
            all.clone() as Arc<dyn Subscribe>,
        ];
        let set = SubscriberSet::new(subs, Bus::new(8));

        set.emit(&Event::new(EventKind::ErrorItem).with_source("rows"));
        set.emit(&Event::new(EventKind::SourceExhausted).with_source("orders"));
        set.emit(&Event::new(EventKind::SourceClosed));
        set.shutdown().await;

        assert_eq!(
            orders.seen.lock().unwrap().clone(),
            vec![EventKind::SourceExhausted]
        );
        assert_eq!(all.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn full_queue_reports_overflow() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Stuck)];
        let set = SubscriberSet::new(subs, bus);

        // The worker has not run yet on this thread: the first event fills the queue.
        set.emit(&Event::new(EventKind::ErrorItem));
        set.emit(&Event::new(EventKind::ErrorItem));
        set.emit(&Event::subscriber_overflow("other", "full"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.source.as_deref(), Some("stuck"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=stuck reason=full"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn panic_is_reported_on_bus() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Panicker)];
        let set = SubscriberSet::new(subs, bus);

        set.emit(&Event::new(EventKind::SourceClosed));
        set.shutdown().await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.source.as_deref(), Some("panicker"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
    }

    #[test]
    fn panic_reason_reads_string_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let fixed: Box<dyn Any + Send> = Box::new("fixed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_reason(owned.as_ref()), "owned");
        assert_eq!(panic_reason(fixed.as_ref()), "fixed");
        assert_eq!(panic_reason(other.as_ref()), "unknown panic");
    }
}
