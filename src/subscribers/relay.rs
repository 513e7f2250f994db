//! # Bus → subscriber forwarding.
//!
//! [`relay`] subscribes to a [`Bus`] and forwards every event to a [`SubscriberSet`]
//! from a background task.
//!
//! ```text
//! Source ── publish(Event) ──► Bus ──► relay task ──► SubscriberSet::emit(&Event)
//! ```
//!
//! ## Rules
//! - The receiver is created **before** the task is spawned, so events published right
//!   after `relay` returns are not missed.
//! - Lagged receivers skip the lost events and keep going.
//! - Stops when `token` is cancelled (after forwarding what is already buffered) or when
//!   every bus sender is gone.

use std::sync::Arc;

use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::events::Bus;
use crate::subscribers::SubscriberSet;

/// Spawns the forwarding task and returns its handle.
pub fn relay(bus: &Bus, set: Arc<SubscriberSet>, token: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
                _ = token.cancelled() => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::events::{Event, EventKind};
    use crate::sources::{from_range, Pull};
    use crate::subscribers::Subscribe;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().unwrap().push(ev.kind);
        }
    }

    #[tokio::test]
    async fn forwards_source_events_to_subscribers() {
        let bus = Bus::new(16);
        let rec = Arc::new(Recorder::default());
        let set = Arc::new(SubscriberSet::new(
            vec![rec.clone() as Arc<dyn Subscribe>],
            bus.clone(),
        ));
        let stop = CancellationToken::new();
        let handle = relay(&bus, Arc::clone(&set), stop.clone());

        let ctx = CancellationToken::new();
        let mut src = from_range(0, 1).with_bus(bus.clone());
        while src.next(&ctx).await.is_ok() {}
        src.close();

        stop.cancel();
        handle.await.unwrap();
        let Ok(set) = Arc::try_unwrap(set) else {
            panic!("relay still holds the set");
        };
        set.shutdown().await;

        let seen = rec.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![EventKind::SourceExhausted, EventKind::SourceClosed]);
    }
}
