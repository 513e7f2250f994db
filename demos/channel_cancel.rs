//! # Example: channel_cancel
//!
//! Demonstrates the two ways a channel source can be cancelled and how the consumer
//! tells them apart.
//!
//! Shows how to:
//! - Pull from a [`ChannelSource`] fed by a background producer
//! - Stop it from the producer side with [`ChannelSource::cancel_handle`]
//! - Stop it from the consumer side by cancelling the subscription token
//! - Observe lifecycle events through a [`SubscriberSet`]
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► relay(bus) ──► SubscriberSet (LogWriter with "logging")
//!   │
//!   ├─► round 1: producer-side stop
//!   │     ├─► producer sends ticks every 50ms
//!   │     ├─► after 5 ticks: handle.cancel()
//!   │     └─► consumer sees CancelledByIterator
//!   │
//!   └─► round 2: consumer-side stop
//!         ├─► producer sends ticks forever
//!         ├─► consumer cancels its own token after 200ms
//!         └─► consumer sees CancelledBySubscription
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example channel_cancel --features logging
//! ```

use std::{sync::Arc, time::Duration};

use pullsource::{
    channel, relay, Bus, ChannelSource, Config, ErrorKind, Pull, Subscribe, SubscriberSet,
};
use tokio_util::sync::CancellationToken;

/// Pulls until a terminal error and returns its kind with the number of values seen.
async fn consume(src: &mut ChannelSource<u32>, ctx: &CancellationToken) -> (ErrorKind, u32) {
    let mut seen = 0;
    loop {
        match src.next(ctx).await {
            Ok(item) => {
                seen += 1;
                println!("[consumer] {item:?}");
            }
            Err(e) => {
                println!("[consumer] stopped: {e} ({})", e.as_label());
                return (e.kind(), seen);
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== channel_cancel example ===\n");

    // 1. Configure sources and the event bus
    let mut cfg = Config::default();
    cfg.channel_capacity = 8;
    cfg.bus_capacity = 64;
    let bus = Bus::new(cfg.bus_capacity_clamped());

    // 2. Optional: add subscriber to see events (requires "logging" feature)
    #[cfg(feature = "logging")]
    let subs: Vec<Arc<dyn Subscribe>> = {
        use pullsource::LogWriter;
        vec![Arc::new(LogWriter)]
    };
    #[cfg(not(feature = "logging"))]
    let subs: Vec<Arc<dyn Subscribe>> = Vec::new();

    let set = Arc::new(SubscriberSet::new(subs, bus.clone()));
    let stop_relay = CancellationToken::new();
    let forwarder = relay(&bus, Arc::clone(&set), stop_relay.clone());

    // 3. Round 1: the producer stops the source on its own
    let (tx, src) = channel::<u32>(&cfg);
    let mut src = src.with_name("ticks-1").with_bus(bus.clone());
    let handle = src.cancel_handle();

    let producer = tokio::spawn(async move {
        for tick in 1..=5u32 {
            if tx.send(tick).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        println!("[producer] upstream done, cancelling source");
        handle.cancel();
        // Hand the sender back: dropping it would also close the channel and race
        // exhaustion against the cancellation.
        tx
    });

    let subscription = CancellationToken::new();
    let (kind, seen) = consume(&mut src, &subscription).await;
    let _tx = producer.await?;
    assert_eq!(kind, ErrorKind::CancelledByIterator);
    println!("[round 1] {seen} values, then {}\n", kind.as_label());
    src.close();

    // 4. Round 2: the consumer walks away
    let (tx, src) = channel::<u32>(&cfg);
    let mut src = src.with_name("ticks-2").with_bus(bus.clone());

    let producer = tokio::spawn(async move {
        let mut tick = 0u32;
        loop {
            tick += 1;
            if tx.send(tick).await.is_err() {
                println!("[producer] receiver closed, exiting");
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    });

    let subscription = CancellationToken::new();
    {
        let subscription = subscription.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            println!("[consumer] cancelling subscription");
            subscription.cancel();
        });
    }

    let (kind, seen) = consume(&mut src, &subscription).await;
    assert_eq!(kind, ErrorKind::CancelledBySubscription);
    assert!(!src.is_cancelled(), "consumer cancel must not touch the source scope");
    println!("[round 2] {seen} values, then {}\n", kind.as_label());

    // Dispose: closes the receiver so the producer's next send fails.
    src.close();
    producer.await?;

    // 5. Flush events and stop subscribers
    stop_relay.cancel();
    forwarder.await?;
    if let Ok(set) = Arc::try_unwrap(set) {
        set.shutdown().await;
    }

    println!("=== example completed successfully ===");
    Ok(())
}
