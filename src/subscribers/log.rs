//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [exhausted] source="orders" delivered=3
//! [cancelled-by-subscription] source="ticks" delivered=7
//! [cancelled-by-iterator] source="ticks" delivered=7
//! [closed] source="orders" delivered=3
//! [error-item] source="rows" position=2 err="torn row"
//! [subscriber-overflow] subscriber="audit" reason="subscriber=audit reason=full"
//! [subscriber-panicked] subscriber="audit" info="boom"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Formats one event as a single log line.
fn render(e: &Event) -> String {
    let source = e.source.as_deref().unwrap_or("unknown");
    let delivered = e.position.unwrap_or(0);

    match e.kind {
        EventKind::SourceExhausted => format!("[exhausted] source={source:?} delivered={delivered}"),
        EventKind::SubscriptionCancelled => {
            format!("[cancelled-by-subscription] source={source:?} delivered={delivered}")
        }
        EventKind::IteratorCancelled => {
            format!("[cancelled-by-iterator] source={source:?} delivered={delivered}")
        }
        EventKind::SourceClosed => format!("[closed] source={source:?} delivered={delivered}"),
        EventKind::ErrorItem => format!(
            "[error-item] source={source:?} position={delivered} err={:?}",
            e.reason.as_deref().unwrap_or("")
        ),
        EventKind::SubscriberOverflow => format!(
            "[subscriber-overflow] subscriber={source:?} reason={:?}",
            e.reason.as_deref().unwrap_or("")
        ),
        EventKind::SubscriberPanicked => format!(
            "[subscriber-panicked] subscriber={source:?} info={:?}",
            e.reason.as_deref().unwrap_or("unknown"),
        ),
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", render(e));
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_names_are_quoted_like_sources() {
        let panicked = Event::subscriber_panicked("audit", "boom".to_string());
        assert_eq!(
            render(&panicked),
            r#"[subscriber-panicked] subscriber="audit" info="boom""#
        );

        let overflow = Event::subscriber_overflow("audit", "full");
        assert_eq!(
            render(&overflow),
            r#"[subscriber-overflow] subscriber="audit" reason="subscriber=audit reason=full""#
        );
    }

    #[test]
    fn source_events_carry_position() {
        let ev = Event::new(EventKind::SourceExhausted)
            .with_source("orders")
            .with_position(3);
        assert_eq!(render(&ev), r#"[exhausted] source="orders" delivered=3"#);
    }
}
