//! `tracing` layer that forwards events to Slack.
//!
//! Formatting happens inline on the emitting thread; delivery happens on a
//! [`SlackWorker`] task fed through a bounded channel, so logging never
//! waits on the network. When the queue is full, messages are dropped and
//! counted.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::client::{SlackClient, SlackError, WebhookClient};
use super::formatter::{LogRecord, SlackFormatter};
use super::message::SlackMessage;
use crate::config::slack::SlackSettings;

/// Targets whose events would feed back into the delivery path.
const IGNORED_TARGET_PREFIXES: [&str; 5] = ["reqwest", "hyper", "h2", "rustls", "tokio"];

/// Messages held for the worker before new ones are dropped.
pub const QUEUE_CAPACITY: usize = 1024;

pub struct SlackLayer {
    formatter: SlackFormatter,
    min_level: Level,
    tx: mpsc::Sender<SlackMessage>,
    dropped: Arc<AtomicU64>,
}

impl SlackLayer {
    pub fn new(formatter: SlackFormatter, min_level: Level, tx: mpsc::Sender<SlackMessage>) -> Self {
        Self {
            formatter,
            min_level,
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared count of messages dropped because the queue was full.
    ///
    /// Stays readable after the layer moves into a subscriber.
    pub fn dropped_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }

    /// Build a layer and the webhook worker that drains it.
    ///
    /// The worker must be spawned on a runtime; until it runs, up to
    /// [`QUEUE_CAPACITY`] messages queue up and the rest are dropped.
    pub fn from_settings(
        settings: &SlackSettings,
    ) -> Result<(Self, SlackWorker<WebhookClient>), SlackError> {
        let client = WebhookClient::new(settings.webhook_url.clone(), settings.client.clone())?;
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);

        let layer = Self::new(
            SlackFormatter::new(settings.formatter.clone()),
            settings.level,
            tx,
        );
        Ok((layer, SlackWorker::new(client, rx)))
    }

    fn wants(&self, event: &Event<'_>) -> bool {
        let metadata = event.metadata();
        // More verbose levels compare greater.
        if *metadata.level() > self.min_level {
            return false;
        }
        !IGNORED_TARGET_PREFIXES
            .iter()
            .any(|prefix| metadata.target().starts_with(prefix))
    }
}

impl<S> Layer<S> for SlackLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.wants(event) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            level: *event.metadata().level(),
            message: visitor.message,
            timestamp: OffsetDateTime::now_utc(),
            fields: visitor.fields,
        };

        match self.tx.try_send(self.formatter.format(&record)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            // The worker is gone; nothing left to do.
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }
}

/// Drains queued messages into a [`SlackClient`].
pub struct SlackWorker<C> {
    client: C,
    rx: mpsc::Receiver<SlackMessage>,
}

impl<C: SlackClient> SlackWorker<C> {
    pub fn new(client: C, rx: mpsc::Receiver<SlackMessage>) -> Self {
        Self { client, rx }
    }

    /// Runs until every sender is dropped.
    ///
    /// Failures go to stderr: logging them through `tracing` would route them
    /// straight back into this queue.
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            if let Err(e) = self.client.send(&message).await {
                eprintln!("slack log forwarding: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::prelude::*;

    use super::*;
    use crate::logging::slack::formatter::FormatterOptions;

    fn capture_with_capacity(
        min_level: Level,
        capacity: usize,
    ) -> (SlackLayer, mpsc::Receiver<SlackMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        let formatter = SlackFormatter::new(FormatterOptions {
            use_attachment: false,
            format: Some("%type% %message%".to_string()),
            alert_channel: false,
        });
        (SlackLayer::new(formatter, min_level, tx), rx)
    }

    fn capture(min_level: Level) -> (SlackLayer, mpsc::Receiver<SlackMessage>) {
        capture_with_capacity(min_level, 16)
    }

    #[test]
    fn forwards_events_at_or_above_level() {
        let (layer, mut rx) = capture(Level::WARN);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("routine");
            tracing::warn!("getting warm");
            tracing::error!(user = "u1", "failed for {{user}}");
        });

        assert_eq!(rx.try_recv().unwrap().text.as_deref(), Some("WARNING getting warm"));
        assert_eq!(rx.try_recv().unwrap().text.as_deref(), Some("ERROR failed for u1"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn transport_targets_are_ignored() {
        let (layer, mut rx) = capture(Level::TRACE);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "hyper::client", "connection reset");
        });

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn full_queue_drops_and_counts() {
        let (layer, mut rx) = capture_with_capacity(Level::ERROR, 1);
        let dropped = layer.dropped_counter();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("first");
            tracing::error!("second");
            tracing::error!("third");
        });

        assert_eq!(rx.try_recv().unwrap().text.as_deref(), Some("ERROR first"));
        assert!(rx.try_recv().is_err());
        assert_eq!(dropped.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn closed_queue_is_not_counted_as_dropped() {
        let (layer, rx) = capture_with_capacity(Level::ERROR, 1);
        let dropped = layer.dropped_counter();
        drop(rx);
        tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), || {
            tracing::error!("nobody listening");
            tracing::error!("still nobody");
        });
        assert_eq!(dropped.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn dropped_worker_does_not_panic() {
        let (layer, rx) = capture(Level::ERROR);
        drop(rx);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("nobody listening");
        });
    }
}
