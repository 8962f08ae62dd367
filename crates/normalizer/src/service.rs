//! Generic normalizer service that works with any feed adapter.
//!
//! The service owns no transport: the caller's fetch layer pushes raw
//! payload strings into the inbound channel and consumes unified
//! notifications from the outbound channel. Persistence, deduplication,
//! and delivery all stay on the caller's side.

use crate::error::Error;
use crate::schema::Notification;
use crate::traits::FeedAdapter;
use anyhow::Result;
use metrics::counter;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Generic normalizer service.
///
/// The service is parameterized by a `FeedAdapter` which defines how to
/// parse and transform payloads for a specific upstream feed.
pub struct NormalizerService<A: FeedAdapter> {
    adapter: A,
    raw_rx: mpsc::Receiver<String>,
    notification_tx: mpsc::Sender<Notification>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<A: FeedAdapter> NormalizerService<A> {
    /// Create a new normalizer service with the given adapter.
    pub fn new(
        adapter: A,
        raw_rx: mpsc::Receiver<String>,
        notification_tx: mpsc::Sender<Notification>,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            adapter,
            raw_rx,
            notification_tx,
            shutdown_rx,
        }
    }

    /// Run the normalizer service.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting {} normalizer", A::NAME);

        loop {
            tokio::select! {
                biased;  // Prioritize shutdown signal

                _ = self.shutdown_rx.recv() => {
                    info!("{} normalizer received shutdown signal", A::NAME);
                    break;
                }

                payload = self.raw_rx.recv() => {
                    match payload {
                        Some(payload) => {
                            counter!(
                                "normalizer_messages_received_total",
                                "feed" => A::NAME
                            ).increment(1);

                            if let Err(e) = self.process_message(&payload).await {
                                error!("[{}] Failed to process message: {:?}", A::NAME, e);
                                counter!(
                                    "normalizer_errors_total",
                                    "feed" => A::NAME,
                                    "error_type" => "processing"
                                ).increment(1);
                            }
                        }
                        None => {
                            warn!("[{}] Raw payload channel closed", A::NAME);
                            break;
                        }
                    }
                }
            }
        }

        info!("{} normalizer service stopped", A::NAME);
        Ok(())
    }

    /// Process a single raw payload.
    async fn process_message(&self, payload: &str) -> Result<()> {
        let notifications = match self.adapter.parse_and_transform(payload) {
            Ok(items) => items,
            Err(e) => {
                debug!("[{}] Failed to parse payload: {:?}", A::NAME, e);
                counter!(
                    "normalizer_parse_errors_total",
                    "feed" => A::NAME
                )
                .increment(1);
                return Ok(());
            }
        };

        for notification in notifications {
            self.publish(notification).await?;
        }

        Ok(())
    }

    /// Hand one notification to the downstream consumer.
    async fn publish(&self, notification: Notification) -> Result<()> {
        debug!("[{}] Publishing {}", A::NAME, notification.id);

        self.notification_tx
            .send(notification)
            .await
            .map_err(|_| Error::ChannelClosed)?;

        counter!(
            "normalizer_notifications_published_total",
            "feed" => A::NAME
        )
        .increment(1);

        Ok(())
    }
}
