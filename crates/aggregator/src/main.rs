//! Main entry point for the disaster-feed aggregator.
//!
//! Wires one normalizer service per upstream feed and runs the bundled
//! sample payloads through them. Fetching real payloads over the network
//! and delivering the resulting notifications are the surrounding system's
//! job; this binary only exercises the normalization path.

use anyhow::Result;
use normalizer::{FeedAdapter, Notification, NormalizerService, P2pQuakeAdapter, WolfxEewAdapter};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sample payloads captured from the quake-information feed.
const QUAKE_SAMPLES: &[&str] = &[
    include_str!("../samples/p2pquake_detail.json"),
    include_str!("../samples/p2pquake_scale_prompt.json"),
];

/// Sample payloads captured from the early-warning feed.
const EEW_SAMPLES: &[&str] = &[
    include_str!("../samples/wolfx_warning.json"),
    include_str!("../samples/wolfx_cancel.json"),
];

/// Run one feed's sample payloads through its normalizer service and
/// collect the resulting notifications.
async fn run_feed<A: FeedAdapter>(adapter: A, samples: &[&str]) -> Result<Vec<Notification>> {
    let (raw_tx, raw_rx) = mpsc::channel(16);
    let (notification_tx, mut notification_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

    let service = NormalizerService::new(adapter, raw_rx, notification_tx, shutdown_rx);
    let handle = tokio::spawn(async move {
        if let Err(e) = service.run().await {
            error!("Normalizer failed: {:?}", e);
        }
    });

    for sample in samples {
        raw_tx.send((*sample).to_string()).await?;
    }

    // Each sample payload carries exactly one report.
    let mut notifications = Vec::new();
    for _ in 0..samples.len() {
        match notification_rx.recv().await {
            Some(notification) => notifications.push(notification),
            None => break,
        }
    }

    let _ = shutdown_tx.send(()).await;
    let _ = handle.await;

    Ok(notifications)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting disaster-feed aggregator...");

    let mut notifications = run_feed(P2pQuakeAdapter::new(), QUAKE_SAMPLES).await?;
    notifications.extend(run_feed(WolfxEewAdapter::new(), EEW_SAMPLES).await?);

    for notification in &notifications {
        println!("=== {} ===", notification.list_summary);
        println!("{}", notification.full_text);
        println!();
        println!(
            "structured: {}",
            serde_json::to_string_pretty(&notification.structured_data)?
        );
        println!();
    }

    info!("Normalized {} notifications", notifications.len());

    Ok(())
}
