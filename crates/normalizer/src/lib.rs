//! Normalizer library for transforming disaster-feed payloads to a unified
//! notification schema.
//!
//! This crate provides a generic, plugin-based architecture for normalizing
//! earthquake/tsunami alert payloads from heterogeneous upstream feeds. To
//! add support for a new feed, implement the `FeedAdapter` trait.
//!
//! # Architecture
//!
//! ```text
//! Raw payloads (caller's fetch layer) --> FeedAdapter --> Notification
//!                                         (parse & transform)
//! ```
//!
//! The adapters are pure: one raw item plus a caller-formatted timestamp in,
//! one notification out. Fetching payloads, formatting timestamps for
//! display, and delivering the results are the caller's responsibility.
//!
//! # Adding a New Feed
//!
//! 1. Create a new adapter struct
//! 2. Implement the `FeedAdapter` trait
//!
//! ```ignore
//! use normalizer::{FeedAdapter, Notification, Result};
//!
//! pub struct JmaXmlAdapter;
//!
//! impl FeedAdapter for JmaXmlAdapter {
//!     const NAME: &'static str = "jma_xml";
//!
//!     fn parse_and_transform(&self, payload: &str) -> Result<Vec<Notification>> {
//!         // Parse JMA XML feed messages into notifications
//!     }
//! }
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use normalizer::{NormalizerService, P2pQuakeAdapter};
//!
//! let adapter = P2pQuakeAdapter::new();
//! let service = NormalizerService::new(adapter, raw_rx, notification_tx, shutdown_rx);
//! service.run().await?;
//! ```

pub mod error;
pub mod format;
pub mod p2pquake;
pub mod schema;
pub mod service;
pub mod traits;
pub mod wolfx;

// Re-export core types
pub use error::{Error, Result};
pub use schema::{Notification, ObservationPoint, ReportType, StructuredData};
pub use service::NormalizerService;
pub use traits::FeedAdapter;

// Re-export feed adapters
pub use p2pquake::P2pQuakeAdapter;
pub use wolfx::WolfxEewAdapter;
