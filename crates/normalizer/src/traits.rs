//! Core trait for feed adapters (plugin interface).
//!
//! To add a new upstream feed, implement the `FeedAdapter` trait.
//!
//! # Example
//!
//! ```ignore
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

use crate::error::Result;
use crate::schema::Notification;

/// Core trait for feed adapters.
///
/// Implement this trait to add support for a new upstream feed.
/// The normalizer service is generic over this trait.
pub trait FeedAdapter: Send + Sync + 'static {
    /// Feed name (e.g., "p2pquake", "wolfx").
    const NAME: &'static str;

    /// Parse one raw payload and transform it to unified notifications.
    ///
    /// Returns a vector because one payload may carry multiple items
    /// (the quake feed can deliver an array of reports).
    ///
    /// Returns an empty vector for messages that should be skipped
    /// (heartbeats, message codes other than quake information).
    fn parse_and_transform(&self, payload: &str) -> Result<Vec<Notification>>;
}
