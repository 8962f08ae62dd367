//! Wolfx EEW feed adapter.
//!
//! This module provides the `WolfxEewAdapter` which implements the
//! `FeedAdapter` trait for normalizing early-warning messages.

mod adapter;

pub use adapter::{normalize, RawEewItem, RawWarnArea, WolfxEewAdapter};
