//! P2P地震情報 feed adapter.
//!
//! This module provides the `P2pQuakeAdapter` which implements the
//! `FeedAdapter` trait for normalizing quake-information messages.

mod adapter;

pub use adapter::{
    normalize, P2pQuakeAdapter, QuakeReportKind, RawComments, RawEarthquake, RawHypocenter,
    RawIssue, RawQuakeItem,
};
