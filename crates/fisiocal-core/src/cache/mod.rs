//! Local caching module for offline roster access.
//!
//! This module provides the `CacheManager` for storing the last fetched
//! student roster (one file per physiotherapist filter) and the
//! physiotherapist list. Data is cached in JSON format and considered
//! stale after 60 minutes.
//!
//! Only fetched data is cached. Calendar events are always projected
//! fresh from the roster.

pub mod manager;

pub use manager::{CacheManager, CachedData};
