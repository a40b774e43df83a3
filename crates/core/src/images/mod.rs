//! Two-tier image cache keyed by absolute URL.
//!
//! This module provides:
//! - [`CachedImage`] - an encoded image payload with its display dimensions
//! - [`ImageCache`] - a bounded, cost-aware memory tier backed by an
//!   unbounded disk tier
//!
//! All disk I/O runs on one dedicated background actor task per cache
//! instance, fed through a channel, so inserts never block the caller and
//! jobs for a cache are strictly ordered.

mod cache;
mod disk;
mod model;

pub use cache::{ImageCache, MEMORY_COST_LIMIT, MEMORY_COUNT_LIMIT};
pub use model::CachedImage;
