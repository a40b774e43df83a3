//! Market data client abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataClient` trait that consumers depend on
//! - The production `CoinMarketCapClient` implementation
//!
//! # Architecture
//!
//! The client system is designed to be:
//! - **Injectable**: view-model state machines receive an
//!   `Arc<dyn MarketDataClient>` at construction, so tests can substitute
//!   a recording mock for the real HTTP client
//! - **Resilient**: transient failures are retried with exponential backoff,
//!   and a single malformed record never fails a whole batch

mod traits;

pub mod coinmarketcap;

// Re-exports
pub use coinmarketcap::CoinMarketCapClient;
pub use traits::MarketDataClient;
