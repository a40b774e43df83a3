//! Coinboard Market Data Crate
//!
//! This crate provides the data-acquisition layer for the Coinboard
//! application: a retrying HTTP client for the CoinMarketCap exchange API.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Exchange discovery and batched exchange-info enrichment (map → info)
//! - Per-exchange asset holdings and market pairs
//! - Retry with exponential backoff for transient failures
//! - Permissive wire decoding with graceful degradation on partial data
//!
//! # Architecture
//!
//! ```text
//! +--------------------+     +----------------------+
//! |   Consumer (core)  | --> |  MarketDataClient    |  (capability trait)
//! +--------------------+     +----------------------+
//!                                      |
//!                                      v
//!                            +----------------------+
//!                            | CoinMarketCapClient  |  (reqwest, RetryPolicy)
//!                            +----------------------+
//!                                      |
//!                                      v
//!                            +----------------------+
//!                            | Exchange / Currency  |  (domain models)
//!                            | / Market             |
//!                            +----------------------+
//! ```
//!
//! # Core Types
//!
//! - [`MarketDataClient`] - Capability trait implemented by the production
//!   client and by test doubles
//! - [`CoinMarketCapClient`] - Production client for the CoinMarketCap API
//! - [`RetryPolicy`] - Exponential-backoff retry wrapper for async operations
//! - [`ApiError`] - Error taxonomy for all remote operations
//! - [`Exchange`], [`Currency`], [`Market`] - Domain models

pub mod client;
pub mod errors;
pub mod models;
pub mod retry;

// Re-export all public types from models
pub use models::{Currency, Exchange, ExchangeUrls, Market};

// Re-export client types
pub use client::{CoinMarketCapClient, MarketDataClient};

// Re-export error and retry types
pub use errors::{ApiError, RetryClass};
pub use retry::RetryPolicy;
