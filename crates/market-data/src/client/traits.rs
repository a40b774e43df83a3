//! Market data client trait definition.
//!
//! This module defines the `MarketDataClient` capability trait that the
//! view-model layer depends on. Production code uses
//! [`CoinMarketCapClient`](super::CoinMarketCapClient); tests substitute
//! recording mocks behind the same trait.

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{Currency, Exchange, Market};

/// Capability set for fetching exchange data from a remote market data API.
///
/// All methods are asynchronous and non-blocking on the caller's execution
/// context. Implementations must be shareable across tasks (`Send + Sync`);
/// a single long-lived instance is constructed at process start and handed
/// by `Arc` to every consumer.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetch the top exchanges, enriched with their info records.
    ///
    /// `limit` is the discovery limit passed to the remote API; the number
    /// of enriched records returned is capped independently (at most 20).
    /// Results are sorted descending by spot volume, falling back to
    /// ascending name order when a volume is missing.
    async fn fetch_exchanges(&self, limit: u32) -> Result<Vec<Exchange>, ApiError>;

    /// Fetch the full info record for a single exchange.
    ///
    /// A response that lacks the requested id is an invalid-response error,
    /// not an empty result.
    async fn fetch_exchange_info(&self, id: i64) -> Result<Exchange, ApiError>;

    /// Fetch the currencies held by an exchange.
    ///
    /// Entries missing a name or symbol are dropped; an empty or
    /// unrecognized response shape yields an empty list, not an error.
    async fn fetch_exchange_assets(&self, id: i64) -> Result<Vec<Currency>, ApiError>;

    /// Fetch up to `limit` market pairs listed on an exchange.
    ///
    /// Market ids are synthesized from the exchange id and the pair's
    /// position in the response.
    async fn fetch_exchange_market_pairs(
        &self,
        id: i64,
        limit: u32,
    ) -> Result<Vec<Market>, ApiError>;
}
