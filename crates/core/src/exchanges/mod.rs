//! Exchange browsing state machines.
//!
//! This module provides the two view-models that mediate between the market
//! data client and the presentation shell:
//!
//! - [`ExchangeListState`] - paginated exchange list with client-side
//!   windowing over a single fully-fetched result set
//! - [`ExchangeDetailState`] - one exchange's enriched details with
//!   independently loaded markets and currencies
//!
//! Both machines notify the shell through `tokio::sync::mpsc` channels of
//! discrete event values obtained via `subscribe()`, and both expose
//! `invalidate()` for owners to call before disposal so in-flight
//! continuations become no-ops instead of touching dead state.

mod detail;
mod list;

#[cfg(test)]
mod mock_client;


pub use detail::{DetailEvent, ExchangeDetailState, MARKET_PAIRS_LIMIT};
pub use list::{ExchangeListState, ListViewState, DISCOVERY_LIMIT, PAGE_SIZE};
