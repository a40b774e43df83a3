//! Coinboard Core - view-state machines, image cache, and display formatting.
//!
//! This crate contains the state-management layer that mediates between the
//! network layer (`coinboard-market-data`) and a presentation shell. The
//! shell consumes [`ViewState`] transitions and discrete events from the two
//! state machines, and issues intents back (refresh, scroll-driven
//! pagination, item selection). No rendering happens here.

pub mod exchanges;
pub mod format;
pub mod images;
pub mod view_state;

// Re-export the state machines and their event types
pub use exchanges::{DetailEvent, ExchangeDetailState, ExchangeListState};

// Re-export the image cache
pub use images::{CachedImage, ImageCache};

pub use view_state::ViewState;

// Re-export the market data surface consumers need alongside the state
// machines
pub use coinboard_market_data::{
    ApiError, CoinMarketCapClient, Currency, Exchange, Market, MarketDataClient,
};
