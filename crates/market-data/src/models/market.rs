use serde::{Deserialize, Serialize};

/// One tradable base/quote combination on an exchange.
///
/// The wire format carries no stable identifier, so `id` is synthesized as
/// `"{exchangeId}_{index}"` from the pair's position in the response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Market {
    #[serde(rename = "market_id")]
    pub id: String,
    /// Pair string of the form `BASE/QUOTE`, e.g. `"BTC/USDT"`.
    pub market_pair: Option<String>,
    pub category: Option<String>,
    pub fee_type: Option<String>,
    pub volume_usd: Option<f64>,
    pub price_usd: Option<f64>,
    pub price_quote: Option<f64>,
}

impl Market {
    /// Synthesize the identifier for the pair at `index` of an exchange's
    /// market-pair listing.
    pub fn synthesized_id(exchange_id: i64, index: usize) -> String {
        format!("{}_{}", exchange_id, index)
    }
}
