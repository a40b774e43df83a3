use serde::{Deserialize, Serialize};

/// A tradable asset or fiat unit.
///
/// Currencies come from three places: an exchange's `fiats` list (synthesized
/// from symbol strings), asset-holdings entries, and market-pair strings.
/// `id` is absent for synthesized and market-pair-derived entries; within a
/// collection, uniqueness is by `symbol`, not `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub slug: Option<String>,
    pub price_usd: Option<f64>,
}

impl Currency {
    /// Build a currency from a bare symbol, as found in an exchange's
    /// `fiats` list or a market-pair string. `id` is the 1-based position
    /// in the synthesized collection.
    pub fn from_symbol(symbol: &str, id: i64, price_usd: Option<f64>) -> Self {
        Self {
            id: Some(id),
            name: Some(symbol.to_string()),
            symbol: Some(symbol.to_string()),
            slug: Some(symbol.to_lowercase()),
            price_usd,
        }
    }
}
