//! CoinMarketCap market data client implementation.
//!
//! This module fetches exchange data from the CoinMarketCap Pro API:
//! - Exchange discovery via /exchange/map
//! - Exchange info (batched and single) via /exchange/info
//! - Asset holdings via /exchange/assets
//! - Market pairs via /exchange/market-pairs/latest
//!
//! All responses share a `{status: {...}, data: ...}` envelope; the shape of
//! `data` varies per endpoint. API documentation:
//! https://coinmarketcap.com/api/documentation/v1/

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::models::{Currency, Exchange, ExchangeUrls, Market};
use crate::retry::RetryPolicy;

const BASE_URL: &str = "https://pro-api.coinmarketcap.com/v1";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

const MAP_ENDPOINT: &str = "/exchange/map";
const INFO_ENDPOINT: &str = "/exchange/info";
const ASSETS_ENDPOINT: &str = "/exchange/assets";
const MARKET_PAIRS_ENDPOINT: &str = "/exchange/market-pairs/latest";

/// Idle read timeout per request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Total transfer ceiling per request.
const RESOURCE_TIMEOUT: Duration = Duration::from_secs(60);

/// At most this many discovered ids are enriched in one info batch.
const MAX_INFO_BATCH: usize = 20;

// ============================================================================
// API Response Structures
// ============================================================================

/// Envelope carried by every response; only consulted for error bodies.
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    error_message: Option<String>,
}

/// One exchange object from /exchange/info.
///
/// Decoding is permissive: a missing `name` or `slug` becomes an empty
/// string, everything else stays absent. The `fiats` field arrives as bare
/// symbol strings and is synthesized into [`Currency`] records.
#[derive(Debug, Deserialize)]
struct ExchangeInfoWire {
    id: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: String,
    logo: Option<String>,
    description: Option<String>,
    date_launched: Option<String>,
    urls: Option<ExchangeUrls>,
    spot_volume_usd: Option<f64>,
    maker_fee: Option<f64>,
    taker_fee: Option<f64>,
    weekly_visits: Option<i64>,
    num_markets: Option<i64>,
    num_coins: Option<i64>,
    fiats: Option<Vec<String>>,
    markets: Option<Vec<Market>>,
}

impl ExchangeInfoWire {
    fn into_exchange(self, id: i64) -> Exchange {
        let fiats = self.fiats.map(|symbols| {
            symbols
                .iter()
                .enumerate()
                .map(|(index, symbol)| Currency::from_symbol(symbol, index as i64 + 1, None))
                .collect()
        });

        Exchange {
            id,
            name: self.name,
            slug: Some(self.slug),
            logo: self.logo,
            description: self.description,
            date_launched: self.date_launched,
            urls: self.urls,
            spot_volume_usd: self.spot_volume_usd,
            maker_fee: self.maker_fee,
            taker_fee: self.taker_fee,
            weekly_visits: self.weekly_visits,
            num_markets: self.num_markets,
            num_coins: self.num_coins,
            fiats,
            markets: self.markets,
        }
    }
}

/// One entry from /exchange/assets.
#[derive(Debug, Deserialize)]
struct AssetEntryWire {
    currency: Option<AssetCurrencyWire>,
}

#[derive(Debug, Deserialize)]
struct AssetCurrencyWire {
    name: Option<String>,
    symbol: Option<String>,
    crypto_id: Option<i64>,
    price_usd: Option<f64>,
}

/// One entry from /exchange/market-pairs/latest.
#[derive(Debug, Deserialize)]
struct MarketPairWire {
    market_pair: Option<String>,
    category: Option<String>,
    fee_type: Option<String>,
    quote: Option<MarketQuoteWire>,
}

#[derive(Debug, Deserialize)]
struct MarketQuoteWire {
    #[serde(rename = "USD")]
    usd: Option<UsdQuoteWire>,
}

#[derive(Debug, Deserialize)]
struct UsdQuoteWire {
    volume_24h: Option<f64>,
    price: Option<f64>,
}

impl MarketPairWire {
    fn into_market(self, exchange_id: i64, index: usize) -> Market {
        let usd = self.quote.and_then(|quote| quote.usd);

        Market {
            id: Market::synthesized_id(exchange_id, index),
            market_pair: self.market_pair,
            category: self.category,
            fee_type: self.fee_type,
            volume_usd: usd.as_ref().and_then(|usd| usd.volume_24h),
            price_usd: usd.as_ref().and_then(|usd| usd.price),
            price_quote: None,
        }
    }
}

// ============================================================================
// CoinMarketCapClient
// ============================================================================

/// Production client for the CoinMarketCap Pro API.
///
/// Holds one `reqwest::Client` with fixed timeouts and one shared
/// [`RetryPolicy`]; construct it once at process start and hand it to
/// consumers as an `Arc<dyn MarketDataClient>`.
pub struct CoinMarketCapClient {
    http: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl CoinMarketCapClient {
    /// Create a client with the given API key and default retry policy.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = Client::builder()
            .read_timeout(REQUEST_TIMEOUT)
            .timeout(RESOURCE_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            retry: RetryPolicy::with_defaults(),
        }
    }

    /// Make a GET request and return the response body.
    ///
    /// Non-2xx statuses become [`ApiError::Api`] when the body carries a
    /// structured `{status: {error_message}}` envelope, otherwise
    /// [`ApiError::InvalidResponse`]. Transport failures become
    /// [`ApiError::Network`].
    async fn request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, ApiError> {
        let url = Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|_| ApiError::InvalidUrl)?;

        debug!(
            "CoinMarketCap request: {} with {} params",
            endpoint,
            params.len()
        );

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            if let Some(message) = error_message_from_body(&body) {
                return Err(ApiError::Api(message));
            }
            return Err(ApiError::InvalidResponse);
        }

        Ok(body)
    }

    /// One pass of the two-stage discovery → info pipeline.
    async fn fetch_exchanges_once(&self, limit: u32) -> Result<Vec<Exchange>, ApiError> {
        let body = self
            .request(
                MAP_ENDPOINT,
                &[
                    ("limit", limit.to_string()),
                    ("sort", "volume_24h".to_string()),
                ],
            )
            .await?;
        let json = parse_json(&body)?;
        let ids = discovery_ids_from_json(&json)?;
        let ids = limit_discovery_ids(&ids);

        if ids.is_empty() {
            debug!("exchange discovery returned no usable ids");
            return Ok(Vec::new());
        }

        let id_list = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let body = self.request(INFO_ENDPOINT, &[("id", id_list)]).await?;
        let json = parse_json(&body)?;

        let exchanges = exchanges_from_info_json(&json)?;
        debug!("fetched {} enriched exchanges", exchanges.len());
        Ok(exchanges)
    }

    async fn fetch_info(&self, id: i64) -> Result<Exchange, ApiError> {
        let body = self
            .request(INFO_ENDPOINT, &[("id", id.to_string())])
            .await?;
        let json = parse_json(&body)?;
        exchange_from_info_json(&json, id)
    }

    async fn fetch_assets(&self, id: i64) -> Result<Vec<Currency>, ApiError> {
        let body = self
            .request(ASSETS_ENDPOINT, &[("id", id.to_string())])
            .await?;
        let json = parse_json(&body)?;
        Ok(currencies_from_assets_json(&json, id))
    }

    async fn fetch_market_pairs(&self, id: i64, limit: u32) -> Result<Vec<Market>, ApiError> {
        let body = self
            .request(
                MARKET_PAIRS_ENDPOINT,
                &[("id", id.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        let json = parse_json(&body)?;
        Ok(markets_from_pairs_json(&json, id))
    }
}

// ============================================================================
// MarketDataClient Implementation
// ============================================================================

#[async_trait::async_trait]
impl crate::client::MarketDataClient for CoinMarketCapClient {
    async fn fetch_exchanges(&self, limit: u32) -> Result<Vec<Exchange>, ApiError> {
        debug!("fetching top exchanges (discovery limit {})", limit);
        self.retry
            .execute(|| self.fetch_exchanges_once(limit))
            .await
    }

    async fn fetch_exchange_info(&self, id: i64) -> Result<Exchange, ApiError> {
        debug!("fetching info for exchange {}", id);
        self.fetch_info(id).await
    }

    async fn fetch_exchange_assets(&self, id: i64) -> Result<Vec<Currency>, ApiError> {
        debug!("fetching asset holdings for exchange {}", id);
        self.fetch_assets(id).await
    }

    async fn fetch_exchange_market_pairs(
        &self,
        id: i64,
        limit: u32,
    ) -> Result<Vec<Market>, ApiError> {
        debug!("fetching up to {} market pairs for exchange {}", limit, id);
        self.fetch_market_pairs(id, limit).await
    }
}

// ============================================================================
// Response Decoding
// ============================================================================

fn parse_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|_| ApiError::InvalidResponse)
}

/// Extract the server's structured error message from an error body, if any.
fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<StatusEnvelope>(body)
        .ok()?
        .status?
        .error_message
}

/// Pull the discovered exchange ids out of a /exchange/map response,
/// preserving the server's order. Entries without an integer id are skipped.
fn discovery_ids_from_json(json: &Value) -> Result<Vec<i64>, ApiError> {
    let entries = json
        .get("data")
        .and_then(Value::as_array)
        .ok_or(ApiError::InvalidResponse)?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("id").and_then(Value::as_i64))
        .collect())
}

/// Cap the discovery result at the info-batch maximum, in discovery order.
fn limit_discovery_ids(ids: &[i64]) -> &[i64] {
    &ids[..ids.len().min(MAX_INFO_BATCH)]
}

/// Decode the id-keyed object map of a batched /exchange/info response.
///
/// A malformed entry is skipped, never failing the batch. The result is
/// sorted with [`volume_name_order`].
fn exchanges_from_info_json(json: &Value) -> Result<Vec<Exchange>, ApiError> {
    let map = json
        .get("data")
        .and_then(Value::as_object)
        .ok_or(ApiError::InvalidResponse)?;

    let mut exchanges: Vec<Exchange> = Vec::with_capacity(map.len());
    for (key, value) in map {
        let wire: ExchangeInfoWire = match serde_json::from_value(value.clone()) {
            Ok(wire) => wire,
            Err(err) => {
                warn!("skipping malformed exchange info entry '{}': {}", key, err);
                continue;
            }
        };
        let id = key.parse::<i64>().ok().or(wire.id).unwrap_or(0);
        exchanges.push(wire.into_exchange(id));
    }

    exchanges.sort_by(volume_name_order);
    Ok(exchanges)
}

/// Decode the single object at key `id` of a /exchange/info response.
///
/// A missing key is an invalid response, not "not found"; a present but
/// undecodable object is a decoding error.
fn exchange_from_info_json(json: &Value, id: i64) -> Result<Exchange, ApiError> {
    let entry = json
        .get("data")
        .and_then(|data| data.get(id.to_string().as_str()))
        .ok_or(ApiError::InvalidResponse)?;

    let wire: ExchangeInfoWire = serde_json::from_value(entry.clone())
        .map_err(|err| ApiError::Decoding(Arc::new(err)))?;
    let resolved = wire.id.unwrap_or(id);
    Ok(wire.into_exchange(resolved))
}

/// Decode an /exchange/assets response into held currencies.
///
/// The response is either a top-level `data` array or a `data` map keyed by
/// exchange id; unrecognized shapes yield an empty list.
fn currencies_from_assets_json(json: &Value, id: i64) -> Vec<Currency> {
    match json.get("data") {
        Some(Value::Array(entries)) => decode_asset_entries(entries),
        Some(Value::Object(map)) => match map.get(&id.to_string()) {
            Some(Value::Array(entries)) => decode_asset_entries(entries),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Decode asset entries, dropping any without both a name and a symbol.
fn decode_asset_entries(entries: &[Value]) -> Vec<Currency> {
    entries
        .iter()
        .filter_map(|entry| {
            let wire: AssetEntryWire = serde_json::from_value(entry.clone()).ok()?;
            let currency = wire.currency?;
            let name = currency.name?;
            let symbol = currency.symbol?;
            Some(Currency {
                id: currency.crypto_id,
                name: Some(name),
                slug: Some(symbol.to_lowercase()),
                symbol: Some(symbol),
                price_usd: currency.price_usd,
            })
        })
        .collect()
}

/// Decode a /exchange/market-pairs/latest response, synthesizing market ids
/// from the exchange id and each pair's position.
fn markets_from_pairs_json(json: &Value, id: i64) -> Vec<Market> {
    let Some(pairs) = json
        .get("data")
        .and_then(|data| data.get("market_pairs"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    pairs
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let wire: MarketPairWire = match serde_json::from_value(entry.clone()) {
                Ok(wire) => wire,
                Err(err) => {
                    warn!("skipping malformed market pair at index {}: {}", index, err);
                    return None;
                }
            };
            Some(wire.into_market(id, index))
        })
        .collect()
}

/// Stable ordering combinator for exchange lists: descending volume when
/// both sides carry one, ascending name otherwise. Not a strict total order;
/// callers must use a stable sort so equal items keep their incoming order.
fn volume_name_order(a: &Exchange, b: &Exchange) -> Ordering {
    match (a.spot_volume_usd, b.spot_volume_usd) {
        (Some(va), Some(vb)) => vb.partial_cmp(&va).unwrap_or(Ordering::Equal),
        _ => a.name.cmp(&b.name),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange_named(name: &str, volume: Option<f64>) -> Exchange {
        Exchange {
            id: 1,
            name: name.to_string(),
            slug: None,
            logo: None,
            description: None,
            date_launched: None,
            urls: None,
            spot_volume_usd: volume,
            maker_fee: None,
            taker_fee: None,
            weekly_visits: None,
            num_markets: None,
            num_coins: None,
            fiats: None,
            markets: None,
        }
    }

    #[test]
    fn test_limit_discovery_ids_caps_at_twenty() {
        let ids: Vec<i64> = (1..=30).collect();
        let limited = limit_discovery_ids(&ids);
        assert_eq!(limited.len(), 20);
        assert_eq!(limited, &ids[..20]);
    }

    #[test]
    fn test_limit_discovery_ids_keeps_short_lists() {
        let ids = vec![270, 311, 24];
        assert_eq!(limit_discovery_ids(&ids), &[270, 311, 24]);
    }

    #[test]
    fn test_discovery_ids_preserve_order_and_skip_idless_entries() {
        let json: Value = serde_json::from_str(
            r#"{"data": [{"id": 311}, {"name": "no id"}, {"id": 270}, {"id": 24}]}"#,
        )
        .unwrap();
        assert_eq!(discovery_ids_from_json(&json).unwrap(), vec![311, 270, 24]);
    }

    #[test]
    fn test_discovery_ids_reject_non_array_data() {
        let json: Value = serde_json::from_str(r#"{"data": {"oops": true}}"#).unwrap();
        assert!(matches!(
            discovery_ids_from_json(&json),
            Err(ApiError::InvalidResponse)
        ));
    }

    #[test]
    fn test_volume_order_descends_then_falls_back_to_name() {
        let mut exchanges = vec![
            exchange_named("B", Some(5.0)),
            exchange_named("A", Some(10.0)),
            exchange_named("C", None),
        ];
        exchanges.sort_by(volume_name_order);

        let names: Vec<&str> = exchanges.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_volume_order_sorts_missing_volumes_by_name() {
        let mut exchanges = vec![exchange_named("Z", None), exchange_named("A", None)];
        exchanges.sort_by(volume_name_order);

        let names: Vec<&str> = exchanges.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Z"]);
    }

    #[test]
    fn test_exchange_info_wire_full_record() {
        let json = r#"{
            "id": 270,
            "name": "Binance",
            "slug": "binance",
            "logo": "https://example.com/270.png",
            "description": "Global exchange",
            "date_launched": "2017-07-14T00:00:00.000Z",
            "urls": {
                "website": ["https://www.binance.com"],
                "twitter": ["https://twitter.com/binance"]
            },
            "spot_volume_usd": 15000000000.5,
            "maker_fee": 0.1,
            "taker_fee": 0.1,
            "weekly_visits": 50000000,
            "num_markets": 1500,
            "num_coins": 350,
            "fiats": ["USD", "EUR"]
        }"#;

        let wire: ExchangeInfoWire = serde_json::from_str(json).unwrap();
        let exchange = wire.into_exchange(270);

        assert_eq!(exchange.id, 270);
        assert_eq!(exchange.name, "Binance");
        assert_eq!(exchange.slug.as_deref(), Some("binance"));
        assert_eq!(exchange.spot_volume_usd, Some(15_000_000_000.5));
        assert_eq!(exchange.num_markets, Some(1500));

        let fiats = exchange.fiats.unwrap();
        assert_eq!(fiats.len(), 2);
        assert_eq!(fiats[0].id, Some(1));
        assert_eq!(fiats[0].symbol.as_deref(), Some("USD"));
        assert_eq!(fiats[0].slug.as_deref(), Some("usd"));
        assert_eq!(fiats[0].price_usd, None);
        assert_eq!(fiats[1].id, Some(2));
        assert_eq!(fiats[1].symbol.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_exchange_info_wire_defaults_missing_name_and_slug() {
        let wire: ExchangeInfoWire = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        let exchange = wire.into_exchange(9);

        assert_eq!(exchange.name, "");
        assert_eq!(exchange.slug.as_deref(), Some(""));
        assert_eq!(exchange.fiats, None);
        assert_eq!(exchange.urls, None);
    }

    #[test]
    fn test_info_batch_skips_malformed_entry() {
        let json: Value = serde_json::from_str(
            r#"{
                "data": {
                    "270": {"id": 270, "name": "Binance", "spot_volume_usd": 100.0},
                    "311": "not an object",
                    "24": {"id": 24, "name": "Kraken", "spot_volume_usd": 50.0}
                }
            }"#,
        )
        .unwrap();

        let exchanges = exchanges_from_info_json(&json).unwrap();
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[0].name, "Binance");
        assert_eq!(exchanges[1].name, "Kraken");
    }

    #[test]
    fn test_info_batch_takes_id_from_key() {
        let json: Value =
            serde_json::from_str(r#"{"data": {"270": {"name": "Binance"}}}"#).unwrap();

        let exchanges = exchanges_from_info_json(&json).unwrap();
        assert_eq!(exchanges[0].id, 270);
    }

    #[test]
    fn test_single_info_missing_key_is_invalid_response() {
        let json: Value = serde_json::from_str(r#"{"data": {"311": {"id": 311}}}"#).unwrap();
        assert!(matches!(
            exchange_from_info_json(&json, 270),
            Err(ApiError::InvalidResponse)
        ));
    }

    #[test]
    fn test_single_info_undecodable_entry_is_decoding_error() {
        let json: Value =
            serde_json::from_str(r#"{"data": {"270": {"name": ["not", "a", "string"]}}}"#).unwrap();
        assert!(matches!(
            exchange_from_info_json(&json, 270),
            Err(ApiError::Decoding(_))
        ));
    }

    #[test]
    fn test_single_info_decodes_entry() {
        let json: Value = serde_json::from_str(
            r#"{"data": {"270": {"id": 270, "name": "Binance", "fiats": ["USD"]}}}"#,
        )
        .unwrap();

        let exchange = exchange_from_info_json(&json, 270).unwrap();
        assert_eq!(exchange.id, 270);
        assert_eq!(exchange.fiats.unwrap().len(), 1);
    }

    #[test]
    fn test_assets_top_level_list_and_id_keyed_map_decode_equivalently() {
        let list_shape: Value = serde_json::from_str(
            r#"{
                "data": [
                    {"currency": {"name": "Bitcoin", "symbol": "BTC", "crypto_id": 1, "price_usd": 50000.0}},
                    {"currency": {"name": "Tether", "symbol": "USDT", "crypto_id": 825}}
                ]
            }"#,
        )
        .unwrap();
        let map_shape: Value = serde_json::from_str(
            r#"{
                "data": {
                    "270": [
                        {"currency": {"name": "Bitcoin", "symbol": "BTC", "crypto_id": 1, "price_usd": 50000.0}},
                        {"currency": {"name": "Tether", "symbol": "USDT", "crypto_id": 825}}
                    ]
                }
            }"#,
        )
        .unwrap();

        let from_list = currencies_from_assets_json(&list_shape, 270);
        let from_map = currencies_from_assets_json(&map_shape, 270);

        assert_eq!(from_list, from_map);
        assert_eq!(from_list.len(), 2);
        assert_eq!(from_list[0].symbol.as_deref(), Some("BTC"));
        assert_eq!(from_list[0].slug.as_deref(), Some("btc"));
        assert_eq!(from_list[0].price_usd, Some(50_000.0));
        assert_eq!(from_list[1].id, Some(825));
    }

    #[test]
    fn test_assets_entry_missing_symbol_is_dropped() {
        let json: Value = serde_json::from_str(
            r#"{
                "data": [
                    {"currency": {"name": "Bitcoin", "symbol": "BTC"}},
                    {"currency": {"name": "Nameless"}},
                    {"no_currency": true}
                ]
            }"#,
        )
        .unwrap();

        let currencies = currencies_from_assets_json(&json, 270);
        assert_eq!(currencies.len(), 1);
        assert_eq!(currencies[0].symbol.as_deref(), Some("BTC"));
    }

    #[test]
    fn test_assets_unrecognized_shape_yields_empty_list() {
        let json: Value = serde_json::from_str(r#"{"data": 42}"#).unwrap();
        assert!(currencies_from_assets_json(&json, 270).is_empty());

        let json: Value = serde_json::from_str(r#"{"data": {"999": []}}"#).unwrap();
        assert!(currencies_from_assets_json(&json, 270).is_empty());
    }

    #[test]
    fn test_market_pairs_synthesize_ids_and_extract_usd_quote() {
        let json: Value = serde_json::from_str(
            r#"{
                "data": {
                    "market_pairs": [
                        {
                            "market_pair": "BTC/USDT",
                            "category": "spot",
                            "fee_type": "percentage",
                            "quote": {"USD": {"volume_24h": 1000000.0, "price": 50000.0}}
                        },
                        {
                            "market_pair": "ETH/USDT",
                            "quote": {"USD": {"price": 3000.0}}
                        },
                        {
                            "market_pair": "XRP/USDT"
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        let markets = markets_from_pairs_json(&json, 270);
        assert_eq!(markets.len(), 3);

        assert_eq!(markets[0].id, "270_0");
        assert_eq!(markets[0].market_pair.as_deref(), Some("BTC/USDT"));
        assert_eq!(markets[0].category.as_deref(), Some("spot"));
        assert_eq!(markets[0].volume_usd, Some(1_000_000.0));
        assert_eq!(markets[0].price_usd, Some(50_000.0));
        assert_eq!(markets[0].price_quote, None);

        assert_eq!(markets[1].id, "270_1");
        assert_eq!(markets[1].volume_usd, None);
        assert_eq!(markets[1].price_usd, Some(3000.0));

        assert_eq!(markets[2].id, "270_2");
        assert_eq!(markets[2].price_usd, None);
    }

    #[test]
    fn test_market_pairs_missing_list_yields_empty() {
        let json: Value = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(markets_from_pairs_json(&json, 270).is_empty());

        let json: Value = serde_json::from_str(r#"{"status": {}}"#).unwrap();
        assert!(markets_from_pairs_json(&json, 270).is_empty());
    }

    #[test]
    fn test_error_message_from_body() {
        let body = r#"{"status": {"error_code": 1002, "error_message": "API key missing."}}"#;
        assert_eq!(
            error_message_from_body(body).as_deref(),
            Some("API key missing.")
        );

        assert_eq!(error_message_from_body(r#"{"status": {}}"#), None);
        assert_eq!(error_message_from_body("not json"), None);
    }

    #[test]
    fn test_parse_json_rejects_malformed_body() {
        assert!(matches!(
            parse_json("<html>Bad Gateway</html>"),
            Err(ApiError::InvalidResponse)
        ));
    }
}
