use serde::{Deserialize, Serialize};

use super::{Currency, Market};

/// A cryptocurrency trading venue with metadata, fees, and volume.
///
/// Exchanges are assembled by the client from the discovery and info
/// endpoints; every field except `id` and `name` is optional because the
/// API frequently omits them. `id` is stable and server-assigned and never
/// changes after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Exchange {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    /// ISO-8601 launch date string, formatted by the presentation layer.
    pub date_launched: Option<String>,
    pub urls: Option<ExchangeUrls>,
    pub spot_volume_usd: Option<f64>,
    /// Maker fee as a plain percentage, e.g. `0.1` for 0.1%.
    pub maker_fee: Option<f64>,
    /// Taker fee as a plain percentage.
    pub taker_fee: Option<f64>,
    pub weekly_visits: Option<i64>,
    pub num_markets: Option<i64>,
    pub num_coins: Option<i64>,
    /// Fiat currencies the exchange supports. When the wire format only
    /// supplies symbol strings these are synthesized with 1-based ids.
    pub fiats: Option<Vec<Currency>>,
    pub markets: Option<Vec<Market>>,
}

/// Categorized link lists attached to an exchange record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeUrls {
    pub website: Option<Vec<String>>,
    pub twitter: Option<Vec<String>>,
    pub blog: Option<Vec<String>>,
    pub chat: Option<Vec<String>>,
    pub fee: Option<Vec<String>>,
}

impl Exchange {
    /// Static fixture used by the list state machine's mock path and by
    /// tests: three well-known exchanges with realistic field values.
    pub fn mock_data() -> Vec<Exchange> {
        vec![
            Exchange {
                id: 270,
                name: "Binance".to_string(),
                slug: Some("binance".to_string()),
                logo: Some(
                    "https://s2.coinmarketcap.com/static/img/exchanges/64x64/270.png".to_string(),
                ),
                description: Some(
                    "Binance is a global cryptocurrency exchange that provides a platform \
                     for trading more than 100 cryptocurrencies."
                        .to_string(),
                ),
                date_launched: Some("2017-07-14T00:00:00.000Z".to_string()),
                urls: Some(ExchangeUrls {
                    website: Some(vec!["https://www.binance.com".to_string()]),
                    twitter: Some(vec!["https://twitter.com/binance".to_string()]),
                    ..ExchangeUrls::default()
                }),
                spot_volume_usd: Some(15_000_000_000.50),
                maker_fee: Some(0.1),
                taker_fee: Some(0.1),
                weekly_visits: Some(50_000_000),
                num_markets: Some(1500),
                num_coins: Some(350),
                fiats: Some(vec![
                    Currency {
                        id: Some(1),
                        name: Some("US Dollar".to_string()),
                        symbol: Some("USD".to_string()),
                        slug: Some("usd".to_string()),
                        price_usd: Some(1.0),
                    },
                    Currency {
                        id: Some(2),
                        name: Some("Euro".to_string()),
                        symbol: Some("EUR".to_string()),
                        slug: Some("eur".to_string()),
                        price_usd: Some(1.08),
                    },
                ]),
                markets: None,
            },
            Exchange {
                id: 311,
                name: "Coinbase Exchange".to_string(),
                slug: Some("coinbase-exchange".to_string()),
                logo: Some(
                    "https://s2.coinmarketcap.com/static/img/exchanges/64x64/311.png".to_string(),
                ),
                description: Some(
                    "Coinbase Pro is a secure platform that makes it easy to buy, sell, \
                     and store cryptocurrency."
                        .to_string(),
                ),
                date_launched: Some("2015-01-25T00:00:00.000Z".to_string()),
                urls: Some(ExchangeUrls {
                    website: Some(vec!["https://pro.coinbase.com".to_string()]),
                    twitter: Some(vec!["https://twitter.com/coinbase".to_string()]),
                    ..ExchangeUrls::default()
                }),
                spot_volume_usd: Some(2_500_000_000.75),
                maker_fee: Some(0.5),
                taker_fee: Some(0.5),
                weekly_visits: Some(20_000_000),
                num_markets: Some(200),
                num_coins: Some(100),
                fiats: Some(vec![
                    Currency {
                        id: Some(1),
                        name: Some("US Dollar".to_string()),
                        symbol: Some("USD".to_string()),
                        slug: Some("usd".to_string()),
                        price_usd: Some(1.0),
                    },
                    Currency {
                        id: Some(3),
                        name: Some("British Pound".to_string()),
                        symbol: Some("GBP".to_string()),
                        slug: Some("gbp".to_string()),
                        price_usd: Some(1.27),
                    },
                ]),
                markets: None,
            },
            Exchange {
                id: 24,
                name: "Kraken".to_string(),
                slug: Some("kraken".to_string()),
                logo: Some(
                    "https://s2.coinmarketcap.com/static/img/exchanges/64x64/24.png".to_string(),
                ),
                description: Some(
                    "Kraken is a cryptocurrency exchange and bank that offers capital funding."
                        .to_string(),
                ),
                date_launched: Some("2013-09-10T00:00:00.000Z".to_string()),
                urls: Some(ExchangeUrls {
                    website: Some(vec!["https://www.kraken.com".to_string()]),
                    twitter: Some(vec!["https://twitter.com/krakenfx".to_string()]),
                    ..ExchangeUrls::default()
                }),
                spot_volume_usd: Some(1_800_000_000.25),
                maker_fee: Some(0.16),
                taker_fee: Some(0.26),
                weekly_visits: Some(15_000_000),
                num_markets: Some(300),
                num_coins: Some(80),
                fiats: Some(vec![
                    Currency {
                        id: Some(1),
                        name: Some("US Dollar".to_string()),
                        symbol: Some("USD".to_string()),
                        slug: Some("usd".to_string()),
                        price_usd: Some(1.0),
                    },
                    Currency {
                        id: Some(4),
                        name: Some("Japanese Yen".to_string()),
                        symbol: Some("JPY".to_string()),
                        slug: Some("jpy".to_string()),
                        price_usd: Some(0.0067),
                    },
                ]),
                markets: None,
            },
        ]
    }
}
