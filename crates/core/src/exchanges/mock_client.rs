//! Recording mock of the market data client for view-model tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use coinboard_market_data::{
    ApiError, Currency, Exchange, ExchangeUrls, Market, MarketDataClient,
};

/// Configurable, call-recording stand-in for the production client.
#[derive(Default)]
pub struct MockMarketDataClient {
    pub mock_exchanges: Mutex<Vec<Exchange>>,
    pub mock_exchange_info: Mutex<Option<Exchange>>,
    pub mock_currencies: Mutex<Vec<Currency>>,
    pub mock_markets: Mutex<Vec<Market>>,

    pub should_fail: AtomicBool,
    pub error_to_return: Mutex<Option<ApiError>>,
    pub delay: Mutex<Duration>,

    pub fetch_exchanges_calls: AtomicUsize,
    pub fetch_exchange_info_calls: AtomicUsize,
    pub fetch_exchange_assets_calls: AtomicUsize,
    pub fetch_exchange_market_pairs_calls: AtomicUsize,

    pub last_fetched_exchange_id: Mutex<Option<i64>>,
}

impl MockMarketDataClient {
    pub fn set_exchanges(&self, exchanges: Vec<Exchange>) {
        *self.mock_exchanges.lock().unwrap() = exchanges;
    }

    pub fn set_exchange_info(&self, info: Exchange) {
        *self.mock_exchange_info.lock().unwrap() = Some(info);
    }

    pub fn set_currencies(&self, currencies: Vec<Currency>) {
        *self.mock_currencies.lock().unwrap() = currencies;
    }

    pub fn set_markets(&self, markets: Vec<Market>) {
        *self.mock_markets.lock().unwrap() = markets;
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    fn record_id(&self, id: i64) {
        *self.last_fetched_exchange_id.lock().unwrap() = Some(id);
    }

    async fn simulate(&self) -> Result<(), ApiError> {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.should_fail.load(Ordering::SeqCst) {
            let error = self
                .error_to_return
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(ApiError::InvalidResponse);
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl MarketDataClient for MockMarketDataClient {
    async fn fetch_exchanges(&self, _limit: u32) -> Result<Vec<Exchange>, ApiError> {
        self.fetch_exchanges_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        Ok(self.mock_exchanges.lock().unwrap().clone())
    }

    async fn fetch_exchange_info(&self, id: i64) -> Result<Exchange, ApiError> {
        self.fetch_exchange_info_calls.fetch_add(1, Ordering::SeqCst);
        self.record_id(id);
        self.simulate().await?;
        self.mock_exchange_info
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::InvalidResponse)
    }

    async fn fetch_exchange_assets(&self, id: i64) -> Result<Vec<Currency>, ApiError> {
        self.fetch_exchange_assets_calls.fetch_add(1, Ordering::SeqCst);
        self.record_id(id);
        self.simulate().await?;
        Ok(self.mock_currencies.lock().unwrap().clone())
    }

    async fn fetch_exchange_market_pairs(
        &self,
        id: i64,
        _limit: u32,
    ) -> Result<Vec<Market>, ApiError> {
        self.fetch_exchange_market_pairs_calls
            .fetch_add(1, Ordering::SeqCst);
        self.record_id(id);
        self.simulate().await?;
        Ok(self.mock_markets.lock().unwrap().clone())
    }
}

/// Build a minimal but realistic exchange record for tests.
pub fn make_exchange(id: i64, name: &str, volume: Option<f64>) -> Exchange {
    Exchange {
        id,
        name: name.to_string(),
        slug: Some(name.to_lowercase()),
        logo: Some("https://example.com/logo.png".to_string()),
        description: Some("Test exchange description".to_string()),
        date_launched: Some("2017-07-14T00:00:00.000Z".to_string()),
        urls: Some(ExchangeUrls {
            website: Some(vec!["https://example.com".to_string()]),
            ..ExchangeUrls::default()
        }),
        spot_volume_usd: volume,
        maker_fee: Some(0.1),
        taker_fee: Some(0.2),
        weekly_visits: None,
        num_markets: Some(100),
        num_coins: None,
        fiats: None,
        markets: None,
    }
}

/// Build a market pair record for currency-extraction tests.
pub fn make_market(id: &str, pair: &str, price_usd: Option<f64>) -> Market {
    Market {
        id: id.to_string(),
        market_pair: Some(pair.to_string()),
        category: Some("spot".to_string()),
        fee_type: Some("percentage".to_string()),
        volume_usd: None,
        price_usd,
        price_quote: None,
    }
}
