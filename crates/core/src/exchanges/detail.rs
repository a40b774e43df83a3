//! Single-exchange detail enrichment state machine.
//!
//! Holds one exchange plus independently loaded market pairs and currencies.
//! The info fetch and the assets/market-pairs fetches carry separate
//! in-flight guards, so details can refresh concurrently with market data,
//! but no fetch kind ever runs twice at once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use coinboard_market_data::{ApiError, Currency, Exchange, Market, MarketDataClient};
use log::{debug, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::format;

/// Market pairs requested per detail view.
pub const MARKET_PAIRS_LIMIT: u32 = 50;

/// Discrete notifications emitted to the observer.
#[derive(Clone, Debug)]
pub enum DetailEvent {
    /// The exchange record (and possibly its fiat currencies) was replaced.
    DetailsUpdated,
    /// Markets and/or currencies were replaced.
    MarketsUpdated,
    /// A fetch failed; the corresponding in-flight guard is already cleared.
    Failed(ApiError),
}

/// Detail view-model for a single exchange.
pub struct ExchangeDetailState {
    client: Arc<dyn MarketDataClient>,
    inner: Mutex<Inner>,
    alive: AtomicBool,
}

struct Inner {
    exchange: Exchange,
    markets: Vec<Market>,
    currencies: Vec<Currency>,
    is_loading_details: bool,
    is_loading_markets: bool,
    observer: Option<UnboundedSender<DetailEvent>>,
}

impl Inner {
    fn emit(&mut self, event: DetailEvent) {
        if let Some(observer) = &self.observer {
            if observer.send(event).is_err() {
                self.observer = None;
            }
        }
    }

    /// Derive currencies from the held market-pair strings and append any
    /// symbol not already present.
    ///
    /// Each `BASE/QUOTE` pair contributes both components; the first
    /// occurrence of a symbol wins, taking the market's USD price only when
    /// it appears on the quote side. Existing currency entries are never
    /// replaced.
    fn extract_currencies_from_markets(&mut self) {
        let mut derived: Vec<Currency> = Vec::new();

        for market in &self.markets {
            let Some(pair) = &market.market_pair else {
                continue;
            };

            for (position, component) in pair.split('/').enumerate() {
                let symbol = component.trim();
                if derived
                    .iter()
                    .any(|currency| currency.symbol.as_deref() == Some(symbol))
                {
                    continue;
                }

                let price_usd = if position == 1 { market.price_usd } else { None };
                derived.push(Currency::from_symbol(
                    symbol,
                    derived.len() as i64 + 1,
                    price_usd,
                ));
            }
        }

        for currency in derived {
            if !self
                .currencies
                .iter()
                .any(|existing| existing.symbol == currency.symbol)
            {
                self.currencies.push(currency);
            }
        }
    }
}

impl ExchangeDetailState {
    /// Create the detail view-model for `exchange` around an injected client.
    pub fn new(exchange: Exchange, client: Arc<dyn MarketDataClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            inner: Mutex::new(Inner {
                exchange,
                markets: Vec::new(),
                currencies: Vec::new(),
                is_loading_details: false,
                is_loading_markets: false,
                observer: None,
            }),
            alive: AtomicBool::new(true),
        })
    }

    /// Register the observer, replacing any previous one.
    pub fn subscribe(&self) -> UnboundedReceiver<DetailEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_inner().observer = Some(tx);
        rx
    }

    /// Detach this view-model: pending fetch continuations become no-ops.
    pub fn invalidate(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Refresh the full info record, replacing the held exchange wholesale.
    /// When the new record carries a fiats list it also replaces the held
    /// currencies. Ignored while a details fetch is in flight.
    pub fn fetch_exchange_details(self: &Arc<Self>) {
        let id;
        {
            let mut inner = self.lock_inner();
            if inner.is_loading_details {
                return;
            }
            inner.is_loading_details = true;
            id = inner.exchange.id;
        }

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.client.fetch_exchange_info(id).await;
            if !this.is_alive() {
                return;
            }

            let mut inner = this.lock_inner();
            inner.is_loading_details = false;
            match result {
                Ok(info) => {
                    debug!("exchange {} details updated", id);
                    if let Some(fiats) = info.fiats.clone() {
                        inner.currencies = fiats;
                    }
                    inner.exchange = info;
                    inner.emit(DetailEvent::DetailsUpdated);
                }
                Err(err) => inner.emit(DetailEvent::Failed(err)),
            }
        });
    }

    /// Replace the held currencies with the exchange's asset holdings.
    /// Shares its in-flight guard with [`fetch_markets`](Self::fetch_markets).
    pub fn fetch_currencies(self: &Arc<Self>) {
        let id;
        {
            let mut inner = self.lock_inner();
            if inner.is_loading_markets {
                return;
            }
            inner.is_loading_markets = true;
            id = inner.exchange.id;
        }

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.client.fetch_exchange_assets(id).await;
            if !this.is_alive() {
                return;
            }

            let mut inner = this.lock_inner();
            inner.is_loading_markets = false;
            match result {
                Ok(currencies) => {
                    debug!("exchange {} holds {} currencies", id, currencies.len());
                    inner.currencies = currencies;
                    inner.emit(DetailEvent::MarketsUpdated);
                }
                Err(err) => inner.emit(DetailEvent::Failed(err)),
            }
        });
    }

    /// Replace the held markets with the exchange's market pairs, then
    /// derive additional currencies from the pair strings (additive merge).
    /// Shares its in-flight guard with
    /// [`fetch_currencies`](Self::fetch_currencies).
    pub fn fetch_markets(self: &Arc<Self>) {
        let id;
        {
            let mut inner = self.lock_inner();
            if inner.is_loading_markets {
                return;
            }
            inner.is_loading_markets = true;
            id = inner.exchange.id;
        }

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this
                .client
                .fetch_exchange_market_pairs(id, MARKET_PAIRS_LIMIT)
                .await;
            if !this.is_alive() {
                return;
            }

            let mut inner = this.lock_inner();
            inner.is_loading_markets = false;
            match result {
                Ok(markets) => {
                    debug!("exchange {} lists {} market pairs", id, markets.len());
                    inner.markets = markets;
                    inner.extract_currencies_from_markets();
                    inner.emit(DetailEvent::MarketsUpdated);
                }
                Err(err) => inner.emit(DetailEvent::Failed(err)),
            }
        });
    }

    /// The currently held exchange record.
    pub fn exchange(&self) -> Exchange {
        self.lock_inner().exchange.clone()
    }

    /// The currently held market pairs.
    pub fn markets(&self) -> Vec<Market> {
        self.lock_inner().markets.clone()
    }

    /// The currently held currencies.
    pub fn currencies(&self) -> Vec<Currency> {
        self.lock_inner().currencies.clone()
    }

    /// Number of currently held currencies.
    pub fn number_of_currencies(&self) -> usize {
        self.lock_inner().currencies.len()
    }

    /// The held currency at `index`, if in range.
    pub fn currency_at(&self, index: usize) -> Option<Currency> {
        self.lock_inner().currencies.get(index).cloned()
    }

    /// Whether an info fetch is in flight.
    pub fn is_loading_details(&self) -> bool {
        self.lock_inner().is_loading_details
    }

    /// Whether an assets or market-pairs fetch is in flight.
    pub fn is_loading_markets(&self) -> bool {
        self.lock_inner().is_loading_markets
    }

    /// First website link, or `"N/A"`.
    pub fn formatted_website(&self) -> String {
        self.lock_inner()
            .exchange
            .urls
            .as_ref()
            .and_then(|urls| urls.website.as_ref())
            .and_then(|websites| websites.first())
            .cloned()
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Maker fee formatted as a percentage.
    pub fn formatted_maker_fee(&self) -> String {
        format::fee_percent(self.lock_inner().exchange.maker_fee)
    }

    /// Taker fee formatted as a percentage.
    pub fn formatted_taker_fee(&self) -> String {
        format::fee_percent(self.lock_inner().exchange.taker_fee)
    }

    /// Launch date formatted as a medium date.
    pub fn formatted_date(&self) -> String {
        format::launch_date(self.lock_inner().exchange.date_launched.as_deref())
    }

    /// USD price of a held currency.
    pub fn formatted_price(&self, currency: &Currency) -> String {
        format::price_usd(currency.price_usd)
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("exchange detail state mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
