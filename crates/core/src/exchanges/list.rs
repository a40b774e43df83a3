//! Paginated exchange list state machine.
//!
//! The full result set is fetched in one network round trip and cached;
//! pagination is client-side windowing over that cache. States move
//! `idle -> loading -> {loaded <-> loaded(more)} | empty | error`, and
//! `loaded` re-enters on every page append with the cumulative visible list.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use coinboard_market_data::{Exchange, MarketDataClient};
use log::{debug, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::format;
use crate::view_state::ViewState;

/// Window size for client-side pagination.
pub const PAGE_SIZE: usize = 20;

/// Discovery limit passed to the remote API on the first page.
pub const DISCOVERY_LIMIT: u32 = 50;

/// Trigger the next page once the shell renders within this many rows of
/// the end of the displayed list.
const LOAD_MORE_THRESHOLD: usize = 5;

/// Simulated latency of the mock data path.
const MOCK_FETCH_DELAY: Duration = Duration::from_millis(500);

/// State snapshots emitted to the observer.
pub type ListViewState = ViewState<Vec<Exchange>>;

/// Paginated exchange list view-model.
///
/// All mutable state lives behind one mutex, and observer notifications are
/// sent while it is held, so observers see transitions in mutation order and
/// never a torn intermediate. At most one page load is in flight at a time.
pub struct ExchangeListState {
    client: Arc<dyn MarketDataClient>,
    inner: Mutex<Inner>,
    alive: AtomicBool,
}

struct Inner {
    state: ListViewState,
    all_exchanges: Vec<Exchange>,
    current_page: usize,
    is_loading_more: bool,
    has_more_pages: bool,
    observer: Option<UnboundedSender<ListViewState>>,
}

impl Inner {
    /// Store the new state and notify the observer.
    fn set_state(&mut self, state: ListViewState) {
        debug!("exchange list state -> {}", state.name());
        self.state = state;
        if let Some(observer) = &self.observer {
            if observer.send(self.state.clone()).is_err() {
                self.observer = None;
            }
        }
    }

    /// The currently displayed list (empty unless `Loaded`).
    fn displayed(&self) -> Vec<Exchange> {
        self.state.data().cloned().unwrap_or_default()
    }

    /// Append the next window of `full_set` to the displayed list and emit
    /// the resulting state. Past the end of the set, just mark the
    /// pagination exhausted without emitting.
    fn append_window(&mut self, full_set: &[Exchange]) {
        let start = self.current_page * PAGE_SIZE;
        let total = full_set.len();

        if start >= total {
            self.has_more_pages = false;
            self.is_loading_more = false;
            return;
        }

        let end = (start + PAGE_SIZE).min(total);
        let mut displayed = self.displayed();
        displayed.extend_from_slice(&full_set[start..end]);

        self.current_page += 1;
        self.is_loading_more = false;
        if end >= total {
            self.has_more_pages = false;
        }

        if displayed.is_empty() {
            self.set_state(ViewState::Empty);
        } else {
            self.set_state(ViewState::Loaded(displayed));
        }
    }
}

impl ExchangeListState {
    /// Create the list view-model around an injected client.
    pub fn new(client: Arc<dyn MarketDataClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            inner: Mutex::new(Inner {
                state: ViewState::Idle,
                all_exchanges: Vec::new(),
                current_page: 0,
                is_loading_more: false,
                has_more_pages: true,
                observer: None,
            }),
            alive: AtomicBool::new(true),
        })
    }

    /// Register the observer, replacing any previous one. Every state
    /// assignment emits a snapshot on the returned channel.
    pub fn subscribe(&self) -> UnboundedReceiver<ListViewState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_inner().observer = Some(tx);
        rx
    }

    /// Detach this view-model: pending fetch continuations become no-ops.
    /// Owners call this before dropping their last reference.
    pub fn invalidate(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Start (or restart) the base load. Ignored while a base load is
    /// already in flight. With `use_mock_data` the list is synthesized from
    /// the static fixture after a fixed delay, bypassing the network.
    pub fn fetch_exchanges(self: &Arc<Self>, use_mock_data: bool) {
        {
            let mut inner = self.lock_inner();
            if inner.state.is_loading() {
                debug!("ignoring fetch while a base load is in flight");
                return;
            }

            inner.current_page = 0;
            inner.all_exchanges.clear();
            inner.has_more_pages = true;
            inner.set_state(ViewState::Loading);
        }

        if use_mock_data {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                tokio::time::sleep(MOCK_FETCH_DELAY).await;
                if !this.is_alive() {
                    return;
                }

                let mock = Exchange::mock_data();
                let mut inner = this.lock_inner();
                if mock.is_empty() {
                    inner.set_state(ViewState::Empty);
                } else {
                    inner.all_exchanges = mock.clone();
                    inner.set_state(ViewState::Loaded(mock));
                }
            });
            return;
        }

        self.load_page();
    }

    /// Scroll-position-driven pagination intent. A no-op unless no page load
    /// is in flight, more pages remain, and `current_index` is within the
    /// look-ahead threshold of the end of the displayed list.
    pub fn load_more_if_needed(self: &Arc<Self>, current_index: usize) {
        {
            let inner = self.lock_inner();
            let displayed = inner.state.data().map_or(0, Vec::len);
            if inner.is_loading_more
                || inner.state.is_loading()
                || !inner.has_more_pages
                || current_index + LOAD_MORE_THRESHOLD < displayed
            {
                return;
            }
        }

        self.load_page();
    }

    /// Load the page at the current cursor. The first page performs the one
    /// network fetch and caches the entire result set; later pages window
    /// over the cache.
    fn load_page(self: &Arc<Self>) {
        let is_first_page;
        {
            let mut inner = self.lock_inner();
            if inner.is_loading_more {
                return;
            }
            inner.is_loading_more = true;
            is_first_page = inner.current_page == 0;
        }

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = if is_first_page {
                this.client.fetch_exchanges(DISCOVERY_LIMIT).await
            } else {
                Ok(this.lock_inner().all_exchanges.clone())
            };

            if !this.is_alive() {
                return;
            }

            match result {
                Ok(full_set) => {
                    let mut inner = this.lock_inner();
                    if is_first_page {
                        inner.all_exchanges = full_set.clone();
                    }
                    inner.append_window(&full_set);
                }
                Err(err) => {
                    let mut inner = this.lock_inner();
                    inner.is_loading_more = false;
                    if is_first_page {
                        inner.set_state(ViewState::Error(err));
                    } else {
                        // Only total failure is surfaced; the list already
                        // on screen stays valid.
                        warn!("ignoring failure while loading a later page: {}", err);
                    }
                }
            }
        });
    }

    /// Current state snapshot.
    pub fn state(&self) -> ListViewState {
        self.lock_inner().state.clone()
    }

    /// The currently displayed exchanges.
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.lock_inner().displayed()
    }

    /// Number of currently displayed exchanges.
    pub fn number_of_exchanges(&self) -> usize {
        self.lock_inner().state.data().map_or(0, Vec::len)
    }

    /// Whether the base load is in flight.
    pub fn is_loading(&self) -> bool {
        self.lock_inner().state.is_loading()
    }

    /// Whether a page append is in flight.
    pub fn is_loading_more(&self) -> bool {
        self.lock_inner().is_loading_more
    }

    /// Whether further pages remain.
    pub fn has_more_pages(&self) -> bool {
        self.lock_inner().has_more_pages
    }

    /// The displayed exchange at `index`, if in range.
    pub fn exchange_at(&self, index: usize) -> Option<Exchange> {
        self.lock_inner()
            .state
            .data()
            .and_then(|exchanges| exchanges.get(index))
            .cloned()
    }

    /// Spot volume formatted for a list row.
    pub fn formatted_volume(&self, exchange: &Exchange) -> String {
        format::volume(exchange.spot_volume_usd)
    }

    /// Launch date formatted for a list row.
    pub fn formatted_date(&self, exchange: &Exchange) -> String {
        format::launch_date(exchange.date_launched.as_deref())
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("exchange list state mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
