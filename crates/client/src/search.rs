//! Listing search: one fetch, then purely client-side filter and sort.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::{Mutex, MutexGuard};

use peerrent_market::ListingSummary;

use crate::backend::Backend;
use crate::section::Section;

/// Price filter bands offered by the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    All,
    Under1000,
    From1000To2000,
    Over2000,
}

impl PriceBand {
    fn matches(&self, price: Decimal) -> bool {
        let one_thousand = Decimal::from(1000);
        let two_thousand = Decimal::from(2000);
        match self {
            PriceBand::All => true,
            PriceBand::Under1000 => price < one_thousand,
            PriceBand::From1000To2000 => price >= one_thousand && price <= two_thousand,
            PriceBand::Over2000 => price > two_thousand,
        }
    }
}

/// Sort orders offered by the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    Oldest,
    PriceLowHigh,
    PriceHighLow,
}

/// State of the search page.
#[derive(Debug)]
pub struct SearchState {
    pub listings: Section<Vec<ListingSummary>>,
    pub term: String,
    pub band: PriceBand,
    pub sort: SortKey,
}

/// View model for browsing listings.
pub struct ListingSearchViewModel<B> {
    backend: Arc<B>,
    state: Arc<Mutex<SearchState>>,
}

impl<B: Backend> ListingSearchViewModel<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(SearchState {
                listings: Section::new(),
                term: String::new(),
                band: PriceBand::All,
                sort: SortKey::Newest,
            })),
        }
    }

    pub async fn state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().await
    }

    pub async fn load(&self) {
        let Some(token) = self.state.lock().await.listings.begin_load() else {
            return;
        };

        let result = self.backend.search_listings().await;

        self.state
            .lock()
            .await
            .listings
            .finish_load(token, result.map_err(|e| e.message()));
    }

    pub async fn set_term(&self, term: impl Into<String>) {
        self.state.lock().await.term = term.into();
    }

    pub async fn set_band(&self, band: PriceBand) {
        self.state.lock().await.band = band;
    }

    pub async fn set_sort(&self, sort: SortKey) {
        self.state.lock().await.sort = sort;
    }

    /// Listings matching the term and price band, in the selected order.
    pub async fn visible(&self) -> Vec<ListingSummary> {
        let st = self.state.lock().await;
        let Some(listings) = st.listings.data() else {
            return Vec::new();
        };

        let term = st.term.to_lowercase();
        let mut matched: Vec<ListingSummary> = listings
            .iter()
            .filter(|l| {
                let matches_term = term.is_empty()
                    || l.title.to_lowercase().contains(&term)
                    || l.description.to_lowercase().contains(&term);
                matches_term && st.band.matches(l.price)
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| match st.sort {
            SortKey::Newest => b.t_created.cmp(&a.t_created),
            SortKey::Oldest => a.t_created.cmp(&b.t_created),
            SortKey::PriceLowHigh => a.price.cmp(&b.price),
            SortKey::PriceHighLow => b.price.cmp(&a.price),
        });
        matched
    }
}
