//! Search client
//!
//! The client half of the job search pipeline:
//!
//! ```text
//! filter update -> FilterAggregator -> Debouncer (quiet window)
//!               -> encode -> ListingView::refresh -> ListingState
//! ```
//!
//! plus the plain API client used for submissions and contact messages,
//! and the saved-jobs store.

pub mod api;
pub mod encoder;
pub mod fetcher;
pub mod filter;
pub mod saved;

pub use api::ApiClient;
pub use encoder::{encode, Debouncer};
pub use fetcher::{FilteredResult, ListingFetcher, ListingSource, ListingState, ListingView};
pub use filter::{Dimension, FilterAggregator, FilterError, FilterState, SalaryRange, MAX_TAGS};
pub use saved::{SavedJob, SavedJobsStore};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

use crate::config::ClientConfig;

pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(1000);

/// One page session of filtered search. Filter changes are debounced and
/// only the state at the end of a quiet window is fetched.
pub struct SearchSession {
    filters: FilterAggregator,
    debouncer: Debouncer<FilterState>,
    view: Arc<ListingView>,
}

impl SearchSession {
    pub fn new(view: Arc<ListingView>, quiet_window: Duration) -> Self {
        let target = view.clone();
        let debouncer = Debouncer::spawn(quiet_window, move |state: FilterState| {
            let view = target.clone();
            async move {
                let query = encode(&state);
                view.refresh(&query).await;
            }
        });

        Self { filters: FilterAggregator::new(), debouncer, view }
    }

    /// Session against the configured API with the configured quiet
    /// window and request timeout.
    pub fn from_config(config: &ClientConfig) -> Self {
        let fetcher = ListingFetcher::new(Arc::new(ApiClient::new(&config.api_url)))
            .with_timeout(Duration::from_secs(config.request_timeout_secs));
        let view = Arc::new(ListingView::new(fetcher));
        Self::new(view, Duration::from_millis(config.debounce_ms))
    }

    pub fn current(&self) -> ListingState {
        self.view.current()
    }

    pub fn filters(&self) -> &FilterState {
        self.filters.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.view.subscribe()
    }

    pub fn set_dimension(&mut self, dimension: Dimension, value: &str) -> Result<bool, FilterError> {
        let changed = self.filters.set_dimension(dimension, value)?;
        self.schedule(changed);
        Ok(changed)
    }

    pub fn add_tag(&mut self, keyword: &str) -> bool {
        let changed = self.filters.add_tag(keyword);
        self.schedule(changed);
        changed
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<String> {
        let removed = self.filters.remove_tag(index);
        self.schedule(removed.is_some());
        removed
    }

    /// Fetch with the current filters once the quiet window passes.
    pub fn request_refresh(&self) {
        if !self.debouncer.push(self.filters.current_state()) {
            warn!("Debounce worker stopped, refresh dropped");
        }
    }

    /// End the session, flushing a pending refresh.
    pub async fn close(self) {
        self.debouncer.close().await;
    }

    fn schedule(&self, changed: bool) {
        if changed {
            self.request_refresh();
        }
    }
}
