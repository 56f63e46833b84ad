//! Listing Fetcher
//!
//! [`ListingFetcher::fetch`] turns one request into a tri-state
//! [`FilteredResult`]. [`ListingView`] sits in front of it for the
//! rendering layer: every refresh takes a new request token and only the
//! response for the latest token is published, so a slow earlier request
//! can never overwrite a faster later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::api::ApiClient;
use crate::models::JobListing;
use crate::types::{ClientError, ClientResult};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Anything that can answer an encoded job query.
#[async_trait]
pub trait ListingSource: Send + Sync + 'static {
    async fn list_jobs(&self, query: &str) -> ClientResult<Vec<JobListing>>;
}

#[async_trait]
impl ListingSource for ApiClient {
    async fn list_jobs(&self, query: &str) -> ClientResult<Vec<JobListing>> {
        ApiClient::list_jobs(self, query).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilteredResult {
    Found(Vec<JobListing>),
    /// The search succeeded with no matches.
    NotFound,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListingState {
    #[default]
    Idle,
    Loading,
    Ready(FilteredResult),
}

#[derive(Clone)]
pub struct ListingFetcher {
    source: Arc<dyn ListingSource>,
    timeout: Duration,
}

impl ListingFetcher {
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self { source, timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one query. Past the timeout the caller gets `Error` and stops
    /// waiting; the request itself keeps running in the background and
    /// its result is dropped.
    pub async fn fetch(&self, query: &str) -> FilteredResult {
        let source = self.source.clone();
        let owned_query = query.to_string();
        let request = tokio::spawn(async move { source.list_jobs(&owned_query).await });

        match tokio::time::timeout(self.timeout, request).await {
            Err(_) => {
                warn!(query = %query, "Job listing request timed out");
                FilteredResult::Error(ClientError::Timeout(self.timeout).to_string())
            }
            Ok(Err(join_error)) => FilteredResult::Error(join_error.to_string()),
            Ok(Ok(Err(e))) => {
                warn!("Job listing request failed: {}", e);
                FilteredResult::Error(e.to_string())
            }
            Ok(Ok(Ok(jobs))) if jobs.is_empty() => FilteredResult::NotFound,
            Ok(Ok(Ok(jobs))) => FilteredResult::Found(jobs),
        }
    }
}

pub struct ListingView {
    fetcher: ListingFetcher,
    issued: AtomicU64,
    state: watch::Sender<ListingState>,
}

impl ListingView {
    pub fn new(fetcher: ListingFetcher) -> Self {
        let (state, _) = watch::channel(ListingState::Idle);
        Self { fetcher, issued: AtomicU64::new(0), state }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ListingState {
        self.state.borrow().clone()
    }

    /// Fetch `query` and publish the outcome unless a newer refresh was
    /// issued meanwhile. Returns `None` for a superseded response.
    pub async fn refresh(&self, query: &str) -> Option<FilteredResult> {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(ListingState::Loading);

        let result = self.fetcher.fetch(query).await;

        let published = self.state.send_if_modified(|state| {
            if self.issued.load(Ordering::SeqCst) != token {
                return false;
            }
            *state = ListingState::Ready(result.clone());
            true
        });

        if published {
            Some(result)
        } else {
            debug!(token, "Discarding stale job listing response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn listing(job_role: &str) -> JobListing {
        JobListing {
            id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            job_role: job_role.to_string(),
            job_type: "Full Time".to_string(),
            location: "Remote".to_string(),
            salary: 50_000,
            tags: vec![],
            company_logo: None,
            form_link: "https://acme.example".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Answers each query after a fixed delay.
    struct ScriptedSource {
        replies: HashMap<&'static str, (Duration, Result<Vec<JobListing>, u16>)>,
    }

    #[async_trait]
    impl ListingSource for ScriptedSource {
        async fn list_jobs(&self, query: &str) -> ClientResult<Vec<JobListing>> {
            let (delay, reply) = self.replies.get(query).cloned().expect("unscripted query");
            tokio::time::sleep(delay).await;
            reply.map_err(|status| ClientError::Http { status, message: "Server error".to_string() })
        }
    }

    fn fetcher(replies: Vec<(&'static str, Duration, Result<Vec<JobListing>, u16>)>) -> ListingFetcher {
        let replies = replies.into_iter().map(|(q, d, r)| (q, (d, r))).collect();
        ListingFetcher::new(Arc::new(ScriptedSource { replies }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_maps_outcomes_to_tri_state() {
        let fetcher = fetcher(vec![
            ("tags=rust", Duration::ZERO, Ok(vec![listing("Rust Developer")])),
            ("tags=cobol", Duration::ZERO, Ok(vec![])),
            ("tags=boom", Duration::ZERO, Err(500)),
        ]);

        assert!(matches!(fetcher.fetch("tags=rust").await, FilteredResult::Found(jobs) if jobs.len() == 1));
        assert_eq!(fetcher.fetch("tags=cobol").await, FilteredResult::NotFound);
        assert!(matches!(fetcher.fetch("tags=boom").await, FilteredResult::Error(reason) if reason.contains("500")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_surfaces_timeout() {
        let fetcher = fetcher(vec![("", Duration::from_secs(20), Ok(vec![listing("Late")]))])
            .with_timeout(Duration::from_secs(15));

        match fetcher.fetch("").await {
            FilteredResult::Error(reason) => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let view = ListingView::new(fetcher(vec![
            ("jobRole=slow", Duration::from_secs(5), Ok(vec![listing("Slow")])),
            ("jobRole=fast", Duration::from_secs(1), Ok(vec![listing("Fast")])),
        ]));
        let mut updates = view.subscribe();

        let (slow, fast) = tokio::join!(view.refresh("jobRole=slow"), view.refresh("jobRole=fast"));

        assert_eq!(slow, None);
        assert!(matches!(fast, Some(FilteredResult::Found(ref jobs)) if jobs[0].job_role == "Fast"));
        match view.current() {
            ListingState::Ready(FilteredResult::Found(jobs)) => assert_eq!(jobs[0].job_role, "Fast"),
            other => panic!("unexpected state: {other:?}"),
        }
        assert!(updates.has_changed().unwrap());
        assert!(matches!(*updates.borrow_and_update(), ListingState::Ready(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_refresh_replaces_earlier_result() {
        let view = ListingView::new(fetcher(vec![
            ("jobRole=a", Duration::ZERO, Ok(vec![listing("A")])),
            ("jobRole=b", Duration::ZERO, Ok(vec![])),
        ]));

        assert!(view.refresh("jobRole=a").await.is_some());
        assert_eq!(view.refresh("jobRole=b").await, Some(FilteredResult::NotFound));
        assert_eq!(view.current(), ListingState::Ready(FilteredResult::NotFound));
    }
}
