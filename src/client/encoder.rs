//! Query Encoder and the debounce timer in front of it.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::debug;

use super::filter::{Dimension, FilterState};

/// Serialize `state` as a URL query string (without the leading `?`).
///
/// Empty dimensions are omitted. Tags are joined with commas and the
/// salary range is written as `<min>-<max>`.
pub fn encode(state: &FilterState) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    for dimension in Dimension::ALL {
        let value = match dimension {
            Dimension::JobRole => state.job_role.as_deref().map(encode_component),
            Dimension::Location => state.location.as_deref().map(encode_component),
            Dimension::CompanyName => state.company_name.as_deref().map(encode_component),
            Dimension::JobType => state.job_type.as_deref().map(encode_component),
            Dimension::Salary => state.salary.map(|range| range.to_string()),
            Dimension::Tags => (!state.tags.is_empty()).then(|| {
                state
                    .tags
                    .iter()
                    .map(|tag| encode_component(tag))
                    .collect::<Vec<_>>()
                    .join(",")
            }),
        };

        if let Some(value) = value.filter(|value| !value.is_empty()) {
            pairs.push((dimension.param(), value));
        }
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(value: &str) -> String {
    urlencoding::encode(value.trim()).into_owned()
}

/// Coalesces bursts of values: `action` runs with the most recent value
/// once no new value has arrived for the quiet window. Every push resets
/// the window. Each action runs in its own task so a slow action never
/// delays the next window. A value still pending when the debouncer is
/// closed is flushed, and `close` waits for actions still running.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F, Fut>(window: Duration, action: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(rx, window, action));
        Self { tx, worker }
    }

    /// Returns `false` once the worker has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Flush any pending value and wait for the worker and its running
    /// actions to finish.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

async fn run<T, F, Fut>(mut rx: mpsc::UnboundedReceiver<T>, window: Duration, mut action: F)
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut running = JoinSet::new();

    'recv: while let Some(mut latest) = rx.recv().await {
        let mut coalesced = 0usize;
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(value) => {
                        latest = value;
                        coalesced += 1;
                    }
                    None => {
                        running.spawn(action(latest));
                        break 'recv;
                    }
                },
                _ = tokio::time::sleep(window) => break,
            }
        }
        debug!(coalesced, in_flight = running.len(), "Debounce window elapsed");
        while running.try_join_next().is_some() {}
        running.spawn(action(latest));
    }

    while running.join_next().await.is_some() {}
}
