//! Where pages of reviews come from.
//!
//! [`ReviewSource`] is the only network-shaped boundary the engine depends
//! on. [`FixtureSource`] serves a fixed set of records with optional latency
//! and injectable failures, which is enough for demos and tests.

use crate::error::FetchError;
use crate::review::{ReviewPage, ReviewRecord};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Fetches pages of reviews by offset and limit.
///
/// Timeouts and transport retries are the implementation's business; the
/// engine only sees success or failure.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Returns up to `limit` records starting at `offset`, plus the total.
    async fn fetch(&self, offset: usize, limit: usize) -> Result<ReviewPage, FetchError>;
}

/// In-memory source backed by a fixed list of records.
///
/// # Examples
///
/// ```rust
/// use review_feed::source::FixtureSource;
/// use std::time::Duration;
///
/// let source = FixtureSource::new(Vec::new()).with_latency(Duration::from_millis(200));
/// source.fail_next(1);
/// assert_eq!(source.calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct FixtureSource {
    records: Vec<ReviewRecord>,
    latency: Option<Duration>,
    pending_failures: AtomicUsize,
    requests: Mutex<Vec<(usize, usize)>>,
}

impl FixtureSource {
    /// Creates a source serving `records`; the total is their count.
    pub fn new(records: Vec<ReviewRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Creates a source from a page response document, serving its items.
    pub fn from_json(bytes: &[u8]) -> Result<Self, FetchError> {
        Ok(Self::new(ReviewPage::from_json(bytes)?.items))
    }

    /// Reads a page response document from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_json(&bytes)
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes the next `count` fetches fail with [`FetchError::Unavailable`].
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.fetch_add(count, Ordering::SeqCst);
    }

    /// Number of fetches issued so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.requests().len()
    }

    /// Every `(offset, limit)` requested so far, in order.
    pub fn requests(&self) -> Vec<(usize, usize)> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record_request(&self, offset: usize, limit: usize) {
        match self.requests.lock() {
            Ok(mut requests) => requests.push((offset, limit)),
            Err(poisoned) => poisoned.into_inner().push((offset, limit)),
        }
    }

    fn take_failure(&self) -> bool {
        self.pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ReviewSource for FixtureSource {
    async fn fetch(&self, offset: usize, limit: usize) -> Result<ReviewPage, FetchError> {
        self.record_request(offset, limit);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.take_failure() {
            return Err(FetchError::Unavailable(format!(
                "injected failure at offset {offset}"
            )));
        }

        let start = offset.min(self.records.len());
        let end = offset.saturating_add(limit).min(self.records.len());
        Ok(ReviewPage {
            items: self.records[start..end].to_vec(),
            total_count: self.records.len(),
        })
    }
}
