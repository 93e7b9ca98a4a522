//! Shared fixtures for unit tests.

use crate::avatar::{AvatarResolver, Image, Placeholder};
use crate::error::FetchError;
use crate::review::{ReviewPage, ReviewRecord};
use crate::source::ReviewSource;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) fn record(n: usize) -> ReviewRecord {
    ReviewRecord {
        text: format!("review {n}"),
        created_at: format!("{n} May"),
        rating: (n % 5 + 1) as u8,
        author_name: format!("Author {n}"),
        avatar_ref: Some(format!("avatar://{n}")),
        photo_refs: Vec::new(),
    }
}

pub(crate) fn records(count: usize) -> Vec<ReviewRecord> {
    (0..count).map(record).collect()
}

/// Source that replays a fixed script of responses, one per fetch.
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Result<ReviewPage, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new(script: Vec<Result<ReviewPage, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewSource for ScriptedSource {
    async fn fetch(&self, _offset: usize, _limit: usize) -> Result<ReviewPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Unavailable("script exhausted".into())))
    }
}

pub(crate) fn page(range: std::ops::Range<usize>, total_count: usize) -> ReviewPage {
    ReviewPage {
        items: range.map(record).collect(),
        total_count,
    }
}

/// Resolver that sleeps a per-reference delay and logs completion order.
pub(crate) struct DelayedResolver {
    delays: Vec<(String, Duration)>,
    pub(crate) completed: Mutex<Vec<String>>,
}

impl DelayedResolver {
    pub(crate) fn new(delays: Vec<(&str, u64)>) -> Self {
        Self {
            delays: delays
                .into_iter()
                .map(|(r, ms)| (r.to_string(), Duration::from_millis(ms)))
                .collect(),
            completed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AvatarResolver for DelayedResolver {
    async fn resolve_avatar(&self, reference: Option<&str>) -> Image {
        let Some(reference) = reference else {
            return Image::Placeholder(Placeholder::Avatar);
        };
        let delay = self
            .delays
            .iter()
            .find(|(r, _)| r == reference)
            .map(|(_, d)| *d)
            .unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.completed.lock().unwrap().push(reference.to_string());
        Image::Loaded {
            source: reference.to_string(),
            data: Arc::from(reference.as_bytes()),
        }
    }
}
