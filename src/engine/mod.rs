//! The pagination engine: owns the review list, sequences page fetches,
//! merges results and reports the minimal row updates.
//!
//! ## Execution model
//!
//! The engine follows the bubbletea-rs update loop. Fetching happens inside a
//! [`Cmd`] returned by [`PaginationEngine::request_next_page`]; the command
//! resolves to a [`PageLoadedMsg`] or [`PageFailedMsg`], and only
//! [`PaginationEngine::update`] applies it to the state. Every mutating entry
//! point takes `&mut self`, so all mutation is serialized on whichever
//! context owns the engine. The engine must not be shared between contexts
//! (for example behind a lock driven from several tasks) without that
//! serialization.
//!
//! `is_fetching` is the only backpressure: initial load, scroll-triggered
//! prefetch and manual refresh all go through `request_next_page`, so any
//! number of overlapping triggers produce at most one fetch in flight.
//!
//! ## Merge
//!
//! A successful page is clamped to the server total before it is appended,
//! the offset advances by one page, and `has_more` becomes
//! `rows.len() < total`. The emitted [`ChangeSet::InsertRows`] names the new
//! rows and, when the page exhausts the list, the summary row right after
//! them, so the presenter sees one update for that transition.
//!
//! A failed page leaves rows, offset and `has_more` untouched; the next
//! trigger retries from the same offset.

mod state;
#[cfg(test)]
mod tests;

pub use state::{PaginationState, Phase};

use crate::avatar::AvatarResolver;
use crate::changeset::{ChangeSet, Row, SummaryRow};
use crate::config::FeedConfig;
use crate::error::{FetchError, RowIndexError};
use crate::item::{ReviewItemBuilder, RowId, RowItem};
use crate::source::ReviewSource;
use crate::style::ReviewStyles;
use bubbletea_rs::{Cmd, Msg};
use std::sync::Arc;

/// Produced by a page command when the fetch succeeded.
#[derive(Debug)]
pub struct PageLoadedMsg {
    offset: usize,
    total_count: usize,
    items: Vec<RowItem>,
}

impl PageLoadedMsg {
    /// Offset the page was requested at.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Produced by a page command when the fetch failed.
#[derive(Debug)]
pub struct PageFailedMsg {
    offset: usize,
    error: FetchError,
}

impl PageFailedMsg {
    /// Offset the failed page was requested at.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Result of handing a page message to the engine.
#[derive(Debug)]
pub enum PageOutcome {
    /// Nothing to apply: request guarded, message stale, or the page added
    /// no displayable rows.
    Skipped,
    /// Rows were appended.
    Loaded(ChangeSet),
    /// The fetch failed; state is as it was before the request.
    Failed(FetchError),
}

/// Owns the list of review rows and drives pagination.
pub struct PaginationEngine {
    state: PaginationState,
    source: Arc<dyn ReviewSource>,
    resolver: Arc<dyn AvatarResolver>,
    builder: Arc<ReviewItemBuilder>,
}

impl std::fmt::Debug for PaginationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PaginationEngine {
    /// Creates an engine with empty state.
    pub fn new(
        config: &FeedConfig,
        source: Arc<dyn ReviewSource>,
        resolver: Arc<dyn AvatarResolver>,
    ) -> Self {
        Self {
            state: PaginationState::new(config.page_size),
            source,
            resolver,
            builder: Arc::new(
                ReviewItemBuilder::new().with_truncation_lines(config.truncation_lines),
            ),
        }
    }

    /// Replaces the styles used for rows built from now on.
    pub fn with_styles(mut self, styles: ReviewStyles) -> Self {
        self.builder = Arc::new((*self.builder).clone().with_styles(styles));
        self
    }

    /// Read access to the full state.
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Review rows in display order.
    pub fn rows(&self) -> &[RowItem] {
        &self.state.rows
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Starts fetching the next page.
    ///
    /// Returns `None` without touching anything when a fetch is already in
    /// flight or the list is exhausted. Otherwise marks the fetch in flight
    /// and returns the command that performs it; feed the message it
    /// produces to [`update`](Self::update).
    pub fn request_next_page(&mut self) -> Option<Cmd> {
        if self.state.is_fetching {
            tracing::debug!(offset = self.state.next_offset, "fetch already in flight");
            return None;
        }
        if !self.state.has_more {
            return None;
        }

        self.state.is_fetching = true;
        let offset = self.state.next_offset;
        let limit = self.state.page_size;
        let source = Arc::clone(&self.source);
        let resolver = Arc::clone(&self.resolver);
        let builder = Arc::clone(&self.builder);
        tracing::debug!(offset, limit, "requesting page");

        let cmd: Cmd = Box::pin(async move {
            let msg = match source.fetch(offset, limit).await {
                Ok(page) => {
                    let items = builder.build_batch(&page.items, resolver.as_ref()).await;
                    Box::new(PageLoadedMsg {
                        offset,
                        total_count: page.total_count,
                        items,
                    }) as Msg
                }
                Err(error) => Box::new(PageFailedMsg { offset, error }) as Msg,
            };
            Some(msg)
        });
        Some(cmd)
    }

    /// Applies a page message.
    ///
    /// Messages that are not page messages are handed back untouched so the
    /// caller can route them elsewhere.
    pub fn update(&mut self, msg: Msg) -> Result<PageOutcome, Msg> {
        let msg = match msg.downcast::<PageLoadedMsg>() {
            Ok(page) => {
                return Ok(self
                    .apply_page(*page)
                    .map_or(PageOutcome::Skipped, PageOutcome::Loaded))
            }
            Err(msg) => msg,
        };
        match msg.downcast::<PageFailedMsg>() {
            Ok(failure) => Ok(self
                .apply_failure(*failure)
                .map_or(PageOutcome::Skipped, PageOutcome::Failed)),
            Err(msg) => Err(msg),
        }
    }

    /// Requests the next page, waits for it, and applies it.
    pub async fn load_next_page(&mut self) -> PageOutcome {
        let Some(cmd) = self.request_next_page() else {
            return PageOutcome::Skipped;
        };
        match cmd.await {
            Some(msg) => self.update(msg).unwrap_or(PageOutcome::Skipped),
            None => PageOutcome::Skipped,
        }
    }

    fn is_stale(&self, offset: usize) -> bool {
        if !self.state.is_fetching || offset != self.state.next_offset {
            tracing::warn!(
                offset,
                expected = self.state.next_offset,
                in_flight = self.state.is_fetching,
                "ignoring stale page message"
            );
            return true;
        }
        false
    }

    fn apply_page(&mut self, page: PageLoadedMsg) -> Option<ChangeSet> {
        if self.is_stale(page.offset) {
            return None;
        }

        let total = page.total_count;
        let start = self.state.rows.len();
        let capacity = total.saturating_sub(start);
        let incoming = page.items.len();
        if incoming > capacity {
            tracing::warn!(
                incoming,
                capacity,
                total,
                "page overshoots the server total, truncating"
            );
        }
        self.state.rows.extend(page.items.into_iter().take(capacity));

        self.state.next_offset += self.state.page_size;
        self.state.has_more = self.state.rows.len() < total;
        self.state.total_count = Some(total);
        self.state.is_fetching = false;

        let end = self.state.rows.len();
        let mut indices: Vec<usize> = (start..end).collect();
        if !self.state.has_more {
            indices.push(end);
        }
        tracing::debug!(
            appended = end - start,
            rows = end,
            total,
            has_more = self.state.has_more,
            "merged page"
        );

        if indices.is_empty() {
            None
        } else {
            Some(ChangeSet::InsertRows(indices))
        }
    }

    fn apply_failure(&mut self, failure: PageFailedMsg) -> Option<FetchError> {
        if self.is_stale(failure.offset) {
            return None;
        }
        self.state.is_fetching = false;
        tracing::warn!(offset = failure.offset, error = %failure.error, "page fetch failed");
        Some(failure.error)
    }

    /// Shows the full text of the row with `id`.
    ///
    /// Unknown ids are ignored. Expanding an expanded row reloads it again
    /// with no visible difference.
    pub fn expand_row(&mut self, id: RowId) -> Option<ChangeSet> {
        let index = self.state.rows.iter().position(|row| row.id() == id)?;
        self.state.rows[index].expand();
        tracing::debug!(%id, index, "expanded row");
        Some(ChangeSet::ReloadRow(index))
    }

    /// Drops every row and starts over from offset 0.
    ///
    /// Refused (returns false) while a fetch is in flight. The caller is
    /// expected to discard whatever it has drawn and request the first page.
    pub fn reset(&mut self) -> bool {
        if self.state.is_fetching {
            return false;
        }
        tracing::debug!(dropped = self.state.rows.len(), "resetting pagination");
        self.state = PaginationState::new(self.state.page_size);
        true
    }

    /// True once the list is exhausted.
    pub fn is_summary_row_visible(&self) -> bool {
        !self.state.has_more
    }

    /// Displayable rows: reviews plus the summary row when visible.
    pub fn row_count(&self) -> usize {
        self.state.rows.len() + usize::from(self.is_summary_row_visible())
    }

    /// Returns the displayable row at `index`.
    pub fn row_at(&self, index: usize) -> Result<Row<'_>, RowIndexError> {
        let rows = &self.state.rows;
        if let Some(item) = rows.get(index) {
            return Ok(Row::Review(item));
        }
        if index == rows.len() && self.is_summary_row_visible() {
            return Ok(Row::Summary(SummaryRow { total: rows.len() }));
        }
        Err(RowIndexError::OutOfRange {
            index,
            count: self.row_count(),
        })
    }
}
