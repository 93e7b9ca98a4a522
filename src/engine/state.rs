//! Authoritative list state owned by the pagination engine.

use crate::item::RowItem;

/// Where the engine is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No fetch in flight and more pages may exist.
    Idle,
    /// Exactly one fetch in flight.
    Fetching,
    /// Every record has been fetched; further requests are no-ops.
    Exhausted,
}

/// Rows fetched so far plus the bookkeeping needed to fetch the rest.
///
/// Invariants, once `total_count` is known:
/// - `rows.len() <= total_count`
/// - `has_more == (rows.len() < total_count)`
///
/// A failed fetch only clears `is_fetching`.
#[derive(Debug, Clone)]
pub struct PaginationState {
    pub(super) rows: Vec<RowItem>,
    pub(super) next_offset: usize,
    pub(super) page_size: usize,
    pub(super) has_more: bool,
    pub(super) is_fetching: bool,
    pub(super) total_count: Option<usize>,
}

impl PaginationState {
    /// Fresh state: no rows, offset 0, more pages assumed. A zero page size
    /// is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            next_offset: 0,
            page_size: page_size.max(1),
            has_more: true,
            is_fetching: false,
            total_count: None,
        }
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[RowItem] {
        &self.rows
    }

    /// Offset of the next page request.
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    /// Records requested per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// False once every record has been fetched.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// True while a fetch is in flight.
    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    /// Server total, known after the first successful fetch.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Current phase derived from the flags.
    pub fn phase(&self) -> Phase {
        if self.is_fetching {
            Phase::Fetching
        } else if self.has_more {
            Phase::Idle
        } else {
            Phase::Exhausted
        }
    }
}
