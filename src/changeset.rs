//! Row-level update instructions and the displayable row variants.

use crate::item::RowItem;

/// The minimal description of what changed, for the presenter to apply.
///
/// The engine never asks for a full reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSet {
    /// Rows were inserted at these indices, in ascending order. When a page
    /// exhausts the list, the summary row's index is the last entry.
    InsertRows(Vec<usize>),
    /// The row at this index must be redrawn.
    ReloadRow(usize),
}

impl ChangeSet {
    /// Indices touched by this change-set.
    pub fn indices(&self) -> &[usize] {
        match self {
            ChangeSet::InsertRows(indices) => indices.as_slice(),
            ChangeSet::ReloadRow(index) => std::slice::from_ref(index),
        }
    }
}

/// Synthetic terminal row stating how many reviews there are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    /// Number of reviews in the list.
    pub total: usize,
}

impl SummaryRow {
    /// Human readable count.
    ///
    /// ```rust
    /// use review_feed::changeset::SummaryRow;
    ///
    /// assert_eq!(SummaryRow { total: 1 }.label(), "1 review");
    /// assert_eq!(SummaryRow { total: 45 }.label(), "45 reviews");
    /// ```
    pub fn label(&self) -> String {
        match self.total {
            1 => "1 review".to_string(),
            n => format!("{n} reviews"),
        }
    }
}

/// A displayable row: a real review or the summary.
#[derive(Debug, Clone, Copy)]
pub enum Row<'a> {
    /// A review row.
    Review(&'a RowItem),
    /// The summary row after the last review.
    Summary(SummaryRow),
}

impl<'a> Row<'a> {
    /// The review, if this is a review row.
    pub fn as_review(&self) -> Option<&'a RowItem> {
        match self {
            Row::Review(item) => Some(item),
            Row::Summary(_) => None,
        }
    }
}
