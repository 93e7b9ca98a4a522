#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/review-feed/")]

//! # review-feed
//!
//! An infinitely scrolling, paginated list of user reviews for
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) applications.
//!
//! The heart of the crate is the [`PaginationEngine`]: it owns the list of
//! review rows, decides when a page may be fetched, merges fetched pages
//! without duplication or overshoot, and reports each change as a minimal
//! [`ChangeSet`] (rows inserted, or one row to redraw). Everything around it
//! is a narrow collaborator:
//!
//! | Piece | Role |
//! |-------|------|
//! | [`ReviewSource`] | fetches a page by offset and limit |
//! | [`AvatarResolver`] | turns avatar and photo references into images, falling back to placeholders |
//! | [`ReviewItemBuilder`] | turns a record and its images into a [`RowItem`] |
//! | [`ReviewsScreen`] | reference presenter: applies change-sets, scroll prefetch, refresh |
//!
//! ## Driving the engine
//!
//! Like every bubbletea-rs component, the engine never blocks. A page request
//! returns a `Cmd`; the message it resolves to is fed back through
//! `update`, which is the only place state changes:
//!
//! ```rust
//! use review_feed::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let source = Arc::new(FixtureSource::new(Vec::new()));
//! let mut engine = PaginationEngine::new(
//!     &FeedConfig::default(),
//!     source,
//!     Arc::new(PlaceholderResolver),
//! );
//!
//! if let Some(cmd) = engine.request_next_page() {
//!     // A second request while the first is in flight is a no-op.
//!     assert!(engine.request_next_page().is_none());
//!     if let Some(msg) = cmd.await {
//!         if let Ok(PageOutcome::Loaded(change)) = engine.update(msg) {
//!             // An empty source: only the summary row is inserted.
//!             assert_eq!(change, ChangeSet::InsertRows(vec![0]));
//!         }
//!     }
//! }
//! # }
//! ```
//!
//! Callers without an update loop can use
//! [`PaginationEngine::load_next_page`], which requests, awaits and applies
//! in one step.
//!
//! ## Concurrency
//!
//! All state mutation goes through `&mut self`, so it is serialized on the
//! context that owns the engine. Fetching and image resolution run inside
//! the returned command, and a batch's images resolve concurrently while the
//! rows keep record order.

pub mod avatar;
pub mod changeset;
pub mod config;
pub mod engine;
pub mod error;
pub mod item;
pub mod keys;
pub mod render;
pub mod review;
pub mod screen;
pub mod source;
pub mod style;

#[cfg(test)]
mod testing;

pub use avatar::{
    AvatarResolver, FileImageLoader, Image, ImageLoader, LoadingResolver, Placeholder,
    PlaceholderResolver,
};
pub use changeset::{ChangeSet, Row, SummaryRow};
pub use config::{FeedConfig, RefreshMode};
pub use engine::{
    PageFailedMsg, PageLoadedMsg, PageOutcome, PaginationEngine, PaginationState, Phase,
};
pub use error::{ConfigError, FetchError, RowIndexError};
pub use item::{RatingRenderer, ReviewItemBuilder, RowId, RowItem, StyledText};
pub use keys::{Binding, ReviewsKeyMap};
pub use review::{ReviewPage, ReviewRecord};
pub use screen::ReviewsScreen;
pub use source::{FixtureSource, ReviewSource};
pub use style::ReviewStyles;

/// Prelude module for convenient imports.
///
/// ```rust
/// use review_feed::prelude::*;
/// ```
pub mod prelude {
    pub use crate::avatar::{AvatarResolver, Image, LoadingResolver, PlaceholderResolver};
    pub use crate::changeset::{ChangeSet, Row, SummaryRow};
    pub use crate::config::{FeedConfig, RefreshMode};
    pub use crate::engine::{PageOutcome, PaginationEngine, Phase};
    pub use crate::error::FetchError;
    pub use crate::item::{ReviewItemBuilder, RowId, RowItem};
    pub use crate::review::{ReviewPage, ReviewRecord};
    pub use crate::screen::ReviewsScreen;
    pub use crate::source::{FixtureSource, ReviewSource};
    pub use crate::style::ReviewStyles;
}
