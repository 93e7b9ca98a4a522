//! A bubbletea-rs presenter for the review feed.
//!
//! `ReviewsScreen` owns a [`PaginationEngine`] and keeps one block of
//! rendered lines per displayable row. Change-sets from the engine patch that
//! cache in place: inserted rows are rendered and spliced in, reloaded rows
//! are re-rendered. Only a width change re-renders everything.
//!
//! Fetches are triggered by:
//! - [`ReviewsScreen::init`] (initial load),
//! - any scroll movement, resize or merge that leaves the end of the list
//!   within `prefetch_screens` screen heights,
//! - the refresh key.
//!
//! # Examples
//!
//! ```rust
//! use review_feed::prelude::*;
//! use std::sync::Arc;
//!
//! let config = FeedConfig::default();
//! let engine = PaginationEngine::new(
//!     &config,
//!     Arc::new(FixtureSource::new(Vec::new())),
//!     Arc::new(PlaceholderResolver),
//! );
//! let mut screen = ReviewsScreen::new(engine, &config, 80, 24);
//! let first_page = screen.init();
//! assert!(first_page.is_some());
//! ```

use crate::changeset::{ChangeSet, Row};
use crate::config::{FeedConfig, RefreshMode};
use crate::engine::{PageOutcome, PaginationEngine, Phase};
use crate::keys::ReviewsKeyMap;
use crate::render::render_row;
use crate::style::{ReviewStyles, DEFAULT_STYLES};
use bubbletea_rs::{Cmd, KeyMsg, Msg, WindowSizeMsg};

const SELECTED_PREFIX: &str = "│ ";
const UNSELECTED_PREFIX: &str = "  ";

/// Returns true when the end of the content is within `screens` view
/// heights of the bottom of the viewport.
///
/// ```rust
/// use review_feed::screen::should_load_next_page;
///
/// // 100 lines of content in a 10-line view scrolled to line 60 leaves
/// // 30 lines below the view; 2.5 screens is 25 lines.
/// assert!(!should_load_next_page(10, 100, 60, 2.5));
/// assert!(should_load_next_page(10, 100, 65, 2.5));
/// ```
pub fn should_load_next_page(
    view_height: usize,
    content_height: usize,
    offset: usize,
    screens: f64,
) -> bool {
    let remaining = content_height as f64 - view_height as f64 - offset as f64;
    remaining <= view_height as f64 * screens
}

/// The reviews screen.
#[derive(Debug)]
pub struct ReviewsScreen {
    engine: PaginationEngine,
    keymap: ReviewsKeyMap,
    styles: ReviewStyles,
    refresh: RefreshMode,
    prefetch_screens: f64,
    width: usize,
    height: usize,
    rendered: Vec<Vec<String>>,
    cursor: usize,
    offset: usize,
    status: Option<String>,
}

impl ReviewsScreen {
    /// Creates a screen of the given size around `engine`.
    pub fn new(engine: PaginationEngine, config: &FeedConfig, width: usize, height: usize) -> Self {
        Self {
            engine,
            keymap: ReviewsKeyMap::default(),
            styles: DEFAULT_STYLES.clone(),
            refresh: config.refresh,
            prefetch_screens: config.prefetch_screens,
            width,
            height,
            rendered: Vec::new(),
            cursor: 0,
            offset: 0,
            status: None,
        }
    }

    /// Replaces the screen's styles (summary, status and footer lines).
    pub fn with_styles(mut self, styles: ReviewStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Replaces the key bindings.
    pub fn with_keymap(mut self, keymap: ReviewsKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// The engine behind the screen.
    pub fn engine(&self) -> &PaginationEngine {
        &self.engine
    }

    /// Index of the selected displayable row.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last fetch error, cleared by the next successful page.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Issues the initial page request.
    pub fn init(&mut self) -> Option<Cmd> {
        self.engine.request_next_page()
    }

    /// Handles page results, window resizes and key presses.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match self.engine.update(msg) {
            Ok(outcome) => return self.on_page(outcome),
            Err(msg) => msg,
        };

        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.width = size.width as usize;
            self.height = size.height as usize;
            self.rerender_all();
            self.clamp_offset();
            return self.maybe_prefetch();
        }

        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key);
        }

        None
    }

    fn on_page(&mut self, outcome: PageOutcome) -> Option<Cmd> {
        match outcome {
            PageOutcome::Loaded(change) => {
                self.status = None;
                self.apply(&change);
                self.maybe_prefetch()
            }
            PageOutcome::Failed(err) => {
                self.status = Some(format!("Could not load reviews: {err}"));
                None
            }
            PageOutcome::Skipped => None,
        }
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if self.keymap.down.matches(key) {
            self.move_cursor(1);
        } else if self.keymap.up.matches(key) {
            self.move_cursor(-1);
        } else if self.keymap.page_down.matches(key) {
            self.scroll_by(self.list_height() as isize);
        } else if self.keymap.page_up.matches(key) {
            self.scroll_by(-(self.list_height() as isize));
        } else if self.keymap.expand.matches(key) {
            self.expand_selected();
            return None;
        } else if self.keymap.refresh.matches(key) {
            return self.refresh();
        } else {
            return None;
        }
        self.maybe_prefetch()
    }

    /// Applies an engine change-set to the rendered rows.
    pub fn apply(&mut self, change: &ChangeSet) {
        match change {
            ChangeSet::InsertRows(indices) => {
                for &index in indices {
                    if let Some(lines) = self.render_index(index) {
                        if index > self.rendered.len() {
                            tracing::warn!(
                                index,
                                rendered = self.rendered.len(),
                                "inserted row lands past the rendered rows; appending"
                            );
                        }
                        let at = index.min(self.rendered.len());
                        self.rendered.insert(at, lines);
                    }
                }
            }
            ChangeSet::ReloadRow(index) => {
                if let Some(lines) = self.render_index(*index) {
                    if let Some(slot) = self.rendered.get_mut(*index) {
                        *slot = lines;
                    }
                }
                self.clamp_offset();
            }
        }
    }

    fn render_index(&self, index: usize) -> Option<Vec<String>> {
        match self.engine.row_at(index) {
            Ok(row) => Some(render_row(row, self.row_width(), &self.styles)),
            Err(err) => {
                tracing::warn!(error = %err, "change-set names a row the engine does not have");
                None
            }
        }
    }

    fn rerender_all(&mut self) {
        self.rendered = (0..self.engine.row_count())
            .filter_map(|index| self.render_index(index))
            .collect();
    }

    fn expand_selected(&mut self) {
        let id = match self.engine.row_at(self.cursor) {
            Ok(Row::Review(item)) => item.id(),
            _ => return,
        };
        if let Some(change) = self.engine.expand_row(id) {
            self.apply(&change);
        }
    }

    fn refresh(&mut self) -> Option<Cmd> {
        match self.refresh {
            RefreshMode::Append => self.engine.request_next_page(),
            RefreshMode::Reset => {
                if !self.engine.reset() {
                    return None;
                }
                self.rendered.clear();
                self.cursor = 0;
                self.offset = 0;
                self.status = None;
                self.engine.request_next_page()
            }
        }
    }

    fn maybe_prefetch(&mut self) -> Option<Cmd> {
        if should_load_next_page(
            self.list_height(),
            self.content_height(),
            self.offset,
            self.prefetch_screens,
        ) {
            self.engine.request_next_page()
        } else {
            None
        }
    }

    fn row_width(&self) -> usize {
        self.width.saturating_sub(SELECTED_PREFIX.chars().count())
    }

    fn list_height(&self) -> usize {
        self.height.saturating_sub(1).max(1)
    }

    fn row_height(&self, index: usize) -> usize {
        self.rendered.get(index).map_or(0, |lines| lines.len() + 1)
    }

    fn content_height(&self) -> usize {
        (0..self.rendered.len()).map(|i| self.row_height(i)).sum()
    }

    fn line_of(&self, index: usize) -> usize {
        (0..index).map(|i| self.row_height(i)).sum()
    }

    fn row_at_line(&self, line: usize) -> usize {
        let mut start = 0;
        for index in 0..self.rendered.len() {
            let end = start + self.row_height(index);
            if line < end {
                return index;
            }
            start = end;
        }
        self.rendered.len().saturating_sub(1)
    }

    fn clamp_offset(&mut self) {
        let max = self.content_height().saturating_sub(self.list_height());
        self.offset = self.offset.min(max);
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rendered.is_empty() {
            return;
        }
        let last = self.rendered.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);

        let start = self.line_of(self.cursor);
        let end = start + self.row_height(self.cursor);
        if start < self.offset {
            self.offset = start;
        } else if end > self.offset + self.list_height() {
            self.offset = end.saturating_sub(self.list_height()).min(start);
        }
    }

    fn scroll_by(&mut self, lines: isize) {
        self.offset = self.offset.saturating_add_signed(lines);
        self.clamp_offset();
        self.cursor = self.row_at_line(self.offset);
    }

    /// Renders the visible part of the list plus a footer line.
    pub fn view(&self) -> String {
        let mut lines = Vec::with_capacity(self.content_height());
        for (index, row) in self.rendered.iter().enumerate() {
            let prefix = if index == self.cursor {
                self.styles.selected_marker.render(SELECTED_PREFIX)
            } else {
                UNSELECTED_PREFIX.to_string()
            };
            lines.extend(row.iter().map(|line| format!("{prefix}{line}")));
            lines.push(String::new());
        }

        let mut out: Vec<String> = lines
            .into_iter()
            .skip(self.offset)
            .take(self.list_height())
            .collect();
        out.push(self.footer());
        out.join("\n")
    }

    fn footer(&self) -> String {
        if self.engine.phase() == Phase::Fetching {
            self.styles.loading.render("Loading…")
        } else if let Some(status) = &self.status {
            self.styles.error.render(status)
        } else {
            self.styles.loading.render(&self.keymap.short_help())
        }
    }
}
