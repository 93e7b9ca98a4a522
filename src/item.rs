//! Renderable review rows and the builder that produces them.
//!
//! A [`RowItem`] is built once from a [`ReviewRecord`] and its resolved
//! images. After that only its truncation limit ever changes, and only
//! through [`PaginationEngine::expand_row`](crate::engine::PaginationEngine::expand_row).
//! Rows carry their [`RowId`] rather than a callback; the presenter sends the
//! id back to the engine to expand a row.

use crate::avatar::{AvatarResolver, Image};
use crate::config::DEFAULT_TRUNCATION_LINES;
use crate::review::ReviewRecord;
use crate::style::{ReviewStyles, DEFAULT_STYLES, STAR_EMPTY, STAR_FILLED};
use futures::future::join_all;
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// Identity of a row, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    fn fresh() -> Self {
        RowId(next_id())
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// Plain text paired with the style it is drawn in.
///
/// Kept apart so the presenter can wrap the plain text before styling each
/// line.
#[derive(Debug, Clone)]
pub struct StyledText {
    /// Unstyled content.
    pub plain: String,
    /// Style applied on render.
    pub style: Style,
}

impl StyledText {
    /// Pairs `plain` with `style`.
    pub fn new(plain: impl Into<String>, style: &Style) -> Self {
        Self {
            plain: plain.into(),
            style: style.clone(),
        }
    }

    /// Renders the whole text.
    pub fn render(&self) -> String {
        self.style.render(&self.plain)
    }

    /// Renders one fragment of the text in the same style.
    pub fn render_fragment(&self, fragment: &str) -> String {
        self.style.render(fragment)
    }
}

/// One review, ready to draw.
#[derive(Debug, Clone)]
pub struct RowItem {
    id: RowId,
    /// Author name.
    pub username: StyledText,
    /// Review body.
    pub text: StyledText,
    /// Creation timestamp.
    pub created: StyledText,
    /// Five-star glyph line.
    pub rating: StyledText,
    /// Resolved avatar.
    pub avatar: Image,
    /// Resolved attached photos, in reference order.
    pub photos: Vec<Image>,
    truncation_limit: usize,
}

impl RowItem {
    /// The row's stable identity.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Maximum lines of text shown; `0` means unlimited.
    pub fn truncation_limit(&self) -> usize {
        self.truncation_limit
    }

    /// True once the row shows its full text.
    pub fn is_expanded(&self) -> bool {
        self.truncation_limit == 0
    }

    pub(crate) fn expand(&mut self) {
        self.truncation_limit = 0;
    }
}

/// Draws a 1..=5 rating as stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRenderer {
    max: u8,
}

impl Default for RatingRenderer {
    fn default() -> Self {
        Self { max: 5 }
    }
}

impl RatingRenderer {
    /// Returns `rating` filled stars followed by empty ones, clamped to the
    /// scale.
    ///
    /// ```rust
    /// use review_feed::item::RatingRenderer;
    ///
    /// let stars = RatingRenderer::default();
    /// assert_eq!(stars.glyphs(3), "★★★☆☆");
    /// assert_eq!(stars.glyphs(9), "★★★★★");
    /// assert_eq!(stars.glyphs(0), "★☆☆☆☆");
    /// ```
    pub fn glyphs(&self, rating: u8) -> String {
        let filled = rating.clamp(1, self.max) as usize;
        let empty = self.max as usize - filled;
        format!("{}{}", STAR_FILLED.repeat(filled), STAR_EMPTY.repeat(empty))
    }
}

/// Turns review records into [`RowItem`]s.
///
/// Building is infallible: every image problem has already been degraded to
/// a placeholder by the resolver.
#[derive(Debug, Clone)]
pub struct ReviewItemBuilder {
    styles: ReviewStyles,
    rating: RatingRenderer,
    truncation_lines: usize,
}

impl Default for ReviewItemBuilder {
    fn default() -> Self {
        Self {
            styles: DEFAULT_STYLES.clone(),
            rating: RatingRenderer::default(),
            truncation_lines: DEFAULT_TRUNCATION_LINES,
        }
    }
}

impl ReviewItemBuilder {
    /// Creates a builder with default styles and a three-line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the styles used for new rows.
    pub fn with_styles(mut self, styles: ReviewStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Sets the initial truncation limit for new rows.
    pub fn with_truncation_lines(mut self, lines: usize) -> Self {
        self.truncation_lines = lines;
        self
    }

    /// Builds one row from a record and its resolved images.
    pub fn build(&self, record: &ReviewRecord, avatar: Image, photos: Vec<Image>) -> RowItem {
        RowItem {
            id: RowId::fresh(),
            username: StyledText::new(&record.author_name, &self.styles.username),
            text: StyledText::new(&record.text, &self.styles.text),
            created: StyledText::new(&record.created_at, &self.styles.created),
            rating: StyledText::new(self.rating.glyphs(record.rating), &self.styles.rating),
            avatar,
            photos,
            truncation_limit: self.truncation_lines,
        }
    }

    /// Resolves images for every record concurrently and builds the rows in
    /// record order, whatever order the resolutions complete in.
    pub async fn build_batch(
        &self,
        records: &[ReviewRecord],
        resolver: &dyn AvatarResolver,
    ) -> Vec<RowItem> {
        let resolved = join_all(records.iter().map(|record| async move {
            futures::join!(
                resolver.resolve_avatar(record.avatar_ref.as_deref()),
                resolver.resolve_photos(&record.photo_refs),
            )
        }))
        .await;

        records
            .iter()
            .zip(resolved)
            .map(|(record, (avatar, photos))| self.build(record, avatar, photos))
            .collect()
    }
}
