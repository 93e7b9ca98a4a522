//! Styling for review rows and the screen around them.
//!
//! Built on lipgloss. Every default uses `AdaptiveColor` so rows stay
//! readable on light and dark terminals.
//!
//! ```rust
//! use review_feed::style::ReviewStyles;
//! use lipgloss_extras::prelude::*;
//!
//! let mut styles = ReviewStyles::default();
//! styles.username = Style::new().bold(true).foreground(Color::from("#EE6FF8"));
//! ```

use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;

/// Filled rating star.
pub const STAR_FILLED: &str = "★";

/// Empty rating star.
pub const STAR_EMPTY: &str = "☆";

/// Text of the expand affordance under truncated reviews.
pub const SHOW_MORE: &str = "Show more...";

/// Styles applied to each part of a review row.
#[derive(Debug, Clone)]
pub struct ReviewStyles {
    /// Author name.
    pub username: Style,
    /// Review body.
    pub text: Style,
    /// Creation timestamp.
    pub created: Style,
    /// Rating stars.
    pub rating: Style,
    /// The "Show more..." affordance.
    pub show_more: Style,
    /// Summary row at the end of an exhausted list.
    pub summary: Style,
    /// Marker drawn next to the selected row.
    pub selected_marker: Style,
    /// Status line shown after a failed fetch.
    pub error: Style,
    /// Loading footer.
    pub loading: Style,
}

impl Default for ReviewStyles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };

        Self {
            username: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            text: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            created: Style::new().foreground(subdued.clone()),
            rating: Style::new().foreground(AdaptiveColor {
                Light: "#F2A600",
                Dark: "#FFC93C",
            }),
            show_more: Style::new().foreground(AdaptiveColor {
                Light: "#3E7BF6",
                Dark: "#6F9BFF",
            }),
            summary: Style::new().foreground(subdued.clone()),
            selected_marker: Style::new().foreground(Color::from("#AD58B4")),
            error: Style::new().foreground(AdaptiveColor {
                Light: "#D23F3F",
                Dark: "#FF6B6B",
            }),
            loading: Style::new().foreground(subdued),
        }
    }
}

/// Process-wide default styles.
pub static DEFAULT_STYLES: Lazy<ReviewStyles> = Lazy::new(ReviewStyles::default);
