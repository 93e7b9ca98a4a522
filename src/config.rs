//! Feed configuration.
//!
//! All fields have defaults, so a partial (or empty) TOML document is valid:
//!
//! ```rust
//! use review_feed::config::{FeedConfig, RefreshMode};
//!
//! let config = FeedConfig::from_toml_str("page_size = 10\nrefresh = \"reset\"").unwrap();
//! assert_eq!(config.page_size, 10);
//! assert_eq!(config.truncation_lines, 3);
//! assert_eq!(config.refresh, RefreshMode::Reset);
//! ```

use crate::error::ConfigError;
use serde::Deserialize;

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default number of text lines shown before the "Show more..." affordance.
pub const DEFAULT_TRUNCATION_LINES: usize = 3;

/// Default prefetch distance, in screen heights from the end of the list.
pub const DEFAULT_PREFETCH_SCREENS: f64 = 2.5;

/// What a manual refresh does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Refresh continues appending from the current offset.
    #[default]
    Append,
    /// Refresh drops every row and starts again from offset 0.
    Reset,
}

/// Tunables for the pagination engine and the screen that drives it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Records requested per page. Must be positive.
    pub page_size: usize,
    /// Initial truncation limit for new rows. `0` shows full text.
    pub truncation_lines: usize,
    /// Request the next page when the end of the list is within this many
    /// screen heights.
    pub prefetch_screens: f64,
    /// Refresh semantics.
    pub refresh: RefreshMode,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            truncation_lines: DEFAULT_TRUNCATION_LINES,
            prefetch_screens: DEFAULT_PREFETCH_SCREENS,
            refresh: RefreshMode::Append,
        }
    }
}

impl FeedConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: FeedConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the refresh mode.
    pub fn with_refresh(mut self, refresh: RefreshMode) -> Self {
        self.refresh = refresh;
        self
    }

    /// Checks values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.prefetch_screens.is_finite() || self.prefetch_screens <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "prefetch_screens",
                reason: format!("must be a positive number, got {}", self.prefetch_screens),
            });
        }
        Ok(())
    }
}
