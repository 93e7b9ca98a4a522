//! Review records and the page response they arrive in.
//!
//! The wire format is a single JSON object per page:
//!
//! ```json
//! {
//!   "count": 45,
//!   "items": [
//!     { "first_name": "Ivan", "last_name": "Ivanov", "rating": 4,
//!       "text": "Fits well", "created": "13 May",
//!       "avatar_url": "https://example.com/a.png",
//!       "photo_urls": ["https://example.com/p1.jpg"] }
//!   ]
//! }
//! ```
//!
//! `avatar_url` and `photo_urls` are optional.

use crate::error::FetchError;
use serde::Deserialize;

/// One review as delivered by the source. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireReview")]
pub struct ReviewRecord {
    /// Review body.
    pub text: String,
    /// Creation timestamp. Opaque: displayed verbatim, never parsed.
    pub created_at: String,
    /// Star rating, nominally 1..=5. Wire values outside `u8` saturate.
    pub rating: u8,
    /// "First Last".
    pub author_name: String,
    /// Avatar reference, if the author has one.
    pub avatar_ref: Option<String>,
    /// References of photos attached to the review, in display order.
    pub photo_refs: Vec<String>,
}

#[derive(Deserialize)]
struct WireReview {
    first_name: String,
    last_name: String,
    rating: i64,
    text: String,
    created: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    photo_urls: Vec<String>,
}

impl From<WireReview> for ReviewRecord {
    fn from(wire: WireReview) -> Self {
        Self {
            text: wire.text,
            created_at: wire.created,
            rating: wire.rating.clamp(0, i64::from(u8::MAX)) as u8,
            author_name: format!("{} {}", wire.first_name, wire.last_name),
            avatar_ref: wire.avatar_url.filter(|url| !url.is_empty()),
            photo_refs: wire.photo_urls,
        }
    }
}

/// One page of records plus the server's total.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewPage {
    /// Records in server order.
    pub items: Vec<ReviewRecord>,
    /// Total number of records available across all pages.
    #[serde(rename = "count")]
    pub total_count: usize,
}

impl ReviewPage {
    /// Decodes a page response.
    pub fn from_json(bytes: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
