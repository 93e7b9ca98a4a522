//! Avatar and photo resolution.
//!
//! Resolution never fails past this module: a missing reference or a failed
//! load yields a [`Placeholder`] image and a `warn!` event. Decoding and
//! caching are left to the [`ImageLoader`] implementation.

use crate::error::FetchError;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;

/// Built-in fallback images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Generic person silhouette, used for missing or broken avatars.
    Avatar,
    /// Shown in place of an attached photo that failed to load.
    BrokenPhoto,
}

/// A displayable image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Image {
    /// One of the built-in fallbacks.
    Placeholder(Placeholder),
    /// Raw image bytes and the reference they were loaded from.
    Loaded {
        /// Reference the bytes came from.
        source: String,
        /// Encoded image data.
        data: Arc<[u8]>,
    },
}

impl Image {
    /// The default avatar.
    pub const fn default_avatar() -> Self {
        Image::Placeholder(Placeholder::Avatar)
    }

    /// Returns true for any placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Image::Placeholder(_))
    }
}

/// Resolves avatar and photo references to images.
#[async_trait]
pub trait AvatarResolver: Send + Sync {
    /// Resolves an avatar. Absent references and failures give the default
    /// avatar.
    async fn resolve_avatar(&self, reference: Option<&str>) -> Image;

    /// Resolves one attached photo.
    async fn resolve_photo(&self, _reference: &str) -> Image {
        Image::Placeholder(Placeholder::BrokenPhoto)
    }

    /// Resolves every attached photo concurrently, keeping reference order.
    async fn resolve_photos(&self, references: &[String]) -> Vec<Image> {
        join_all(references.iter().map(|r| self.resolve_photo(r))).await
    }
}

/// Resolver that never loads anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderResolver;

#[async_trait]
impl AvatarResolver for PlaceholderResolver {
    async fn resolve_avatar(&self, _reference: Option<&str>) -> Image {
        Image::default_avatar()
    }
}

/// Loads raw image bytes for a reference.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fetches the bytes behind `reference`.
    async fn load(&self, reference: &str) -> Result<Vec<u8>, FetchError>;
}

/// Resolver that delegates to an [`ImageLoader`] and degrades to placeholders.
#[derive(Debug, Clone)]
pub struct LoadingResolver<L> {
    loader: L,
}

impl<L: ImageLoader> LoadingResolver<L> {
    /// Wraps `loader`.
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    async fn load_or(&self, reference: &str, fallback: Placeholder) -> Image {
        match self.loader.load(reference).await {
            Ok(data) if !data.is_empty() => Image::Loaded {
                source: reference.to_string(),
                data: data.into(),
            },
            Ok(_) => {
                tracing::warn!(reference, "image is empty, using placeholder");
                Image::Placeholder(fallback)
            }
            Err(err) => {
                tracing::warn!(reference, error = %err, "image failed to load, using placeholder");
                Image::Placeholder(fallback)
            }
        }
    }
}

#[async_trait]
impl<L: ImageLoader> AvatarResolver for LoadingResolver<L> {
    async fn resolve_avatar(&self, reference: Option<&str>) -> Image {
        match reference {
            Some(reference) => self.load_or(reference, Placeholder::Avatar).await,
            None => Image::default_avatar(),
        }
    }

    async fn resolve_photo(&self, reference: &str) -> Image {
        self.load_or(reference, Placeholder::BrokenPhoto).await
    }
}

/// Loads images from files under a root directory.
///
/// References may be plain relative paths or `file://` URLs.
#[derive(Debug, Clone)]
pub struct FileImageLoader {
    root: PathBuf,
}

impl FileImageLoader {
    /// Resolves relative references against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, reference: &str) -> PathBuf {
        let relative = reference.strip_prefix("file://").unwrap_or(reference);
        self.root.join(relative.trim_start_matches('/'))
    }
}

#[async_trait]
impl ImageLoader for FileImageLoader {
    async fn load(&self, reference: &str) -> Result<Vec<u8>, FetchError> {
        Ok(tokio::fs::read(self.path_for(reference)).await?)
    }
}
