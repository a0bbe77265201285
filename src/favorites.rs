use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FavoritesError;
use crate::models::Article;

/// A saved article as stored on disk. `saved_at` records when the user
/// favorited it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteArticle {
    pub title: String,
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub saved_at: DateTime<Utc>,
}

impl From<&Article> for FavoriteArticle {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            source: article.source.clone(),
            url: article.url.clone(),
            description: article.description.clone(),
            published_at: article.published_at,
            saved_at: Utc::now(),
        }
    }
}

/// Favorites render through the same listing pipeline as fetched results.
impl From<&FavoriteArticle> for Article {
    fn from(favorite: &FavoriteArticle) -> Self {
        Self {
            title: favorite.title.clone(),
            source: favorite.source.clone(),
            author: None,
            description: favorite.description.clone(),
            url: favorite.url.clone(),
            published_at: favorite.published_at,
            content: None,
        }
    }
}

/// Write-through favorites store: a JSON array on disk, deduplicated by
/// url, insertion order preserved. Every mutation flushes before the
/// call returns.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    entries: Vec<FavoriteArticle>,
}

impl FavoritesStore {
    /// Read the store at `path`. An absent file is a first run, not an
    /// error; an unreadable one is surfaced as `CorruptStore` so saved
    /// articles are never silently discarded.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, FavoritesError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| {
                FavoritesError::CorruptStore {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(FavoritesError::Io(e)),
        };
        tracing::debug!(path = %path.display(), count = entries.len(), "loaded favorites");
        Ok(Self { path, entries })
    }

    pub fn add(&mut self, article: &Article) -> Result<(), FavoritesError> {
        if self.contains(&article.url) {
            return Err(FavoritesError::AlreadyFavorited(article.url.clone()));
        }
        self.entries.push(FavoriteArticle::from(article));
        if let Err(e) = self.flush() {
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    pub fn remove(&mut self, url: &str) -> Result<(), FavoritesError> {
        let position = self
            .entries
            .iter()
            .position(|f| f.url == url)
            .ok_or_else(|| FavoritesError::NotFavorited(url.to_string()))?;
        let removed = self.entries.remove(position);
        if let Err(e) = self.flush() {
            self.entries.insert(position, removed);
            return Err(e);
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), FavoritesError> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.flush() {
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }

    /// All favorites in insertion order.
    pub fn list(&self) -> &[FavoriteArticle] {
        &self.entries
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|f| f.url == url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: serialize to a sibling temp file, then rename over
    /// the target, so a failure leaves the prior on-disk state intact.
    fn flush(&self) -> Result<(), FavoritesError> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), count = self.entries.len(), "flushed favorites");
        Ok(())
    }
}
