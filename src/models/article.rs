use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized news article. The url is the identity key used for
/// deduplication; articles are immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
}

/// Metadata for a news outlet, as returned by the sources capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}
