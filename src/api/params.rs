use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Largest page size the provider accepts; anything above is clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A logical request kind, distinct from its HTTP mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Headlines,
    Search,
    Sources,
}

impl Capability {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Capability::Headlines => "top-headlines",
            Capability::Search => "everything",
            Capability::Sources => "top-headlines/sources",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Case-insensitive parse; unknown names are rejected up front.
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let lowered = input.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| ApiError::InvalidParameter {
                field: "category",
                reason: format!(
                    "`{}` is not a category; expected one of: {}",
                    input,
                    Category::ALL
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Relevancy,
    Popularity,
    #[default]
    PublishedAt,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevancy => "relevancy",
            SortOrder::Popularity => "popularity",
            SortOrder::PublishedAt => "publishedAt",
        }
    }
}

/// A structured, validated query. Unknown options are impossible by
/// construction; `build` checks cross-field rules and produces the
/// provider parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub capability: Capability,
    /// Free-text filter; required for the search capability.
    pub text: Option<String>,
    pub category: Option<Category>,
    pub source_ids: Vec<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    /// 1-based provider page.
    pub page: u32,
    pub page_size: u32,
    pub sort: SortOrder,
    /// ISO dates bounding a search, e.g. "2024-01-01".
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl Query {
    fn new(capability: Capability) -> Self {
        Self {
            capability,
            text: None,
            category: None,
            source_ids: Vec::new(),
            language: None,
            country: None,
            page: 1,
            page_size: 20,
            sort: SortOrder::default(),
            from_date: None,
            to_date: None,
        }
    }

    pub fn headlines() -> Self {
        Self::new(Capability::Headlines)
    }

    pub fn search(text: impl Into<String>) -> Self {
        let mut query = Self::new(Capability::Search);
        query.text = Some(text.into());
        query
    }

    pub fn sources() -> Self {
        Self::new(Capability::Sources)
    }

    /// Keywords of the free-text filter, for display highlighting.
    pub fn keywords(&self) -> Vec<String> {
        self.text
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Validate and produce the provider parameter list.
    pub fn build(&self) -> Result<Vec<(&'static str, String)>, ApiError> {
        if self.page == 0 {
            return Err(ApiError::InvalidParameter {
                field: "page",
                reason: "pages are numbered from 1".into(),
            });
        }
        if self.page_size == 0 {
            return Err(ApiError::InvalidParameter {
                field: "page_size",
                reason: "page size must be positive".into(),
            });
        }
        let page_size = self.page_size.min(MAX_PAGE_SIZE);

        let mut params: Vec<(&'static str, String)> = Vec::new();

        match self.capability {
            Capability::Headlines => {
                if self.category.is_some() && !self.source_ids.is_empty() {
                    return Err(ApiError::ConflictingFilter);
                }
                if !self.source_ids.is_empty() {
                    params.push(("sources", self.source_ids.join(",")));
                } else {
                    // The provider rejects `country` combined with `sources`.
                    if let Some(country) = &self.country {
                        params.push(("country", country.clone()));
                    }
                    if let Some(category) = self.category {
                        params.push(("category", category.as_str().to_string()));
                    }
                }
                params.push(("page", self.page.to_string()));
                params.push(("pageSize", page_size.to_string()));
            }
            Capability::Search => {
                let text = self.text.as_deref().unwrap_or("").trim().to_string();
                if text.is_empty() {
                    return Err(ApiError::InvalidParameter {
                        field: "q",
                        reason: "search query cannot be empty".into(),
                    });
                }
                params.push(("q", text));
                if let Some(language) = &self.language {
                    params.push(("language", language.clone()));
                }
                params.push(("sortBy", self.sort.as_str().to_string()));
                if let Some(from) = &self.from_date {
                    params.push(("from", from.clone()));
                }
                if let Some(to) = &self.to_date {
                    params.push(("to", to.clone()));
                }
                params.push(("page", self.page.to_string()));
                params.push(("pageSize", page_size.to_string()));
            }
            Capability::Sources => {
                if let Some(language) = &self.language {
                    params.push(("language", language.clone()));
                }
                if let Some(category) = self.category {
                    params.push(("category", category.as_str().to_string()));
                }
                if let Some(country) = &self.country {
                    params.push(("country", country.clone()));
                }
            }
        }

        Ok(params)
    }
}
