use crate::api::Query;
use crate::models::Article;

/// One query's worth of results. Created per user request, replaced
/// wholesale by the next request, never mutated in place.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Articles in provider order, already normalized.
    pub articles: Vec<Article>,
    /// Total matches reported by the provider; may exceed `articles.len()`.
    pub total_results: u64,
    /// Articles discarded during normalization (missing title or url).
    pub dropped: usize,
    /// The query that produced this result.
    pub query: Query,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
