use crate::error::PagingError;
use crate::models::{Article, QueryResult};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// In-memory page cursor over one query's results. No network access;
/// everything here is derived from the held `QueryResult`.
pub struct Pager {
    result: QueryResult,
    page_size: usize,
    cursor: usize,
}

/// The slice of articles visible on the current page, plus metadata for
/// the presentation layer. Positions (`start`/`end`) are 1-based for
/// display.
#[derive(Debug)]
pub struct PageView<'a> {
    pub articles: &'a [Article],
    pub index: usize,
    pub page_count: usize,
    pub total: usize,
    pub total_available: u64,
    pub start: usize,
    pub end: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pager {
    pub fn new(result: QueryResult, page_size: usize) -> Self {
        Self {
            result,
            page_size: page_size.max(1),
            cursor: 0,
        }
    }

    /// Swap in a fresh result set; the cursor returns to the first page.
    pub fn replace(&mut self, result: QueryResult) {
        self.result = result;
        self.cursor = 0;
    }

    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    pub fn page_count(&self) -> usize {
        self.result.articles.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> PageView<'_> {
        let total = self.result.articles.len();
        let page_count = self.page_count();
        let start_idx = (self.cursor * self.page_size).min(total);
        let end_idx = (start_idx + self.page_size).min(total);
        let articles = &self.result.articles[start_idx..end_idx];

        PageView {
            articles,
            index: self.cursor,
            page_count,
            total,
            total_available: self.result.total_results,
            start: if articles.is_empty() { 0 } else { start_idx + 1 },
            end: end_idx,
            has_next: self.cursor + 1 < page_count,
            has_prev: self.cursor > 0,
        }
    }

    /// Advance one page. Returns whether the cursor moved; past the last
    /// page this is a clamped no-op.
    pub fn next_page(&mut self) -> bool {
        if self.cursor + 1 < self.page_count() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Step back one page; clamped at the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), PagingError> {
        let page_count = self.page_count();
        if index >= page_count {
            return Err(PagingError::OutOfRange {
                index,
                max: page_count.saturating_sub(1),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// Article at a 0-based position on the current page.
    pub fn article_at(&self, position: usize) -> Result<&Article, PagingError> {
        let view = self.current_page();
        let max = view.articles.len().saturating_sub(1);
        view.articles
            .get(position)
            .ok_or(PagingError::OutOfRange {
                index: position,
                max,
            })
    }
}
