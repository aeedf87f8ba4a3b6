use crate::types::{Page, Result};
use async_trait::async_trait;

/// Selects which documents to fetch from the content source.
#[derive(Debug, Clone)]
pub struct Query {
    /// Document type predicate, e.g. "post".
    pub document_type: String,
    /// Field names to retrieve. Empty means all fields.
    pub fields: Vec<String>,
}

impl Query {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}

/// Trait for paginated content backends (headless CMS APIs, fixtures, etc.)
///
/// Fetches are idempotent reads: the same `(query, cursor, page_size)` over
/// unchanged backing data yields an equal page, and item order is stable.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable name for this source, used in logs.
    fn source_name(&self) -> String;

    /// Fetch one page of raw documents. `cursor == None` requests the first
    /// page; the cursor for later pages is the opaque token from the
    /// previous page's `next_cursor`.
    async fn fetch_page(&self, query: &Query, cursor: Option<&str>, page_size: u32) -> Result<Page>;

    /// Check that the source is reachable.
    async fn health_check(&self) -> Result<bool>;
}
