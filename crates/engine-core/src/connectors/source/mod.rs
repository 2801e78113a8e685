use crate::error::SourceError;
use async_trait::async_trait;
use model::{dataset::filter::Filter, records::page::Page};

pub mod ckan;

/// One bounded read against a remote collection.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub resource_id: &'a str,
    pub filter: &'a Filter,
    pub limit: usize,
    pub offset: usize,
}

/// Read-only, paginated access to the upstream datasets.
#[async_trait]
pub trait Source: Send + Sync {
    /// Maximum of `field` over the rows of `resource_id` matching `filter`,
    /// as raw text. `None` when nothing matches.
    async fn max_text(
        &self,
        resource_id: &str,
        field: &str,
        filter: &Filter,
    ) -> Result<Option<String>, SourceError>;

    /// Fetches one page; an offset past the end yields an empty page.
    async fn fetch_page(&self, request: PageRequest<'_>) -> Result<Page, SourceError>;
}
