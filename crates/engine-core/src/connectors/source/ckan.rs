use crate::{
    connectors::source::{PageRequest, Source},
    error::SourceError,
};
use async_trait::async_trait;
use connectors::ckan::{
    client::{CkanClient, SearchRequest},
    response::SearchResult,
};
use model::{dataset::filter::Filter, records::page::Page};
use planner::{
    query::{
        ast::select::Select, builder::select::SelectBuilder, dialect, ident,
        predicate::filter_predicate, renderer::render_inline,
    },
    table_ref,
};

/// Column alias of the aggregate query.
const MAX_ALIAS: &str = "mx";

pub struct CkanSource {
    client: CkanClient,
    dialect: dialect::Postgres,
}

impl CkanSource {
    pub fn new(client: CkanClient) -> Self {
        Self {
            client,
            dialect: dialect::Postgres,
        }
    }

    fn max_query(resource_id: &str, field: &str, filter: &Filter) -> Select {
        SelectBuilder::new()
            .select(vec![ident(field).max().alias(MAX_ALIAS)])
            .from(table_ref!(resource_id), None)
            .where_clause(filter_predicate(filter))
            .build()
    }
}

/// An estimated total can fall short of the real row count, so it is
/// dropped and paging runs until a short page instead.
fn page_from(offset: usize, result: SearchResult) -> Result<Page, SourceError> {
    let total = match result.total {
        Some(total) if !result.total_was_estimated => Some(
            usize::try_from(total)
                .map_err(|e| SourceError::Response(format!("total out of range: {e}")))?,
        ),
        _ => None,
    };
    Ok(Page::new(offset, result.records).with_total(total))
}

#[async_trait]
impl Source for CkanSource {
    async fn max_text(
        &self,
        resource_id: &str,
        field: &str,
        filter: &Filter,
    ) -> Result<Option<String>, SourceError> {
        let query = Self::max_query(resource_id, field, filter);
        let sql = render_inline(&query, &self.dialect);
        let records = self.client.datastore_search_sql(&sql).await?;

        Ok(records
            .first()
            .and_then(|record| record.get_value(MAX_ALIAS).as_string())
            .filter(|text| !text.trim().is_empty()))
    }

    async fn fetch_page(&self, request: PageRequest<'_>) -> Result<Page, SourceError> {
        let search = SearchRequest {
            resource_id: request.resource_id,
            limit: request.limit,
            offset: request.offset,
            filter: request.filter,
        };
        let result = self.client.datastore_search(&search).await?;
        page_from(request.offset, result)
    }
}
