use crate::{
    ckan::response::{ActionResponse, SearchResult},
    error::{CkanError, ConnectorError},
};
use model::{dataset::filter::Filter, records::record::Record};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://dadosabertos.aneel.gov.br/api/3/action";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const ACTION_SEARCH: &str = "datastore_search";
const ACTION_SEARCH_SQL: &str = "datastore_search_sql";
const ACTION_STATUS: &str = "status_show";

/// Longest response body kept in a [`CkanError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// One page request against `datastore_search`.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub resource_id: &'a str,
    pub limit: usize,
    pub offset: usize,
    pub filter: &'a Filter,
}

impl SearchRequest<'_> {
    fn query_params(&self) -> Result<Vec<(&'static str, String)>, CkanError> {
        let mut params = vec![
            ("resource_id", self.resource_id.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if !self.filter.is_empty() {
            params.push(("filters", self.filter.to_json()?));
        }
        Ok(params)
    }
}

#[derive(Debug, Clone)]
pub struct CkanClient {
    client: Client,
    base_url: String,
}

impl CkanClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConnectorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/{}", self.base_url, action)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<T, CkanError> {
        let url = self.action_url(action);
        debug!(%url, ?params, "CKAN request");

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(CkanError::Status {
                action: action.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ActionResponse<T> = response.json().await?;
        if !envelope.success {
            return Err(CkanError::Api {
                action: action.to_string(),
                message: envelope.error_message(),
            });
        }
        envelope
            .result
            .ok_or_else(|| CkanError::MissingResult(action.to_string()))
    }

    /// Runs a read-only SQL statement over datastore resources.
    pub async fn datastore_search_sql(&self, sql: &str) -> Result<Vec<Record>, CkanError> {
        let result: SearchResult = self
            .call(ACTION_SEARCH_SQL, &[("sql", sql.to_string())])
            .await?;
        Ok(result.records)
    }

    /// Fetches one page of records; an offset past the end yields an empty page.
    pub async fn datastore_search(
        &self,
        request: &SearchRequest<'_>,
    ) -> Result<SearchResult, CkanError> {
        let params = request.query_params()?;
        let result: SearchResult = self.call(ACTION_SEARCH, &params).await?;
        debug!(
            resource = request.resource_id,
            offset = request.offset,
            received = result.records.len(),
            total = ?result.total,
            estimated = result.total_was_estimated,
            "Fetched datastore page"
        );
        Ok(result)
    }

    /// Checks the API is reachable and answering.
    pub async fn ping(&self) -> Result<(), CkanError> {
        let _: serde_json::Value = self.call(ACTION_STATUS, &[]).await?;
        Ok(())
    }
}
