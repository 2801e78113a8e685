use crate::{error::RunError, execution::settings::RuntimeSettings};
use connectors::{
    ckan::client::CkanClient,
    sql::{base::adapter::SqlAdapter, postgres::adapter::PgAdapter},
};
use engine_core::{
    connectors::{sink::postgres::PostgresSink, source::ckan::CkanSource},
    context::SyncContext,
};
use std::sync::Arc;
use tracing::info;

pub fn create_source(settings: &RuntimeSettings) -> Result<CkanSource, RunError> {
    let client = CkanClient::new(&settings.ckan_base_url, settings.http_timeout)?;
    Ok(CkanSource::new(client))
}

pub async fn create_sink(settings: &RuntimeSettings) -> Result<PostgresSink, RunError> {
    if settings.schema.trim().is_empty() {
        return Err(RunError::Settings("staging schema must not be empty".into()));
    }
    let adapter = PgAdapter::connect(&settings.db_url).await?;
    Ok(PostgresSink::new(Arc::new(adapter), &settings.schema))
}

/// Builds the context every dataset sync of this process shares.
pub async fn create_context(settings: &RuntimeSettings) -> Result<SyncContext, RunError> {
    let source = create_source(settings)?;
    let sink = create_sink(settings).await?;
    info!(
        ckan = %settings.ckan_base_url,
        schema = %settings.schema,
        "Sync context ready"
    );
    Ok(SyncContext::new(Arc::new(source), Arc::new(sink)))
}
