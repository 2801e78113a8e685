use crate::{context::SyncContext, error::SyncError};
use model::dataset::{descriptor::DatasetDescriptor, freshness::FreshnessMarker};
use serde::Serialize;
use tracing::debug;

/// Both freshness markers of a dataset, as read at check time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreshnessCheck {
    pub sink: Option<FreshnessMarker>,
    pub source: Option<FreshnessMarker>,
}

impl FreshnessCheck {
    pub fn needs_sync(&self) -> bool {
        is_stale(self.sink.as_ref(), self.source.as_ref())
    }
}

/// A sink is up to date only when both markers are known and the source
/// has not moved past the sink.
pub fn is_stale(sink: Option<&FreshnessMarker>, source: Option<&FreshnessMarker>) -> bool {
    match (sink, source) {
        (Some(sink), Some(source)) => source > sink,
        _ => true,
    }
}

/// Reads both markers. Sink failures read as an absent marker; source
/// failures propagate.
pub async fn check_freshness(
    ctx: &SyncContext,
    dataset: &DatasetDescriptor,
) -> Result<FreshnessCheck, SyncError> {
    let sink_raw = ctx
        .sink
        .max_text(&dataset.table, &dataset.freshness_field)
        .await;
    let source_raw = ctx
        .source
        .max_text(
            &dataset.resource_id,
            &dataset.freshness_field,
            &dataset.filter,
        )
        .await?;

    debug!(
        dataset = %dataset.name,
        sink = ?sink_raw,
        source = ?source_raw,
        "Read freshness markers"
    );

    Ok(FreshnessCheck {
        sink: sink_raw.as_deref().and_then(FreshnessMarker::parse),
        source: source_raw.as_deref().and_then(FreshnessMarker::parse),
    })
}

pub async fn needs_sync(
    ctx: &SyncContext,
    dataset: &DatasetDescriptor,
) -> Result<bool, SyncError> {
    Ok(check_freshness(ctx, dataset).await?.needs_sync())
}
