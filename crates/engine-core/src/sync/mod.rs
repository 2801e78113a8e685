//! Incremental sync of one dataset: the freshness gate followed by a full
//! or partition-scoped replace.

use crate::{context::SyncContext, error::SyncError};
use model::dataset::descriptor::DatasetDescriptor;
use tracing::info;

pub mod freshness;
pub mod replicator;
pub mod report;

pub use freshness::{FreshnessCheck, check_freshness, needs_sync};
pub use replicator::{SyncRun, replicate_full, replicate_scoped};
pub use report::{SyncMode, SyncOutcome, SyncReport};

/// Gates `mode` on freshness and replicates when the sink is behind.
pub async fn sync(
    ctx: &SyncContext,
    dataset: &DatasetDescriptor,
    mode: SyncMode,
) -> Result<SyncReport, SyncError> {
    let mut run = SyncRun::new(ctx, dataset);
    let check = run.check_freshness().await?;

    let outcome = if check.needs_sync() {
        match mode {
            SyncMode::Full => run.replicate_full().await?,
            SyncMode::Scoped { year } => run.replicate_scoped(year).await?,
        };
        SyncOutcome::Replicated
    } else {
        SyncOutcome::Skipped
    };

    let report = run.into_report(mode, outcome).with_check(&check);
    info!(
        dataset = %report.dataset,
        outcome = ?report.outcome,
        rows = report.rows_written(),
        elapsed_ms = report.elapsed_ms,
        "Sync finished"
    );
    Ok(report)
}

pub async fn sync_full(
    ctx: &SyncContext,
    dataset: &DatasetDescriptor,
) -> Result<SyncReport, SyncError> {
    sync(ctx, dataset, SyncMode::Full).await
}

pub async fn sync_scoped(
    ctx: &SyncContext,
    dataset: &DatasetDescriptor,
    year: i32,
) -> Result<SyncReport, SyncError> {
    sync(ctx, dataset, SyncMode::Scoped { year }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        progress::SyncStage,
        testing::{FakeSource, MemorySink, context, continuity, rows},
    };
    use model::{core::value::Value, records::record::Record};

    #[tokio::test]
    async fn test_fresh_sink_skips_replication() {
        let sink = MemorySink::default().with_rows(
            "stg_continuidades",
            vec![Record::from([(
                "DatGeracaoConjuntoDados",
                Value::String("2024-06-01".into()),
            )])],
        );
        let source = FakeSource::new(rows(10)).with_marker("2024-05-31");
        let ctx = context(source.clone(), sink.clone());

        let report = sync_full(&ctx, &continuity()).await.unwrap();

        assert!(report.was_skipped());
        assert!(source.offsets().is_empty());
        assert!(sink.operations().is_empty());
        assert_eq!(
            report.stages,
            vec![SyncStage::Idle, SyncStage::CheckingFreshness, SyncStage::Skipped]
        );
    }

    #[tokio::test]
    async fn test_first_sync_replicates_and_reports() {
        let source = FakeSource::new(rows(120_000)).with_marker("2024-06-01");
        let ctx = context(source, MemorySink::default());

        let report = sync_full(&ctx, &continuity()).await.unwrap();

        assert_eq!(report.outcome, SyncOutcome::Replicated);
        assert_eq!(report.rows_written(), 120_000);
        assert_eq!(report.metrics.fetch_calls, 3);
        assert_eq!(report.sink_marker, None);
        assert!(report.source_marker.is_some());
        assert_eq!(report.stages.last(), Some(&SyncStage::Done));
    }

    #[tokio::test]
    async fn test_scoped_sync_deletes_then_loads() {
        let source = FakeSource::new(rows(4)).with_marker("2024-06-01");
        let sink = MemorySink::default();
        let ctx = context(source, sink.clone());

        let report = sync_scoped(&ctx, &continuity(), 2024).await.unwrap();

        assert_eq!(report.mode, SyncMode::Scoped { year: 2024 });
        assert_eq!(report.rows_written(), 4);
        assert_eq!(
            sink.operations(),
            vec![
                "delete stg_continuidades AnoIndice=2024".to_string(),
                "append stg_continuidades 4".to_string(),
            ]
        );
    }

    #[test]
    fn test_report_serializes_mode() {
        let json = serde_json::to_value(SyncMode::Scoped { year: 2025 }).unwrap();
        assert_eq!(json, serde_json::json!({"strategy": "scoped", "year": 2025}));
    }
}
