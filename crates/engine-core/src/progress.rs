use crate::error::SyncError;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Where a dataset sync currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncStage {
    Idle,
    CheckingFreshness,
    Skipped,
    Clearing,
    Fetching,
    Writing,
    Done,
    Failed,
}

impl SyncStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStage::Idle => "Idle",
            SyncStage::CheckingFreshness => "CheckingFreshness",
            SyncStage::Skipped => "Skipped",
            SyncStage::Clearing => "Clearing",
            SyncStage::Fetching => "Fetching",
            SyncStage::Writing => "Writing",
            SyncStage::Done => "Done",
            SyncStage::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStage::Skipped | SyncStage::Done | SyncStage::Failed)
    }

    /// `Idle -> Clearing` covers a replicator invoked directly, after the
    /// caller ran the freshness check itself. `Fetching -> Fetching` is the
    /// re-typed retry of an empty first page.
    fn can_advance_to(&self, next: SyncStage) -> bool {
        use SyncStage::*;
        matches!(
            (self, next),
            (Idle, CheckingFreshness)
                | (Idle, Clearing)
                | (CheckingFreshness, Skipped)
                | (CheckingFreshness, Clearing)
                | (Clearing, Fetching)
                | (Fetching, Writing)
                | (Fetching, Fetching)
                | (Fetching, Done)
                | (Writing, Fetching)
                | (Writing, Done)
        )
    }
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Walks one dataset through the sync stages, rejecting illegal moves.
#[derive(Debug, Clone)]
pub struct StageTracker {
    dataset: String,
    stage: SyncStage,
    history: Vec<SyncStage>,
}

impl StageTracker {
    pub fn new(dataset: &str) -> Self {
        StageTracker {
            dataset: dataset.to_string(),
            stage: SyncStage::Idle,
            history: vec![SyncStage::Idle],
        }
    }

    pub fn stage(&self) -> SyncStage {
        self.stage
    }

    /// Stages visited so far, consecutive repeats collapsed.
    pub fn history(&self) -> &[SyncStage] {
        &self.history
    }

    pub fn advance(&mut self, next: SyncStage) -> Result<(), SyncError> {
        if !self.stage.can_advance_to(next) {
            return Err(SyncError::IllegalTransition {
                dataset: self.dataset.clone(),
                from: self.stage,
                to: next,
            });
        }
        self.enter(next);
        Ok(())
    }

    /// Moves to `Failed` from any non-terminal stage.
    pub fn fail(&mut self) {
        if !self.stage.is_terminal() {
            self.enter(SyncStage::Failed);
        }
    }

    fn enter(&mut self, next: SyncStage) {
        if next != self.stage {
            debug!(dataset = %self.dataset, from = %self.stage, to = %next, "Stage transition");
            self.history.push(next);
        }
        self.stage = next;
    }
}
