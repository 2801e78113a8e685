use clap::{Subcommand, ValueEnum};
use engine_runtime::{
    catalog::DatasetKind,
    execution::executor::{JobMode, SyncJob},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetArg {
    Continuity,
    Compensation,
    All,
}

impl DatasetArg {
    pub fn kinds(&self) -> Vec<DatasetKind> {
        match self {
            DatasetArg::Continuity => vec![DatasetKind::Continuity],
            DatasetArg::Compensation => vec![DatasetKind::Compensation],
            DatasetArg::All => DatasetKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Drop the table and reload everything
    Full,
    /// Replace only the rows of one operating year
    CurrentYear,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync datasets from the CKAN API into the staging schema
    Sync {
        #[arg(long, value_enum, default_value = "all", help = "Dataset to sync")]
        dataset: DatasetArg,

        #[arg(long, value_enum, default_value = "current-year", help = "Replication strategy")]
        mode: ModeArg,

        #[arg(
            long,
            help = "Operating year for --mode current-year; defaults to the current year"
        )]
        year: Option<i32>,

        #[arg(long, help = "If set, prints the sync reports as JSON")]
        json: bool,
    },
    /// Compare freshness markers without writing anything
    Check {
        #[arg(long, value_enum, default_value = "all", help = "Dataset to check")]
        dataset: DatasetArg,

        #[arg(long, help = "If set, prints the verdicts as JSON")]
        json: bool,
    },
    /// Ping Postgres and the CKAN API
    TestConn,
}

/// The jobs a `sync` invocation expands to, in catalog order.
pub fn jobs(dataset: DatasetArg, mode: ModeArg, year: Option<i32>) -> Vec<SyncJob> {
    let mode = match mode {
        ModeArg::Full => JobMode::Full,
        ModeArg::CurrentYear => JobMode::CurrentYear { year },
    };
    dataset
        .kinds()
        .into_iter()
        .map(|kind| SyncJob::new(kind, mode))
        .collect()
}
