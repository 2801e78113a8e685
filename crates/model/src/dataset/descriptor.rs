use crate::dataset::filter::{Filter, FilterValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 50_000;
pub const DEFAULT_FRESHNESS_FIELD: &str = "DatGeracaoConjuntoDados";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Dataset '{0}': page size must be positive")]
    ZeroPageSize(String),

    #[error("Dataset '{0}' has no partition field; scoped replication is not available")]
    NotPartitioned(String),

    #[error("Dataset '{0}': {1} must not be empty")]
    Empty(String, &'static str),
}

/// One partition of a dataset, e.g. a single operating year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionKey {
    pub field: String,
    pub value: i32,
}

impl PartitionKey {
    pub fn new(field: impl Into<String>, value: i32) -> Self {
        PartitionKey {
            field: field.into(),
            value,
        }
    }
}

/// Everything needed to replicate one upstream resource into one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    /// Opaque handle of the remote collection.
    pub resource_id: String,
    /// Target table in the staging schema.
    pub table: String,
    pub filter: Filter,
    pub partition_field: Option<String>,
    pub page_size: usize,
    pub freshness_field: String,
    /// Free-text field normalized (text + trim) before writing.
    pub trim_field: Option<String>,
}

impl DatasetDescriptor {
    pub fn new(
        name: impl Into<String>,
        resource_id: impl Into<String>,
        table: impl Into<String>,
        filter: Filter,
    ) -> Self {
        DatasetDescriptor {
            name: name.into(),
            resource_id: resource_id.into(),
            table: table.into(),
            filter,
            partition_field: None,
            page_size: DEFAULT_PAGE_SIZE,
            freshness_field: DEFAULT_FRESHNESS_FIELD.to_string(),
            trim_field: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_partition_field(mut self, field: impl Into<String>) -> Self {
        self.partition_field = Some(field.into());
        self
    }

    pub fn with_trim_field(mut self, field: impl Into<String>) -> Self {
        self.trim_field = Some(field.into());
        self
    }

    pub fn with_freshness_field(mut self, field: impl Into<String>) -> Self {
        self.freshness_field = field.into();
        self
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.page_size == 0 {
            return Err(DescriptorError::ZeroPageSize(self.name.clone()));
        }
        if self.resource_id.trim().is_empty() {
            return Err(DescriptorError::Empty(self.name.clone(), "resource id"));
        }
        if self.table.trim().is_empty() {
            return Err(DescriptorError::Empty(self.name.clone(), "table"));
        }
        Ok(())
    }

    pub fn partition(&self, value: i32) -> Result<PartitionKey, DescriptorError> {
        self.partition_field
            .as_ref()
            .map(|field| PartitionKey::new(field.clone(), value))
            .ok_or_else(|| DescriptorError::NotPartitioned(self.name.clone()))
    }

    /// The logical filter extended with the partition restriction, typed
    /// as text first.
    pub fn partitioned_filter(&self, key: &PartitionKey) -> Filter {
        self.filter
            .clone()
            .with(key.field.clone(), FilterValue::Text(key.value.to_string()))
    }
}
