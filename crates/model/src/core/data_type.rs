use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// Column types the staging tables are created with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    Long,
    Double,
    Boolean,
    String,
    Json,
    Null,
}

impl DataType {
    pub fn postgres_name(&self) -> Cow<'_, str> {
        match self {
            DataType::Long => Cow::Borrowed("BIGINT"),
            DataType::Double => Cow::Borrowed("DOUBLE PRECISION"),
            DataType::Boolean => Cow::Borrowed("BOOLEAN"),
            DataType::String => Cow::Borrowed("TEXT"),
            DataType::Json => Cow::Borrowed("JSONB"),
            // A column with no observed value is stored as text.
            DataType::Null => Cow::Borrowed("TEXT"),
        }
    }

    /// Maps an `information_schema.columns.data_type` name back to a staging
    /// type. Types the sink never creates yield `None`.
    pub fn from_postgres_type(name: &str) -> Option<DataType> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bigint" | "integer" | "smallint" => Some(DataType::Long),
            "double precision" | "real" | "numeric" => Some(DataType::Double),
            "boolean" => Some(DataType::Boolean),
            "text" | "character varying" | "character" => Some(DataType::String),
            "jsonb" | "json" => Some(DataType::Json),
            _ => None,
        }
    }

    /// Smallest type able to hold values of both `self` and `other`.
    pub fn widen(&self, other: &DataType) -> DataType {
        use DataType::*;
        match (self, other) {
            (a, b) if a == b => a.clone(),
            (Null, b) => b.clone(),
            (a, Null) => a.clone(),
            (Long, Double) | (Double, Long) => Double,
            _ => String,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.postgres_name())
    }
}
