//! Defines the AST for ALTER TABLE statements.

use crate::query::ast::{common::TableRef, create_table::ColumnDef};
use model::core::data_type::DataType;

/// One ALTER TABLE statement carrying any number of actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTable {
    pub table: TableRef,
    pub operations: Vec<AlterTableOperation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableOperation {
    AddColumn(ColumnDef),
    /// Retypes a column, converting stored values with a cast.
    AlterColumnType { name: String, data_type: DataType },
}
