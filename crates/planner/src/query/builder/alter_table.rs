use crate::query::ast::{
    alter_table::{AlterTable, AlterTableOperation},
    common::TableRef,
    create_table::ColumnDef,
};
use model::core::data_type::DataType;

#[derive(Debug, Clone)]
pub struct AlterTableBuilder {
    ast: AlterTable,
}

impl AlterTableBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: AlterTable {
                table,
                ..Default::default()
            },
        }
    }

    /// Adds a nullable column, so existing rows read as NULL.
    pub fn add_column(mut self, name: &str, data_type: DataType) -> Self {
        self.ast
            .operations
            .push(AlterTableOperation::AddColumn(ColumnDef {
                name: name.to_string(),
                data_type,
                is_nullable: true,
            }));
        self
    }

    pub fn alter_column_type(mut self, name: &str, data_type: DataType) -> Self {
        self.ast
            .operations
            .push(AlterTableOperation::AlterColumnType {
                name: name.to_string(),
                data_type,
            });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ast.operations.is_empty()
    }

    pub fn build(self) -> AlterTable {
        self.ast
    }
}
