use crate::query::ast::{
    common::TableRef,
    create_table::{ColumnDef, CreateTable},
};
use model::core::data_type::DataType;

#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    ast: CreateTable,
}

impl CreateTableBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: CreateTable {
                table,
                ..Default::default()
            },
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.ast.if_not_exists = true;
        self
    }

    pub fn column(mut self, name: &str, data_type: DataType, is_nullable: bool) -> Self {
        self.ast.columns.push(ColumnDef {
            name: name.to_string(),
            data_type,
            is_nullable,
        });
        self
    }

    pub fn build(self) -> CreateTable {
        self.ast
    }
}
