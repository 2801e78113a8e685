pub mod alter_table;
pub mod common;
pub mod copy;
pub mod create_schema;
pub mod create_table;
pub mod delete;
pub mod drop_table;
pub mod expr;
pub mod select;
