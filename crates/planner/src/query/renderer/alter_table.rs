use crate::query::{
    ast::alter_table::{AlterTable, AlterTableOperation},
    renderer::{Render, Renderer},
};

impl Render for AlterTable {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("ALTER TABLE ");
        r.render_table_ref(&self.table);
        for (i, op) in self.operations.iter().enumerate() {
            r.sql.push_str(if i > 0 { ", " } else { " " });
            op.render(r);
        }
        r.sql.push(';');
    }
}

impl Render for AlterTableOperation {
    fn render(&self, r: &mut Renderer) {
        match self {
            AlterTableOperation::AddColumn(col) => {
                r.sql.push_str("ADD COLUMN IF NOT EXISTS ");
                col.render(r);
            }
            AlterTableOperation::AlterColumnType { name, data_type } => {
                let column = r.dialect.quote_identifier(name);
                let target = r.dialect.render_data_type(data_type);
                r.sql.push_str(&format!(
                    "ALTER COLUMN {column} TYPE {target} USING {column}::{target}"
                ));
            }
        }
    }
}
