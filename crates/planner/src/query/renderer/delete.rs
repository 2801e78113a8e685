use crate::query::{
    ast::delete::Delete,
    renderer::{Render, Renderer},
};

impl Render for Delete {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("DELETE FROM ");
        r.render_table_ref(&self.table);
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        query::{builder::delete::DeleteBuilder, dialect::Postgres, ident, renderer, value},
        table_ref,
    };
    use model::core::value::Value;

    #[test]
    fn test_render_delete_partition() {
        let ast = DeleteBuilder::new(table_ref!("stg", "stg_compensacoes"))
            .where_clause(ident("AnoIndice").cast("INTEGER").eq(value(Value::Int(2025))))
            .build();

        let (sql, params) = renderer::render(&ast, &Postgres);
        assert_eq!(
            sql,
            r#"DELETE FROM "stg"."stg_compensacoes" WHERE (CAST("AnoIndice" AS INTEGER) = $1)"#
        );
        assert_eq!(params, vec![Value::Int(2025)]);
    }
}
