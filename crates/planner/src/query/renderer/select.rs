use crate::query::{
    ast::select::{FromClause, Select},
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier(alias));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        query::{
            builder::select::SelectBuilder, dialect::Postgres, ident, predicate::filter_predicate,
            renderer,
        },
        table_ref,
    };
    use model::dataset::filter::{Filter, FilterValue};

    #[test]
    fn test_render_aggregate_over_resource() {
        let filter = Filter::new().with("SigIndicador", FilterValue::list(["DEC", "FEC"]));
        let ast = SelectBuilder::new()
            .select(vec![ident("DatGeracaoConjuntoDados").max().alias("mx")])
            .from(table_ref!("4493985c-baea-429c-9df5-3030422c71d7"), None)
            .where_clause(filter_predicate(&filter))
            .build();

        let sql = renderer::render_inline(&ast, &Postgres);
        assert_eq!(
            sql,
            concat!(
                r#"SELECT MAX("DatGeracaoConjuntoDados") AS "mx" "#,
                r#"FROM "4493985c-baea-429c-9df5-3030422c71d7" "#,
                r#"WHERE "SigIndicador" IN ('DEC', 'FEC')"#
            )
        );
    }

    #[test]
    fn test_render_sink_max_as_text() {
        let ast = SelectBuilder::new()
            .select(vec![ident("DatGeracaoConjuntoDados").max().pg_cast("text")])
            .from(table_ref!("stg", "stg_continuidades"), None)
            .where_clause(None)
            .build();

        let (sql, params) = renderer::render(&ast, &Postgres);
        assert!(params.is_empty());
        assert_eq!(
            sql,
            r#"SELECT MAX("DatGeracaoConjuntoDados")::text FROM "stg"."stg_continuidades""#
        );
    }
}
