//! Translates a dataset [`Filter`] into a SQL `WHERE` expression.

use crate::query::{ast::expr::Expr, ident, value};
use model::{
    core::value::Value,
    dataset::filter::{Filter, FilterValue},
};

/// Builds the conjunction of every filter condition.
///
/// Text and numbers become equality tests, lists become `IN (...)`.
/// An empty filter yields `None`.
pub fn filter_predicate(filter: &Filter) -> Option<Expr> {
    filter
        .iter()
        .map(|(field, condition)| condition_expr(field, condition))
        .reduce(Expr::and)
}

fn condition_expr(field: &str, condition: &FilterValue) -> Expr {
    match condition {
        FilterValue::Text(text) => ident(field).eq(value(Value::String(text.clone()))),
        FilterValue::Number(number) => ident(field).eq(value(Value::Int(*number))),
        FilterValue::TextList(items) => ident(field).in_list(
            items
                .iter()
                .map(|item| value(Value::String(item.clone())))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::filter_predicate;
    use crate::query::{
        dialect::Postgres,
        renderer::{Render, Renderer},
    };
    use model::dataset::filter::{Filter, FilterValue};

    fn render_inline(filter: &Filter) -> Option<String> {
        let expr = filter_predicate(filter)?;
        let mut renderer = Renderer::inline(&Postgres);
        expr.render(&mut renderer);
        Some(renderer.finish().0)
    }

    #[test]
    fn test_empty_filter_has_no_predicate() {
        assert!(filter_predicate(&Filter::new()).is_none());
    }

    #[test]
    fn test_list_condition_renders_in() {
        let filter = Filter::new().with("SigIndicador", FilterValue::list(["DEC", "FEC"]));
        assert_eq!(
            render_inline(&filter).as_deref(),
            Some(r#""SigIndicador" IN ('DEC', 'FEC')"#)
        );
    }

    #[test]
    fn test_conditions_are_and_ed_in_field_order() {
        let filter = Filter::new()
            .with("SigIndicador", FilterValue::list(["PGUCAT"]))
            .with("AnoIndice", 2025i64);
        assert_eq!(
            render_inline(&filter).as_deref(),
            Some(r#"("AnoIndice" = 2025 AND "SigIndicador" IN ('PGUCAT'))"#)
        );
    }

    #[test]
    fn test_text_literal_is_escaped() {
        let filter = Filter::new().with("SigAgente", "D'ANGELO");
        assert_eq!(
            render_inline(&filter).as_deref(),
            Some(r#"("SigAgente" = 'D''ANGELO')"#)
        );
    }
}
