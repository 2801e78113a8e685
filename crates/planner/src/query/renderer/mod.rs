//! Defines the core rendering trait and context for converting AST to SQL.

use crate::query::{ast::common::TableRef, dialect::Dialect};
use model::core::value::Value;

pub mod alter_table;
pub mod copy;
pub mod create_schema;
pub mod create_table;
pub mod delete;
pub mod drop_table;
pub mod expr;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// How literal values reach the final statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// Values become placeholders and are collected in `params`.
    Bind,
    /// Values are written as escaped SQL literals; used for endpoints that
    /// accept a bare SQL string without bind parameters.
    Inline,
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
    pub style: ParamStyle,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
            style: ParamStyle::Bind,
        }
    }

    pub fn inline(dialect: &'a dyn Dialect) -> Self {
        Self {
            style: ParamStyle::Inline,
            ..Self::new(dialect)
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Value) {
        match self.style {
            ParamStyle::Bind => {
                self.params.push(value);
                let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
                self.sql.push_str(&placeholder);
            }
            ParamStyle::Inline => self.sql.push_str(&value.to_string()),
        }
    }

    pub fn render_table_ref(&mut self, table: &TableRef) {
        if let Some(schema) = &table.schema {
            self.sql.push_str(&self.dialect.quote_identifier(schema));
            self.sql.push('.');
        }
        self.sql.push_str(&self.dialect.quote_identifier(&table.name));
    }
}

/// Renders any AST node with bound parameters.
pub fn render<T: Render>(ast: &T, dialect: &dyn Dialect) -> (String, Vec<Value>) {
    let mut renderer = Renderer::new(dialect);
    ast.render(&mut renderer);
    renderer.finish()
}

/// Renders any AST node with every value inlined as a literal.
pub fn render_inline<T: Render>(ast: &T, dialect: &dyn Dialect) -> String {
    let mut renderer = Renderer::inline(dialect);
    ast.render(&mut renderer);
    renderer.finish().0
}
