//! Defines the AST for SQL expressions.

use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table identifier, e.g., `users` or `users.id`.
    Identifier(Ident),

    /// A literal value; bound as a parameter or inlined, depending on the renderer.
    Value(Value),

    /// A binary operation, e.g., `column = 'value'`.
    BinaryOp(Box<BinaryOp>),

    /// Membership test, e.g., `"SigIndicador" IN ('DEC', 'FEC')`.
    InList { expr: Box<Expr>, list: Vec<Expr> },

    /// A function call, e.g., `MAX(price)`.
    FunctionCall(FunctionCall),

    /// An aliased expression, e.g. `MAX(x) AS mx`
    Alias { expr: Box<Expr>, alias: String },

    /// `CAST(expr AS type)`
    Cast { expr: Box<Expr>, data_type: String },

    /// Postgres shorthand cast, `expr::type`
    PgCast { expr: Box<Expr>, data_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl Expr {
    pub fn eq(self, right: Expr) -> Expr {
        Expr::binary(self, BinaryOperator::Eq, right)
    }

    pub fn and(self, right: Expr) -> Expr {
        Expr::binary(self, BinaryOperator::And, right)
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn in_list(self, list: Vec<Expr>) -> Expr {
        Expr::InList {
            expr: Box::new(self),
            list,
        }
    }

    pub fn max(self) -> Expr {
        Expr::FunctionCall(FunctionCall {
            name: "MAX".to_string(),
            args: vec![self],
        })
    }

    pub fn alias(self, alias: &str) -> Expr {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.to_string(),
        }
    }

    pub fn cast(self, data_type: &str) -> Expr {
        Expr::Cast {
            expr: Box::new(self),
            data_type: data_type.to_string(),
        }
    }

    pub fn pg_cast(self, data_type: &str) -> Expr {
        Expr::PgCast {
            expr: Box::new(self),
            data_type: data_type.to_string(),
        }
    }
}
