use crate::query::{
    ast::create_schema::CreateSchema,
    renderer::{Render, Renderer},
};

impl Render for CreateSchema {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("CREATE SCHEMA ");
        if self.if_not_exists {
            r.sql.push_str("IF NOT EXISTS ");
        }
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
        r.sql.push(';');
    }
}
