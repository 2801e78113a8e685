use crate::query::ast::copy::{CopyFormat, CopyIn, CopyOption};
use crate::query::renderer::Render;

impl Render for CopyIn {
    fn render(&self, r: &mut super::Renderer) {
        r.sql.push_str("COPY ");
        r.render_table_ref(&self.table);

        if !self.columns.is_empty() {
            let cols: Vec<String> = self
                .columns
                .iter()
                .map(|col| r.dialect.quote_identifier(col))
                .collect();
            r.sql.push_str(&format!(" ({})", cols.join(", ")));
        }

        r.sql.push_str(" FROM STDIN");

        if !self.options.is_empty() {
            let options: Vec<String> = self.options.iter().map(render_option).collect();
            r.sql.push_str(&format!(" WITH ({})", options.join(", ")));
        }
    }
}

fn render_option(option: &CopyOption) -> String {
    match option {
        CopyOption::Format(CopyFormat::Csv) => "FORMAT csv".to_string(),
        CopyOption::Format(CopyFormat::Text) => "FORMAT text".to_string(),
        CopyOption::Null(marker) => format!("NULL '{}'", marker.replace('\'', "''")),
        CopyOption::Header(header) => format!("HEADER {header}"),
    }
}
