use crate::query::ast::{
    common::TableRef,
    copy::{CopyFormat, CopyIn, CopyOption},
};

#[derive(Debug, Clone)]
pub struct CopyBuilder {
    ast: CopyIn,
}

impl CopyBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: CopyIn {
                table,
                columns: Vec::new(),
                options: Vec::new(),
            },
        }
    }

    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.ast.columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn format(self, format: CopyFormat) -> Self {
        self.option(CopyOption::Format(format))
    }

    pub fn null_marker(self, marker: &str) -> Self {
        self.option(CopyOption::Null(marker.to_string()))
    }

    pub fn header(self, header: bool) -> Self {
        self.option(CopyOption::Header(header))
    }

    // Later options of the same kind replace earlier ones.
    fn option(mut self, option: CopyOption) -> Self {
        self.ast
            .options
            .retain(|o| std::mem::discriminant(o) != std::mem::discriminant(&option));
        self.ast.options.push(option);
        self
    }

    pub fn build(self) -> CopyIn {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        query::{
            ast::copy::{CopyFormat, CopyOption},
            builder::copy::CopyBuilder,
        },
        table_ref,
    };

    #[test]
    fn test_copy_builder_with_options() {
        let copy = CopyBuilder::new(table_ref!("stg", "stg_compensacoes"))
            .columns(&["_id", "SigAgente"])
            .format(CopyFormat::Text)
            .null_marker("\\N")
            .format(CopyFormat::Csv)
            .build();

        assert_eq!(copy.columns, vec!["_id", "SigAgente"]);
        assert_eq!(
            copy.options,
            vec![
                CopyOption::Null("\\N".into()),
                CopyOption::Format(CopyFormat::Csv)
            ]
        );
    }
}
