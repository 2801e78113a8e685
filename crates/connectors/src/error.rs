use thiserror::Error;

/// Errors raised while talking to the CKAN action API.
#[derive(Debug, Error)]
pub enum CkanError {
    /// Transport failure, including the request timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("{action} returned HTTP {status}: {body}")]
    Status {
        action: String,
        status: u16,
        body: String,
    },

    /// The API answered 2xx but flagged the call as unsuccessful.
    #[error("{action} failed: {message}")]
    Api { action: String, message: String },

    #[error("{0} response carried no result")]
    MissingResult(String),

    /// A filter could not be encoded as the `filters` query parameter.
    #[error("Filter encoding error: {0}")]
    Filter(#[from] serde_json::Error),
}

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any Postgres driver error. Server errors carry their message,
    /// detail and context; the driver's own Display only says "db error".
    #[error("SQL error: {}", describe_pg_error(.0))]
    Sql(#[from] tokio_postgres::Error),

    /// Writing rows to the database failed at the application level.
    #[error("Write error: {0}")]
    Write(String),
}

fn describe_pg_error(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => server_message(db.code().code(), db.message(), db.detail(), db.where_()),
        None => err.to_string(),
    }
}

fn server_message(code: &str, message: &str, detail: Option<&str>, context: Option<&str>) -> String {
    let mut text = format!("{message} (SQLSTATE {code})");
    if let Some(detail) = detail {
        text.push_str(&format!("; detail: {detail}"));
    }
    if let Some(context) = context {
        text.push_str(&format!("; context: {context}"));
    }
    text
}

/// Errors happening during adapter or client setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Postgres connection failed: {}", describe_pg_error(.0))]
    Postgres(#[from] tokio_postgres::Error),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::server_message;

    #[test]
    fn test_server_message_keeps_detail_and_context() {
        assert_eq!(
            server_message(
                "22P02",
                r#"invalid input syntax for type bigint: "2.5""#,
                None,
                Some(r#"COPY stg_continuidades, line 1, column VlrIndiceEnviado: "2.5""#),
            ),
            concat!(
                r#"invalid input syntax for type bigint: "2.5" (SQLSTATE 22P02); "#,
                r#"context: COPY stg_continuidades, line 1, column VlrIndiceEnviado: "2.5""#
            )
        );
        assert_eq!(
            server_message("42P01", "relation \"stg.x\" does not exist", Some("d"), None),
            "relation \"stg.x\" does not exist (SQLSTATE 42P01); detail: d"
        );
    }
}
