use crate::{env::EnvManager, error::CliError};
use engine_runtime::execution::settings::RuntimeSettings;
use std::time::Duration;

pub const ENV_DB_URL: &str = "DB_URL";
pub const ENV_CKAN_BASE_URL: &str = "CKAN_BASE_URL";
pub const ENV_SCHEMA: &str = "STG_SCHEMA";
pub const ENV_PAGE_SIZE: &str = "SYNC_PAGE_SIZE";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";

/// Values given on the command line; each one beats its env variable.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_url: Option<String>,
    pub ckan_base_url: Option<String>,
    pub schema: Option<String>,
    pub page_size: Option<usize>,
}

pub fn resolve_settings(
    env: &EnvManager,
    overrides: &Overrides,
) -> Result<RuntimeSettings, CliError> {
    let db_url = match &overrides.db_url {
        Some(url) => url.clone(),
        None => env.require(ENV_DB_URL)?.to_string(),
    };
    let mut settings = RuntimeSettings::new(db_url);

    if let Some(url) = overrides
        .ckan_base_url
        .clone()
        .or_else(|| env.get(ENV_CKAN_BASE_URL).map(str::to_string))
    {
        settings.ckan_base_url = url;
    }

    if let Some(schema) = overrides
        .schema
        .clone()
        .or_else(|| env.get(ENV_SCHEMA).map(str::to_string))
    {
        settings.schema = schema;
    }

    let page_size = match overrides.page_size {
        Some(size) => Some(size),
        None => env.parse::<usize>(ENV_PAGE_SIZE)?,
    };
    if let Some(size) = page_size {
        if size == 0 {
            return Err(CliError::Config("page size must be positive".into()));
        }
        settings.page_size = size;
    }

    if let Some(secs) = env.parse::<u64>(ENV_HTTP_TIMEOUT)? {
        settings.http_timeout = Duration::from_secs(secs);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::dataset::descriptor::DEFAULT_PAGE_SIZE;

    #[test]
    fn test_defaults_from_env() {
        let env = EnvManager::from_vars([(ENV_DB_URL, "postgres://etl@localhost/dw")]);
        let settings = resolve_settings(&env, &Overrides::default()).unwrap();

        assert_eq!(settings.db_url, "postgres://etl@localhost/dw");
        assert_eq!(settings.schema, "stg");
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.http_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_db_url() {
        let env = EnvManager::from_vars([(ENV_SCHEMA, "stg")]);
        let err = resolve_settings(&env, &Overrides::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("DB_URL")));
    }

    #[test]
    fn test_flags_beat_env() {
        let env = EnvManager::from_vars([
            (ENV_DB_URL, "postgres://env/dw"),
            (ENV_SCHEMA, "staging"),
            (ENV_PAGE_SIZE, "1000"),
            (ENV_HTTP_TIMEOUT, "5"),
        ]);
        let overrides = Overrides {
            db_url: Some("postgres://flag/dw".into()),
            page_size: Some(250),
            ..Default::default()
        };
        let settings = resolve_settings(&env, &overrides).unwrap();

        assert_eq!(settings.db_url, "postgres://flag/dw");
        assert_eq!(settings.schema, "staging");
        assert_eq!(settings.page_size, 250);
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let env = EnvManager::from_vars([(ENV_DB_URL, "postgres://env/dw"), (ENV_PAGE_SIZE, "0")]);
        assert!(resolve_settings(&env, &Overrides::default()).is_err());
    }
}
