use crate::error::CliError;
use async_trait::async_trait;
use connectors::{
    ckan::client::CkanClient,
    sql::{
        base::adapter::SqlAdapter,
        postgres::{adapter::PgAdapter, utils::describe_target},
    },
};
use tracing::{error, info};

/// Trait for "pinging" one end of the sync
#[async_trait]
pub trait ConnectionPinger {
    fn name(&self) -> &'static str;

    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

/// Postgres pinger
pub struct PostgresConnectionPinger {
    pub conn_str: String,
}

/// CKAN datastore API pinger
pub struct CkanConnectionPinger {
    pub client: CkanClient,
}

impl PostgresConnectionPinger {
    // Never log the raw connection string; it may carry a password.
    fn target(&self) -> String {
        self.conn_str
            .parse::<tokio_postgres::Config>()
            .map(|config| describe_target(&config))
            .unwrap_or_else(|_| "<unparseable connection string>".to_string())
    }
}

#[async_trait]
impl ConnectionPinger for PostgresConnectionPinger {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), CliError> {
        let target = self.target();
        info!("Pinging Postgres at '{}'", target);

        let adapter = PgAdapter::connect(&self.conn_str).await.map_err(|e| {
            error!("Postgres connection to '{}' failed: {}", target, e);
            CliError::Connector(e)
        })?;

        let version = adapter.ping().await.map_err(|e| {
            error!("Postgres ping query on '{}' failed: {}", target, e);
            CliError::Postgres(e)
        })?;

        info!("Postgres ping to '{}' succeeded: {}", target, version);
        Ok(())
    }
}

#[async_trait]
impl ConnectionPinger for CkanConnectionPinger {
    fn name(&self) -> &'static str {
        "ckan"
    }

    async fn ping(&self) -> Result<(), CliError> {
        let base_url = self.client.base_url();
        info!("Pinging CKAN at '{}'", base_url);

        self.client.ping().await.map_err(|e| {
            error!("CKAN ping to '{}' failed: {}", base_url, e);
            CliError::Ckan(e)
        })?;

        info!("CKAN ping to '{}' succeeded", base_url);
        Ok(())
    }
}

/// Pings every end, reporting each one; fails if any of them is down.
pub async fn ping_all(pingers: &[&dyn ConnectionPinger]) -> Result<(), CliError> {
    let mut first_err = None;
    for pinger in pingers {
        match pinger.ping().await {
            Ok(()) => println!("{:<10} ok", pinger.name()),
            Err(err) => {
                println!("{:<10} FAILED: {}", pinger.name(), err);
                first_err.get_or_insert(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
