//! Environment-driven configuration.

use anyhow::Context;

/// Database connection settings, read from the environment.
///
/// `DATABASE_URL` takes precedence when set; otherwise the URL is assembled
/// from the individual `POSTGRES_*` variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let user =
                    std::env::var("POSTGRES_USER").context("POSTGRES_USER must be set")?;
                let password = std::env::var("POSTGRES_PASSWORD")
                    .context("POSTGRES_PASSWORD must be set")?;
                let db = std::env::var("POSTGRES_DB").context("POSTGRES_DB must be set")?;
                let pg_host =
                    std::env::var("POSTGRES_HOST").context("POSTGRES_HOST must be set")?;
                let pg_port = std::env::var("POSTGRES_PORT")
                    .unwrap_or_else(|_| "5432".to_string())
                    .parse::<u16>()
                    .context("POSTGRES_PORT must be a port number")?;

                format!("postgresql://{user}:{password}@{pg_host}:{pg_port}/{db}")
            }
        };

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a port number")?;

        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
