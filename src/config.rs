use anyhow::Context;
use std::env::{self, VarError};

const DEFAULT_PORT: u16 = 5005;
const DEFAULT_ORIGINS: &str = "http://localhost:5173,*.netlify.app";

pub struct Config {
    pub port: u16,
    /// Connection string understood by `tokio_postgres::Config`.
    pub database_url: String,
    /// Comma-separated origins. A leading `*.` matches any subdomain.
    pub allowed_origins: String,
    pub body_limit: usize,
}

/// Reads an optional variable. Present but unparsable values are errors.
fn optional(key: &str) -> anyhow::Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("cannot read {key}")),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match optional("PORT")? {
            Some(port) => port.parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };
        let body_limit = match optional("BODY_LIMIT")? {
            Some(limit) => limit.parse().context("BODY_LIMIT must be a byte count")?,
            None => api::DEFAULT_BODY_LIMIT,
        };
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let allowed_origins = optional("ALLOWED_ORIGINS")?.unwrap_or_else(|| DEFAULT_ORIGINS.into());
        Ok(Self { port, database_url, allowed_origins, body_limit })
    }
}
