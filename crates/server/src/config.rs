use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_SYSTEM_USERNAME: &str = "system";
const DEFAULT_MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_address: SocketAddr,
    /// Username of the owner whose courses every user can see
    pub system_username: String,
    /// Upper bound on request bodies, which caps CSV uploads
    pub max_import_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let bind_address = var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned());
        let bind_address: SocketAddr = bind_address
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDRESS",
                value: bind_address.clone(),
            })?;

        let max_import_bytes = match var("MAX_IMPORT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .ok_or(ConfigError::Invalid {
                    name: "MAX_IMPORT_BYTES",
                    value: raw,
                })?,
            None => DEFAULT_MAX_IMPORT_BYTES,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            bind_address,
            system_username: var("SYSTEM_USERNAME")
                .map(|u| u.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_SYSTEM_USERNAME.to_owned()),
            max_import_bytes,
        })
    }
}
