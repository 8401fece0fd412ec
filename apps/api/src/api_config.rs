use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cloud_auditor_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// Where verdicts are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_key: String,
    pub api_host: String,
    pub api_port: u16,
    pub result_store: ResultStoreConfig,
    pub cloud_region: String,
    pub inventory_path: PathBuf,
    pub scan_concurrency: usize,
    pub scan_queue_capacity: usize,
    pub provider_call_timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn load() -> AppResult<Self> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(|name| env::var(name).ok(), migrate_only)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, migrate_only: bool) -> AppResult<Self> {
        // `migrate` exits before listening and never checks the key.
        let api_key = if migrate_only {
            lookup("API_KEY").unwrap_or_default()
        } else {
            required_non_empty(&lookup, "API_KEY")?
        };

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or(&lookup, "API_PORT", 8000_u16)?;

        let result_store = match lookup("RESULT_STORE")
            .unwrap_or_else(|| "postgres".to_owned())
            .as_str()
        {
            "postgres" => ResultStoreConfig::Postgres {
                database_url: required_non_empty(&lookup, "DATABASE_URL")?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10_u32)?,
            },
            "memory" => ResultStoreConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "RESULT_STORE must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && result_store == ResultStoreConfig::Memory {
            return Err(AppError::Validation(
                "migrate requires RESULT_STORE=postgres".to_owned(),
            ));
        }

        let cloud_region = lookup("CLOUD_REGION")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "us-east-1".to_owned());
        let inventory_path = PathBuf::from(
            lookup("AUDIT_INVENTORY_PATH").unwrap_or_else(|| "inventory.json".to_owned()),
        );
        let scan_concurrency = parse_or(&lookup, "AUDIT_SCAN_CONCURRENCY", 4_usize)?.max(1);
        let scan_queue_capacity = parse_or(&lookup, "AUDIT_SCAN_QUEUE_CAPACITY", 8_usize)?.max(1);
        let provider_call_timeout = lookup("PROVIDER_CALL_TIMEOUT_SECS")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|error| {
                        AppError::Validation(format!(
                            "invalid PROVIDER_CALL_TIMEOUT_SECS value '{value}': {error}"
                        ))
                    })
            })
            .transpose()?;

        Ok(Self {
            migrate_only,
            api_key,
            api_host,
            api_port,
            result_store,
            cloud_region,
            inventory_path,
            scan_concurrency,
            scan_queue_capacity,
            provider_call_timeout,
        })
    }

    pub fn socket_address(&self) -> AppResult<SocketAddr> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
