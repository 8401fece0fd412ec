//! Cloud auditor scheduled scan trigger.

#![forbid(unsafe_code)]

use std::env;
use std::time::Duration;

use cloud_auditor_core::{AppError, AppResult};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
struct WorkerConfig {
    api_base_url: String,
    api_key: String,
    worker_id: String,
    scan_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
struct ScanAcceptedResponse {
    message: String,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        worker_id = %config.worker_id,
        api_base_url = %config.api_base_url,
        scan_interval_secs = config.scan_interval_secs,
        "cloud-auditor-worker started"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.scan_interval_secs));
    loop {
        ticker.tick().await;

        match trigger_full_scan(&http_client, &config).await {
            Ok(message) => info!(worker_id = %config.worker_id, %message, "full scan triggered"),
            Err(error) => warn!(
                worker_id = %config.worker_id,
                error = %error,
                "failed to trigger full scan"
            ),
        }
    }
}

async fn trigger_full_scan(
    http_client: &reqwest::Client,
    config: &WorkerConfig,
) -> AppResult<String> {
    let endpoint = format!("{}/audit/run-full-scan", config.api_base_url);
    let response = http_client
        .post(endpoint)
        .header(API_KEY_HEADER, config.api_key.as_str())
        .send()
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to call full scan endpoint: {error}"))
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        return Err(AppError::Internal(format!(
            "full scan endpoint returned status {}: {body}",
            status.as_u16()
        )));
    }

    let accepted = response
        .json::<ScanAcceptedResponse>()
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to parse full scan endpoint response body: {error}"
            ))
        })?;

    Ok(accepted.message)
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let api_base_url = normalize_base_url(
            env::var("AUDITOR_API_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_owned())
                .as_str(),
        );
        let api_key = required_env("API_KEY")?;
        if api_key.trim().is_empty() {
            return Err(AppError::Validation("API_KEY must not be empty".to_owned()));
        }

        let worker_id = env::var("WORKER_ID")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("worker-{}", std::process::id()));
        let scan_interval_secs =
            parse_interval("SCAN_INTERVAL_SECS", env::var("SCAN_INTERVAL_SECS").ok(), 3600)?;

        Ok(Self {
            api_base_url,
            api_key,
            worker_id,
            scan_interval_secs,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn normalize_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_owned()
}

fn parse_interval(name: &str, value: Option<String>, default: u64) -> AppResult<u64> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Validation(format!("{name} must be greater than zero"))),
        Ok(seconds) => Ok(seconds),
        Err(error) => Err(AppError::Validation(format!(
            "invalid {name} value '{value}': {error}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use cloud_auditor_core::AppError;

    use super::{normalize_base_url, parse_interval};

    #[test]
    fn interval_defaults_when_unset() {
        assert_eq!(parse_interval("SCAN_INTERVAL_SECS", None, 3600).ok(), Some(3600));
    }

    #[test]
    fn interval_rejects_zero_and_garbage() {
        assert!(matches!(
            parse_interval("SCAN_INTERVAL_SECS", Some("0".to_owned()), 3600),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_interval("SCAN_INTERVAL_SECS", Some("hourly".to_owned()), 3600),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            parse_interval("SCAN_INTERVAL_SECS", Some(" 900 ".to_owned()), 3600).ok(),
            Some(900)
        );
    }

    #[test]
    fn base_url_drops_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://auditor:8000//"),
            "http://auditor:8000"
        );
    }
}
