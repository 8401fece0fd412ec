//! Cloud Resource Auditor API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use cloud_auditor_application::{
    AuditOrchestrator, AuditResultService, BlockingCallPolicy, IdentityAuditor, NetworkAuditor,
    ScanDispatcher, ServiceAuditor, StorageAuditor, VerdictRepository,
};
use cloud_auditor_core::{AppError, AppResult};
use cloud_auditor_infrastructure::{
    InMemoryVerdictRepository, InventorySnapshotProvider, MIGRATOR, PostgresVerdictRepository,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, ResultStoreConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let verdict_repository = build_verdict_repository(&config.result_store).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let inventory = Arc::new(InventorySnapshotProvider::new(
        config.inventory_path.clone(),
        config.cloud_region.clone(),
    ));
    let policy = BlockingCallPolicy::new(config.provider_call_timeout);
    let auditors: Vec<Arc<dyn ServiceAuditor>> = vec![
        Arc::new(StorageAuditor::new(inventory.clone(), policy)),
        Arc::new(IdentityAuditor::new(inventory.clone(), policy)),
        Arc::new(NetworkAuditor::new(inventory, policy)),
    ];

    let audit_orchestrator = AuditOrchestrator::new(
        auditors,
        verdict_repository.clone(),
        config.scan_concurrency,
    );
    let scan_dispatcher =
        ScanDispatcher::spawn(audit_orchestrator.clone(), config.scan_queue_capacity);

    let app_state = AppState {
        audit_orchestrator,
        scan_dispatcher,
        audit_result_service: AuditResultService::new(verdict_repository),
        api_key: Arc::from(config.api_key.as_str()),
    };

    let app = api_router::build_router(app_state);
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        region = %config.cloud_region,
        inventory_path = %config.inventory_path.display(),
        scan_concurrency = config.scan_concurrency,
        "cloud-auditor-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

async fn build_verdict_repository(
    result_store: &ResultStoreConfig,
) -> AppResult<Arc<dyn VerdictRepository>> {
    match result_store {
        ResultStoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(database_url)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to database: {error}"))
                })?;

            MIGRATOR
                .run(&pool)
                .await
                .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

            Ok(Arc::new(PostgresVerdictRepository::new(pool)))
        }
        ResultStoreConfig::Memory => {
            info!("using in-memory result store, verdicts are lost on restart");
            Ok(Arc::new(InMemoryVerdictRepository::new()))
        }
    }
}
