use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, FromRow, PgPool, Postgres, Transaction};

use cloud_auditor_application::{ScanSession, VerdictQuery, VerdictRepository};
use cloud_auditor_core::{AppError, AppResult, NonEmptyString};
use cloud_auditor_domain::{AuditService, CheckName, ComplianceStats, RecordedVerdict, Verdict};


/// Embedded schema migrations for the verdict store.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL-backed append-only verdict store.
#[derive(Clone)]
pub struct PostgresVerdictRepository {
    pool: PgPool,
}

impl PostgresVerdictRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct VerdictRow {
    id: i64,
    service: String,
    resource_id: String,
    check_name: String,
    is_compliant: bool,
    details: String,
    checked_at: DateTime<Utc>,
}

impl TryFrom<VerdictRow> for RecordedVerdict {
    type Error = AppError;

    fn try_from(row: VerdictRow) -> Result<Self, Self::Error> {
        let verdict = Verdict::restore(
            AuditService::from_str(row.service.as_str())?,
            NonEmptyString::new(row.resource_id)?,
            CheckName::from_str(row.check_name.as_str())?,
            row.is_compliant,
            row.details,
            row.checked_at,
        )
        .map_err(|error| {
            AppError::Internal(format!("stored verdict {} is invalid: {error}", row.id))
        })?;

        Ok(RecordedVerdict::new(row.id, verdict))
    }
}

async fn insert_batch(
    transaction: &mut Transaction<'_, Postgres>,
    verdicts: &[Verdict],
) -> AppResult<u64> {
    let mut inserted = 0_u64;
    for verdict in verdicts {
        sqlx::query(
            r#"
            INSERT INTO audit_results (
                service,
                resource_id,
                check_name,
                is_compliant,
                details,
                checked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(verdict.service().as_str())
        .bind(verdict.resource_id().as_str())
        .bind(verdict.check_name().as_str())
        .bind(verdict.is_compliant())
        .bind(verdict.details())
        .bind(verdict.timestamp())
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to insert verdict for {} resource '{}': {error}",
                verdict.service(),
                verdict.resource_id()
            ))
        })?;
        inserted += 1;
    }

    Ok(inserted)
}

async fn commit_batch(
    mut transaction: Transaction<'_, Postgres>,
    verdicts: &[Verdict],
) -> AppResult<u64> {
    let inserted = insert_batch(&mut transaction, verdicts).await?;

    transaction.commit().await.map_err(|error| {
        AppError::Internal(format!(
            "failed to commit batch of {} verdicts: {error}",
            verdicts.len()
        ))
    })?;

    Ok(inserted)
}

#[async_trait]
impl VerdictRepository for PostgresVerdictRepository {
    async fn insert(&self, verdict: Verdict) -> AppResult<RecordedVerdict> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO audit_results (
                service,
                resource_id,
                check_name,
                is_compliant,
                details,
                checked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(verdict.service().as_str())
        .bind(verdict.resource_id().as_str())
        .bind(verdict.check_name().as_str())
        .bind(verdict.is_compliant())
        .bind(verdict.details())
        .bind(verdict.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to insert verdict for {} resource '{}': {error}",
                verdict.service(),
                verdict.resource_id()
            ))
        })?;

        Ok(RecordedVerdict::new(id, verdict))
    }

    async fn insert_many(&self, verdicts: Vec<Verdict>) -> AppResult<u64> {
        if verdicts.is_empty() {
            return Ok(0);
        }

        let transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start verdict batch transaction: {error}"))
        })?;

        commit_batch(transaction, &verdicts).await
    }

    async fn query(&self, query: VerdictQuery) -> AppResult<Vec<RecordedVerdict>> {
        let rows = sqlx::query_as::<_, VerdictRow>(
            r#"
            SELECT
                id,
                service,
                resource_id,
                check_name,
                is_compliant,
                details,
                checked_at
            FROM audit_results
            WHERE ($1::TEXT IS NULL OR service = $1)
                AND ($2::BOOLEAN IS NULL OR is_compliant = $2)
            ORDER BY checked_at DESC, id DESC
            "#,
        )
        .bind(query.service.map(|service| service.as_str()))
        .bind(query.is_compliant)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list verdicts: {error}")))?;

        rows.into_iter().map(RecordedVerdict::try_from).collect()
    }

    async fn stats(&self) -> AppResult<ComplianceStats> {
        let (passed, failed): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE is_compliant),
                COUNT(*) FILTER (WHERE NOT is_compliant)
            FROM audit_results
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to aggregate verdict counts: {error}"))
        })?;

        Ok(ComplianceStats::from_counts(
            u64::try_from(passed).unwrap_or_default(),
            u64::try_from(failed).unwrap_or_default(),
        ))
    }

    async fn clear_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM audit_results")
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to clear verdicts: {error}")))?;

        Ok(result.rows_affected())
    }

    async fn open_scan_session(&self) -> AppResult<Box<dyn ScanSession>> {
        let connection = self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire scan session connection: {error}"))
        })?;

        Ok(Box::new(PostgresScanSession { connection }))
    }
}

/// Dedicated pooled connection held for the lifetime of one scan.
struct PostgresScanSession {
    connection: PoolConnection<Postgres>,
}

#[async_trait]
impl ScanSession for PostgresScanSession {
    async fn insert_many(&mut self, verdicts: Vec<Verdict>) -> AppResult<u64> {
        if verdicts.is_empty() {
            return Ok(0);
        }

        let transaction = self.connection.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start scan batch transaction: {error}"))
        })?;

        commit_batch(transaction, &verdicts).await
    }
}
