use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::features::reports::models::{
    InvalidLiteral, Report, ReportId, ReportRow, ReportStatus, ValidatedReportRequest,
};
use crate::features::users::models::UserId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Report {0} not found")]
    NotFound(ReportId),

    #[error("Invalid {field} '{value}'. Must be one of: {allowed}")]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Stored report has invalid {column} '{value}'")]
    Corrupt { column: &'static str, value: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<InvalidLiteral> for StoreError {
    fn from(e: InvalidLiteral) -> Self {
        StoreError::Corrupt {
            column: e.column,
            value: e.value,
        }
    }
}

/// Durable report persistence.
///
/// Each operation is a single atomic statement; nothing is cached, so reads
/// always observe the latest committed state.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Insert a new report in `Pending` status and return its id
    async fn create(&self, request: &ValidatedReportRequest) -> Result<ReportId, StoreError>;

    async fn get_by_id(&self, id: ReportId) -> Result<Option<Report>, StoreError>;

    /// Reports owned by `user_id`, newest first
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Report>, StoreError>;

    /// Every report, newest first
    async fn get_all(&self) -> Result<Vec<Report>, StoreError>;

    /// Overwrite `report_status` only
    async fn update_status(&self, id: ReportId, status: ReportStatus) -> Result<(), StoreError>;
}

const REPORT_COLUMNS: &str = r#"
    id, user_id, username, latitude, longitude, readable_area,
    photo_path, waste_type, date_time, description, severity,
    landmark, report_status, created_at
"#;

/// [`ReportStore`] over the Postgres `reports` table
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_reports(rows: Vec<ReportRow>) -> Result<Vec<Report>, StoreError> {
        rows.into_iter()
            .map(|row| Report::try_from(row).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn create(&self, request: &ValidatedReportRequest) -> Result<ReportId, StoreError> {
        // report_status, date_time and created_at come from column defaults
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reports (user_id, username, latitude, longitude, readable_area,
                                 photo_path, waste_type, description, severity, landmark)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(request.user_id)
        .bind(&request.username)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.readable_area)
        .bind(&request.photo_path)
        .bind(request.waste_type.as_str())
        .bind(&request.description)
        .bind(request.severity.map(|s| s.as_str()))
        .bind(&request.landmark)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            StoreError::Database(e)
        })?;

        tracing::info!(
            "Created report: {} for user: {} ({})",
            id,
            request.user_id,
            request.waste_type
        );

        Ok(id)
    }

    async fn get_by_id(&self, id: ReportId) -> Result<Option<Report>, StoreError> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report: {:?}", e);
            StoreError::Database(e)
        })?;

        row.map(Report::try_from)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Report>, StoreError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports by user: {:?}", e);
            StoreError::Database(e)
        })?;

        Self::into_reports(rows)
    }

    async fn get_all(&self) -> Result<Vec<Report>, StoreError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            StoreError::Database(e)
        })?;

        Self::into_reports(rows)
    }

    async fn update_status(&self, id: ReportId, status: ReportStatus) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET report_status = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report status: {:?}", e);
            StoreError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::info!("Report {} status set to {}", id, status);
        Ok(())
    }
}
