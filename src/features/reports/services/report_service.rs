use std::sync::Arc;

use thiserror::Error;

use crate::features::reports::models::{RawReportSubmission, Report, ReportId, ReportStatus};
use crate::features::reports::services::report_store::{ReportStore, StoreError};
use crate::features::reports::validator::{validate, ValidationError};
use crate::features::users::models::UserId;
use crate::features::users::{UserDirectory, UserError};
use crate::modules::storage::{PhotoStorage, PhotoStorageError};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Photo(#[from] PhotoStorageError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    User(#[from] UserError),
}

/// Photo as received from the client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Report submission and retrieval
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    photos: Arc<dyn PhotoStorage>,
    users: Arc<dyn UserDirectory>,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        photos: Arc<dyn PhotoStorage>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            store,
            photos,
            users,
        }
    }

    /// Store the photo, validate the submission and persist it for `user_id`.
    ///
    /// The saved photo is removed again if validation or the insert fails.
    /// Once the insert has committed the photo belongs to the report.
    pub async fn submit(
        &self,
        user_id: UserId,
        mut raw: RawReportSubmission,
        photo: PhotoUpload,
    ) -> Result<Report, ReportError> {
        let username = self.users.find_by_id(user_id).await?.map(|u| u.name);

        let photo_path = self.photos.save(photo.bytes, &photo.filename).await?;

        raw.user_id = Some(user_id);
        raw.username = username;
        raw.photo_path = Some(photo_path.as_str().to_string());

        let id = match self.persist(&raw).await {
            Ok(id) => id,
            Err(e) => {
                if let Err(remove_err) = self.photos.remove(&photo_path).await {
                    tracing::warn!(
                        "Failed to remove orphaned photo {}: {}",
                        photo_path,
                        remove_err
                    );
                }
                return Err(e);
            }
        };

        self.get_by_id(id).await.inspect_err(|e| {
            tracing::error!("Report {} was stored but could not be read back: {}", id, e);
        })
    }

    async fn persist(&self, raw: &RawReportSubmission) -> Result<ReportId, ReportError> {
        let request = validate(raw).inspect_err(|e| {
            tracing::debug!("Rejected report submission on {}: {}", e.field(), e);
        })?;
        Ok(self.store.create(&request).await?)
    }

    pub async fn get_by_id(&self, id: ReportId) -> Result<Report, ReportError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(ReportError::Store(StoreError::NotFound(id)))
    }

    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Report>, ReportError> {
        Ok(self.store.get_by_user(user_id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Report>, ReportError> {
        Ok(self.store.get_all().await?)
    }

    /// Set the status of a report from its literal, e.g. `"In Progress"`.
    /// Any status may follow any other.
    pub async fn update_status(&self, id: ReportId, raw_status: &str) -> Result<Report, ReportError> {
        let status = ReportStatus::from_literal(raw_status).ok_or_else(|| {
            StoreError::InvalidEnum {
                field: "report_status",
                value: raw_status.to_string(),
                allowed: ReportStatus::ALL
                    .iter()
                    .map(ReportStatus::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })?;

        self.store.update_status(id, status).await?;
        self.get_by_id(id).await
    }
}
