//! In-memory collaborators and auth injection for handler and service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::Utc;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::models::{
    Report, ReportId, ReportStatus, ValidatedReportRequest,
};
use crate::features::reports::services::{ReportStore, StoreError};
use crate::features::users::models::{UserId, UserRecord};
use crate::features::users::{UserDirectory, UserError};
use crate::shared::constants::{ROLE_ADMIN, ROLE_CITIZEN};

pub const TEST_ADMIN_ID: UserId = 1000;

pub fn create_user(user_id: UserId) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        name: format!("user-{}", user_id),
        email: format!("user-{}@example.com", user_id),
        roles: vec![ROLE_CITIZEN.to_string()],
    }
}

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        roles: vec![ROLE_CITIZEN.to_string(), ROLE_ADMIN.to_string()],
        ..create_user(TEST_ADMIN_ID)
    }
}

/// Run every request of `router` as `user`
pub fn with_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

pub fn with_user_auth(router: Router, user_id: UserId) -> Router {
    with_auth(router, create_user(user_id))
}

pub fn with_admin_auth(router: Router) -> Router {
    with_auth(router, create_admin_user())
}

/// [`ReportStore`] over a vector, assigning ids the way a sequence would
#[derive(Default)]
pub struct InMemoryReportStore {
    reports: Mutex<Vec<Report>>,
    fail_writes: bool,
    fail_reads: bool,
}

impl InMemoryReportStore {
    /// A store whose `create` always fails with a database error
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    /// A store whose `create` succeeds but whose `get_by_id` always fails
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().unwrap().is_empty()
    }

    fn newest_first(mut reports: Vec<Report>) -> Vec<Report> {
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        reports
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn create(&self, request: &ValidatedReportRequest) -> Result<ReportId, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut reports = self.reports.lock().unwrap();
        let id = reports.len() as ReportId + 1;
        let now = Utc::now();
        reports.push(Report {
            id,
            user_id: request.user_id,
            username: request.username.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
            readable_area: request.readable_area.clone(),
            photo_path: request.photo_path.clone(),
            waste_type: request.waste_type,
            date_time: now,
            description: request.description.clone(),
            severity: request.severity,
            landmark: request.landmark.clone(),
            report_status: ReportStatus::Pending,
            created_at: now,
        });
        Ok(id)
    }

    async fn get_by_id(&self, id: ReportId) -> Result<Option<Report>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let reports = self.reports.lock().unwrap();
        Ok(reports.iter().find(|r| r.id == id).cloned())
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Report>, StoreError> {
        let reports = self.reports.lock().unwrap();
        let mine = reports
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(mine))
    }

    async fn get_all(&self) -> Result<Vec<Report>, StoreError> {
        let reports = self.reports.lock().unwrap().clone();
        Ok(Self::newest_first(reports))
    }

    async fn update_status(&self, id: ReportId, status: ReportStatus) -> Result<(), StoreError> {
        let mut reports = self.reports.lock().unwrap();
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        report.report_status = status;
        Ok(())
    }
}

/// [`UserDirectory`] over a fixed set of users
pub struct StaticUserDirectory {
    users: HashMap<UserId, UserRecord>,
}

impl StaticUserDirectory {
    pub fn with_users(users: &[(UserId, &str)]) -> Self {
        let users = users
            .iter()
            .map(|&(id, name)| {
                (
                    id,
                    UserRecord {
                        id,
                        name: name.to_string(),
                        number: "+91 98765 43210".to_string(),
                        email: format!("{}@example.com", name.to_lowercase()),
                        is_admin: false,
                        created_at: Utc::now(),
                    },
                )
            })
            .collect();
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserError> {
        Ok(self.users.get(&id).cloned())
    }
}
