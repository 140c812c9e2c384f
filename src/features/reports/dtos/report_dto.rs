use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::{Report, ReportId, ReportStatus, Severity, WasteType};
use crate::features::users::models::UserId;

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: ReportId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub readable_area: Option<String>,
    pub photo_path: String,
    pub waste_type: WasteType,
    pub date_time: DateTime<Utc>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub landmark: Option<String>,
    pub report_status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            username: r.username,
            latitude: r.latitude,
            longitude: r.longitude,
            readable_area: r.readable_area,
            photo_path: r.photo_path,
            waste_type: r.waste_type,
            date_time: r.date_time,
            description: r.description,
            severity: r.severity,
            landmark: r.landmark,
            report_status: r.report_status,
            created_at: r.created_at,
        }
    }
}

/// Multipart form for submitting a report.
/// Documentation only; the handler reads the fields from `Multipart`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateReportForm {
    /// Photo of the dump site (png, jpg, jpeg or gif)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: String,
    #[schema(example = "12.9716")]
    pub latitude: String,
    #[schema(example = "77.5946")]
    pub longitude: String,
    /// One of `Plastic`, `Organic`, `Construction debris`, `E-waste`, `Mixed / Other`
    pub waste_type: String,
    /// At most 200 characters
    pub description: Option<String>,
    /// One of `Low`, `Medium`, `High`
    pub severity: Option<String>,
    pub landmark: Option<String>,
    /// Human readable place name resolved by the client
    pub readable_area: Option<String>,
}

/// Request DTO for updating report status.
///
/// The status stays a plain string so unknown literals surface as a
/// validation error rather than a JSON rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    /// One of `Pending`, `In Progress`, `Cleaned`
    #[schema(example = "In Progress")]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_uses_stored_literals() {
        let now = Utc::now();
        let dto = ReportResponseDto::from(Report {
            id: 1,
            user_id: 2,
            username: Some("Asha".to_string()),
            latitude: 12.97,
            longitude: 77.59,
            readable_area: None,
            photo_path: "static/uploads/a.png".to_string(),
            waste_type: WasteType::ConstructionDebris,
            date_time: now,
            description: None,
            severity: Some(Severity::Low),
            landmark: None,
            report_status: ReportStatus::InProgress,
            created_at: now,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["waste_type"], "Construction debris");
        assert_eq!(json["report_status"], "In Progress");
        assert_eq!(json["severity"], "Low");
        assert!(json["description"].is_null());
    }
}
