use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::features::users::models::UserId;

pub type ReportId = i64;

/// Longest accepted description, counted in characters after trimming
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Closed set of waste classifications.
///
/// The string literals are persisted verbatim and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum WasteType {
    Plastic,
    Organic,
    #[serde(rename = "Construction debris")]
    ConstructionDebris,
    #[serde(rename = "E-waste")]
    EWaste,
    #[serde(rename = "Mixed / Other")]
    MixedOther,
}

impl WasteType {
    pub const ALL: [WasteType; 5] = [
        WasteType::Plastic,
        WasteType::Organic,
        WasteType::ConstructionDebris,
        WasteType::EWaste,
        WasteType::MixedOther,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WasteType::Plastic => "Plastic",
            WasteType::Organic => "Organic",
            WasteType::ConstructionDebris => "Construction debris",
            WasteType::EWaste => "E-waste",
            WasteType::MixedOther => "Mixed / Other",
        }
    }

    /// Exact, case-sensitive match against the persisted literal
    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == value)
    }
}

impl std::fmt::Display for WasteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional urgency indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == value)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report lifecycle marker. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Cleaned,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Cleaned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Cleaned => "Cleaned",
        }
    }

    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == value)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored waste report.
///
/// Only `report_status` changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: ReportId,
    pub user_id: UserId,
    /// Display name captured when the report was submitted
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

/// Raw `reports` row as the database returns it, enum columns still text
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub readable_area: Option<String>,
    pub photo_path: String,
    pub waste_type: String,
    pub date_time: DateTime<Utc>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub landmark: Option<String>,
    pub report_status: String,
    pub created_at: DateTime<Utc>,
}

/// Column that held a literal outside its closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLiteral {
    pub column: &'static str,
    pub value: String,
}

impl TryFrom<ReportRow> for Report {
    type Error = InvalidLiteral;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let waste_type = WasteType::from_literal(&row.waste_type).ok_or(InvalidLiteral {
            column: "waste_type",
            value: row.waste_type.clone(),
        })?;

        let severity = match row.severity.as_deref() {
            None => None,
            Some(value) => Some(Severity::from_literal(value).ok_or_else(|| InvalidLiteral {
                column: "severity",
                value: value.to_string(),
            })?),
        };

        let report_status =
            ReportStatus::from_literal(&row.report_status).ok_or_else(|| InvalidLiteral {
                column: "report_status",
                value: row.report_status.clone(),
            })?;

        Ok(Report {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            latitude: row.latitude,
            longitude: row.longitude,
            readable_area: row.readable_area,
            photo_path: row.photo_path,
            waste_type,
            date_time: row.date_time,
            description: row.description,
            severity,
            landmark: row.landmark,
            report_status,
            created_at: row.created_at,
        })
    }
}

/// Submission fields exactly as collected from the form, before any checks
#[derive(Debug, Clone, Default)]
pub struct RawReportSubmission {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub readable_area: Option<String>,
    pub photo_path: Option<String>,
    pub waste_type: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub landmark: Option<String>,
}

/// A submission that passed validation, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReportRequest {
    pub user_id: UserId,
    pub username: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub readable_area: Option<String>,
    pub photo_path: String,
    pub waste_type: WasteType,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub landmark: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ReportRow {
        let now = Utc::now();
        ReportRow {
            id: 7,
            user_id: 3,
            username: Some("Asha".to_string()),
            latitude: 12.97,
            longitude: 77.59,
            readable_area: None,
            photo_path: "static/uploads/a.jpg".to_string(),
            waste_type: "Mixed / Other".to_string(),
            date_time: now,
            description: None,
            severity: Some("High".to_string()),
            landmark: None,
            report_status: "In Progress".to_string(),
            created_at: now,
        }
    }

    #[test]
    fn test_literals_round_trip() {
        for waste_type in WasteType::ALL {
            assert_eq!(WasteType::from_literal(waste_type.as_str()), Some(waste_type));
        }
        for severity in Severity::ALL {
            assert_eq!(Severity::from_literal(severity.as_str()), Some(severity));
        }
        for status in ReportStatus::ALL {
            assert_eq!(ReportStatus::from_literal(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_literals_are_case_sensitive() {
        assert_eq!(WasteType::from_literal("plastic"), None);
        assert_eq!(WasteType::from_literal("Construction Debris"), None);
        assert_eq!(ReportStatus::from_literal("in progress"), None);
        assert_eq!(Severity::from_literal("Critical"), None);
    }

    #[test]
    fn test_serde_uses_legacy_literals() {
        assert_eq!(
            serde_json::to_string(&WasteType::MixedOther).unwrap(),
            "\"Mixed / Other\""
        );
        assert_eq!(
            serde_json::to_string(&WasteType::EWaste).unwrap(),
            "\"E-waste\""
        );
        assert_eq!(
            serde_json::from_str::<ReportStatus>("\"In Progress\"").unwrap(),
            ReportStatus::InProgress
        );
    }

    #[test]
    fn test_row_converts_to_report() {
        let report = Report::try_from(row()).unwrap();
        assert_eq!(report.waste_type, WasteType::MixedOther);
        assert_eq!(report.severity, Some(Severity::High));
        assert_eq!(report.report_status, ReportStatus::InProgress);
    }

    #[test]
    fn test_row_with_unknown_literal_is_rejected() {
        let mut bad = row();
        bad.waste_type = "Glass".to_string();
        let err = Report::try_from(bad).unwrap_err();
        assert_eq!(err.column, "waste_type");
        assert_eq!(err.value, "Glass");

        let mut bad = row();
        bad.report_status = "Done".to_string();
        assert_eq!(Report::try_from(bad).unwrap_err().column, "report_status");
    }
}
