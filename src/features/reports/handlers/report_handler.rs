use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{CreateReportForm, ReportResponseDto, UpdateReportStatusDto};
use crate::features::reports::models::{RawReportSubmission, ReportId};
use crate::features::reports::services::{PhotoUpload, ReportService};
use crate::shared::types::ApiResponse;

/// Submit a waste report
///
/// Accepts multipart/form-data with a `photo` file plus the report fields.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(
        content = CreateReportForm,
        content_type = "multipart/form-data",
        description = "Photo and report fields",
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid photo or report field"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Photo too large")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let mut raw = RawReportSubmission::default();
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "photo" {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field.bytes().await.map_err(|e| {
                debug!("Failed to read photo bytes: {}", e);
                AppError::BadRequest(format!("Failed to read photo data: {}", e))
            })?;
            photo = Some(PhotoUpload {
                bytes: bytes.to_vec(),
                filename,
            });
            continue;
        }

        let slot = match field_name.as_str() {
            "latitude" => &mut raw.latitude,
            "longitude" => &mut raw.longitude,
            "waste_type" => &mut raw.waste_type,
            "description" => &mut raw.description,
            "severity" => &mut raw.severity,
            "landmark" => &mut raw.landmark,
            "readable_area" => &mut raw.readable_area,
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
                continue;
            }
        };

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
        })?;
        *slot = Some(text);
    }

    let photo = photo.ok_or_else(|| AppError::BadRequest("No photo uploaded".to_string()))?;

    let report = service.submit(user.user_id, raw, photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted successfully!".to_string()),
            None,
        )),
    ))
}

/// List reports for the authenticated user
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "List of user's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_by_user(user.user_id).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// List every report
#[utoipa::path(
    get,
    path = "/api/reports/all",
    responses(
        (status = 200, description = "List of all reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_all_reports(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_all().await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<ReportId>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Update report status (admin only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<ReportId>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.update_status(id, &dto.status).await?;
    tracing::info!(
        "Admin {} set report {} to {}",
        admin.user_id,
        id,
        report.report_status
    );
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Status updated".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UploadConfig;
    use crate::features::reports::routes::routes;
    use crate::modules::storage::LocalPhotoStorage;
    use crate::shared::test_helpers::{
        with_admin_auth, with_user_auth, InMemoryReportStore, StaticUserDirectory,
    };
    use axum::Router;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    struct Harness {
        service: Arc<ReportService>,
        _dir: tempfile::TempDir,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let photos = Arc::new(LocalPhotoStorage::new(&UploadConfig {
            upload_dir: dir.path().to_path_buf(),
            max_photo_size: 1024,
        }));
        let users = Arc::new(StaticUserDirectory::with_users(&[(1, "Asha")]));
        let service = Arc::new(ReportService::new(
            Arc::new(InMemoryReportStore::default()),
            photos,
            users,
        ));
        Harness { service, _dir: dir }
    }

    fn server(router: Router) -> TestServer {
        TestServer::new(router).unwrap()
    }

    fn form() -> MultipartForm {
        MultipartForm::new()
            .add_text("latitude", "12.97")
            .add_text("longitude", "77.59")
            .add_text("waste_type", "Plastic")
            .add_text("description", "")
            .add_text("severity", "Medium")
            .add_part(
                "photo",
                Part::bytes(b"fake jpeg".to_vec())
                    .file_name("dump.JPG")
                    .mime_type("image/jpeg"),
            )
    }

    #[tokio::test]
    async fn test_create_report() {
        let h = harness();
        let server = server(with_user_auth(routes(h.service.clone(), 1024), 1));

        let response = server.post("/api/reports").multipart(form()).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["user_id"], 1);
        assert_eq!(body["data"]["username"], "Asha");
        assert_eq!(body["data"]["waste_type"], "Plastic");
        assert_eq!(body["data"]["report_status"], "Pending");
        assert!(body["data"]["description"].is_null());
    }

    #[tokio::test]
    async fn test_create_report_requires_photo() {
        let h = harness();
        let server = server(with_user_auth(routes(h.service.clone(), 1024), 1));

        let form = MultipartForm::new()
            .add_text("latitude", "12.97")
            .add_text("longitude", "77.59")
            .add_text("waste_type", "Plastic");
        let response = server.post("/api/reports").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_report_rejects_bad_fields() {
        let h = harness();
        let server = server(with_user_auth(routes(h.service.clone(), 1024), 1));

        let bad_type = form().add_text("waste_type", "Glass");
        // duplicate field, last value wins
        let response = server.post("/api/reports").multipart(bad_type).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let bad_photo = MultipartForm::new()
            .add_text("latitude", "12.97")
            .add_text("longitude", "77.59")
            .add_text("waste_type", "Plastic")
            .add_part("photo", Part::bytes(b"text".to_vec()).file_name("notes.txt"));
        let response = server.post("/api/reports").multipart(bad_photo).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let big = MultipartForm::new()
            .add_text("latitude", "12.97")
            .add_text("longitude", "77.59")
            .add_text("waste_type", "Plastic")
            .add_part("photo", Part::bytes(vec![0; 2048]).file_name("big.png"));
        let response = server.post("/api/reports").multipart(big).await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

        assert!(h.service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_and_get_reports() {
        let h = harness();
        let server = server(with_user_auth(routes(h.service.clone(), 1024), 1));

        server.post("/api/reports").multipart(form()).await;
        server.post("/api/reports").multipart(form()).await;

        let response = server.get("/api/reports").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        let newest = body["data"][0]["id"].as_i64().unwrap();
        let oldest = body["data"][1]["id"].as_i64().unwrap();
        assert!(newest > oldest);

        let response = server.get("/api/reports/all").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["meta"]["total"], 2);

        let response = server.get(&format!("/api/reports/{}", oldest)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["id"], oldest);

        server
            .get("/api/reports/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_reports_is_scoped_to_caller() {
        let h = harness();
        let asha = server(with_user_auth(routes(h.service.clone(), 1024), 1));
        let ravi = server(with_user_auth(routes(h.service.clone(), 1024), 2));

        asha.post("/api/reports").multipart(form()).await;

        assert_eq!(asha.get("/api/reports").await.json::<Value>()["meta"]["total"], 1);
        assert_eq!(ravi.get("/api/reports").await.json::<Value>()["meta"]["total"], 0);
        assert_eq!(ravi.get("/api/reports/all").await.json::<Value>()["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_update_status_as_admin() {
        let h = harness();
        let citizen = server(with_user_auth(routes(h.service.clone(), 1024), 1));
        let admin = server(with_admin_auth(routes(h.service.clone(), 1024)));

        let created: Value = citizen.post("/api/reports").multipart(form()).await.json();
        let id = created["data"]["id"].as_i64().unwrap();

        let response = admin
            .patch(&format!("/api/reports/{}/status", id))
            .json(&json!({ "status": "In Progress" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["report_status"], "In Progress");

        admin
            .patch(&format!("/api/reports/{}/status", id))
            .json(&json!({ "status": "Done" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        admin
            .patch("/api/reports/999/status")
            .json(&json!({ "status": "Cleaned" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_status_requires_admin() {
        let h = harness();
        let citizen = server(with_user_auth(routes(h.service.clone(), 1024), 1));

        let created: Value = citizen.post("/api/reports").multipart(form()).await.json();
        let id = created["data"]["id"].as_i64().unwrap();

        citizen
            .patch(&format!("/api/reports/{}/status", id))
            .json(&json!({ "status": "Cleaned" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let report = h.service.get_by_id(id).await.unwrap();
        assert_eq!(report.report_status.as_str(), "Pending");
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let h = harness();
        let anonymous = server(routes(h.service.clone(), 1024));

        anonymous
            .get("/api/reports")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        anonymous
            .patch("/api/reports/1/status")
            .json(&json!({ "status": "Cleaned" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
