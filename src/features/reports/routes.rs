use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Multipart framing allowance on top of the photo itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create routes for the reports feature
///
/// All routes require the auth middleware to be applied by the caller
pub fn routes(report_service: Arc<ReportService>, max_photo_size: usize) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report).layer(
                DefaultBodyLimit::max(max_photo_size + MULTIPART_OVERHEAD),
            ),
        )
        .route("/api/reports/all", get(handlers::list_all_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(report_service)
}
