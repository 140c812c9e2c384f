//! Waste reports: submission, validation, storage and retrieval.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validator;

pub use routes::routes;
pub use services::{PgReportStore, ReportService};
