mod report_service;
mod report_store;

pub use report_service::{PhotoUpload, ReportError, ReportService};
pub use report_store::{PgReportStore, StoreError};

#[cfg(test)]
pub use report_store::ReportStore;
