mod report;

pub use report::{
    InvalidLiteral, RawReportSubmission, Report, ReportId, ReportRow, ReportStatus, Severity,
    ValidatedReportRequest, WasteType, MAX_DESCRIPTION_LEN,
};
