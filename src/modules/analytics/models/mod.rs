pub mod report;
pub mod summary;

pub use report::{DateRange, OrderBy, OrderField, ReportRequest, ReportResult, ReportRow};
pub use summary::{CategoryCount, Kpi, PageCount, TimeSeriesPoint, WebAnalyticsSummary, WebKpis};
