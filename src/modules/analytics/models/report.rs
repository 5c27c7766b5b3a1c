use chrono::NaiveDate;

/// Inclusive date range for a report query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

/// Field a report can be ordered by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderField {
    Metric(String),
    Dimension(String),
}

/// Requested ordering for report rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: OrderField,
    pub descending: bool,
}

impl OrderBy {
    pub fn metric_desc(name: impl Into<String>) -> Self {
        Self {
            field: OrderField::Metric(name.into()),
            descending: true,
        }
    }

    pub fn dimension_asc(name: impl Into<String>) -> Self {
        Self {
            field: OrderField::Dimension(name.into()),
            descending: false,
        }
    }
}

/// One analytical query within a batch report call
///
/// Immutable once built; the batch endpoint accepts up to five of these per
/// call and answers them positionally.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub metric_names: Vec<String>,
    pub dimension_names: Vec<String>,
    pub date_range: DateRange,
    pub comparison_date_range: Option<DateRange>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<i64>,
}

impl ReportRequest {
    pub fn new(
        metric_names: Vec<String>,
        dimension_names: Vec<String>,
        date_range: DateRange,
    ) -> Self {
        Self {
            metric_names,
            dimension_names,
            date_range,
            comparison_date_range: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn with_comparison(mut self, range: DateRange) -> Self {
        self.comparison_date_range = Some(range);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One row of a report, flattened from the wire format at the client boundary
///
/// Values are position-encoded: the ordinal of each entry corresponds to the
/// ordinal of the requested dimension/metric. The shaper owns that mapping;
/// nothing else in the crate indexes raw rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

/// Result of a single query within a batch report call
#[derive(Debug, Clone, Default)]
pub struct ReportResult {
    pub rows: Vec<ReportRow>,
    pub row_count: Option<i64>,
}
