use serde::Serialize;

/// A single key performance indicator with its period-over-period change
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpi {
    /// Value for the current period
    pub value: f64,
    /// Percentage change against the prior, equal-length period
    pub change: f64,
}

/// Headline web KPIs shown on the dashboard overview cards
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebKpis {
    pub active_users: Kpi,
    pub new_users: Kpi,
    pub sessions: Kpi,
    pub page_views: Kpi,
}

/// One point of a per-date series, labeled for direct rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    /// Short month/day label, e.g. "Mar 17"
    pub date: String,
    pub value: f64,
}

/// One entry of a category breakdown (country, device, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: f64,
}

/// One entry of the ranked top-pages table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageCount {
    pub path: String,
    pub views: f64,
}

/// Everything the dashboard's web-analytics tab renders
#[derive(Debug, Clone, Serialize)]
pub struct WebAnalyticsSummary {
    pub kpis: WebKpis,
    pub users_over_time: Vec<TimeSeriesPoint>,
    pub users_by_country: Vec<CategoryCount>,
    pub sessions_by_device: Vec<CategoryCount>,
    pub top_pages: Vec<PageCount>,
}
