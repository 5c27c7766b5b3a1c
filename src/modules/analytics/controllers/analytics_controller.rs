use actix_web::{error::ResponseError, web, HttpResponse};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::{error, info};

use crate::config::Config;
use crate::core::Result;
use crate::modules::analytics::models::{
    DateRange, OrderBy, ReportRequest, ReportResult, WebAnalyticsSummary, WebKpis,
};
use crate::modules::analytics::services::shaper;
use crate::modules::analytics::services::{GoogleAuthenticator, ReportClient};

const ANALYTICS_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

const DEFAULT_PERIOD_DAYS: i64 = 28;
const MAX_PERIOD_DAYS: i64 = 365;

/// Query parameters for the web analytics endpoint
#[derive(Debug, Deserialize)]
pub struct WebAnalyticsQuery {
    /// Length of the reporting period in days, ending today
    #[serde(default)]
    pub days: Option<i64>,
}

/// GET /analytics/web
///
/// Authenticates with the service account, runs one batched report call and
/// returns the shaped summary the dashboard renders.
pub async fn get_web_analytics(
    config: web::Data<Config>,
    query: web::Query<WebAnalyticsQuery>,
) -> HttpResponse {
    match handle_get_web_analytics(config, query).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            error!("Failed to build web analytics summary: {}", e);
            e.error_response()
        }
    }
}

async fn handle_get_web_analytics(
    config: web::Data<Config>,
    query: web::Query<WebAnalyticsQuery>,
) -> Result<WebAnalyticsSummary> {
    let days = resolve_period_days(query.days)?;

    // "Today" is resolved here, in the caller; shaping stays clock-free.
    let today = Utc::now().date_naive();
    let current = DateRange::new(today - Duration::days(days - 1), today);
    let previous = DateRange::new(
        current.start_date - Duration::days(days),
        current.start_date - Duration::days(1),
    );

    let requests = build_report_batch(current, previous);

    let authenticator = GoogleAuthenticator::new(&config.google);
    let token = authenticator.fetch_access_token(ANALYTICS_SCOPE).await?;

    let report_client = ReportClient::new(config.google.property_id.clone());
    let reports = report_client.batch_run_reports(&requests, &token).await?;

    info!(days, "Web analytics summary generated");

    Ok(shape_summary(&reports))
}

/// Resolve the requested period length, defaulting when absent
fn resolve_period_days(requested: Option<i64>) -> Result<i64> {
    let days = requested.unwrap_or(DEFAULT_PERIOD_DAYS);
    if !(1..=MAX_PERIOD_DAYS).contains(&days) {
        return Err(crate::core::AppError::validation(format!(
            "days must be between 1 and {}, got {}",
            MAX_PERIOD_DAYS, days
        )));
    }
    Ok(days)
}

/// Build the five sub-queries answered by one batch call
///
/// Order matters: the shaper maps response reports back to queries by index.
fn build_report_batch(current: DateRange, previous: DateRange) -> Vec<ReportRequest> {
    vec![
        // 0: headline KPIs with a comparison period
        ReportRequest::new(
            vec![
                "activeUsers".to_string(),
                "newUsers".to_string(),
                "sessions".to_string(),
                "screenPageViews".to_string(),
            ],
            vec![],
            current,
        )
        .with_comparison(previous),
        // 1: active users per date
        ReportRequest::new(
            vec!["activeUsers".to_string()],
            vec!["date".to_string()],
            current,
        )
        .with_order_by(OrderBy::dimension_asc("date")),
        // 2: users by country
        ReportRequest::new(
            vec!["activeUsers".to_string()],
            vec!["country".to_string()],
            current,
        )
        .with_order_by(OrderBy::metric_desc("activeUsers"))
        .with_limit(10),
        // 3: sessions by device category
        ReportRequest::new(
            vec!["sessions".to_string()],
            vec!["deviceCategory".to_string()],
            current,
        )
        .with_order_by(OrderBy::metric_desc("sessions")),
        // 4: most viewed pages
        ReportRequest::new(
            vec!["screenPageViews".to_string()],
            vec!["pagePath".to_string()],
            current,
        )
        .with_order_by(OrderBy::metric_desc("screenPageViews"))
        .with_limit(5),
    ]
}

fn shape_summary(reports: &[ReportResult]) -> WebAnalyticsSummary {
    let empty = ReportResult::default();
    let kpi_report = reports.first().unwrap_or(&empty);

    WebAnalyticsSummary {
        kpis: WebKpis {
            active_users: shaper::extract_kpi(kpi_report, 0),
            new_users: shaper::extract_kpi(kpi_report, 1),
            sessions: shaper::extract_kpi(kpi_report, 2),
            page_views: shaper::extract_kpi(kpi_report, 3),
        },
        users_over_time: reports
            .get(1)
            .map(|r| shaper::extract_time_series(r, 0))
            .unwrap_or_default(),
        users_by_country: reports
            .get(2)
            .map(shaper::extract_categories)
            .unwrap_or_default(),
        sessions_by_device: reports
            .get(3)
            .map(shaper::extract_categories)
            .unwrap_or_default(),
        top_pages: reports
            .get(4)
            .map(shaper::extract_pages)
            .unwrap_or_default(),
    }
}

/// Configure routes for the analytics module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/analytics").route("/web", web::get().to(get_web_analytics)));
}
