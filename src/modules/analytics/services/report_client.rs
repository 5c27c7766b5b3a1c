use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AppError, Result};
use crate::modules::analytics::models::{OrderField, ReportRequest, ReportResult, ReportRow};

const DATA_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Maximum number of sub-requests the batch endpoint accepts per call
pub const MAX_BATCH_REQUESTS: usize = 5;

/// Client for the GA4 Data API batch reporting endpoint
///
/// One HTTP call per batch, no retry, no pagination; each sub-query bounds
/// its own row count through its `limit`. A non-2xx response is terminal for
/// the whole batch since partial success is not representable upstream.
pub struct ReportClient {
    client: Client,
    property_id: String,
}

impl ReportClient {
    pub fn new(property_id: String) -> Self {
        Self {
            client: Client::new(),
            property_id,
        }
    }

    /// Run up to five report queries in one call, answered in submission order
    pub async fn batch_run_reports(
        &self,
        requests: &[ReportRequest],
        access_token: &str,
    ) -> Result<Vec<ReportResult>> {
        if requests.is_empty() {
            return Err(AppError::validation("Batch must contain at least one report request"));
        }
        if requests.len() > MAX_BATCH_REQUESTS {
            return Err(AppError::validation(format!(
                "Batch supports at most {} report requests, got {}",
                MAX_BATCH_REQUESTS,
                requests.len()
            )));
        }

        let url = format!(
            "{}/properties/{}:batchRunReports",
            DATA_API_BASE, self.property_id
        );

        #[derive(Serialize)]
        struct BatchRequest {
            requests: Vec<WireRequest>,
        }

        #[derive(Deserialize)]
        struct BatchResponse {
            #[serde(default)]
            reports: Vec<WireReport>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct WireReport {
            #[serde(default)]
            rows: Vec<WireRow>,
            row_count: Option<i64>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct WireRow {
            #[serde(default)]
            dimension_values: Vec<WireValue>,
            #[serde(default)]
            metric_values: Vec<WireValue>,
        }

        #[derive(Deserialize)]
        struct WireValue {
            #[serde(default)]
            value: String,
        }

        let body = BatchRequest {
            requests: requests.iter().map(WireRequest::from).collect(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ReportingApi { status, body });
        }

        let batch: BatchResponse = response.json().await?;

        debug!(
            requested = requests.len(),
            returned = batch.reports.len(),
            "Fetched batch report"
        );

        // Flatten the position-encoded wire rows at the boundary; a report
        // the API omitted entirely shapes the same as one with zero rows.
        let mut results: Vec<ReportResult> = batch
            .reports
            .into_iter()
            .map(|report| ReportResult {
                rows: report
                    .rows
                    .into_iter()
                    .map(|row| ReportRow {
                        dimension_values: row.dimension_values.into_iter().map(|v| v.value).collect(),
                        metric_values: row.metric_values.into_iter().map(|v| v.value).collect(),
                    })
                    .collect(),
                row_count: report.row_count,
            })
            .collect();
        results.resize_with(requests.len(), ReportResult::default);

        Ok(results)
    }
}

/// Wire representation of one report sub-request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    date_ranges: Vec<WireDateRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dimensions: Vec<WireName>,
    metrics: Vec<WireName>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_bys: Vec<WireOrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDateRange {
    start_date: String,
    end_date: String,
}

#[derive(Serialize)]
struct WireName {
    name: String,
}

#[derive(Serialize)]
struct WireOrderBy {
    desc: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<WireMetricOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension: Option<WireDimensionOrder>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireMetricOrder {
    metric_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDimensionOrder {
    dimension_name: String,
}

impl From<&ReportRequest> for WireRequest {
    fn from(request: &ReportRequest) -> Self {
        let mut date_ranges = vec![WireDateRange {
            start_date: request.date_range.start_date.format("%Y-%m-%d").to_string(),
            end_date: request.date_range.end_date.format("%Y-%m-%d").to_string(),
        }];
        if let Some(comparison) = &request.comparison_date_range {
            date_ranges.push(WireDateRange {
                start_date: comparison.start_date.format("%Y-%m-%d").to_string(),
                end_date: comparison.end_date.format("%Y-%m-%d").to_string(),
            });
        }

        let order_bys = request
            .order_by
            .iter()
            .map(|order| match &order.field {
                OrderField::Metric(name) => WireOrderBy {
                    desc: order.descending,
                    metric: Some(WireMetricOrder {
                        metric_name: name.clone(),
                    }),
                    dimension: None,
                },
                OrderField::Dimension(name) => WireOrderBy {
                    desc: order.descending,
                    metric: None,
                    dimension: Some(WireDimensionOrder {
                        dimension_name: name.clone(),
                    }),
                },
            })
            .collect();

        Self {
            date_ranges,
            dimensions: request
                .dimension_names
                .iter()
                .map(|name| WireName { name: name.clone() })
                .collect(),
            metrics: request
                .metric_names
                .iter()
                .map(|name| WireName { name: name.clone() })
                .collect(),
            order_bys,
            limit: request.limit,
        }
    }
}
