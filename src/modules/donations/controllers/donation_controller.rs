use actix_web::{error::ResponseError, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::Config;
use crate::core::Result;
use crate::modules::donations::models::{
    DonationAggregate, DonorTotal, LookbackWindow, RecentDonation,
};
use crate::modules::donations::services::{
    DonationAggregator, StripeChargeClient, SupabaseProfileClient,
};

/// Query parameters for the donation summary endpoint
#[derive(Debug, Deserialize)]
pub struct DonationSummaryQuery {
    /// Lookback window selector: 24h, 7d, 30d, 1y or all
    #[serde(default)]
    pub window: Option<String>,
}

/// Response structure for the donation summary
#[derive(Debug, Serialize)]
pub struct DonationSummaryResponse {
    pub window: String,
    pub gross_total: String, // Decimal as string for JSON precision
    pub fee_total: String,
    pub net_total: String,
    pub count: u64,
    pub top_donor: TopDonorResponse,
    pub per_user_totals: Vec<DonorTotalResponse>,
    pub recent_donations: Vec<RecentDonationResponse>,
}

#[derive(Debug, Serialize)]
pub struct TopDonorResponse {
    pub name: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct DonorTotalResponse {
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct RecentDonationResponse {
    pub display_name: String,
    pub avatar_url: String,
    pub amount: String,
    pub created_at: DateTime<Utc>,
}

impl DonationSummaryResponse {
    fn from_aggregate(window: LookbackWindow, aggregate: DonationAggregate) -> Self {
        Self {
            window: window.as_str().to_string(),
            gross_total: aggregate.gross_total.to_string(),
            fee_total: aggregate.fee_total.to_string(),
            net_total: aggregate.net_total.to_string(),
            count: aggregate.count,
            top_donor: TopDonorResponse {
                name: aggregate.top_donor.name,
                amount: aggregate.top_donor.amount.to_string(),
            },
            per_user_totals: aggregate
                .per_user_totals
                .into_iter()
                .map(DonorTotalResponse::from)
                .collect(),
            recent_donations: aggregate
                .recent_donations
                .into_iter()
                .map(RecentDonationResponse::from)
                .collect(),
        }
    }
}

impl From<DonorTotal> for DonorTotalResponse {
    fn from(total: DonorTotal) -> Self {
        Self {
            user_id: total.user_id,
            display_name: total.display_name,
            avatar_url: total.avatar_url,
            total: total.total.to_string(),
        }
    }
}

impl From<RecentDonation> for RecentDonationResponse {
    fn from(donation: RecentDonation) -> Self {
        Self {
            display_name: donation.display_name,
            avatar_url: donation.avatar_url,
            amount: donation.amount.to_string(),
            created_at: donation.created_at,
        }
    }
}

/// GET /donations/summary
///
/// Pages through the charge history for the requested window and returns the
/// folded aggregate.
pub async fn get_donation_summary(
    config: web::Data<Config>,
    query: web::Query<DonationSummaryQuery>,
) -> HttpResponse {
    match handle_get_donation_summary(config, query).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            error!("Failed to build donation summary: {}", e);
            e.error_response()
        }
    }
}

async fn handle_get_donation_summary(
    config: web::Data<Config>,
    query: web::Query<DonationSummaryQuery>,
) -> Result<DonationSummaryResponse> {
    // A missing selector means the unbounded window; a present but
    // unrecognized one is rejected by the parser.
    let window = match query.window.as_deref() {
        Some(raw) => raw.parse::<LookbackWindow>()?,
        None => LookbackWindow::All,
    };

    let stripe = StripeChargeClient::new(&config.stripe);
    let profiles = SupabaseProfileClient::new(&config.supabase);
    let aggregator = DonationAggregator::new(&stripe, &profiles);

    let aggregate = aggregator.aggregate(window, Utc::now()).await?;

    Ok(DonationSummaryResponse::from_aggregate(window, aggregate))
}

/// Configure routes for the donations module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/donations").route("/summary", web::get().to(get_donation_summary)));
}
