use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::config::StripeConfig;
use crate::core::{AppError, Result};
use crate::modules::donations::models::{Charge, ChargePage};
use crate::modules::donations::services::sources::ChargeSource;

/// Fixed page size for the charge-listing loop
pub const PAGE_SIZE: u32 = 100;

const MAX_TRANSIENT_RETRIES: u32 = 3;

/// Stripe charge-listing client
///
/// Lists charges newest-first with the fee sub-record expanded in place.
/// Transient network failures are retried with exponential backoff inside the
/// transport; a non-2xx answer is surfaced as `PaymentApi` untouched.
pub struct StripeChargeClient {
    client: ClientWithMiddleware,
    secret_key: String,
    base_url: String,
}

impl StripeChargeClient {
    pub fn new(stripe: &StripeConfig) -> Self {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(MAX_TRANSIENT_RETRIES);
        let client = ClientBuilder::new(reqwest::Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            client,
            secret_key: stripe.secret_key.clone(),
            base_url: stripe.base_url.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChargeList {
    #[serde(default)]
    data: Vec<WireCharge>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Deserialize)]
struct WireCharge {
    id: String,
    amount: i64,
    status: String,
    paid: bool,
    created: i64,
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    balance_transaction: Option<WireBalanceTransaction>,
}

/// Expanded fee sub-record; an unexpanded string id deserializes as `Id`
/// and contributes a zero fee.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireBalanceTransaction {
    Expanded { fee: i64 },
    Id(String),
}

impl WireCharge {
    fn into_charge(self) -> Charge {
        let fee_minor = match self.balance_transaction {
            Some(WireBalanceTransaction::Expanded { fee }) => fee,
            _ => 0,
        };

        Charge {
            amount_minor: self.amount,
            fee_minor,
            succeeded: self.status == "succeeded",
            paid: self.paid,
            created_at: Utc
                .timestamp_opt(self.created, 0)
                .single()
                .unwrap_or_else(Utc::now),
            user_id: self.metadata.get("user_id").cloned(),
            id: self.id,
        }
    }
}

#[async_trait]
impl ChargeSource for StripeChargeClient {
    async fn list_page(
        &self,
        created_after: Option<DateTime<Utc>>,
        cursor: Option<&str>,
    ) -> Result<ChargePage> {
        let url = format!("{}/v1/charges", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("limit", PAGE_SIZE.to_string()),
            ("expand[]", "data.balance_transaction".to_string()),
        ];
        if let Some(after) = created_after {
            query.push(("created[gte]", after.timestamp().to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("starting_after", cursor.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PaymentApi { status, body });
        }

        let list: ChargeList = response
            .json()
            .await
            .map_err(AppError::HttpClient)?;

        debug!(
            fetched = list.data.len(),
            has_more = list.has_more,
            "Fetched charge page"
        );

        let next_cursor = if list.has_more {
            list.data.last().map(|charge| charge.id.clone())
        } else {
            None
        };

        Ok(ChargePage {
            charges: list.data.into_iter().map(WireCharge::into_charge).collect(),
            next_cursor,
        })
    }
}
