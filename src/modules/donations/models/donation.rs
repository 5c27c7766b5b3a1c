use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::core::AppError;

/// Per-user key used when a charge carries no user id
pub const ANONYMOUS_USER_KEY: &str = "anonymous";

/// Display name synthesized for donors without a resolvable profile
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// How far back the donation query reaches, always ending "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackWindow {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl LookbackWindow {
    /// Lower bound for charge creation time, `None` for unbounded
    pub fn start_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            LookbackWindow::Day => Some(now - Duration::hours(24)),
            LookbackWindow::Week => Some(now - Duration::days(7)),
            LookbackWindow::Month => Some(now - Duration::days(30)),
            LookbackWindow::Year => Some(now - Duration::days(365)),
            LookbackWindow::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackWindow::Day => "24h",
            LookbackWindow::Week => "7d",
            LookbackWindow::Month => "30d",
            LookbackWindow::Year => "1y",
            LookbackWindow::All => "all",
        }
    }
}

impl FromStr for LookbackWindow {
    type Err = AppError;

    /// Accepts exactly `24h|7d|30d|1y|all`; anything else is rejected rather
    /// than silently falling through to "all time".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(LookbackWindow::Day),
            "7d" => Ok(LookbackWindow::Week),
            "30d" => Ok(LookbackWindow::Month),
            "1y" => Ok(LookbackWindow::Year),
            "all" => Ok(LookbackWindow::All),
            other => Err(AppError::validation(format!(
                "Unknown lookback window '{}': expected 24h, 7d, 30d, 1y or all",
                other
            ))),
        }
    }
}

/// One payment record as fetched from the payment processor
#[derive(Debug, Clone)]
pub struct Charge {
    pub id: String,
    /// Amount in minor units (cents)
    pub amount_minor: i64,
    /// Processor fee in minor units, 0 when the fee record was unavailable
    pub fee_minor: i64,
    pub succeeded: bool,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<String>,
}

impl Charge {
    /// Only successful, fully paid charges count toward aggregation
    pub fn counts(&self) -> bool {
        self.succeeded && self.paid
    }

    /// Per-user aggregation key; charges without a user id pool together
    pub fn user_key(&self) -> &str {
        self.user_id.as_deref().unwrap_or(ANONYMOUS_USER_KEY)
    }
}

/// One page of the charge history, with the cursor to continue from
#[derive(Debug, Clone, Default)]
pub struct ChargePage {
    pub charges: Vec<Charge>,
    pub next_cursor: Option<String>,
}

/// User display fields resolved through the profile lookup
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Running total for one donor, kept in first-encountered order
#[derive(Debug, Clone, Serialize)]
pub struct DonorTotal {
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub total: Decimal,
}

/// The single largest donor of the window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopDonor {
    pub name: String,
    pub amount: Decimal,
}

impl TopDonor {
    /// Sentinel returned when the window holds no successful charges
    pub fn none() -> Self {
        Self {
            name: "N/A".to_string(),
            amount: Decimal::ZERO,
        }
    }
}

/// One entry of the recent-activity list, in original fetch order
#[derive(Debug, Clone, Serialize)]
pub struct RecentDonation {
    pub display_name: String,
    pub avatar_url: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Everything the dashboard's donations tab renders
///
/// Built fresh on every invocation; there is no cross-call state.
#[derive(Debug, Clone, Serialize)]
pub struct DonationAggregate {
    pub gross_total: Decimal,
    pub fee_total: Decimal,
    /// gross_total - fee_total
    pub net_total: Decimal,
    pub count: u64,
    pub per_user_totals: Vec<DonorTotal>,
    pub top_donor: TopDonor,
    pub recent_donations: Vec<RecentDonation>,
}

impl DonationAggregate {
    pub fn empty() -> Self {
        Self {
            gross_total: Decimal::ZERO,
            fee_total: Decimal::ZERO,
            net_total: Decimal::ZERO,
            count: 0,
            per_user_totals: Vec::new(),
            top_donor: TopDonor::none(),
            recent_donations: Vec::new(),
        }
    }
}
