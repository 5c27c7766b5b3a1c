use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use std::sync::Mutex;

use stoutly_dashboard::core::{AppError, Result};
use stoutly_dashboard::donations::models::{Charge, ChargePage, LookbackWindow, UserProfile};
use stoutly_dashboard::donations::services::aggregator::RECENT_DONATIONS_CAP;
use stoutly_dashboard::donations::services::{ChargeSource, DonationAggregator, ProfileSource};

fn charge(id: &str, amount: i64, fee: i64, succeeded: bool, user_id: Option<&str>) -> Charge {
    Charge {
        id: id.to_string(),
        amount_minor: amount,
        fee_minor: fee,
        succeeded,
        paid: succeeded,
        created_at: Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap(),
        user_id: user_id.map(|s| s.to_string()),
    }
}

fn profile(id: &str, name: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        display_name: name.to_string(),
        avatar_url: format!("avatars/{}.png", id),
    }
}

/// In-memory charge history served one page at a time
struct FakeChargeSource {
    pages: Vec<Vec<Charge>>,
    seen_created_after: Mutex<Vec<Option<DateTime<Utc>>>>,
}

impl FakeChargeSource {
    fn new(pages: Vec<Vec<Charge>>) -> Self {
        Self {
            pages,
            seen_created_after: Mutex::new(Vec::new()),
        }
    }

    fn single_page(charges: Vec<Charge>) -> Self {
        Self::new(vec![charges])
    }
}

#[async_trait]
impl ChargeSource for FakeChargeSource {
    async fn list_page(
        &self,
        created_after: Option<DateTime<Utc>>,
        cursor: Option<&str>,
    ) -> Result<ChargePage> {
        self.seen_created_after.lock().unwrap().push(created_after);

        let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let charges = self.pages.get(index).cloned().unwrap_or_default();
        let next_cursor = if index + 1 < self.pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(ChargePage {
            charges,
            next_cursor,
        })
    }
}

struct FailingChargeSource;

#[async_trait]
impl ChargeSource for FailingChargeSource {
    async fn list_page(&self, _: Option<DateTime<Utc>>, _: Option<&str>) -> Result<ChargePage> {
        Err(AppError::PaymentApi {
            status: 500,
            body: "stripe is down".to_string(),
        })
    }
}

struct FakeProfileSource {
    profiles: Vec<UserProfile>,
}

#[async_trait]
impl ProfileSource for FakeProfileSource {
    async fn lookup(&self, ids: &[String]) -> Result<Vec<UserProfile>> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

struct FailingProfileSource;

#[async_trait]
impl ProfileSource for FailingProfileSource {
    async fn lookup(&self, _: &[String]) -> Result<Vec<UserProfile>> {
        Err(AppError::lookup("profile table unavailable"))
    }
}

#[tokio::test]
async fn test_synthetic_charge_list_aggregates_to_known_totals() {
    // 3 successes ($10/$0.30, $20/$0.60, anonymous $5/$0.15), 1 failed $100
    let charges = FakeChargeSource::single_page(vec![
        charge("ch_1", 1000, 30, true, Some("user-a")),
        charge("ch_2", 2000, 60, true, Some("user-b")),
        charge("ch_3", 500, 15, true, None),
        charge("ch_4", 10000, 0, false, Some("user-a")),
    ]);
    let profiles = FakeProfileSource {
        profiles: vec![profile("user-a", "Aoife"), profile("user-b", "Beth")],
    };

    let aggregate = DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::All, Utc::now())
        .await
        .unwrap();

    assert_eq!(aggregate.gross_total, dec!(35.00));
    assert_eq!(aggregate.fee_total, dec!(1.05));
    assert_eq!(aggregate.net_total, dec!(33.95));
    assert_eq!(aggregate.count, 3);

    assert_eq!(aggregate.top_donor.name, "Beth");
    assert_eq!(aggregate.top_donor.amount, dec!(20.00));

    // Recent activity keeps original fetch order, failed charge excluded
    assert_eq!(aggregate.recent_donations.len(), 3);
    assert_eq!(aggregate.recent_donations[0].display_name, "Aoife");
    assert_eq!(aggregate.recent_donations[1].display_name, "Beth");
    assert_eq!(aggregate.recent_donations[2].display_name, "Anonymous");
    assert_eq!(aggregate.recent_donations[2].avatar_url, "");
    assert_eq!(aggregate.recent_donations[2].amount, dec!(5.00));
}

#[tokio::test]
async fn test_zero_successful_charges_yields_sentinel_without_failing() {
    let charges = FakeChargeSource::single_page(vec![charge(
        "ch_1",
        10000,
        0,
        false,
        Some("user-a"),
    )]);
    let profiles = FakeProfileSource { profiles: vec![] };

    let aggregate = DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::Week, Utc::now())
        .await
        .unwrap();

    assert_eq!(aggregate.gross_total, dec!(0.00));
    assert_eq!(aggregate.count, 0);
    assert_eq!(aggregate.top_donor.name, "N/A");
    assert_eq!(aggregate.top_donor.amount, dec!(0));
    assert!(aggregate.per_user_totals.is_empty());
    assert!(aggregate.recent_donations.is_empty());
}

#[tokio::test]
async fn test_profile_lookup_failure_is_fatal() {
    let charges = FakeChargeSource::single_page(vec![charge(
        "ch_1",
        1000,
        30,
        true,
        Some("user-a"),
    )]);

    let err = DonationAggregator::new(&charges, &FailingProfileSource)
        .aggregate(LookbackWindow::All, Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Lookup(_)));
}

#[tokio::test]
async fn test_charge_listing_failure_is_fatal() {
    let profiles = FakeProfileSource { profiles: vec![] };

    let err = DonationAggregator::new(&FailingChargeSource, &profiles)
        .aggregate(LookbackWindow::Month, Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PaymentApi { status: 500, .. }));
}

#[tokio::test]
async fn test_aggregation_spans_all_pages() {
    let charges = FakeChargeSource::new(vec![
        vec![charge("ch_1", 1000, 30, true, Some("user-a"))],
        vec![charge("ch_2", 2000, 60, true, Some("user-a"))],
        vec![charge("ch_3", 4000, 120, true, Some("user-b"))],
    ]);
    let profiles = FakeProfileSource {
        profiles: vec![profile("user-a", "Aoife"), profile("user-b", "Beth")],
    };

    let aggregate = DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::All, Utc::now())
        .await
        .unwrap();

    assert_eq!(aggregate.count, 3);
    assert_eq!(aggregate.gross_total, dec!(70.00));
    assert_eq!(aggregate.per_user_totals.len(), 2);
    assert_eq!(aggregate.top_donor.name, "Beth");
    assert_eq!(aggregate.top_donor.amount, dec!(40.00));
}

#[tokio::test]
async fn test_recent_donations_capped_at_first_ten() {
    let many: Vec<Charge> = (0..15)
        .map(|i| charge(&format!("ch_{}", i), 100 + i, 3, true, Some("user-a")))
        .collect();
    let charges = FakeChargeSource::single_page(many);
    let profiles = FakeProfileSource {
        profiles: vec![profile("user-a", "Aoife")],
    };

    let aggregate = DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::All, Utc::now())
        .await
        .unwrap();

    assert_eq!(aggregate.count, 15);
    assert_eq!(aggregate.recent_donations.len(), RECENT_DONATIONS_CAP);
    // First ten in fetch order, not the largest ten
    assert_eq!(aggregate.recent_donations[0].amount, dec!(1.00));
    assert_eq!(aggregate.recent_donations[9].amount, dec!(1.09));
}

#[tokio::test]
async fn test_top_donor_tie_goes_to_first_encountered() {
    let charges = FakeChargeSource::single_page(vec![
        charge("ch_1", 1500, 45, true, Some("user-a")),
        charge("ch_2", 1500, 45, true, Some("user-b")),
    ]);
    let profiles = FakeProfileSource {
        profiles: vec![profile("user-a", "Aoife"), profile("user-b", "Beth")],
    };

    let aggregate = DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::All, Utc::now())
        .await
        .unwrap();

    assert_eq!(aggregate.top_donor.name, "Aoife");
}

#[tokio::test]
async fn test_missing_profile_aggregates_as_anonymous() {
    let charges = FakeChargeSource::single_page(vec![charge(
        "ch_1",
        1000,
        30,
        true,
        Some("user-gone"),
    )]);
    let profiles = FakeProfileSource { profiles: vec![] };

    let aggregate = DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::All, Utc::now())
        .await
        .unwrap();

    assert_eq!(aggregate.count, 1);
    assert_eq!(aggregate.per_user_totals[0].user_id, "user-gone");
    assert_eq!(aggregate.per_user_totals[0].display_name, "Anonymous");
    assert_eq!(aggregate.per_user_totals[0].avatar_url, "");
    assert_eq!(aggregate.top_donor.name, "Anonymous");
}

#[tokio::test]
async fn test_window_lower_bound_is_forwarded_to_the_source() {
    let charges = FakeChargeSource::single_page(vec![]);
    let profiles = FakeProfileSource { profiles: vec![] };
    let now = Utc.with_ymd_and_hms(2025, 3, 17, 12, 0, 0).unwrap();

    DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::Week, now)
        .await
        .unwrap();
    DonationAggregator::new(&charges, &profiles)
        .aggregate(LookbackWindow::All, now)
        .await
        .unwrap();

    let seen = charges.seen_created_after.lock().unwrap();
    assert_eq!(seen[0], Some(now - Duration::days(7)));
    assert_eq!(seen[1], None);
}
