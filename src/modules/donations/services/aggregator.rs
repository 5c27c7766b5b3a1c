use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::core::Result;
use crate::modules::donations::models::{
    Charge, DonationAggregate, DonorTotal, LookbackWindow, RecentDonation, TopDonor, UserProfile,
    ANONYMOUS_DISPLAY_NAME, ANONYMOUS_USER_KEY,
};
use crate::modules::donations::services::sources::{ChargeSource, ProfileSource};

/// Cap on the recent-activity list, first charges in fetch order
pub const RECENT_DONATIONS_CAP: usize = 10;

/// Folds the full charge history of a lookback window into a DonationAggregate
///
/// Drives the charge-listing pagination until the cursor is exhausted, then
/// does one batched profile lookup for every distinct donor. Either upstream
/// failing fails the whole aggregation; there is no partial-result contract.
pub struct DonationAggregator<'a> {
    charges: &'a dyn ChargeSource,
    profiles: &'a dyn ProfileSource,
}

impl<'a> DonationAggregator<'a> {
    pub fn new(charges: &'a dyn ChargeSource, profiles: &'a dyn ProfileSource) -> Self {
        Self { charges, profiles }
    }

    pub async fn aggregate(
        &self,
        window: LookbackWindow,
        now: DateTime<Utc>,
    ) -> Result<DonationAggregate> {
        let created_after = window.start_after(now);

        let mut fold = Fold::default();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .charges
                .list_page(created_after, cursor.as_deref())
                .await?;
            pages += 1;

            for charge in &page.charges {
                // Unsuccessful or unpaid charges are silently excluded.
                if charge.counts() {
                    fold.absorb(charge);
                }
            }

            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        let profile_index = self.resolve_profiles(&fold).await?;
        let aggregate = fold.finish(&profile_index);

        info!(
            window = window.as_str(),
            pages,
            count = aggregate.count,
            gross = %aggregate.gross_total,
            "Donation aggregation complete"
        );

        Ok(aggregate)
    }

    /// One batched lookup for all distinct donor ids seen in the window
    async fn resolve_profiles(&self, fold: &Fold) -> Result<HashMap<String, UserProfile>> {
        let ids: Vec<String> = fold
            .user_order
            .iter()
            .filter(|key| key.as_str() != ANONYMOUS_USER_KEY)
            .cloned()
            .collect();

        let profiles = self.profiles.lookup(&ids).await?;

        if profiles.len() < ids.len() {
            warn!(
                requested = ids.len(),
                resolved = profiles.len(),
                "Some donor profiles are missing; aggregating them as anonymous"
            );
        }

        Ok(profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect())
    }
}

/// Single-pass accumulator over successful charges
#[derive(Default)]
struct Fold {
    gross_minor: i64,
    fee_minor: i64,
    count: u64,
    totals_minor: HashMap<String, i64>,
    /// First-encountered order of user keys, also the tie-break order
    user_order: Vec<String>,
    recent: Vec<RecentCharge>,
}

struct RecentCharge {
    user_key: String,
    amount_minor: i64,
    created_at: DateTime<Utc>,
}

impl Fold {
    fn absorb(&mut self, charge: &Charge) {
        self.gross_minor += charge.amount_minor;
        self.fee_minor += charge.fee_minor;
        self.count += 1;

        let key = charge.user_key().to_string();
        if !self.totals_minor.contains_key(&key) {
            self.user_order.push(key.clone());
        }
        *self.totals_minor.entry(key.clone()).or_insert(0) += charge.amount_minor;

        if self.recent.len() < RECENT_DONATIONS_CAP {
            self.recent.push(RecentCharge {
                user_key: key,
                amount_minor: charge.amount_minor,
                created_at: charge.created_at,
            });
        }
    }

    fn finish(self, profiles: &HashMap<String, UserProfile>) -> DonationAggregate {
        let display = |key: &str| -> (String, String) {
            match profiles.get(key) {
                Some(profile) => (profile.display_name.clone(), profile.avatar_url.clone()),
                None => (ANONYMOUS_DISPLAY_NAME.to_string(), String::new()),
            }
        };

        let per_user_totals: Vec<DonorTotal> = self
            .user_order
            .iter()
            .map(|key| {
                let (display_name, avatar_url) = display(key);
                DonorTotal {
                    user_id: key.clone(),
                    display_name,
                    avatar_url,
                    total: to_major(self.totals_minor[key]),
                }
            })
            .collect();

        // Strictly-greater comparison over first-encountered order keeps the
        // earliest donor on ties.
        let top_donor = per_user_totals
            .iter()
            .fold(None::<&DonorTotal>, |best, entry| match best {
                Some(current) if current.total >= entry.total => Some(current),
                _ => Some(entry),
            })
            .map(|entry| TopDonor {
                name: entry.display_name.clone(),
                amount: entry.total,
            })
            .unwrap_or_else(TopDonor::none);

        let recent_donations = self
            .recent
            .iter()
            .map(|recent| {
                let (display_name, avatar_url) = display(&recent.user_key);
                RecentDonation {
                    display_name,
                    avatar_url,
                    amount: to_major(recent.amount_minor),
                    created_at: recent.created_at,
                }
            })
            .collect();

        let gross_total = to_major(self.gross_minor);
        let fee_total = to_major(self.fee_minor);

        DonationAggregate {
            net_total: gross_total - fee_total,
            gross_total,
            fee_total,
            count: self.count,
            per_user_totals,
            top_donor,
            recent_donations,
        }
    }
}

/// Minor units (cents) to major units with two decimal places
fn to_major(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}
