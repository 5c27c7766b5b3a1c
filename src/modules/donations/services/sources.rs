use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::Result;
use crate::modules::donations::models::{ChargePage, UserProfile};

/// Paginated access to the payment processor's charge history
///
/// The aggregator drives the page loop; implementations only answer one page
/// at a time. `created_after` is the window's lower bound (inclusive), `None`
/// for unbounded history.
#[async_trait]
pub trait ChargeSource: Send + Sync {
    async fn list_page(
        &self,
        created_after: Option<DateTime<Utc>>,
        cursor: Option<&str>,
    ) -> Result<ChargePage>;
}

/// Batched lookup of user display fields
///
/// Ids missing from the result are tolerated by callers; a failed lookup is
/// not, since enrichment is required and errors propagate.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn lookup(&self, ids: &[String]) -> Result<Vec<UserProfile>>;
}
