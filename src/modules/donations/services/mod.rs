pub mod aggregator;
pub mod profile_client;
pub mod sources;
pub mod stripe_client;

pub use aggregator::DonationAggregator;
pub use profile_client::SupabaseProfileClient;
pub use sources::{ChargeSource, ProfileSource};
pub use stripe_client::StripeChargeClient;
