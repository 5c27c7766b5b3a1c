pub mod donation;

pub use donation::{
    Charge, ChargePage, DonationAggregate, DonorTotal, LookbackWindow, RecentDonation, TopDonor,
    UserProfile, ANONYMOUS_DISPLAY_NAME, ANONYMOUS_USER_KEY,
};
