//! Stoutly Dashboard Backend Library
//!
//! Server-side integration layer for the Stoutly internal analytics
//! dashboard: Google Analytics report fetching and shaping, and Stripe
//! donation aggregation enriched with user profiles.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::analytics;
pub use modules::donations;
