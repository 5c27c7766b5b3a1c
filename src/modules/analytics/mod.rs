pub mod controllers;
pub mod models;
pub mod services;

pub use models::WebAnalyticsSummary;
pub use services::{GoogleAuthenticator, ReportClient};
