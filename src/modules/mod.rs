pub mod analytics;
pub mod donations;
