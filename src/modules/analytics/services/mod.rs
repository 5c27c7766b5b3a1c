pub mod credentials;
pub mod report_client;
pub mod shaper;

pub use credentials::GoogleAuthenticator;
pub use report_client::ReportClient;
