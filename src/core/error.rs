use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Validation errors for request parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (missing or invalid environment)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed service-account key material
    #[error("Credential error: {0}")]
    Credential(String),

    /// Token exchange rejected by the OAuth endpoint
    #[error("Auth exchange failed ({status}): {body}")]
    AuthExchange { status: u16, body: String },

    /// Analytics reporting API returned non-2xx
    #[error("Reporting API error ({status}): {body}")]
    ReportingApi { status: u16, body: String },

    /// Payment API returned non-2xx
    #[error("Payment API error ({status}): {body}")]
    PaymentApi { status: u16, body: String },

    /// Profile batch lookup failed
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// HTTP client errors surfaced through the retry middleware
    #[error("HTTP client error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::AuthExchange { .. } => StatusCode::BAD_GATEWAY,
            AppError::ReportingApi { .. } => StatusCode::BAD_GATEWAY,
            AppError::PaymentApi { .. } => StatusCode::BAD_GATEWAY,
            AppError::Lookup(_) => StatusCode::BAD_GATEWAY,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::HttpMiddleware(_) => StatusCode::BAD_GATEWAY,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn credential(msg: impl Into<String>) -> Self {
        AppError::Credential(msg.into())
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        AppError::Lookup(msg.into())
    }
}
