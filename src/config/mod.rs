use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod server;

pub use server::ServerConfig;

/// Main application configuration
///
/// Constructed once at startup and handed to request handlers as app data.
/// Upstream clients are built per request from these values rather than held
/// as process-wide globals, so tests can substitute fakes freely.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub google: GoogleConfig,
    pub stripe: StripeConfig,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Google service-account credentials and GA4 property binding
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_email: String,
    pub private_key: String,
    pub property_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            server: ServerConfig::from_env()?,
            google: GoogleConfig {
                client_email: env::var("GOOGLE_CLIENT_EMAIL").map_err(|_| {
                    AppError::Configuration("GOOGLE_CLIENT_EMAIL not set".to_string())
                })?,
                // Keys pasted into env files usually carry escaped newlines
                private_key: env::var("GOOGLE_PRIVATE_KEY")
                    .map(|key| key.replace("\\n", "\n"))
                    .map_err(|_| {
                        AppError::Configuration("GOOGLE_PRIVATE_KEY not set".to_string())
                    })?,
                property_id: env::var("GA4_PROPERTY_ID")
                    .map_err(|_| AppError::Configuration("GA4_PROPERTY_ID not set".to_string()))?,
            },
            stripe: StripeConfig {
                secret_key: env::var("STRIPE_SECRET_KEY")
                    .map_err(|_| AppError::Configuration("STRIPE_SECRET_KEY not set".to_string()))?,
                base_url: env::var("STRIPE_BASE_URL")
                    .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            },
            supabase: SupabaseConfig {
                url: env::var("SUPABASE_URL")
                    .map_err(|_| AppError::Configuration("SUPABASE_URL not set".to_string()))?,
                service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").map_err(|_| {
                    AppError::Configuration("SUPABASE_SERVICE_ROLE_KEY not set".to_string())
                })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.google.private_key.contains("PRIVATE KEY") {
            return Err(AppError::Configuration(
                "GOOGLE_PRIVATE_KEY does not look like a PEM key".to_string(),
            ));
        }

        if self.google.property_id.is_empty() {
            return Err(AppError::Configuration(
                "GA4_PROPERTY_ID must not be empty".to_string(),
            ));
        }

        if !self.stripe.secret_key.starts_with("sk_") {
            return Err(AppError::Configuration(
                "STRIPE_SECRET_KEY must be a secret key (sk_...)".to_string(),
            ));
        }

        Ok(())
    }
}
