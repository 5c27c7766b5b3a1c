use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GoogleConfig;
use crate::core::{AppError, Result};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Exchanges a service-account key for a short-lived Google access token
///
/// Every call performs a fresh exchange; tokens are deliberately not cached.
/// Request volume on the dashboard is low enough that the extra round trip is
/// preferable to expiry bookkeeping.
pub struct GoogleAuthenticator {
    client: Client,
    client_email: String,
    private_key: String,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl GoogleAuthenticator {
    pub fn new(google: &GoogleConfig) -> Self {
        Self {
            client: Client::new(),
            client_email: google.client_email.clone(),
            private_key: google.private_key.clone(),
        }
    }

    /// Fetch a bearer token scoped to the given API surface
    pub async fn fetch_access_token(&self, scope: &str) -> Result<String> {
        let assertion = self.sign_assertion(scope)?;

        #[derive(Serialize)]
        struct TokenRequest<'a> {
            grant_type: &'a str,
            assertion: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&TokenRequest {
                grant_type: JWT_BEARER_GRANT,
                assertion: &assertion,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AuthExchange { status, body });
        }

        let token: TokenResponse = response.json().await?;

        debug!(scope, "Obtained Google access token");

        Ok(token.access_token)
    }

    fn sign_assertion(&self, scope: &str) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| AppError::credential(format!("Unparseable RSA key: {}", e)))?;

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope,
            aud: TOKEN_ENDPOINT,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| AppError::credential(format!("Failed to sign assertion: {}", e)))
    }
}
