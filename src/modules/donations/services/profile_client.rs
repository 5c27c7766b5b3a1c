use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::SupabaseConfig;
use crate::core::{AppError, Result};
use crate::modules::donations::models::UserProfile;
use crate::modules::donations::services::sources::ProfileSource;

/// Profile lookup over the Supabase REST interface
///
/// One batched read per aggregation, keyed by the distinct user ids collected
/// from charges.
pub struct SupabaseProfileClient {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseProfileClient {
    pub fn new(supabase: &SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: supabase.url.trim_end_matches('/').to_string(),
            service_role_key: supabase.service_role_key.clone(),
        }
    }
}

#[derive(Deserialize)]
struct WireProfile {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[async_trait]
impl ProfileSource for SupabaseProfileClient {
    async fn lookup(&self, ids: &[String]) -> Result<Vec<UserProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/rest/v1/profiles", self.base_url);
        let id_filter = format!(
            "in.({})",
            ids.iter()
                .map(|id| format!("\"{}\"", id))
                .collect::<Vec<_>>()
                .join(",")
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .query(&[
                ("select", "id,display_name,avatar_url"),
                ("id", id_filter.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::lookup(format!(
                "Profile batch read failed ({}): {}",
                status, body
            )));
        }

        let profiles: Vec<WireProfile> = response.json().await?;

        debug!(
            requested = ids.len(),
            resolved = profiles.len(),
            "Resolved donor profiles"
        );

        Ok(profiles
            .into_iter()
            .map(|profile| UserProfile {
                display_name: profile
                    .display_name
                    .unwrap_or_else(|| profile.id.clone()),
                avatar_url: profile.avatar_url.unwrap_or_default(),
                id: profile.id,
            })
            .collect())
    }
}
