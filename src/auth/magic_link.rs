use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::{config::RemoteConfig, error::Result, repository::rest_table_repository::check};

/// Sends a one-time login link. Whatever the provider answers is final:
/// an error aborts the login, success lets the user in.
#[async_trait]
pub trait MagicLinkProvider: Send + Sync {
    async fn send_link(&self, email: &str) -> Result<()>;
}

/// One-time-link endpoint of the hosted backend (`/auth/v1/otp`).
pub struct HostedMagicLink {
    client: Client,
    endpoint: String,
    anon_key: String,
}

impl HostedMagicLink {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/auth/v1/otp", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
        }
    }
}

#[async_trait]
impl MagicLinkProvider for HostedMagicLink {
    async fn send_link(&self, email: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&json!({ "email": email, "create_user": true }))
            .send()
            .await?;

        check(response).await?;
        tracing::info!("Sent login link to {}", email);
        Ok(())
    }
}
