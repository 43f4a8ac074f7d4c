use std::time::Duration;

use reqwest::Client;

use super::credentials::CredentialStore;
use crate::config::AppConfig;
use crate::Result;

/// What happened to the token during revocation
#[derive(Debug, PartialEq, Eq)]
pub enum RevokeStatus {
    /// No credential file exists; nothing to do
    NoCredential,
    /// Provider confirmed the revocation
    Revoked,
    /// Provider returned a non-200 status; the token may already be
    /// expired. The local credential file is deleted regardless.
    ProviderRejected(u16),
}

/// Revoke the stored token server-side, then delete the local credential.
pub async fn revoke_token(
    config: &AppConfig,
    store: &dyn CredentialStore,
) -> Result<RevokeStatus> {
    let credential = match store.load()? {
        Some(credential) => credential,
        None => return Ok(RevokeStatus::NoCredential),
    };

    let client = Client::builder()
        .timeout(Duration::from_secs(config.api.request_timeout_secs))
        .build()?;

    let response = client
        .post(&config.auth.revoke_url)
        .query(&[("token", credential.token.as_str())])
        .send()
        .await?;

    let status = response.status();
    store.delete()?;

    if status.is_success() {
        tracing::info!("Token revoked on the provider's servers");
        Ok(RevokeStatus::Revoked)
    } else {
        tracing::warn!("Revocation request returned status {}", status.as_u16());
        Ok(RevokeStatus::ProviderRejected(status.as_u16()))
    }
}
