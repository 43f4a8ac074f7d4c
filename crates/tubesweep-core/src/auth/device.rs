use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::credentials::{ClientSecrets, Credential};
use crate::config::AppConfig;
use crate::{Error, Result};

const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// How much the polling interval grows on a slow_down signal
const SLOW_DOWN_STEP_SECS: u64 = 5;

/// Response to a device-code request
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAuthorization {
    pub device_code: String,
    /// Code the user enters on the verification page
    pub user_code: String,
    pub verification_url: String,
    /// Seconds until the device code expires
    pub expires_in: u64,
    /// Suggested polling interval in seconds
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    5
}

/// Tokens returned by a successful device-flow grant
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenGrant {
    /// Build the credential record to persist for this grant
    pub fn into_credential(
        self,
        secrets: &ClientSecrets,
        token_uri: String,
        scopes: &[&str],
    ) -> Credential {
        let expiry = self
            .expires_in
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs));

        Credential {
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            token: self.access_token,
            refresh_token: self.refresh_token,
            token_uri,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            expiry,
        }
    }
}

/// Outcome of a single token-endpoint poll
#[derive(Debug)]
pub enum PollStatus {
    /// The user has not acted yet; keep polling
    Pending,
    /// Provider asked us to poll less often
    SlowDown,
    Granted(TokenGrant),
    Denied,
    Expired,
    /// Any other provider error string
    Failed(String),
}

/// Raw token-endpoint response; either a grant or an error string
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: Option<String>,
    error_description: Option<String>,
}

fn classify(response: TokenResponse) -> PollStatus {
    if let Some(error) = response.error {
        return match error.as_str() {
            "authorization_pending" => PollStatus::Pending,
            "slow_down" => PollStatus::SlowDown,
            "expired_token" => PollStatus::Expired,
            "access_denied" => PollStatus::Denied,
            other => PollStatus::Failed(other.to_string()),
        };
    }

    match response.access_token {
        Some(access_token) => PollStatus::Granted(TokenGrant {
            access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
        }),
        None => PollStatus::Failed("token response carried neither a token nor an error".into()),
    }
}

/// OAuth 2.0 device flow against the configured provider endpoints
pub struct DeviceFlow {
    client: Client,
    device_code_url: String,
    token_url: String,
    secrets: ClientSecrets,
}

impl DeviceFlow {
    pub fn new(config: &AppConfig, secrets: ClientSecrets) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            device_code_url: config.auth.device_code_url.clone(),
            token_url: config.auth.token_url.clone(),
            secrets,
        })
    }

    /// Request a device code and the user-facing verification details
    pub async fn start(&self, scopes: &[&str]) -> Result<DeviceAuthorization> {
        let scope = scopes.join(" ");
        let response = self
            .client
            .post(&self.device_code_url)
            .form(&[
                ("client_id", self.secrets.client_id.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ProviderError>().await {
                Ok(body) => format!(
                    "{}: {}",
                    body.error.unwrap_or_else(|| status.to_string()),
                    body.error_description.unwrap_or_default()
                ),
                Err(_) => status.to_string(),
            };
            return Err(Error::Auth(format!(
                "the provider rejected the client credentials ({}). \
                 Make sure client_secrets.json uses an OAuth client of type \
                 'TVs and Limited Input devices'.",
                detail.trim_end_matches([':', ' '])
            )));
        }

        Ok(response.json().await?)
    }

    /// Poll the token endpoint once and classify the outcome
    pub async fn poll_once(&self, device_code: &str) -> Result<PollStatus> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
                ("device_code", device_code),
                ("grant_type", DEVICE_GRANT_TYPE),
            ])
            .send()
            .await?;

        // The provider answers pending/denied polls with a 4xx status but a
        // well-formed JSON body; classification goes by the body alone.
        let body: TokenResponse = response.json().await?;
        Ok(classify(body))
    }

    /// Poll until the user grants or the device code expires.
    ///
    /// `on_pending` runs after each pending poll, letting the caller show
    /// progress without the flow knowing about consoles.
    pub async fn wait_for_grant(
        &self,
        authorization: &DeviceAuthorization,
        on_pending: impl FnMut(),
    ) -> Result<TokenGrant> {
        drive(
            authorization,
            || self.poll_once(&authorization.device_code),
            on_pending,
        )
        .await
    }
}

/// Polling driver: sleeps the current interval between polls, grows the
/// interval on slow_down, and gives up when the device-code deadline passes.
async fn drive<P, Fut>(
    authorization: &DeviceAuthorization,
    mut poll: P,
    mut on_pending: impl FnMut(),
) -> Result<TokenGrant>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus>>,
{
    let deadline =
        tokio::time::Instant::now() + Duration::from_secs(authorization.expires_in);
    let mut interval = Duration::from_secs(authorization.interval);

    loop {
        tokio::time::sleep(interval).await;
        if tokio::time::Instant::now() >= deadline {
            return Err(Error::Auth(
                "authorization timed out, run 'tubesweep auth' again".into(),
            ));
        }

        match poll().await? {
            PollStatus::Pending => on_pending(),
            PollStatus::SlowDown => {
                interval += Duration::from_secs(SLOW_DOWN_STEP_SECS);
                tracing::debug!(
                    "Provider sent slow_down, polling every {}s now",
                    interval.as_secs()
                );
            }
            PollStatus::Granted(grant) => return Ok(grant),
            PollStatus::Denied => return Err(Error::Auth("authorization denied".into())),
            PollStatus::Expired => {
                return Err(Error::Auth(
                    "device code expired, run 'tubesweep auth' again".into(),
                ))
            }
            PollStatus::Failed(error) => {
                return Err(Error::Auth(format!(
                    "unexpected token endpoint error: {}",
                    error
                )))
            }
        }
    }
}
