use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::credentials::{Credential, CredentialStore};
use crate::config::AppConfig;
use crate::{Error, Result};

/// Response to a refresh-token exchange
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RefreshError {
    error: Option<String>,
    error_description: Option<String>,
}

/// Supplies a valid bearer token, refreshing the stored credential when it
/// has expired and rewriting the credential file in place.
#[derive(Debug)]
pub struct Authenticator<S> {
    client: Client,
    store: S,
    credential: Credential,
}

impl<S: CredentialStore> Authenticator<S> {
    pub fn new(config: &AppConfig, store: S) -> Result<Self> {
        let credential = store.load()?.ok_or_else(|| {
            Error::Credential(format!(
                "{} not found. Run 'tubesweep auth' first to authenticate.",
                config.credentials_path().display()
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            store,
            credential,
        })
    }

    /// Current bearer token, refreshed first if expired
    pub async fn bearer_token(&mut self) -> Result<String> {
        if self.credential.is_expired(Utc::now()) {
            if self.credential.refresh_token.is_none() {
                return Err(Error::Auth(
                    "token expired and no refresh token is available, \
                     run 'tubesweep auth' again"
                        .into(),
                ));
            }
            self.refresh().await?;
        }

        Ok(self.credential.token.clone())
    }

    async fn refresh(&mut self) -> Result<()> {
        tracing::info!("Access token expired, refreshing");

        let refresh_token = self
            .credential
            .refresh_token
            .clone()
            .ok_or_else(|| Error::Auth("no refresh token available".into()))?;

        let response = self
            .client
            .post(&self.credential.token_uri)
            .form(&[
                ("client_id", self.credential.client_id.as_str()),
                ("client_secret", self.credential.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<RefreshError>().await {
                Ok(body) => format!(
                    "{} {}",
                    body.error.unwrap_or_else(|| status.to_string()),
                    body.error_description.unwrap_or_default()
                ),
                Err(_) => status.to_string(),
            };
            return Err(Error::Auth(format!(
                "token refresh failed: {}",
                detail.trim()
            )));
        }

        let body: RefreshResponse = response.json().await?;
        self.credential.token = body.access_token;
        self.credential.expiry = body
            .expires_in
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs));

        // Persist the refreshed token
        self.store.save(&self.credential)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::YOUTUBE_SCOPE;

    /// In-memory credential store recording saves
    #[derive(Default, Debug)]
    struct MemoryStore {
        credential: Mutex<Option<Credential>>,
        saves: Mutex<u32>,
    }

    impl CredentialStore for MemoryStore {
        fn load(&self) -> Result<Option<Credential>> {
            Ok(self.credential.lock().unwrap().clone())
        }

        fn save(&self, credential: &Credential) -> Result<()> {
            *self.credential.lock().unwrap() = Some(credential.clone());
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }

        fn delete(&self) -> Result<()> {
            *self.credential.lock().unwrap() = None;
            Ok(())
        }
    }

    fn store_with(credential: Credential) -> MemoryStore {
        MemoryStore {
            credential: Mutex::new(Some(credential)),
            saves: Mutex::new(0),
        }
    }

    fn credential(token_uri: String, expired: bool, refresh_token: Option<&str>) -> Credential {
        let expiry = if expired {
            Utc::now() - chrono::Duration::minutes(5)
        } else {
            Utc::now() + chrono::Duration::minutes(30)
        };

        Credential {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            token: "stale-token".to_string(),
            refresh_token: refresh_token.map(|t| t.to_string()),
            token_uri,
            scopes: vec![YOUTUBE_SCOPE.to_string()],
            expiry: Some(expiry),
        }
    }

    #[tokio::test]
    async fn test_valid_token_returned_without_refresh() {
        let config = AppConfig::default();
        let store = store_with(credential(
            "http://localhost:1/token".to_string(),
            false,
            Some("1//r"),
        ));

        let mut authenticator = Authenticator::new(&config, store).unwrap();
        let token = authenticator.bearer_token().await.unwrap();

        assert_eq!(token, "stale-token");
        assert_eq!(*authenticator.store.saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_and_persists() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=1%2F%2Fr"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"access_token": "fresh-token", "expires_in": 3599}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let config = AppConfig::default();
        let store = store_with(credential(
            format!("{}/token", server.uri()),
            true,
            Some("1//r"),
        ));

        let mut authenticator = Authenticator::new(&config, store).unwrap();
        let token = authenticator.bearer_token().await.unwrap();

        assert_eq!(token, "fresh-token");
        assert_eq!(*authenticator.store.saves.lock().unwrap(), 1);

        let saved = authenticator.store.load().unwrap().unwrap();
        assert_eq!(saved.token, "fresh-token");
        assert!(saved.expiry.unwrap() > Utc::now());
        // The refresh token survives the rewrite
        assert_eq!(saved.refresh_token.as_deref(), Some("1//r"));
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token() {
        let config = AppConfig::default();
        let store = store_with(credential("http://localhost:1/token".to_string(), true, None));

        let mut authenticator = Authenticator::new(&config, store).unwrap();
        let err = authenticator.bearer_token().await.unwrap_err();

        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("tubesweep auth"));
    }

    #[tokio::test]
    async fn test_refresh_rejected_by_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_raw(
                r#"{"error": "invalid_grant", "error_description": "Token has been revoked."}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let config = AppConfig::default();
        let store = store_with(credential(
            format!("{}/token", server.uri()),
            true,
            Some("1//r"),
        ));

        let mut authenticator = Authenticator::new(&config, store).unwrap();
        let err = authenticator.bearer_token().await.unwrap_err();

        assert!(err.to_string().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn test_missing_credential_is_precondition_error() {
        let config = AppConfig::default();
        let err = Authenticator::new(&config, MemoryStore::default()).unwrap_err();

        assert!(matches!(err, Error::Credential(_)));
        assert!(err.to_string().contains("tubesweep auth"));
    }
}
