use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// OAuth scope required to read and edit the watch history
pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube";

/// Persisted OAuth credential record
///
/// Written as pretty-printed JSON and always overwritten wholesale, both on
/// the initial grant and on every refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
    /// Current bearer token
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub scopes: Vec<String>,
    /// Absent for credentials saved before expiry tracking; treated as
    /// still valid in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= now,
            None => false,
        }
    }
}

/// OAuth client identity parsed from client_secrets.json
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

/// client_secrets.json wraps the client under either an "installed" or a
/// "web" key depending on how the OAuth client was created.
#[derive(Debug, Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Credential(format!(
                "{} not found. Download OAuth 2.0 client credentials from Google Cloud Console.",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let file: SecretsFile = serde_json::from_str(&content)?;

        file.installed.or(file.web).ok_or_else(|| {
            Error::Credential(format!("Unrecognized format in {}.", path.display()))
        })
    }
}

/// Load/save seam for the persisted credential record
pub trait CredentialStore: Send + Sync {
    /// Returns None when no credential has been saved yet
    fn load(&self) -> Result<Option<Credential>>;
    fn save(&self, credential: &Credential) -> Result<()>;
    fn delete(&self) -> Result<()>;
}

/// File-backed credential store (token.json)
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let credential = serde_json::from_str(&content).map_err(|e| {
            Error::Credential(format!(
                "Unrecognized format in {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(credential))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Full serialize then single write, so the record is never
        // partially written from the caller's perspective.
        let content = serde_json::to_string_pretty(credential)?;
        std::fs::write(&self.path, content)?;

        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
