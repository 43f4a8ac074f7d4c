use anyhow::Result;

use tubesweep_core::auth::{revoke_token, FileCredentialStore, RevokeStatus};
use tubesweep_core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let store = FileCredentialStore::new(config.credentials_path());
    let credentials_path = config.credentials_path();

    match revoke_token(config, &store).await? {
        RevokeStatus::NoCredential => {
            println!(
                "No token found at {}. Nothing to revoke.",
                credentials_path.display()
            );
        }
        RevokeStatus::Revoked => {
            println!("Token successfully revoked on the provider's servers.");
            println!("{} deleted.", credentials_path.display());
            println!("Run 'tubesweep auth' to re-authenticate.");
        }
        RevokeStatus::ProviderRejected(status) => {
            println!(
                "Warning: Revocation request returned status {}. \
                 The token may already be expired.",
                status
            );
            println!("{} deleted.", credentials_path.display());
            println!("Run 'tubesweep auth' to re-authenticate.");
        }
    }

    Ok(())
}
