use std::io::{self, Write};

use anyhow::Result;

use tubesweep_core::auth::{
    ClientSecrets, CredentialStore, DeviceFlow, FileCredentialStore, YOUTUBE_SCOPE,
};
use tubesweep_core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let store = FileCredentialStore::new(config.credentials_path());

    if store.load()?.is_some() {
        println!("Token already exists at {}.", config.credentials_path().display());
        println!("Run 'tubesweep revoke' first if you want to re-authenticate.");
        return Ok(());
    }

    let secrets = ClientSecrets::load(&config.client_secrets_path())?;
    let flow = DeviceFlow::new(config, secrets.clone())?;

    let authorization = flow.start(&[YOUTUBE_SCOPE]).await?;

    println!();
    println!("Open the following URL on any device (phone, laptop, etc.):");
    println!("\n  {}\n", authorization.verification_url);
    println!("Then enter the code: {}", authorization.user_code);
    println!();
    print!("Waiting for authorization");
    io::stdout().flush()?;

    let grant = flow
        .wait_for_grant(&authorization, || {
            print!(".");
            let _ = io::stdout().flush();
        })
        .await?;

    println!("\nAuthorization successful!");

    let credential =
        grant.into_credential(&secrets, config.auth.token_url.clone(), &[YOUTUBE_SCOPE]);
    store.save(&credential)?;

    println!("Token saved to {}.", config.credentials_path().display());

    Ok(())
}
