use anyhow::Result;
use chrono::Utc;

use tubesweep_core::api::ApiClient;
use tubesweep_core::auth::{Authenticator, FileCredentialStore};
use tubesweep_core::history::{self, parse_window};
use tubesweep_core::AppConfig;

pub async fn run(config: &AppConfig, since: &str, dry_run: bool) -> Result<()> {
    let window = parse_window(since)?;
    let cutoff = Utc::now() - window;

    let store = FileCredentialStore::new(config.credentials_path());
    let mut authenticator = Authenticator::new(config, store)?;
    let token = authenticator.bearer_token().await?;

    let api = ApiClient::new(config, token)?;
    let playlist_id = api.watch_history_playlist_id().await?;

    let summary = history::clean(&api, &playlist_id, cutoff, dry_run).await?;

    if summary.dry_run {
        if !summary.selected.is_empty() {
            println!("[dry-run] Would remove {} kids video(s):", summary.found);
            for item in &summary.selected {
                println!("  - {}  (https://youtu.be/{})", item.title, item.video_id);
            }
        }
        println!(
            "\nScanned {} items. Found {} kids videos. Nothing removed (dry-run).",
            summary.scanned, summary.found
        );
        return Ok(());
    }

    for outcome in &summary.outcomes {
        if let Some(error) = &outcome.error {
            println!("Warning: Failed to remove '{}': {}", outcome.item.title, error);
        }
    }

    if summary.removed > 0 {
        println!(
            "Scanned {} items. Found {} kids videos. Removed {}.",
            summary.scanned, summary.found, summary.removed
        );
    } else {
        println!(
            "Scanned {} items. Found 0 kids videos. Nothing removed.",
            summary.scanned
        );
    }

    Ok(())
}
