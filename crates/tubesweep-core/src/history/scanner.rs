use chrono::{DateTime, Utc};

use super::HistoryItem;
use crate::api::HistoryApi;
use crate::Result;

/// Collect watch-history entries published at or after the cutoff.
///
/// Pages through the playlist 50 items at a time and stops when there is no
/// continuation token, or as soon as an entire page fell before the cutoff.
/// The short-circuit assumes the playlist is returned newest-first; a page
/// with out-of-order timestamps can end the scan before later in-window
/// entries are seen. That stopping rule is part of the tool's behavior and
/// must not be traded for an exhaustive scan.
///
/// Any remote failure aborts the scan and propagates to the caller.
pub async fn scan(
    api: &dyn HistoryApi,
    playlist_id: &str,
    cutoff: DateTime<Utc>,
) -> Result<Vec<HistoryItem>> {
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = api
            .list_playlist_items(playlist_id, page_token.as_deref())
            .await?;

        let mut all_old = true;
        for entry in page.items.into_iter().map(HistoryItem::from) {
            if entry.published_at >= cutoff {
                all_old = false;
                items.push(entry);
            }
        }

        page_token = page.next_page_token;
        if page_token.is_none() || all_old {
            break;
        }
    }

    tracing::debug!("Scan found {} in-window history entries", items.len());
    Ok(items)
}
