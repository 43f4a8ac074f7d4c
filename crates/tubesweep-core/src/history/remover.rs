use super::HistoryItem;
use crate::api::HistoryApi;
use crate::Result;

/// Per-item result of a removal attempt
#[derive(Debug, Clone)]
pub struct RemovalOutcome {
    pub item: HistoryItem,
    /// Human-readable failure detail; None when the delete succeeded
    pub error: Option<String>,
}

impl RemovalOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated result of one clean run
#[derive(Debug, Clone)]
pub struct CleanSummary {
    /// In-window entries the scan produced
    pub scanned: usize,
    /// Entries selected for removal
    pub found: usize,
    /// Successful deletions; always 0 on dry run
    pub removed: usize,
    pub dry_run: bool,
    /// The removal set, in scan order
    pub selected: Vec<HistoryItem>,
    /// Per-item outcomes; empty on dry run
    pub outcomes: Vec<RemovalOutcome>,
}

/// Delete the selected entries, or on dry run only report them.
///
/// Each delete stands alone: a failure is recorded with the item's title
/// and the run carries on. A partially completed removal is a valid
/// terminal state; there is no rollback.
pub async fn remove(
    api: &dyn HistoryApi,
    scanned: usize,
    selected: Vec<HistoryItem>,
    dry_run: bool,
) -> Result<CleanSummary> {
    let found = selected.len();

    if dry_run {
        return Ok(CleanSummary {
            scanned,
            found,
            removed: 0,
            dry_run: true,
            selected,
            outcomes: Vec::new(),
        });
    }

    let mut outcomes = Vec::with_capacity(found);
    let mut removed = 0;

    for item in &selected {
        match api.delete_playlist_item(&item.item_id).await {
            Ok(()) => {
                removed += 1;
                outcomes.push(RemovalOutcome {
                    item: item.clone(),
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to remove '{}': {}", item.title, e);
                outcomes.push(RemovalOutcome {
                    item: item.clone(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(CleanSummary {
        scanned,
        found,
        removed,
        dry_run: false,
        selected,
        outcomes,
    })
}
