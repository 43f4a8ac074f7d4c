use std::collections::HashSet;

use super::HistoryItem;
use crate::api::HistoryApi;
use crate::Result;

/// videos.list accepts at most this many ids per call
const BATCH_SIZE: usize = 50;

/// Resolve which of the scanned entries point at made-for-kids videos.
///
/// Video ids are looked up in scan order, 50 per request, and the flagged
/// ones are unioned into a set. No request is issued for an empty scan.
/// A failed batch aborts the whole resolution.
pub async fn resolve_kids_flags(
    api: &dyn HistoryApi,
    items: &[HistoryItem],
) -> Result<HashSet<String>> {
    if items.is_empty() {
        return Ok(HashSet::new());
    }

    let video_ids: Vec<String> = items.iter().map(|item| item.video_id.clone()).collect();
    let mut flagged = HashSet::new();

    for batch in video_ids.chunks(BATCH_SIZE) {
        let response = api.list_video_flags(batch).await?;
        for video in response.items {
            if video.status.map(|s| s.made_for_kids).unwrap_or(false) {
                flagged.insert(video.id);
            }
        }
    }

    tracing::debug!("{} of {} videos are flagged made-for-kids", flagged.len(), items.len());
    Ok(flagged)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{item, FakeApi};
    use super::super::HistoryItem;
    use super::*;

    fn history_item(n: usize) -> HistoryItem {
        HistoryItem::from(item(
            &format!("item-{}", n),
            &format!("vid-{}", n),
            "2026-08-07T09:00:00Z",
            &format!("Video {}", n),
        ))
    }

    #[tokio::test]
    async fn test_empty_input_issues_no_calls() {
        let api = FakeApi::default();
        let flagged = resolve_kids_flags(&api, &[]).await.unwrap();

        assert!(flagged.is_empty());
        assert!(api.flag_batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batches_never_exceed_fifty() {
        let mut api = FakeApi::default();
        api.kids.insert("vid-0".to_string());
        api.kids.insert("vid-119".to_string());

        let items: Vec<HistoryItem> = (0..120).map(history_item).collect();
        let flagged = resolve_kids_flags(&api, &items).await.unwrap();

        assert_eq!(*api.flag_batches.lock().unwrap(), vec![50, 50, 20]);
        assert_eq!(flagged.len(), 2);
        assert!(flagged.contains("vid-0"));
        assert!(flagged.contains("vid-119"));
    }

    #[tokio::test]
    async fn test_duplicate_video_ids_deduplicate_in_result() {
        let mut api = FakeApi::default();
        api.kids.insert("vid-1".to_string());

        // The same video watched twice in the window
        let items = vec![history_item(1), history_item(1)];
        let flagged = resolve_kids_flags(&api, &items).await.unwrap();

        assert_eq!(flagged.len(), 1);
    }

    #[tokio::test]
    async fn test_unflagged_videos_are_excluded() {
        let api = FakeApi::default();
        let items = vec![history_item(1), history_item(2)];
        let flagged = resolve_kids_flags(&api, &items).await.unwrap();
        assert!(flagged.is_empty());
    }
}
