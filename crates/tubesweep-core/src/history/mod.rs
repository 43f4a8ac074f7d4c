mod remover;
mod resolver;
mod scanner;
mod selector;
mod window;

pub use remover::{remove, CleanSummary, RemovalOutcome};
pub use resolver::resolve_kids_flags;
pub use scanner::scan;
pub use selector::select;
pub use window::parse_window;

use chrono::{DateTime, Utc};

use crate::api::{HistoryApi, PlaylistItem};
use crate::Result;

/// One watch-history entry within the scan window
#[derive(Debug, Clone)]
pub struct HistoryItem {
    /// Playlist-item id, the deletion key
    pub item_id: String,
    /// Id of the video the entry points at
    pub video_id: String,
    pub published_at: DateTime<Utc>,
    pub title: String,
}

impl From<PlaylistItem> for HistoryItem {
    fn from(item: PlaylistItem) -> Self {
        Self {
            item_id: item.id,
            video_id: item.snippet.resource_id.video_id,
            published_at: item.snippet.published_at,
            title: item.snippet.title,
        }
    }
}

/// Run the full pipeline: scan the window, resolve the made-for-kids flags,
/// select the flagged entries, and remove them (or report them on dry run).
///
/// Scan and resolve failures abort the whole run; individual delete
/// failures are recorded in the summary and do not.
pub async fn clean(
    api: &dyn HistoryApi,
    playlist_id: &str,
    cutoff: DateTime<Utc>,
    dry_run: bool,
) -> Result<CleanSummary> {
    let items = scan(api, playlist_id, cutoff).await?;
    let flagged = resolve_kids_flags(api, &items).await?;
    let selected = select(&items, &flagged);

    remove(api, items.len(), selected, dry_run).await
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use crate::api::{
        HistoryApi, PlaylistItem, PlaylistItemListResponse, PlaylistItemSnippet, ResourceId,
        Video, VideoListResponse, VideoStatus,
    };
    use crate::{Error, Result};

    /// Scripted HistoryApi double: serves pre-built pages in order, flags a
    /// fixed set of video ids as made-for-kids, and fails chosen deletes.
    #[derive(Default)]
    pub struct FakeApi {
        pub pages: Mutex<Vec<PlaylistItemListResponse>>,
        pub kids: HashSet<String>,
        pub fail_deletes: HashSet<String>,
        pub list_calls: Mutex<u32>,
        pub flag_batches: Mutex<Vec<usize>>,
        pub deleted: Mutex<Vec<String>>,
    }

    impl FakeApi {
        pub fn with_pages(pages: Vec<PlaylistItemListResponse>) -> Self {
            Self {
                pages: Mutex::new(pages),
                ..Default::default()
            }
        }
    }

    pub fn ts(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().unwrap()
    }

    pub fn item(item_id: &str, video_id: &str, published_at: &str, title: &str) -> PlaylistItem {
        PlaylistItem {
            id: item_id.to_string(),
            snippet: PlaylistItemSnippet {
                title: title.to_string(),
                published_at: ts(published_at),
                resource_id: ResourceId {
                    video_id: video_id.to_string(),
                },
            },
        }
    }

    pub fn page(
        items: Vec<PlaylistItem>,
        next_page_token: Option<&str>,
    ) -> PlaylistItemListResponse {
        PlaylistItemListResponse {
            items,
            next_page_token: next_page_token.map(|t| t.to_string()),
        }
    }

    #[async_trait]
    impl HistoryApi for FakeApi {
        async fn list_playlist_items(
            &self,
            _playlist_id: &str,
            _page_token: Option<&str>,
        ) -> Result<PlaylistItemListResponse> {
            *self.list_calls.lock().unwrap() += 1;
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Err(Error::Api {
                    status: 404,
                    message: "no more scripted pages".into(),
                });
            }
            Ok(pages.remove(0))
        }

        async fn list_video_flags(&self, video_ids: &[String]) -> Result<VideoListResponse> {
            self.flag_batches.lock().unwrap().push(video_ids.len());
            let items = video_ids
                .iter()
                .map(|id| Video {
                    id: id.clone(),
                    status: Some(VideoStatus {
                        made_for_kids: self.kids.contains(id),
                    }),
                })
                .collect();
            Ok(VideoListResponse { items })
        }

        async fn delete_playlist_item(&self, item_id: &str) -> Result<()> {
            if self.fail_deletes.contains(item_id) {
                return Err(Error::Api {
                    status: 403,
                    message: "The request is not properly authorized.".into(),
                });
            }
            self.deleted.lock().unwrap().push(item_id.to_string());
            Ok(())
        }
    }
}
