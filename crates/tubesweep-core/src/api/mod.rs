mod client;
mod models;

pub use client::{ApiClient, HistoryApi};
pub use models::{
    ApiErrorBody, ApiErrorResponse, Channel, ChannelContentDetails, ChannelListResponse,
    PlaylistItem, PlaylistItemListResponse, PlaylistItemSnippet, RelatedPlaylists, ResourceId,
    Video, VideoListResponse, VideoStatus,
};
