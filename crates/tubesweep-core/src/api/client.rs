use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::models::{
    ApiErrorResponse, ChannelListResponse, PlaylistItemListResponse, VideoListResponse,
};
use crate::config::AppConfig;
use crate::{Error, Result};

/// Remote operations the history pipeline depends on
#[async_trait]
pub trait HistoryApi: Send + Sync {
    /// One page of the target playlist, 50 items at most
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse>;

    /// Status flags for up to 50 video ids
    async fn list_video_flags(&self, video_ids: &[String]) -> Result<VideoListResponse>;

    async fn delete_playlist_item(&self, item_id: &str) -> Result<()>;
}

/// YouTube Data API v3 client authenticated with a bearer token
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig, token: String) -> Result<Self> {
        Url::parse(&config.api.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        Ok(response.json().await?)
    }

    /// Map a non-2xx response to Error::Api, preferring the structured
    /// error message when the body carries one.
    async fn api_error(status: StatusCode, response: reqwest::Response) -> Error {
        let message = match response.json::<ApiErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Watch history playlist id for the authenticated user
    pub async fn watch_history_playlist_id(&self) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint("channels"))
            .bearer_auth(&self.token)
            .query(&[("part", "contentDetails"), ("mine", "true"), ("maxResults", "1")])
            .send()
            .await?;

        let body: ChannelListResponse = Self::parse(response).await?;

        let channel = body.items.into_iter().next().ok_or_else(|| {
            Error::HistoryUnavailable(
                "could not retrieve channel info for the authenticated user".into(),
            )
        })?;

        channel
            .content_details
            .and_then(|details| details.related_playlists)
            .and_then(|playlists| playlists.watch_history)
            .ok_or_else(|| {
                Error::HistoryUnavailable(
                    "watch history playlist not found; \
                     the account may not support this feature in your region"
                        .into(),
                )
            })
    }
}

#[async_trait]
impl HistoryApi for ApiClient {
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse> {
        let mut request = self
            .client
            .get(self.endpoint("playlistItems"))
            .bearer_auth(&self.token)
            .query(&[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", "50"),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        Self::parse(request.send().await?).await
    }

    async fn list_video_flags(&self, video_ids: &[String]) -> Result<VideoListResponse> {
        let ids = video_ids.join(",");
        let response = self
            .client
            .get(self.endpoint("videos"))
            .bearer_auth(&self.token)
            .query(&[("part", "status"), ("id", ids.as_str()), ("maxResults", "50")])
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn delete_playlist_item(&self, item_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint("playlistItems"))
            .bearer_auth(&self.token)
            .query(&[("id", item_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        Ok(())
    }
}
