// Twitch Helix HTTP client.
// Two chained lookups: login to user id, then active streams for that id.

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use tracing::{debug, error};

use crate::error::{FolioError, Result};

use super::LiveStatusSource;
use super::types::{HelixList, HelixStream, HelixUser, LiveStatus};

const HELIX_API_BASE: &str = "https://api.twitch.tv/helix";

pub struct TwitchClient {
    client: Client,
    base_url: String,
    login: String,
}

impl TwitchClient {
    /// Create a client for the channel `login` using an app or user access token.
    pub fn new(login: &str, client_id: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Client-ID",
            HeaderValue::from_str(client_id).map_err(|e| FolioError::Config(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FolioError::Config(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FolioError::Api)?;

        Ok(Self {
            client,
            base_url: HELIX_API_BASE.to_string(),
            login: login.to_string(),
        })
    }

    /// Point the client at another Helix root.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get<T: serde::Serialize + ?Sized>(&self, endpoint: &str, params: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(params).send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::UNAUTHORIZED => Err(FolioError::Unauthorized),
            status => Err(FolioError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }

    /// Resolve the configured login to its numeric user id.
    pub async fn user_id(&self) -> Result<String> {
        let users: HelixList<HelixUser> = self
            .get("/users", &[("login", self.login.as_str())])
            .await?
            .json()
            .await?;
        users
            .data
            .into_iter()
            .next()
            .map(|user| user.id)
            .ok_or_else(|| FolioError::NotFound(format!("twitch user {}", self.login)))
    }

    /// Active streams for a user id; empty when offline.
    pub async fn streams(&self, user_id: &str) -> Result<Vec<HelixStream>> {
        let streams: HelixList<HelixStream> = self
            .get("/streams", &[("user_id", user_id)])
            .await?
            .json()
            .await?;
        Ok(streams.data)
    }

    /// Run both lookups and summarize the result.
    pub async fn fetch_live_status(&self) -> Result<LiveStatus> {
        let user_id = self.user_id().await?;
        let streams = self.streams(&user_id).await?;
        debug!(login = %self.login, user_id = %user_id, streams = streams.len(), "fetched twitch status");
        Ok(LiveStatus::from_stream_count(streams.len()))
    }
}

#[async_trait]
impl LiveStatusSource for TwitchClient {
    async fn live_status(&self) -> Option<LiveStatus> {
        match self.fetch_live_status().await {
            Ok(status) => Some(status),
            Err(err) => {
                error!(login = %self.login, error = %err, "failed to fetch twitch status");
                None
            }
        }
    }
}
