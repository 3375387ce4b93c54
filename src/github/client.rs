// GitHub API HTTP client.
// Handles authentication, rate limiting, and request/response processing.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{FolioError, Result};

use super::types::RateLimit;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    username: String,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client listing repositories of `username`.
    ///
    /// An empty token sends unauthenticated requests, which GitHub allows at a lower rate limit.
    pub fn new(username: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if !token.is_empty() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| FolioError::Config(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        // GitHub rejects requests without a user agent; the account name is what it expects to see.
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(username).map_err(|e| FolioError::Config(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FolioError::Api)?;

        Ok(Self {
            client,
            base_url: GITHUB_API_BASE.to_string(),
            username: username.to_string(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Send requests to another API root, such as GitHub Enterprise.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Account whose repositories are listed.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(FolioError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(FolioError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(FolioError::NotFound(url))
            }
            StatusCode::FORBIDDEN => {
                let rate_limit = self.rate_limit();
                if rate_limit.limit > 0 && rate_limit.remaining == 0 {
                    let reset_at = chrono::DateTime::from_timestamp(rate_limit.reset as i64, 0)
                        .map(|dt| dt.format("%H:%M:%S").to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    Err(FolioError::RateLimited { reset_at })
                } else {
                    Err(FolioError::Other(format!(
                        "Forbidden: {}",
                        response.text().await.unwrap_or_default()
                    )))
                }
            }
            status => Err(FolioError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;

    /// Serve `app` on an ephemeral local port and return its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn client_for(app: Router) -> GitHubClient {
        let base = serve(app).await;
        GitHubClient::new("octocat", "token").unwrap().with_base_url(&base)
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let client = client_for(Router::new().route(
            "/thing",
            get(|| async { (axum::http::StatusCode::UNAUTHORIZED, "bad credentials") }),
        ))
        .await;
        let err = client.get_with_params("/thing", &[("a", "b")]).await.err().unwrap();
        assert!(matches!(err, FolioError::Unauthorized));
    }

    #[tokio::test]
    async fn test_not_found_carries_url() {
        let client = client_for(Router::new()).await;
        let err = client.get_with_params("/missing", &[("a", "b")]).await.err().unwrap();
        match err {
            FolioError::NotFound(url) => assert!(url.contains("/missing")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_forbidden_with_exhausted_limit_is_rate_limited() {
        let client = client_for(Router::new().route(
            "/thing",
            get(|| async {
                (
                    axum::http::StatusCode::FORBIDDEN,
                    [
                        ("x-ratelimit-limit", "60"),
                        ("x-ratelimit-remaining", "0"),
                        ("x-ratelimit-reset", "1700000000"),
                    ],
                    "rate limit exceeded",
                )
            }),
        ))
        .await;
        let err = client.get_with_params("/thing", &[("a", "b")]).await.err().unwrap();
        assert!(matches!(err, FolioError::RateLimited { .. }));

        let rate_limit = client.rate_limit();
        assert_eq!(rate_limit.limit, 60);
        assert_eq!(rate_limit.remaining, 0);
        assert_eq!(rate_limit.reset, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_forbidden_with_quota_left_is_other() {
        let client = client_for(Router::new().route(
            "/thing",
            get(|| async {
                (
                    axum::http::StatusCode::FORBIDDEN,
                    [("x-ratelimit-limit", "60"), ("x-ratelimit-remaining", "12")],
                    "resource not accessible",
                )
            }),
        ))
        .await;
        let err = client.get_with_params("/thing", &[("a", "b")]).await.err().unwrap();
        match err {
            FolioError::Other(message) => assert!(message.contains("resource not accessible")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_other() {
        let client = client_for(Router::new().route(
            "/thing",
            get(|| async { (axum::http::StatusCode::BAD_GATEWAY, "upstream down") }),
        ))
        .await;
        let err = client.get_with_params("/thing", &[("a", "b")]).await.err().unwrap();
        match err {
            FolioError::Other(message) => assert!(message.starts_with("HTTP 502")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_without_token() {
        let client = GitHubClient::new("octocat", "").unwrap();
        assert_eq!(client.username(), "octocat");
        assert_eq!(client.rate_limit().remaining, 0);
    }

    #[test]
    fn test_invalid_header_value_is_config_error() {
        let err = GitHubClient::new("octo\ncat", "token").err().unwrap();
        assert!(matches!(err, FolioError::Config(_)));
    }
}
