//! GitHub REST client.
//!
//! Async HTTP client using `reqwest`. The credential, when present, is sent
//! as a Bearer token on every request.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

use pulltray_config::UserConfig;

use crate::types::{Item, SearchKind, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const AGENT: &str = concat!("pulltray/", env!("CARGO_PKG_VERSION"));

/// Results requested per search. Only the first page is ever fetched.
pub const PAGE_SIZE: u32 = 100;

/// Errors from the GitHub client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed: {body}")]
    Unauthorized { body: String },

    #[error("rate limit exceeded (resets at {reset:?})")]
    RateLimited { reset: Option<u64> },

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("credential contains characters not allowed in a header")]
    InvalidCredential,
}

/// GitHub search client bound to one credential.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for api.github.com.
    ///
    /// An empty credential produces an unauthenticated client.
    pub fn new(credential: &str) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        if !credential.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {credential}"))
                .map_err(|_| Error::InvalidCredential)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Creates a client from the user's credential and optional API root.
    pub fn from_config(config: &UserConfig) -> Result<Self, Error> {
        let client = Self::new(&config.credential)?;
        Ok(match &config.api_base_url {
            Some(url) => client.with_base_url(url.clone()),
            None => client,
        })
    }

    /// Points the client at another API root (GitHub Enterprise, tests).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open pull requests authored by `username`.
    pub async fn fetch_open_pull_requests(&self, username: &str) -> Result<Vec<Item>, Error> {
        self.search(SearchKind::PullRequest, username).await
    }

    /// Open issues authored by `username`.
    pub async fn fetch_open_issues(&self, username: &str) -> Result<Vec<Item>, Error> {
        self.search(SearchKind::Issue, username).await
    }

    /// Runs one single-page search. Failures are logged before being returned.
    pub async fn search(&self, kind: SearchKind, username: &str) -> Result<Vec<Item>, Error> {
        match self.search_page(kind, username).await {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::error!(%kind, user = username, "error fetching {kind}: {e}");
                Err(e)
            }
        }
    }

    async fn search_page(&self, kind: SearchKind, username: &str) -> Result<Vec<Item>, Error> {
        let params = [
            ("q", kind.query(username)),
            ("per_page", PAGE_SIZE.to_string()),
        ];
        let body = self.get("/search/issues", &params).await?;
        let resp: SearchResponse = serde_json::from_slice(&body)?;

        if resp.total_count > resp.items.len() as u64 {
            tracing::debug!(
                %kind,
                total = resp.total_count,
                returned = resp.items.len(),
                "search results truncated to first page"
            );
        }
        if resp.incomplete_results {
            tracing::debug!(%kind, "search reported incomplete results");
        }

        Ok(resp.items)
    }

    /// Performs a GET request and maps non-2xx statuses to errors.
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<u8>, Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self.http.get(&url).query(params).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
                || (status == StatusCode::FORBIDDEN
                    && header_str(resp.headers(), "x-ratelimit-remaining") == Some("0"));
            let reset = header_str(resp.headers(), "x-ratelimit-reset")
                .and_then(|v| v.parse::<u64>().ok());
            let body = resp.text().await.unwrap_or_default();

            return Err(if rate_limited {
                Error::RateLimited { reset }
            } else if status == StatusCode::UNAUTHORIZED {
                Error::Unauthorized { body }
            } else {
                Error::Api {
                    status: status.as_u16(),
                    body,
                }
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a one-shot mock HTTP server.
    ///
    /// The join handle yields the raw request text the server received.
    async fn mock_server_with(
        status: &str,
        extra_headers: &str,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let status = status.to_string();
        let extra_headers = extra_headers.to_string();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = String::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                request = String::from_utf8_lossy(&buf[..n]).into_owned();

                let resp = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n{extra_headers}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    async fn mock_server(body: &str) -> (String, tokio::task::JoinHandle<String>) {
        mock_server_with("200 OK", "", body).await
    }

    const TWO_ITEMS: &str = r#"{"total_count":2,"incomplete_results":false,"items":[
        {"id":1,"number":10,"title":"Add tray","html_url":"https://github.com/o/r/pull/10"},
        {"id":2,"number":11,"title":"Fix blur","html_url":"https://github.com/o/r/pull/11"}
    ]}"#;

    #[tokio::test]
    async fn pull_requests_query_and_items() {
        let (url, handle) = mock_server(TWO_ITEMS).await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let items = client.fetch_open_pull_requests("alice").await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0["title"], "Add tray");
        assert_eq!(items[1].0["number"], 11);

        let request = handle.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(
            request_line.starts_with(
                "GET /search/issues?q=type%3Apr+is%3Aopen+author%3Aalice&per_page=100 "
            ),
            "unexpected request line: {request_line}"
        );

        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("authorization: bearer tok"));
        assert!(lower.contains("accept: application/vnd.github+json"));
        assert!(lower.contains("x-github-api-version: 2022-11-28"));
        assert!(lower.contains("user-agent: pulltray/"));
    }

    #[tokio::test]
    async fn issues_use_issue_qualifier() {
        let (url, handle) = mock_server(r#"{"total_count":0,"items":[]}"#).await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let items = client.fetch_open_issues("bob").await.unwrap();
        assert!(items.is_empty());

        let request = handle.await.unwrap();
        assert!(request.contains("q=type%3Aissue+is%3Aopen+author%3Abob"));
    }

    #[tokio::test]
    async fn empty_credential_sends_no_authorization() {
        let (url, handle) = mock_server(r#"{"items":[]}"#).await;

        let client = Client::new("").unwrap().with_base_url(url);
        client.fetch_open_issues("bob").await.unwrap();

        let request = handle.await.unwrap().to_ascii_lowercase();
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn truncated_results_return_first_page() {
        let (url, handle) =
            mock_server(r#"{"total_count":250,"incomplete_results":false,"items":[{"id":1}]}"#)
                .await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let items = client.fetch_open_pull_requests("alice").await.unwrap();
        assert_eq!(items.len(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn unauthorized_maps_to_unauthorized() {
        let (url, handle) =
            mock_server_with("401 Unauthorized", "", r#"{"message":"Bad credentials"}"#).await;

        let client = Client::new("bad").unwrap().with_base_url(url);
        let err = client.fetch_open_pull_requests("alice").await.unwrap_err();
        match err {
            Error::Unauthorized { body } => assert!(body.contains("Bad credentials")),
            other => panic!("expected Unauthorized, got {other:?}"),
        }

        handle.abort();
    }

    #[tokio::test]
    async fn exhausted_quota_maps_to_rate_limited() {
        let (url, handle) = mock_server_with(
            "403 Forbidden",
            "x-ratelimit-remaining: 0\r\nx-ratelimit-reset: 1700000000\r\n",
            r#"{"message":"API rate limit exceeded"}"#,
        )
        .await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let err = client.fetch_open_issues("alice").await.unwrap_err();
        assert!(
            matches!(err, Error::RateLimited { reset: Some(1_700_000_000) }),
            "got {err:?}"
        );

        handle.abort();
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let (url, handle) = mock_server_with("429 Too Many Requests", "", "{}").await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let err = client.fetch_open_issues("alice").await.unwrap_err();
        assert!(matches!(err, Error::RateLimited { reset: None }), "got {err:?}");

        handle.abort();
    }

    #[tokio::test]
    async fn forbidden_without_quota_header_is_api_error() {
        let (url, handle) = mock_server_with("403 Forbidden", "", r#"{"message":"nope"}"#).await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let err = client.fetch_open_issues("alice").await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 403, .. }), "got {err:?}");

        handle.abort();
    }

    #[tokio::test]
    async fn server_error_mentions_status() {
        let (url, handle) = mock_server_with("500 Internal Server Error", "", "boom").await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let err = client.fetch_open_pull_requests("alice").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500"), "error should mention 500: {msg}");

        handle.abort();
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let (url, handle) = mock_server(r#"{"items": 5}"#).await;

        let client = Client::new("tok").unwrap().with_base_url(url);
        let err = client.fetch_open_pull_requests("alice").await.unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");

        handle.abort();
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = Client::new("tok")
            .unwrap()
            .with_base_url(format!("http://127.0.0.1:{port}"));
        let err = client.fetch_open_pull_requests("alice").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)), "got {err:?}");
    }

    #[test]
    fn credential_with_newline_is_rejected() {
        assert!(matches!(
            Client::new("bad\ntoken"),
            Err(Error::InvalidCredential)
        ));
    }

    #[test]
    fn from_config_uses_base_url_override() {
        let mut cfg = UserConfig::new("alice", "tok");
        assert_eq!(
            Client::from_config(&cfg).unwrap().base_url(),
            "https://api.github.com"
        );

        cfg.api_base_url = Some("https://ghe.example.com/api/v3/".into());
        assert_eq!(
            Client::from_config(&cfg).unwrap().base_url(),
            "https://ghe.example.com/api/v3"
        );
    }
}
