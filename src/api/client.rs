use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{Comment, FeedSnapshot, Like};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the feed server's JSON endpoints.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base: Url,
}

impl FeedClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("Invalid base URL {base_url}"))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http, base })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Parse(format!("invalid path {path}: {e}")))
    }

    /// Absolute URL for a server path, for handing to a browser.
    pub fn absolute(&self, path: &str) -> Option<String> {
        self.url(path).ok().map(String::from)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path)?;
        let bytes = self
            .http
            .post(url)
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let bytes = self.post_form(path, form).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Read one page of the feed at `feed_path` (path plus query).
    pub async fn fetch_snapshot(&self, feed_path: &str) -> Result<FeedSnapshot, ApiError> {
        self.get_json(feed_path).await
    }

    pub async fn like(&self, entry: &str) -> Result<Vec<Like>, ApiError> {
        self.post_json("/a/like", &[("entry", entry)]).await
    }

    pub async fn unlike(&self, entry: &str) -> Result<Vec<Like>, ApiError> {
        self.post_json("/a/like/delete", &[("entry", entry)]).await
    }

    pub async fn post_comment(&self, entry: &str, body: &str) -> Result<Comment, ApiError> {
        self.post_json("/a/comment", &[("entry", entry), ("body", body)])
            .await
    }

    /// The acknowledgement body is not inspected; only the status matters.
    pub async fn delete_comment(&self, entry: &str, comment: &str) -> Result<(), ApiError> {
        self.post_form("/a/comment/delete", &[("entry", entry), ("comment", comment)])
            .await
            .map(|_| ())
    }

    pub async fn expand_comments(&self, entry: &str) -> Result<Vec<Comment>, ApiError> {
        self.get_json(&format!("/a/entry/{entry}")).await
    }

    pub async fn expand_likes(&self, entry: &str) -> Result<Vec<Like>, ApiError> {
        self.get_json(&format!("/a/expandlikes/{entry}")).await
    }
}

/// Rewrite the `start` query parameter of a feed path, keeping everything else.
pub fn page_path(feed_path: &str, start: u32) -> String {
    let (path, query) = feed_path.split_once('?').unwrap_or((feed_path, ""));
    let start_param = format!("start={start}");
    let mut params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("start="))
        .collect();
    if start > 0 {
        params.push(&start_param);
    }
    if params.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, params.join("&"))
    }
}
