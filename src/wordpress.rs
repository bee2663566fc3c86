use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::WordPressConfig;
use crate::truncate;

const API_PREFIX: &str = "wp-json/wp/v2";
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const POST_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct UploadedMedia {
    pub id: u64,
    pub source_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPost {
    pub id: u64,
    pub link: String,
}

#[derive(Serialize)]
struct DraftRequest<'a> {
    title: &'a str,
    content: &'a str,
    status: &'a str,
    featured_media: u64,
}

pub struct WordPressClient {
    client: reqwest::Client,
    base: String,
    username: String,
    app_password: String,
}

impl WordPressClient {
    pub fn new(config: &WordPressConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gutenberg_publisher/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base: config.url.clone(),
            username: config.username.clone(),
            app_password: config.app_password.clone(),
        })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}/{}", self.base.trim_end_matches('/'), API_PREFIX, resource)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.app_password))
    }

    /// Upload a PNG to the media library.
    pub async fn upload_media(&self, bytes: Vec<u8>, filename: &str) -> Result<UploadedMedia> {
        let request = self
            .client
            .post(self.endpoint("media"))
            .header(CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\""))
            .header(CONTENT_TYPE, "image/png")
            .timeout(UPLOAD_TIMEOUT)
            .body(bytes);

        let response = self
            .authed(request)
            .send()
            .await
            .context("WordPress media upload request failed")?;
        let media: UploadedMedia = handle(response, "WordPress media upload").await?;
        info!("Uploaded {} as media {}", filename, media.id);
        Ok(media)
    }

    /// Create a draft post. `featured_media` of `None` leaves the post without one.
    pub async fn create_draft(
        &self,
        title: &str,
        content: &str,
        featured_media: Option<u64>,
    ) -> Result<CreatedPost> {
        let payload = DraftRequest {
            title,
            content,
            status: "draft",
            featured_media: featured_media.unwrap_or(0),
        };
        let request = self
            .client
            .post(self.endpoint("posts"))
            .timeout(POST_TIMEOUT)
            .json(&payload);

        let response = self
            .authed(request)
            .send()
            .await
            .context("WordPress post creation request failed")?;
        handle(response, "WordPress post creation").await
    }
}

async fn handle<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("{} failed: {}: {}", what, status, truncate(&text, ERROR_BODY_CHARS));
    }
    response
        .json()
        .await
        .with_context(|| format!("{what} returned an unexpected body"))
}
