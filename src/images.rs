use std::sync::LazyLock;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::truncate;

const IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";
const MODEL: &str = "dall-e-3";
const SIZE: &str = "1792x1024";
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

pub const FEATURED_FILENAME: &str = "featured-image.png";

const BASE_STYLE: &str = "Clean enterprise IT illustration, dark blue and gray color palette, \
subtle datacenter or cloud infrastructure elements, modern flat design with \
slight depth. No text, no logos, no people, no brand marks.";

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

pub fn featured_prompt(title: &str) -> String {
    format!(
        "Professional technology blog header image for an article titled: '{title}'. \
         {BASE_STYLE} Widescreen 16:9 format."
    )
}

pub fn inline_prompt(heading: &str, title: &str) -> String {
    format!(
        "Technical illustration for a blog section titled '{heading}' \
         within an article about '{title}'. \
         {BASE_STYLE} Abstract server infrastructure, software-defined networking, \
         or private cloud architecture concepts. Widescreen 16:9 format."
    )
}

/// `inline-<slug>.png`, slug being the lowercased heading with every run of
/// non `[a-z0-9]` collapsed to `-`.
pub fn inline_filename(heading: &str) -> String {
    let lower = heading.to_lowercase();
    let slug = NON_SLUG_RE.replace_all(&lower, "-");
    format!("inline-{}.png", slug.trim_matches('-'))
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Hd,
    Standard,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: Quality,
    n: u8,
}

#[derive(Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedData>,
}

#[derive(Deserialize)]
struct GeneratedData {
    url: Option<String>,
}

pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
}

pub struct ImageClient {
    client: reqwest::Client,
    api_key: String,
}

impl ImageClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gutenberg_publisher/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, api_key })
    }

    pub async fn featured(&self, title: &str) -> Result<GeneratedImage> {
        let url = self.generate(&featured_prompt(title), Quality::Hd).await?;
        Ok(GeneratedImage {
            bytes: self.download(&url).await?,
            filename: FEATURED_FILENAME.to_string(),
        })
    }

    pub async fn inline(&self, heading: &str, title: &str) -> Result<GeneratedImage> {
        let url = self
            .generate(&inline_prompt(heading, title), Quality::Standard)
            .await
            .with_context(|| format!("Image generation failed for '{heading}'"))?;
        Ok(GeneratedImage {
            bytes: self.download(&url).await?,
            filename: inline_filename(heading),
        })
    }

    /// Request one image and return its temporary URL, backing off on 429/5xx.
    async fn generate(&self, prompt: &str, quality: Quality) -> Result<String> {
        let body = GenerationRequest {
            model: MODEL,
            prompt,
            size: SIZE,
            quality,
            n: 1,
        };

        let mut attempt = 0;
        loop {
            let start = Instant::now();
            let response = self
                .client
                .post(IMAGES_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .context("Image generation request failed")?;
            let status = response.status();
            debug!(
                "Image generation returned {} in {}ms",
                status,
                start.elapsed().as_millis()
            );

            if status.is_success() {
                let parsed: GenerationResponse = response
                    .json()
                    .await
                    .context("Unexpected image generation response")?;
                return parsed
                    .data
                    .into_iter()
                    .find_map(|d| d.url)
                    .ok_or_else(|| anyhow!("Image generation response had no URL"));
            }

            if !should_retry(status) || attempt == MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                bail!("Image generation failed: {}: {}", status, truncate(&text, 500));
            }

            let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
            warn!(
                "Image generation got {} (attempt {}/{}), backing off {:.1}s",
                status,
                attempt + 1,
                MAX_RETRIES,
                backoff.as_secs_f64()
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await
            .context("Failed to download generated image")?;
        Ok(bytes.to_vec())
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
