use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Config;
use crate::images::ImageClient;
use crate::parser::anchors::AnchorMap;
use crate::parser::{self, Document};
use crate::wordpress::{CreatedPost, WordPressClient};

/// Pause before each inline image request to stay under the image API rate limit.
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(2);

pub struct PublishOptions {
    pub images: bool,
    pub max_images: usize,
    pub rate_limit_delay: Duration,
}

pub struct PublishOutcome {
    pub post: CreatedPost,
    pub featured_media: Option<u64>,
    pub inline_images: usize,
}

/// Read a Markdown file and parse it, using the file stem as fallback title.
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let doc = parser::parse_post(&raw, &fallback);
    for run in &doc.unmatched {
        warn!("Dropped unrecognised markup: {}", crate::truncate(run, 80));
    }
    Ok(doc)
}

/// Full flow: parse, illustrate, insert, create the draft.
pub async fn publish(path: &Path, config: &Config, opts: &PublishOptions) -> Result<PublishOutcome> {
    let mut doc = load_document(path)?;
    println!("Title    : {}", doc.title);
    println!(
        "Sections : {:?}",
        doc.headings.iter().map(|h| h.text.as_str()).collect::<Vec<_>>()
    );

    let wp = WordPressClient::new(&config.wordpress)?;
    let mut featured_media = None;
    let mut inline_images = 0;

    match (&config.openai_api_key, opts.images) {
        (Some(api_key), true) => {
            let images = ImageClient::new(api_key.clone())?;

            println!("Generating featured image...");
            let featured = images.featured(&doc.title).await?;
            let media = wp.upload_media(featured.bytes, &featured.filename).await?;
            println!("  Uploaded : {}", media.source_url);
            featured_media = Some(media.id);

            let anchors = illustrate_sections(&doc, &images, &wp, opts).await?;
            if !anchors.is_empty() {
                info!("Inserting {} inline images", anchors.len());
            }
            let report = doc.insert_media(&anchors);
            for heading in &report.dropped {
                warn!("No heading block matched '{}', image left out", heading);
            }
            inline_images = report.inserted.len();
        }
        _ => println!("Skipping image generation"),
    }

    println!("Creating WordPress draft...");
    let post = wp
        .create_draft(&doc.title, &doc.to_markup(), featured_media)
        .await?;
    info!("Created draft {} at {}", post.id, post.link);

    Ok(PublishOutcome {
        post,
        featured_media,
        inline_images,
    })
}

/// Generate and upload one image per selected heading, strictly one at a time.
async fn illustrate_sections(
    doc: &Document,
    images: &ImageClient,
    wp: &WordPressClient,
    opts: &PublishOptions,
) -> Result<AnchorMap> {
    let selected = doc.select_anchors(opts.max_images);
    let mut anchors = AnchorMap::new();
    if selected.is_empty() {
        return Ok(anchors);
    }

    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    for heading in &selected {
        pb.set_message(heading.text.clone());
        tokio::time::sleep(opts.rate_limit_delay).await;

        let image = images.inline(&heading.text, &doc.title).await?;
        let media = wp.upload_media(image.bytes, &image.filename).await?;
        pb.println(format!("  {} -> {}", heading.text, media.source_url));
        anchors.insert(heading.text.clone(), media.source_url);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(anchors)
}
