mod config;
mod images;
mod parser;
mod publish;
mod wordpress;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use parser::anchors::DEFAULT_MAX_ANCHORS;

#[derive(Parser)]
#[command(
    name = "gutenberg_publisher",
    about = "Publish a Markdown post as a WordPress block-editor draft with generated images"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert, illustrate, and create a WordPress draft
    Publish {
        /// Markdown file to publish
        file: PathBuf,
        /// Skip image generation and publish a text-only draft
        #[arg(long)]
        no_images: bool,
        /// Max inline images
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_ANCHORS)]
        max_images: usize,
    },
    /// Print block markup for a Markdown file (offline)
    Convert {
        /// Markdown file to convert
        file: PathBuf,
        /// Write markup here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the section headings and which ones would get images (offline)
    Anchors {
        /// Markdown file to inspect
        file: PathBuf,
        /// Max inline images
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_ANCHORS)]
        max_images: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Publish {
            file,
            no_images,
            max_images,
        } => {
            let cfg = config::Config::from_env(!no_images)?;
            let opts = publish::PublishOptions {
                images: !no_images,
                max_images,
                rate_limit_delay: publish::RATE_LIMIT_DELAY,
            };
            println!("Parsing: {}", file.display());
            let outcome = publish::publish(&file, &cfg, &opts).await?;

            println!("\n{}", "=".repeat(50));
            println!("  Done!");
            println!("  Post ID  : {}", outcome.post.id);
            println!("  Preview  : {}", outcome.post.link);
            println!(
                "  Images   : {} inline{}",
                outcome.inline_images,
                if outcome.featured_media.is_some() { " + featured" } else { "" }
            );
            println!("{}", "=".repeat(50));
            Ok(())
        }
        Commands::Convert { file, output } => {
            let doc = publish::load_document(&file)?;
            let markup = doc.to_markup();
            match output {
                Some(path) => {
                    std::fs::write(&path, &markup)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "Wrote {} blocks for \"{}\" to {}",
                        doc.body.len(),
                        doc.title,
                        path.display()
                    );
                }
                None => println!("{markup}"),
            }
            Ok(())
        }
        Commands::Anchors { file, max_images } => {
            let doc = publish::load_document(&file)?;
            if doc.headings.is_empty() {
                println!("No ## headings in {}.", file.display());
                return Ok(());
            }
            let selected = doc.select_anchors(max_images);

            println!("{:>3} | {:<48} | {}", "#", "Heading", "Image");
            println!("{}", "-".repeat(62));
            for h in &doc.headings {
                let mark = if selected.contains(h) { "yes" } else { "" };
                println!("{:>3} | {:<48} | {}", h.order + 1, truncate(&h.text, 48), mark);
            }
            println!("\n{} headings | {} selected", doc.headings.len(), selected.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
