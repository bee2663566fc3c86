use std::sync::LazyLock;

use regex::Regex;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)").unwrap());
static TITLE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+.+\n?").unwrap());

/// Post title plus the Markdown body with the title line removed.
#[derive(Debug, Clone)]
pub struct TitleSplit {
    pub title: String,
    pub body: String,
}

/// Take the first `# ` heading as the title, falling back to `fallback`
/// (usually the file stem). Only the first title line leaves the body.
pub fn split_title(raw: &str, fallback: &str) -> TitleSplit {
    let title = TITLE_RE
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| fallback.to_string());

    let body = TITLE_LINE_RE.replacen(raw, 1, "").trim().to_string();

    TitleSplit { title, body }
}
