use std::sync::LazyLock;

use regex::Regex;

static H2_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+(.+)").unwrap());

/// A level-2 heading from the Markdown source and its position among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    pub text: String,
    pub order: usize,
}

/// Canonical heading text. Both the Markdown index and the rendered heading
/// blocks go through here so anchor lookups compare like with like.
pub fn normalize_heading_text(text: &str) -> &str {
    text.trim()
}

/// Every `## ` heading in `markdown`, in document order.
pub fn index_headings(markdown: &str) -> Vec<HeadingRef> {
    H2_LINE_RE
        .captures_iter(markdown)
        .enumerate()
        .map(|(order, caps)| HeadingRef {
            text: normalize_heading_text(&caps[1]).to_string(),
            order,
        })
        .collect()
}
