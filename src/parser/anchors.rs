use regex::{Regex, RegexBuilder};

use super::blocks::{Block, MediaBlock};
use super::headings::normalize_heading_text;

pub const DEFAULT_MAX_ANCHORS: usize = 3;

/// Pick up to `max_count` headings to illustrate.
///
/// The last heading is skipped when there is more than one (it is usually a
/// wrap-up), then the rest are stride-sampled from the first one onward.
pub fn select_anchors<T: Clone>(headings: &[T], max_count: usize) -> Vec<T> {
    if headings.is_empty() || max_count == 0 {
        return Vec::new();
    }
    let candidates = if headings.len() > 1 {
        &headings[..headings.len() - 1]
    } else {
        headings
    };

    let step = (candidates.len() / max_count).max(1);
    candidates
        .iter()
        .step_by(step)
        .take(max_count)
        .cloned()
        .collect()
}

/// Heading text → media URL, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    entries: Vec<(String, String)>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; an existing entry with the same heading is replaced in place.
    pub fn insert(&mut self, heading: impl Into<String>, url: impl Into<String>) {
        let heading = heading.into();
        let url = url.into();
        match self.entries.iter_mut().find(|(h, _)| *h == heading) {
            Some(entry) => entry.1 = url,
            None => self.entries.push((heading, url)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, u)| (h.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnchorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AnchorMap::new();
        for (heading, url) in iter {
            map.insert(heading, url);
        }
        map
    }
}

/// What [`insert_media`] did with each anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: Vec<String>,
    /// Anchors with no matching level-2 heading block. These are not errors.
    pub dropped: Vec<String>,
}

/// Place an image block right after the first level-2 heading matching each
/// anchor (case-insensitive). Anchors without a match are skipped and listed
/// in the report. Running twice inserts twice.
pub fn insert_media(blocks: &mut Vec<Block>, anchors: &AnchorMap) -> InsertReport {
    let mut report = InsertReport::default();

    for (heading, url) in anchors.iter() {
        let position = heading_matcher(heading).and_then(|re| {
            blocks
                .iter()
                .position(|b| b.h2_text().is_some_and(|text| re.is_match(text)))
        });

        match position {
            Some(idx) => {
                blocks.insert(
                    idx + 1,
                    Block::Image(MediaBlock {
                        url: url.to_string(),
                        alt: heading.to_string(),
                    }),
                );
                report.inserted.push(heading.to_string());
            }
            None => report.dropped.push(heading.to_string()),
        }
    }

    report
}

fn heading_matcher(heading: &str) -> Option<Regex> {
    let pattern = format!("^{}$", regex::escape(normalize_heading_text(heading)));
    RegexBuilder::new(&pattern).case_insensitive(true).build().ok()
}
