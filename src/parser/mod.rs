pub mod anchors;
pub mod blocks;
pub mod headings;
pub mod render;
pub mod segment;
pub mod title;

use anchors::{AnchorMap, InsertReport};
use blocks::Block;
use headings::HeadingRef;

/// A post ready for publishing: title, block body, and the `##` heading index.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub body: Vec<Block>,
    pub headings: Vec<HeadingRef>,
    /// Rendered markup the segmenter skipped (code blocks, rules, raw HTML).
    pub unmatched: Vec<String>,
}

impl Document {
    pub fn to_markup(&self) -> String {
        blocks::serialize(&self.body)
    }

    pub fn select_anchors(&self, max_count: usize) -> Vec<HeadingRef> {
        anchors::select_anchors(&self.headings, max_count)
    }

    pub fn insert_media(&mut self, anchors: &AnchorMap) -> InsertReport {
        anchors::insert_media(&mut self.body, anchors)
    }
}

/// Four-step pipeline: title split → markdown render → segment into blocks → heading index.
pub fn parse_post(raw: &str, fallback_title: &str) -> Document {
    let split = title::split_title(raw, fallback_title);
    let html = render::markdown_to_html(&split.body);

    let spans: Vec<_> = segment::segment(&html).collect();
    let body = spans.iter().map(Block::from_span).collect();
    let unmatched = segment::unmatched_runs(&html, &spans);

    Document {
        title: split.title,
        body,
        headings: headings::index_headings(&split.body),
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Document {
        let md = std::fs::read_to_string("tests/fixtures/homelab.md").unwrap();
        parse_post(&md, "homelab")
    }

    fn h2_texts(doc: &Document) -> Vec<&str> {
        doc.body.iter().filter_map(Block::h2_text).collect()
    }

    #[test]
    fn title_and_body() {
        let doc = parse_post("# My Post\n\nHello.\n", "fallback");
        assert_eq!(doc.title, "My Post");
        assert_eq!(doc.body, vec![Block::Paragraph("<p>Hello.</p>".into())]);
        assert!(!doc.to_markup().contains("My Post"));
    }

    #[test]
    fn block_order_follows_source() {
        let doc = parse_post("para\n\n## Heading\n\n- a\n- b\n", "x");
        assert!(matches!(doc.body[0], Block::Paragraph(_)));
        assert!(matches!(doc.body[1], Block::Heading { level: 2, .. }));
        assert!(matches!(doc.body[2], Block::List { ordered: false, .. }));
        assert_eq!(doc.body.len(), 3);
    }

    #[test]
    fn ordered_list_not_starting_at_one_is_kept() {
        let doc = parse_post("Intro.\n\n3. third\n4. fourth\n", "x");
        assert_eq!(doc.body.len(), 2);
        match &doc.body[1] {
            Block::List { ordered: true, items } => {
                let inners: Vec<&str> = items.iter().map(|i| i.inner.as_str()).collect();
                assert_eq!(inners, vec!["third", "fourth"]);
            }
            other => panic!("expected ordered list, got {other:?}"),
        }
        assert!(doc.unmatched.is_empty());
    }

    #[test]
    fn index_agrees_with_blocks() {
        let doc = fixture();
        let indexed: Vec<&str> = doc.headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(indexed, h2_texts(&doc));
    }

    #[test]
    fn fixture_structure() {
        let doc = fixture();
        assert_eq!(doc.title, "Building a Private Cloud at Home");
        assert_eq!(doc.headings.len(), 5);
        assert!(doc.body.iter().any(|b| matches!(b, Block::Table(_))));
        assert!(doc.body.iter().any(|b| matches!(b, Block::Quote(_))));
        assert!(doc.body.iter().any(|b| matches!(b, Block::List { ordered: true, .. })));
        assert!(doc.body.iter().any(|b| matches!(b, Block::Heading { level: 3, .. })));
        // the fenced code block has no block form
        assert!(doc.unmatched.iter().any(|u| u.starts_with("<pre><code")));
    }

    #[test]
    fn fixture_end_to_end() {
        let mut doc = fixture();
        let selected = doc.select_anchors(anchors::DEFAULT_MAX_ANCHORS);
        let names: Vec<&str> = selected.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(names, vec!["Why Bother", "Hardware", "Networking"]);

        let map: AnchorMap = selected
            .iter()
            .map(|h| (h.text.clone(), format!("https://cdn.example/{}.png", h.order)))
            .collect();
        let report = doc.insert_media(&map);
        assert_eq!(report.inserted.len(), 3);
        assert!(report.dropped.is_empty());

        let markup = doc.to_markup();
        assert!(markup.contains(
            "<h2 class=\"wp-block-heading\">Hardware</h2>\n<!-- /wp:heading -->\n\n<!-- wp:image {\"sizeSlug\":\"large\"} -->"
        ));
        assert_eq!(markup.matches("<!-- wp:image").count(), 3);
        assert!(!markup.contains("Building a Private Cloud at Home"));
    }
}
