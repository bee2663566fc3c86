use serde_json::{json, Value};

use super::headings::normalize_heading_text;
use super::segment::{Span, SpanKind};

const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Full `<p>...</p>` element, kept verbatim.
    Paragraph(String),
    Heading { level: u8, text: String },
    List { ordered: bool, items: Vec<ListItem> },
    /// Trimmed blockquote content.
    Quote(String),
    /// Full `<table>...</table>` element, kept verbatim.
    Table(String),
    Image(MediaBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub inner: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlock {
    pub url: String,
    pub alt: String,
}

impl Block {
    pub fn from_span(span: &Span<'_>) -> Block {
        match span.kind {
            SpanKind::Table => Block::Table(span.raw.to_string()),
            SpanKind::Quote => Block::Quote(span.inner().trim().to_string()),
            SpanKind::UnorderedList => Block::List {
                ordered: false,
                items: list_items(span.raw),
            },
            SpanKind::OrderedList => Block::List {
                ordered: true,
                items: list_items(span.raw),
            },
            SpanKind::Heading2 => heading(2, span),
            SpanKind::Heading3 => heading(3, span),
            SpanKind::Paragraph => Block::Paragraph(span.raw.to_string()),
        }
    }

    /// Level-2 heading text, if this is one.
    pub fn h2_text(&self) -> Option<&str> {
        match self {
            Block::Heading { level: 2, text } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Block-editor markup for this block, comment markers included.
    pub fn to_markup(&self) -> String {
        match self {
            Block::Paragraph(html) => wrap("paragraph", None, html),
            Block::Heading { level, text } => wrap(
                "heading",
                Some(json!({ "level": level })),
                &format!("<h{level} class=\"wp-block-heading\">{text}</h{level}>"),
            ),
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                let attrs = ordered.then(|| json!({ "ordered": true }));
                let items: String = items.iter().map(ListItem::to_markup).collect();
                wrap(
                    "list",
                    attrs,
                    &format!("<{tag} class=\"wp-block-list\">{items}</{tag}>"),
                )
            }
            Block::Quote(inner) => wrap(
                "quote",
                None,
                &format!("<blockquote class=\"wp-block-quote\">{inner}</blockquote>"),
            ),
            Block::Table(html) => wrap(
                "table",
                None,
                &format!("<figure class=\"wp-block-table\">{html}</figure>"),
            ),
            Block::Image(media) => media.to_markup(),
        }
    }
}

impl ListItem {
    fn to_markup(&self) -> String {
        format!("{}\n", wrap("list-item", None, &format!("<li>{}</li>", self.inner)))
    }
}

impl MediaBlock {
    fn to_markup(&self) -> String {
        let src = html_escape::encode_double_quoted_attribute(&self.url);
        let alt = html_escape::encode_double_quoted_attribute(&self.alt);
        wrap(
            "image",
            Some(json!({ "sizeSlug": "large" })),
            &format!(
                "<figure class=\"wp-block-image size-large\"><img src=\"{}\" alt=\"{}\"/></figure>",
                src, alt
            ),
        )
    }
}

fn heading(level: u8, span: &Span<'_>) -> Block {
    Block::Heading {
        level,
        text: normalize_heading_text(span.inner()).to_string(),
    }
}

/// Every `<li>...</li>` inside a list element, trimmed. The nearest `</li>`
/// closes an item, so a nested list stays inside its parent item's text.
pub fn list_items(list_html: &str) -> Vec<ListItem> {
    const OPEN: &str = "<li>";
    const CLOSE: &str = "</li>";

    let mut items = Vec::new();
    let mut rest = list_html;
    while let Some(open) = rest.find(OPEN) {
        let body = &rest[open + OPEN.len()..];
        let Some(close) = body.find(CLOSE) else {
            break;
        };
        items.push(ListItem {
            inner: body[..close].trim().to_string(),
        });
        rest = &body[close + CLOSE.len()..];
    }
    items
}

fn wrap(block_type: &str, attrs: Option<Value>, html: &str) -> String {
    match attrs {
        Some(attrs) => format!("<!-- wp:{block_type} {attrs} -->\n{html}\n<!-- /wp:{block_type} -->"),
        None => format!("<!-- wp:{block_type} -->\n{html}\n<!-- /wp:{block_type} -->"),
    }
}

/// Serialize blocks in order, blank-line separated.
pub fn serialize(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::to_markup)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::segment::segment;

    fn blocks(html: &str) -> Vec<Block> {
        segment(html).map(|s| Block::from_span(&s)).collect()
    }

    fn inners(block: &Block) -> Vec<&str> {
        match block {
            Block::List { items, .. } => items.iter().map(|i| i.inner.as_str()).collect(),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn paragraph_verbatim() {
        let b = &blocks("<p>Hello <em>world</em></p>")[0];
        assert_eq!(
            b.to_markup(),
            "<!-- wp:paragraph -->\n<p>Hello <em>world</em></p>\n<!-- /wp:paragraph -->"
        );
    }

    #[test]
    fn heading_levels() {
        let bs = blocks("<h2>Scaling Up</h2><h3 id=\"x\">Detail</h3>");
        assert_eq!(bs[0], Block::Heading { level: 2, text: "Scaling Up".into() });
        assert_eq!(
            bs[0].to_markup(),
            "<!-- wp:heading {\"level\":2} -->\n<h2 class=\"wp-block-heading\">Scaling Up</h2>\n<!-- /wp:heading -->"
        );
        assert_eq!(
            bs[1].to_markup(),
            "<!-- wp:heading {\"level\":3} -->\n<h3 class=\"wp-block-heading\">Detail</h3>\n<!-- /wp:heading -->"
        );
        assert_eq!(bs[0].h2_text(), Some("Scaling Up"));
        assert_eq!(bs[1].h2_text(), None);
    }

    #[test]
    fn heading_text_shares_index_normalization() {
        let bs = blocks("<h2>  Padded  </h2>");
        assert_eq!(bs[0].h2_text(), Some("Padded"));
    }

    #[test]
    fn list_items_in_order() {
        for (html, ordered) in [
            ("<ul>\n<li>A</li>\n<li>B</li>\n<li>C</li>\n</ul>", false),
            ("<ol>\n<li>A</li>\n<li>B</li>\n<li>C</li>\n</ol>", true),
        ] {
            let bs = blocks(html);
            assert!(matches!(&bs[0], Block::List { ordered: o, .. } if *o == ordered));
            assert_eq!(inners(&bs[0]), vec!["A", "B", "C"]);
        }
    }

    #[test]
    fn list_markup() {
        let ul = &blocks("<ul>\n<li> one </li>\n</ul>")[0];
        assert_eq!(
            ul.to_markup(),
            "<!-- wp:list -->\n<ul class=\"wp-block-list\"><!-- wp:list-item -->\n<li>one</li>\n<!-- /wp:list-item -->\n</ul>\n<!-- /wp:list -->"
        );

        let ol = &blocks("<ol>\n<li>one</li>\n</ol>")[0];
        assert!(ol.to_markup().starts_with("<!-- wp:list {\"ordered\":true} -->\n<ol class=\"wp-block-list\">"));
    }

    #[test]
    fn empty_list() {
        let bs = blocks("<ul></ul>");
        assert_eq!(bs[0], Block::List { ordered: false, items: vec![] });
        assert_eq!(
            bs[0].to_markup(),
            "<!-- wp:list -->\n<ul class=\"wp-block-list\"></ul>\n<!-- /wp:list -->"
        );
    }

    #[test]
    fn loose_list_items_keep_paragraphs() {
        let items = list_items("<ul>\n<li>\n<p>first</p>\n</li>\n<li>\n<p>second</p>\n</li>\n</ul>");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].inner, "<p>first</p>");
    }

    #[test]
    fn quote_inner_trimmed() {
        let b = &blocks("<blockquote>\n<p>Be brief.</p>\n</blockquote>")[0];
        assert_eq!(b, &Block::Quote("<p>Be brief.</p>".into()));
        assert_eq!(
            b.to_markup(),
            "<!-- wp:quote -->\n<blockquote class=\"wp-block-quote\"><p>Be brief.</p></blockquote>\n<!-- /wp:quote -->"
        );
    }

    #[test]
    fn table_wrapped_in_figure() {
        let html = "<table><tr><td>1</td></tr></table>";
        assert_eq!(
            blocks(html)[0].to_markup(),
            format!("<!-- wp:table -->\n<figure class=\"wp-block-table\">{html}</figure>\n<!-- /wp:table -->")
        );
    }

    #[test]
    fn image_alt_escaped() {
        let img = Block::Image(MediaBlock {
            url: "https://x/img.png".into(),
            alt: "Say \"hi\"".into(),
        });
        assert_eq!(
            img.to_markup(),
            "<!-- wp:image {\"sizeSlug\":\"large\"} -->\n<figure class=\"wp-block-image size-large\"><img src=\"https://x/img.png\" alt=\"Say &quot;hi&quot;\"/></figure>\n<!-- /wp:image -->"
        );
    }

    #[test]
    fn image_src_escaped() {
        let img = Block::Image(MediaBlock {
            url: "https://x/a\"b.png".into(),
            alt: "A".into(),
        });
        assert!(img
            .to_markup()
            .contains("<img src=\"https://x/a&quot;b.png\" alt=\"A\"/>"));
    }

    #[test]
    fn serialize_joins_with_blank_line() {
        let bs = blocks("<p>a</p><p>b</p>");
        assert_eq!(
            serialize(&bs),
            "<!-- wp:paragraph -->\n<p>a</p>\n<!-- /wp:paragraph -->\n\n<!-- wp:paragraph -->\n<p>b</p>\n<!-- /wp:paragraph -->"
        );
        assert_eq!(serialize(&[]), "");
    }
}
