use pulldown_cmark::{html, Event, Options, Parser, Tag};

/// Render Markdown to plain HTML: tables on, fenced code on, every soft
/// line break promoted to `<br />`, and ordered lists always emitted as a
/// bare `<ol>` whatever number they start at.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Start(Tag::List(Some(_))) => Event::Start(Tag::List(Some(1))),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_paragraphs() {
        let out = markdown_to_html("## Scaling Up\n\nSome text.");
        assert!(out.contains("<h2>Scaling Up</h2>"));
        assert!(out.contains("<p>Some text.</p>"));
    }

    #[test]
    fn soft_breaks_become_br() {
        let out = markdown_to_html("line one\nline two");
        assert!(out.contains("line one<br />"));
    }

    #[test]
    fn tables_enabled() {
        let out = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.starts_with("<table>"));
        assert!(out.contains("</table>"));
    }

    #[test]
    fn ordered_list_start_is_dropped() {
        let out = markdown_to_html("Intro.\n\n3. third\n4. fourth\n");
        assert!(out.contains("<ol>\n<li>third</li>\n<li>fourth</li>\n</ol>"));
        assert!(!out.contains("start="));
    }

    #[test]
    fn list_split_by_code_block_stays_bare() {
        let out = markdown_to_html("1. install\n\n```\nmake\n```\n\n2. run\n");
        assert_eq!(out.matches("<ol>").count(), 2);
        assert!(!out.contains("start="));
    }

    #[test]
    fn tight_list_items_are_bare() {
        let out = markdown_to_html("- one\n- two\n");
        assert!(out.contains("<ul>"));
        assert!(out.contains("<li>one</li>"));
        assert!(out.contains("<li>two</li>"));
    }
}
