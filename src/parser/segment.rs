//! Single-pass segmentation of rendered HTML into top-level element spans.
//!
//! At every `<` the element kinds are tried in a fixed priority order
//! (table, blockquote, ul, ol, h2, h3, p). A kind matches when its opening
//! tag starts there and its closing tag appears somewhere after it; the span
//! runs to the *nearest* closing tag, so nested elements of the same kind are
//! not balanced. Matched spans never overlap. Anything between spans is
//! skipped and can be recovered with [`unmatched_runs`].

/// Element kinds recognised by the segmenter, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Table,
    Quote,
    UnorderedList,
    OrderedList,
    Heading2,
    Heading3,
    Paragraph,
}

impl SpanKind {
    pub const PRIORITY: [SpanKind; 7] = [
        SpanKind::Table,
        SpanKind::Quote,
        SpanKind::UnorderedList,
        SpanKind::OrderedList,
        SpanKind::Heading2,
        SpanKind::Heading3,
        SpanKind::Paragraph,
    ];

    /// Opening tag text. Headings are open-ended (`<h2 id="..">` is allowed),
    /// every other kind must match the bare tag exactly.
    fn open(self) -> &'static str {
        match self {
            SpanKind::Table => "<table>",
            SpanKind::Quote => "<blockquote>",
            SpanKind::UnorderedList => "<ul>",
            SpanKind::OrderedList => "<ol>",
            SpanKind::Heading2 => "<h2",
            SpanKind::Heading3 => "<h3",
            SpanKind::Paragraph => "<p>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            SpanKind::Table => "</table>",
            SpanKind::Quote => "</blockquote>",
            SpanKind::UnorderedList => "</ul>",
            SpanKind::OrderedList => "</ol>",
            SpanKind::Heading2 => "</h2>",
            SpanKind::Heading3 => "</h3>",
            SpanKind::Paragraph => "</p>",
        }
    }

    fn has_attributes(self) -> bool {
        matches!(self, SpanKind::Heading2 | SpanKind::Heading3)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One matched element: its kind, the full outer HTML, and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub raw: &'a str,
    pub start: usize,
    /// Offset of the element content within `raw`.
    inner_start: usize,
}

impl<'a> Span<'a> {
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    /// Content between the opening and closing tags, untrimmed.
    pub fn inner(&self) -> &'a str {
        let raw: &'a str = self.raw;
        &raw[self.inner_start..raw.len() - self.kind.close().len()]
    }
}

/// Lazy iterator over the element spans of an HTML string.
pub struct Segmenter<'a> {
    markup: &'a str,
    pos: usize,
    // Set once a kind's closing tag (or a heading's `>`) is known to be absent
    // from the remainder; it cannot reappear further along.
    exhausted: [bool; 7],
}

impl<'a> Segmenter<'a> {
    pub fn new(markup: &'a str) -> Self {
        Self {
            markup,
            pos: 0,
            exhausted: [false; 7],
        }
    }

    fn match_at(&mut self, kind: SpanKind, at: usize) -> Option<Span<'a>> {
        if self.exhausted[kind.index()] {
            return None;
        }
        let markup: &'a str = self.markup;
        let rest = &markup[at..];
        let open = kind.open();
        if !rest.starts_with(open) {
            return None;
        }

        let inner_start = if kind.has_attributes() {
            match rest[open.len()..].find('>') {
                Some(gt) => open.len() + gt + 1,
                None => {
                    self.exhausted[kind.index()] = true;
                    return None;
                }
            }
        } else {
            open.len()
        };

        let close = kind.close();
        let Some(close_at) = rest[inner_start..].find(close) else {
            self.exhausted[kind.index()] = true;
            return None;
        };
        let len = inner_start + close_at + close.len();

        Some(Span {
            kind,
            raw: &rest[..len],
            start: at,
            inner_start,
        })
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        while self.pos < self.markup.len() {
            let at = self.pos + self.markup[self.pos..].find('<')?;
            for kind in SpanKind::PRIORITY {
                if let Some(span) = self.match_at(kind, at) {
                    self.pos = span.end();
                    return Some(span);
                }
            }
            self.pos = at + 1;
        }
        None
    }
}

/// Segment `markup` into element spans, in document order.
pub fn segment(markup: &str) -> Segmenter<'_> {
    Segmenter::new(markup)
}

/// Non-blank text runs that fall between (or around) `spans`, trimmed.
pub fn unmatched_runs(markup: &str, spans: &[Span<'_>]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut cursor = 0;
    for span in spans {
        push_run(&mut runs, &markup[cursor..span.start]);
        cursor = span.end();
    }
    push_run(&mut runs, &markup[cursor..]);
    runs
}

fn push_run(runs: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        runs.push(text.to_string());
    }
}
