//! Portable Text rich text.
//!
//! Bodies arrive as an array of blocks, each holding styled spans. This
//! module keeps a typed copy of the parts the storefront renders and groups
//! blocks into template-ready nodes: consecutive list items of the same kind
//! collapse into one list, heading levels are clamped to the page outline,
//! and link targets are checked before they reach an `href` attribute.

/// Paragraph-level style of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockStyle {
    #[default]
    Normal,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Blockquote,
}

impl BlockStyle {
    /// Parse a style name; unknown styles render as paragraphs.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "h5" => Self::H5,
            "h6" => Self::H6,
            "blockquote" => Self::Blockquote,
            _ => Self::Normal,
        }
    }

    /// Output tag. The page title owns `h1`, so headings fit within `h2..=h4`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Normal => "p",
            Self::H1 | Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 | Self::H5 | Self::H6 => "h4",
            Self::Blockquote => "blockquote",
        }
    }
}

/// List kind of a list-item block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    /// Parse a `listItem` value.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bullet" => Some(Self::Bullet),
            "number" => Some(Self::Number),
            _ => None,
        }
    }

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bullet => "ul",
            Self::Number => "ol",
        }
    }
}

/// Inline annotation on a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Strong,
    Emphasis,
    Code,
    Underline,
    StrikeThrough,
    Link(String),
}

impl Mark {
    /// Parse a decorator name. Annotations (links) are resolved separately
    /// because they reference the block's mark definitions.
    #[must_use]
    pub fn decorator(name: &str) -> Option<Self> {
        match name {
            "strong" => Some(Self::Strong),
            "em" => Some(Self::Emphasis),
            "code" => Some(Self::Code),
            "underline" => Some(Self::Underline),
            "strike-through" => Some(Self::StrikeThrough),
            _ => None,
        }
    }
}

/// A run of text sharing the same marks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

/// A text block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub style: BlockStyle,
    /// Set when the block is a list item.
    pub list: Option<ListKind>,
    pub spans: Vec<Span>,
}

impl Block {
    /// Plain text of the block, marks dropped.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// A span flattened for templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanView {
    pub text: String,
    pub strong: bool,
    pub em: bool,
    pub code: bool,
    pub underline: bool,
    pub strike: bool,
    /// Sanitized link target.
    pub href: Option<String>,
}

impl From<&Span> for SpanView {
    fn from(span: &Span) -> Self {
        let mut view = Self {
            text: span.text.clone(),
            ..Self::default()
        };
        for mark in &span.marks {
            match mark {
                Mark::Strong => view.strong = true,
                Mark::Emphasis => view.em = true,
                Mark::Code => view.code = true,
                Mark::Underline => view.underline = true,
                Mark::StrikeThrough => view.strike = true,
                Mark::Link(href) => view.href = Some(safe_href(href)),
            }
        }
        view
    }
}

/// One top-level element of rendered rich text.
///
/// Text blocks fill `spans`; lists fill `items`, one entry per `<li>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextNode {
    pub tag: &'static str,
    pub is_list: bool,
    pub spans: Vec<SpanView>,
    pub items: Vec<Vec<SpanView>>,
}

/// Group blocks into renderable nodes.
///
/// Blocks without visible text are skipped. Only consecutive list items
/// group; a non-list block, even an empty one, closes the open list. List
/// nesting levels are not preserved; nested items join their surrounding
/// list.
#[must_use]
pub fn render(blocks: &[Block]) -> Vec<RichTextNode> {
    let mut nodes: Vec<RichTextNode> = Vec::new();
    let mut open_list: Option<ListKind> = None;

    for block in blocks {
        if block.plain_text().trim().is_empty() {
            // A skipped paragraph still ends the list before it.
            if block.list.is_none() {
                open_list = None;
            }
            continue;
        }
        let spans: Vec<SpanView> = block.spans.iter().map(SpanView::from).collect();

        match block.list {
            Some(kind) => {
                if open_list == Some(kind)
                    && let Some(list) = nodes.last_mut()
                {
                    list.items.push(spans);
                    continue;
                }
                nodes.push(RichTextNode {
                    tag: kind.tag(),
                    is_list: true,
                    spans: Vec::new(),
                    items: vec![spans],
                });
                open_list = Some(kind);
            }
            None => {
                nodes.push(RichTextNode {
                    tag: block.style.tag(),
                    is_list: false,
                    spans,
                    items: Vec::new(),
                });
                open_list = None;
            }
        }
    }

    nodes
}

/// First non-empty paragraph of a body, for meta descriptions.
#[must_use]
pub fn excerpt(blocks: &[Block], max_chars: usize) -> Option<String> {
    let text = blocks
        .iter()
        .filter(|b| b.list.is_none() && b.style == BlockStyle::Normal)
        .map(Block::plain_text)
        .find(|t| !t.trim().is_empty())?;
    let text = text.trim();

    if text.chars().count() <= max_chars {
        return Some(text.to_owned());
    }
    let truncated: String = text.chars().take(max_chars).collect();
    Some(format!("{}…", truncated.trim_end()))
}

/// Allow only web, mail, and site-relative link targets.
fn safe_href(href: &str) -> String {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    let allowed = lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || (href.starts_with('/') && !href.starts_with("//"));

    if allowed { href.to_owned() } else { "#".to_owned() }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn text_block(style: BlockStyle, text: &str) -> Block {
        Block {
            style,
            list: None,
            spans: vec![Span {
                text: text.to_owned(),
                marks: Vec::new(),
            }],
        }
    }

    fn list_item(kind: ListKind, text: &str) -> Block {
        Block {
            list: Some(kind),
            ..text_block(BlockStyle::Normal, text)
        }
    }

    #[test]
    fn test_heading_levels_are_clamped() {
        assert_eq!(BlockStyle::H1.tag(), "h2");
        assert_eq!(BlockStyle::H3.tag(), "h3");
        assert_eq!(BlockStyle::H6.tag(), "h4");
        assert_eq!(BlockStyle::parse("display"), BlockStyle::Normal);
    }

    #[test]
    fn test_consecutive_list_items_group() {
        let nodes = render(&[
            text_block(BlockStyle::Normal, "前言"),
            list_item(ListKind::Bullet, "鼠"),
            list_item(ListKind::Bullet, "牛"),
            list_item(ListKind::Number, "一"),
            text_block(BlockStyle::Normal, "結語"),
            list_item(ListKind::Bullet, "虎"),
        ]);

        let tags: Vec<_> = nodes.iter().map(|n| n.tag).collect();
        assert_eq!(tags, ["p", "ul", "ol", "p", "ul"]);
        assert_eq!(nodes[1].items.len(), 2);
        assert_eq!(nodes[2].items.len(), 1);
        assert!(nodes[1].is_list);
    }

    #[test]
    fn test_empty_paragraph_splits_lists() {
        let nodes = render(&[
            list_item(ListKind::Bullet, "鼠"),
            text_block(BlockStyle::Normal, ""),
            list_item(ListKind::Bullet, "牛"),
            list_item(ListKind::Bullet, " "),
            list_item(ListKind::Bullet, "虎"),
        ]);

        let tags: Vec<_> = nodes.iter().map(|n| n.tag).collect();
        assert_eq!(tags, ["ul", "ul"]);
        assert_eq!(nodes[0].items.len(), 1);
        assert_eq!(nodes[1].items.len(), 2);
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let nodes = render(&[
            text_block(BlockStyle::Normal, "  "),
            text_block(BlockStyle::H2, "標題"),
        ]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].tag, "h2");
    }

    #[test]
    fn test_marks_flatten_into_view() {
        let span = Span {
            text: "金湯匙".to_owned(),
            marks: vec![
                Mark::Strong,
                Mark::Emphasis,
                Mark::Link("https://kiyone.tw/".to_owned()),
            ],
        };
        let view = SpanView::from(&span);
        assert!(view.strong);
        assert!(view.em);
        assert!(!view.code);
        assert_eq!(view.href.as_deref(), Some("https://kiyone.tw/"));
    }

    #[test]
    fn test_unsafe_hrefs_are_neutralized() {
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href("JAVASCRIPT:alert(1)"), "#");
        assert_eq!(safe_href("//evil.example"), "#");
        assert_eq!(safe_href("data:text/html,hi"), "#");
        assert_eq!(safe_href("/products/golden-spoon"), "/products/golden-spoon");
        assert_eq!(safe_href("mailto:hi@kiyone.tw"), "mailto:hi@kiyone.tw");
        assert_eq!(safe_href(" https://shopee.tw/x "), "https://shopee.tw/x");
    }

    #[test]
    fn test_excerpt_uses_first_paragraph() {
        let blocks = [
            text_block(BlockStyle::H2, "標題"),
            text_block(BlockStyle::Normal, ""),
            text_block(BlockStyle::Normal, "寶寶的第一份禮物"),
        ];
        assert_eq!(excerpt(&blocks, 100).as_deref(), Some("寶寶的第一份禮物"));
        assert_eq!(excerpt(&blocks, 4).as_deref(), Some("寶寶的第…"));
        assert!(excerpt(&[], 10).is_none());
    }
}
