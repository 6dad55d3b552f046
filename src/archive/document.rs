//! Thin adapter over `scraper` exposing only what the archive parsers need:
//! anchor selection, element text, the text around an anchor, and the raw
//! page source for offset lookups.

use std::sync::LazyLock;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;

/// Flat thread view (`/T/`) entry suffix.
pub const FLAT_SUFFIX: &str = "T/#u";
/// Nested thread view (`/t/`) entry suffix.
pub const UNIFIED_SUFFIX: &str = "t/#u";

static THREAD_ANCHORS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!(
        r#"a[href$="{FLAT_SUFFIX}"], a[href$="{UNIFIED_SUFFIX}"]"#
    ))
    .unwrap()
});

static ALL_ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

static PREFORMATTED: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre").unwrap());

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("document is empty")]
    EmptyDocument,

    #[error("document contains no markup")]
    NotHtml,
}

/// A parsed archive page together with its unparsed source.
pub struct ArchivePage<'a> {
    raw: &'a str,
    html: Html,
}

impl<'a> ArchivePage<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        if !raw.contains('<') {
            return Err(ParseError::NotHtml);
        }
        Ok(Self {
            raw,
            html: Html::parse_document(raw),
        })
    }

    /// The page exactly as fetched, before any parsing.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Thread-entry anchors in document order.
    pub fn thread_anchors(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.select(&THREAD_ANCHORS)
    }

    /// Every anchor on the page, in document order.
    pub fn anchors(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.select(&ALL_ANCHORS)
    }

    /// `<pre>` blocks in document order.
    pub fn preformatted(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.select(&PREFORMATTED)
    }
}

/// Rendered text of an element with runs of whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text rendered around `anchor` inside its container: the part of the
/// anchor's own line before it, then everything after it up to the next
/// anchor. Falls back to the whole container text when both are empty.
pub fn surrounding_text(anchor: ElementRef<'_>) -> String {
    let text = collapse_whitespace(&format!(
        "{} {}",
        line_prefix_text(anchor),
        following_text(anchor)
    ));
    if !text.is_empty() {
        return text;
    }

    anchor
        .parent()
        .and_then(ElementRef::wrap)
        .map(element_text)
        .unwrap_or_default()
}

fn node_text(node: NodeRef<'_, Node>) -> Option<String> {
    match node.value() {
        Node::Text(t) => Some(String::from(&**t)),
        Node::Element(_) => ElementRef::wrap(node).map(|el| el.text().collect()),
        _ => None,
    }
}

fn is_anchor(node: NodeRef<'_, Node>) -> bool {
    matches!(node.value(), Node::Element(e) if e.name() == "a")
}

fn line_prefix_text(anchor: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    for sibling in anchor.prev_siblings() {
        if is_anchor(sibling) {
            break;
        }
        let Some(text) = node_text(sibling) else {
            continue;
        };
        if let Some((_, tail)) = text.rsplit_once('\n') {
            pieces.push(tail.to_string());
            break;
        }
        pieces.push(text);
    }
    pieces.reverse();
    pieces.concat()
}

fn following_text(anchor: ElementRef<'_>) -> String {
    anchor
        .next_siblings()
        .take_while(|sibling| !is_anchor(*sibling))
        .filter_map(node_text)
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
