//! Cell content model
//!
//! Every data cell is classified once into a [`CellContent`] variant so that
//! column extraction functions can pattern-match instead of probing the DOM.

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));
static FLAG_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.flagicon img[alt]").expect("static selector"));
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("static regex"));
static CITATION_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]*\]$").expect("static regex"));

/// A hyperlink found inside a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: Option<String>,
}

/// Normalized content of one table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Text only, no links or flags
    PlainText(String),
    /// Text with one or more (non-citation) links
    LinkedText { text: String, links: Vec<Link> },
    /// Text preceded by flag icons, e.g. doubles teams on Wikipedia
    FlagAnnotatedText {
        text: String,
        flags: Vec<String>,
        links: Vec<Link>,
    },
}

impl CellContent {
    /// Classify a `td` element
    pub fn parse(cell: ElementRef<'_>) -> Self {
        let text = normalize_ws(&cell.text().collect::<String>());

        let flags: Vec<String> = cell
            .select(&FLAG_IMG)
            .filter_map(|img| img.value().attr("alt"))
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(String::from)
            .collect();

        let links: Vec<Link> = cell
            .select(&ANCHOR)
            .filter(|a| !inside_flagicon(a))
            .filter_map(|a| {
                let link_text = normalize_ws(&a.text().collect::<String>());
                if link_text.is_empty() || CITATION_ONLY.is_match(&link_text) {
                    return None;
                }
                Some(Link {
                    text: link_text,
                    href: a.value().attr("href").map(String::from),
                })
            })
            .collect();

        if !flags.is_empty() {
            CellContent::FlagAnnotatedText { text, flags, links }
        } else if !links.is_empty() {
            CellContent::LinkedText { text, links }
        } else {
            CellContent::PlainText(text)
        }
    }

    /// Full visible text, whitespace-collapsed, citations still present
    pub fn text(&self) -> &str {
        match self {
            CellContent::PlainText(text)
            | CellContent::LinkedText { text, .. }
            | CellContent::FlagAnnotatedText { text, .. } => text,
        }
    }

    pub fn links(&self) -> &[Link] {
        match self {
            CellContent::PlainText(_) => &[],
            CellContent::LinkedText { links, .. } | CellContent::FlagAnnotatedText { links, .. } => {
                links
            }
        }
    }
}

fn inside_flagicon(element: &ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .map(|el| el.classes().any(|c| c == "flagicon"))
            .unwrap_or(false)
    })
}

/// Remove bracketed citation markers such as `[12]` or `[b]`
pub fn strip_citations(s: &str) -> String {
    normalize_ws(&CITATION.replace_all(s, ""))
}

/// Collapse runs of whitespace (including non-breaking spaces) and trim
pub fn normalize_ws(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
