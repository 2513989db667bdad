//! Table selection

use crate::{Result, TennisError};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Locates one table among the elements matching a CSS selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelector {
    pub css: String,
    /// Position among the matches, 0-based
    pub index: usize,
}

impl TableSelector {
    pub fn new(css: impl Into<String>, index: usize) -> Self {
        TableSelector {
            css: css.into(),
            index,
        }
    }
}

impl std::fmt::Display for TableSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.css, self.index)
    }
}

/// Why the expected table could not be found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no table matches `{selector}`")]
    TableNotFound { selector: String },

    #[error("table index {index} out of range: `{selector}` matched {found} table(s)")]
    IndexOutOfRange {
        selector: String,
        index: usize,
        found: usize,
    },
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TennisError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Find the selected table in a parsed document
pub fn select_table<'a>(document: &'a Html, selector: &TableSelector) -> Result<ElementRef<'a>> {
    let css = parse_selector(&selector.css)?;
    let matches: Vec<ElementRef<'a>> = document.select(&css).collect();

    if matches.is_empty() {
        return Err(SelectionError::TableNotFound {
            selector: selector.css.clone(),
        }
        .into());
    }

    let found = matches.len();
    matches.into_iter().nth(selector.index).ok_or_else(|| {
        SelectionError::IndexOutOfRange {
            selector: selector.css.clone(),
            index: selector.index,
            found,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <table class="wikitable"><tr><td>navbox</td></tr></table>
            <table class="sortable wikitable"><tr><td>amateur</td></tr></table>
            <table class="wikitable sortable plainrowheaders"><tr><td>open era</td></tr></table>
        </body></html>
    "#;

    fn first_td(table: ElementRef<'_>) -> String {
        let td = Selector::parse("td").unwrap();
        table.select(&td).next().unwrap().text().collect()
    }

    #[test]
    fn test_selects_by_index_regardless_of_class_order() {
        let doc = Html::parse_document(PAGE);
        let table = select_table(&doc, &TableSelector::new("table.wikitable.sortable", 1)).unwrap();
        assert_eq!(first_td(table), "open era");

        let table = select_table(&doc, &TableSelector::new("table.wikitable", 0)).unwrap();
        assert_eq!(first_td(table), "navbox");
    }

    #[test]
    fn test_table_not_found() {
        let doc = Html::parse_document(PAGE);
        let err = select_table(&doc, &TableSelector::new("table.tablesorter", 0)).unwrap_err();
        assert!(matches!(
            err,
            TennisError::Selection(SelectionError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let doc = Html::parse_document(PAGE);
        let err = select_table(&doc, &TableSelector::new("table.sortable", 2)).unwrap_err();
        match err {
            TennisError::Selection(SelectionError::IndexOutOfRange { index, found, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_bad_selector_is_reported() {
        let doc = Html::parse_document(PAGE);
        let err = select_table(&doc, &TableSelector::new("table[", 0)).unwrap_err();
        assert!(matches!(err, TennisError::Selector { .. }));
    }
}
