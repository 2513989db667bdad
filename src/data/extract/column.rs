//! Column rules, table shapes and the standard cell extraction functions

use super::cell::{strip_citations, CellContent};
use crate::{Result, TennisError};
use regex::Regex;
use std::sync::LazyLock;

/// Maps the content of one cell to a normalized field value
pub type ExtractFn = fn(&CellContent) -> String;

/// A named output column read from a fixed cell position
#[derive(Clone)]
pub struct ColumnRule {
    /// Header name written to CSV
    pub name: &'static str,
    /// Index into the row's `td` cells
    pub cell: usize,
    pub extract: ExtractFn,
}

impl ColumnRule {
    pub const fn new(name: &'static str, cell: usize, extract: ExtractFn) -> Self {
        ColumnRule {
            name,
            cell,
            extract,
        }
    }
}

impl std::fmt::Debug for ColumnRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnRule")
            .field("name", &self.name)
            .field("cell", &self.cell)
            .finish()
    }
}

/// Column positions that must be non-empty for a record to be kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFieldSet {
    positions: Vec<usize>,
}

impl RequiredFieldSet {
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Layout of one kind of table
#[derive(Debug, Clone)]
pub struct TableShape {
    columns: Vec<ColumnRule>,
    min_cells: usize,
    required: RequiredFieldSet,
}

impl TableShape {
    /// Build a shape; rows need at least as many cells as the rules reference
    pub fn new(columns: Vec<ColumnRule>) -> Self {
        let min_cells = columns.iter().map(|c| c.cell + 1).max().unwrap_or(0);
        TableShape {
            columns,
            min_cells,
            required: RequiredFieldSet::default(),
        }
    }

    /// Override the minimum `td` count a row needs to be considered data
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// Mark columns (by name) as required
    pub fn require(mut self, names: &[&str]) -> Result<Self> {
        let mut positions = Vec::with_capacity(names.len());
        for name in names {
            let pos = self
                .columns
                .iter()
                .position(|c| c.name == *name)
                .ok_or_else(|| {
                    TennisError::Config(format!("required column `{}` is not in the shape", name))
                })?;
            if !positions.contains(&pos) {
                positions.push(pos);
            }
        }
        positions.sort_unstable();
        self.required = RequiredFieldSet { positions };
        Ok(self)
    }

    pub fn columns(&self) -> &[ColumnRule] {
        &self.columns
    }

    pub fn min_cells(&self) -> usize {
        self.min_cells
    }

    pub fn required(&self) -> &RequiredFieldSet {
        &self.required
    }

    /// Header row matching the record layout
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("static regex"));

/// Visible text without citation markers
pub fn plain_text(cell: &CellContent) -> String {
    strip_citations(cell.text())
}

/// First link's text, falling back to the plain text
pub fn link_or_text(cell: &CellContent) -> String {
    match cell.links().first() {
        Some(link) => link.text.clone(),
        None => plain_text(cell),
    }
}

/// First link's text, or empty when the cell has no link
pub fn link_text(cell: &CellContent) -> String {
    cell.links()
        .first()
        .map(|link| link.text.clone())
        .unwrap_or_default()
}

/// All link texts joined, falling back to the plain text
pub fn linked_names(cell: &CellContent) -> String {
    let links = cell.links();
    if links.is_empty() {
        return plain_text(cell);
    }
    links
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flag alt texts joined, or empty for cells without flags
pub fn flag_countries(cell: &CellContent) -> String {
    match cell {
        CellContent::FlagAnnotatedText { flags, .. } => flags.join(", "),
        CellContent::PlainText(_) | CellContent::LinkedText { .. } => String::new(),
    }
}

/// Plain text, or the flag countries when the cell shows only flags
pub fn text_or_flags(cell: &CellContent) -> String {
    let text = plain_text(cell);
    if text.is_empty() {
        flag_countries(cell)
    } else {
        text
    }
}

/// Last `[XYZ]` annotation without the brackets, e.g. `[POL]` -> `POL`
pub fn bracketed_code(cell: &CellContent) -> String {
    BRACKETED
        .captures_iter(cell.text())
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::extract::cell::Link;

    fn linked(text: &str, names: &[&str]) -> CellContent {
        CellContent::LinkedText {
            text: text.to_string(),
            links: names
                .iter()
                .map(|n| Link {
                    text: n.to_string(),
                    href: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_min_cells_follows_highest_cell() {
        let shape = TableShape::new(vec![
            ColumnRule::new("A", 0, plain_text),
            ColumnRule::new("B", 4, plain_text),
            ColumnRule::new("C", 2, plain_text),
        ]);
        assert_eq!(shape.min_cells(), 5);
        assert_eq!(shape.headers(), ["A", "B", "C"]);
        assert_eq!(shape.with_min_cells(3).min_cells(), 3);
    }

    #[test]
    fn test_require_resolves_names() {
        let shape = TableShape::new(vec![
            ColumnRule::new("Rank", 0, plain_text),
            ColumnRule::new("Name", 1, plain_text),
            ColumnRule::new("Score", 2, plain_text),
        ])
        .require(&["Score", "Rank"])
        .unwrap();
        assert_eq!(shape.required().positions(), &[0, 2]);

        let err = TableShape::new(vec![ColumnRule::new("Rank", 0, plain_text)])
            .require(&["Nope"])
            .unwrap_err();
        assert!(matches!(err, TennisError::Config(_)));
    }

    #[test]
    fn test_link_extractors() {
        let plain = CellContent::PlainText("Ken Rosewall [a]".to_string());
        assert_eq!(link_or_text(&plain), "Ken Rosewall");
        assert_eq!(link_text(&plain), "");
        assert_eq!(linked_names(&plain), "Ken Rosewall");

        let cell = linked("Martina Navratilova Pam Shriver", &["Martina Navratilova", "Pam Shriver"]);
        assert_eq!(link_or_text(&cell), "Martina Navratilova");
        assert_eq!(linked_names(&cell), "Martina Navratilova, Pam Shriver");
    }

    #[test]
    fn test_country_extractors() {
        let flagged = CellContent::FlagAnnotatedText {
            text: "A B".to_string(),
            flags: vec!["Australia".to_string(), "Czech Republic".to_string()],
            links: vec![],
        };
        assert_eq!(flag_countries(&flagged), "Australia, Czech Republic");
        assert_eq!(text_or_flags(&flagged), "A B");

        let flag_only = CellContent::FlagAnnotatedText {
            text: String::new(),
            flags: vec!["Sweden".to_string()],
            links: vec![],
        };
        assert_eq!(text_or_flags(&flag_only), "Sweden");

        let plain = CellContent::PlainText("SWE".to_string());
        assert_eq!(flag_countries(&plain), "");
        assert_eq!(text_or_flags(&plain), "SWE");
    }

    #[test]
    fn test_bracketed_code() {
        let cell = linked("Iga Swiatek [POL]", &["Iga Swiatek"]);
        assert_eq!(bracketed_code(&cell), "POL");
        assert_eq!(bracketed_code(&CellContent::PlainText("Nobody".into())), "");
    }
}
