//! Tabular HTML-to-record extraction
//!
//! A table is picked out of a parsed document with a [`TableSelector`], then
//! every row after the header is mapped through the column rules of a
//! [`TableShape`]. Rows with too few cells or with an empty required field
//! are counted as skipped; all others become [`Record`]s, in source order.

pub mod cell;
pub mod column;
pub mod record;
pub mod table;

pub use cell::{CellContent, Link};
pub use column::{ColumnRule, ExtractFn, RequiredFieldSet, TableShape};
pub use record::{Record, RecordBatch};
pub use table::{select_table, SelectionError, TableSelector};

use crate::Result;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("static selector"));
static DATA_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("static selector"));

/// Map the rows of a table to records
///
/// The first row is treated as the header and never examined. Cell
/// extraction cannot fail, so this always returns a batch.
pub fn extract_records(table: ElementRef<'_>, shape: &TableShape) -> RecordBatch {
    let mut batch = RecordBatch::new();

    for (row_no, row) in table.select(&ROW).skip(1).enumerate() {
        let cells: Vec<ElementRef<'_>> = row.select(&DATA_CELL).collect();

        if cells.len() < shape.min_cells() {
            log::debug!(
                "Row {}: {} cell(s), need {}; skipping",
                row_no + 1,
                cells.len(),
                shape.min_cells()
            );
            batch.skipped += 1;
            continue;
        }

        let contents: Vec<CellContent> = cells.into_iter().map(CellContent::parse).collect();
        let fields: Vec<String> = shape
            .columns()
            .iter()
            .map(|rule| {
                contents
                    .get(rule.cell)
                    .map(|content| (rule.extract)(content))
                    .unwrap_or_default()
            })
            .collect();

        if let Some(&missing) = shape
            .required()
            .positions()
            .iter()
            .find(|&&pos| fields[pos].is_empty())
        {
            log::warn!(
                "Row {}: required column `{}` is empty; skipping {:?}",
                row_no + 1,
                shape.columns()[missing].name,
                fields
            );
            batch.skipped += 1;
            continue;
        }

        batch.records.push(Record::new(fields));
    }

    log::debug!(
        "Extracted {} record(s), skipped {} row(s)",
        batch.len(),
        batch.skipped
    );
    batch
}

/// Selector and shape bundled for one kind of page
#[derive(Debug, Clone)]
pub struct TableRecordExtractor {
    pub selector: TableSelector,
    pub shape: TableShape,
}

impl TableRecordExtractor {
    pub fn new(selector: TableSelector, shape: TableShape) -> Self {
        TableRecordExtractor { selector, shape }
    }

    /// Select the table and extract its records
    pub fn extract(&self, document: &Html) -> Result<RecordBatch> {
        let table = select_table(document, &self.selector)?;
        Ok(extract_records(table, &self.shape))
    }

    /// Parse raw HTML and extract
    pub fn extract_html(&self, html: &str) -> Result<RecordBatch> {
        let document = Html::parse_document(html);
        self.extract(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::column::{link_or_text, plain_text};
    use super::*;

    fn six_column_shape() -> TableShape {
        TableShape::new(vec![
            ColumnRule::new("Year", 0, plain_text),
            ColumnRule::new("Champion_Country", 1, plain_text),
            ColumnRule::new("Champion", 2, link_or_text),
            ColumnRule::new("Runner_up_Country", 3, plain_text),
            ColumnRule::new("Runner-up", 4, link_or_text),
            ColumnRule::new("Score_in_final", 5, plain_text),
        ])
    }

    fn extractor(shape: TableShape) -> TableRecordExtractor {
        TableRecordExtractor::new(TableSelector::new("table.wikitable", 0), shape)
    }

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body><table class="wikitable">
                <tr><th>Year</th><th>Country</th><th>Champion</th><th>Country</th><th>Runner-up</th><th>Score</th></tr>
                {}
            </table></body></html>"#,
            rows
        )
    }

    #[test]
    fn test_full_row_kept_short_row_skipped() {
        let html = page(
            r#"<tr><td>2024</td><td>ITA</td><td><a href="/s">Jannik Sinner</a></td><td>RUS</td>
                   <td><a href="/m">Daniil Medvedev</a></td><td>3–6, 3–6, 6–4, 6–4, 6–3<sup>[7]</sup></td></tr>
               <tr><td>1986</td><td colspan="5">No competition</td><td>x</td></tr>"#,
        );
        let shape = six_column_shape()
            .require(&["Year", "Champion_Country", "Champion", "Runner_up_Country", "Runner-up", "Score_in_final"])
            .unwrap();
        let batch = extractor(shape).extract_html(&html).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(
            batch.records[0].fields(),
            &["2024", "ITA", "Jannik Sinner", "RUS", "Daniil Medvedev", "3–6, 3–6, 6–4, 6–4, 6–3"]
        );
    }

    #[test]
    fn test_counts_add_up_and_order_is_kept() {
        let html = page(
            r#"<tr><td>2023</td><td>SRB</td><td>Novak Djokovic</td><td>GRE</td><td>Stefanos Tsitsipas</td><td>6–3</td></tr>
               <tr><td>1986</td><td>No competition</td></tr>
               <tr><td>2022</td><td>ESP</td><td>Rafael Nadal</td><td>RUS</td><td>Daniil Medvedev</td><td>2–6</td></tr>
               <tr><td></td></tr>
               <tr><td>2021</td><td>SRB</td><td>Novak Djokovic</td><td>RUS</td><td>Daniil Medvedev</td><td>7–5</td></tr>"#,
        );
        let batch = extractor(six_column_shape()).extract_html(&html).unwrap();

        assert_eq!(batch.examined(), 5);
        assert_eq!(batch.skipped, 2);
        let years: Vec<_> = batch.records.iter().filter_map(|r| r.get(0)).collect();
        assert_eq!(years, ["2023", "2022", "2021"]);
    }

    #[test]
    fn test_required_field_gates_record() {
        let html = page(
            r#"<tr><td>2020</td><td>SRB</td><td>Novak Djokovic</td><td>AUT</td><td>Dominic Thiem</td><td>6–4</td></tr>
               <tr><td>2019</td><td>SRB</td><td></td><td>ESP</td><td>Rafael Nadal</td><td>6–3</td></tr>"#,
        );
        let shape = six_column_shape().require(&["Champion"]).unwrap();
        let batch = extractor(shape).extract_html(&html).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.records[0].get(2), Some("Novak Djokovic"));
    }

    #[test]
    fn test_optional_columns_past_row_end_are_empty() {
        let html = page(r#"<tr><td>1 </td><td>Aryna Sabalenka</td><td>58</td></tr>"#);
        let shape = TableShape::new(vec![
            ColumnRule::new("Rank", 0, plain_text),
            ColumnRule::new("Player", 1, plain_text),
            ColumnRule::new("Matches", 2, plain_text),
            ColumnRule::new("Aces", 8, plain_text),
        ])
        .with_min_cells(3)
        .require(&["Rank", "Player"])
        .unwrap();
        let batch = extractor(shape).extract_html(&html).unwrap();

        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.records[0].fields(), &["1", "Aryna Sabalenka", "58", ""]);
    }

    #[test]
    fn test_header_only_table() {
        let batch = extractor(six_column_shape()).extract_html(&page("")).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = page(
            r#"<tr><td>2018</td><td>SUI</td><td><a href="/f">Roger Federer</a></td><td>CRO</td><td>Marin Čilić</td><td>6–2</td></tr>
               <tr><td>2017</td></tr>"#,
        );
        let document = Html::parse_document(&html);
        let ex = extractor(six_column_shape());
        assert_eq!(ex.extract(&document).unwrap(), ex.extract(&document).unwrap());
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let ex = TableRecordExtractor::new(TableSelector::new("table.wikitable", 3), six_column_shape());
        assert!(ex.extract_html(&page("")).is_err());
    }
}
