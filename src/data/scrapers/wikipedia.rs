//! Australian Open champions lists on Wikipedia
//!
//! The finals tables are `wikitable sortable` tables; which one holds the
//! data depends on the page (amateur era / open era splits).

use super::TableSource;
use crate::data::extract::column::{
    flag_countries, link_or_text, linked_names, plain_text, text_or_flags,
};
use crate::data::extract::{ColumnRule, TableRecordExtractor, TableSelector, TableShape};
use crate::DataSource;

const FINALS_TABLE: &str = "table.wikitable.sortable";

/// Year | Country | Champion | Country | Runner-up | Score
fn singles_shape() -> TableShape {
    TableShape::new(vec![
        ColumnRule::new("Year", 0, plain_text),
        ColumnRule::new("Champion_Country", 1, text_or_flags),
        ColumnRule::new("Champion", 2, link_or_text),
        ColumnRule::new("Runner_up_Country", 3, text_or_flags),
        ColumnRule::new("Runner-up", 4, link_or_text),
        ColumnRule::new("Score_in_final", 5, plain_text),
    ])
}

/// Men's singles, open era table (second match on the page)
pub fn mens_singles_finals() -> TableSource {
    TableSource {
        name: "ao-mens-singles",
        description: "Australian Open men's singles finals (open era)",
        data_source: DataSource::Wikipedia,
        urls: vec!["https://en.wikipedia.org/wiki/List_of_Australian_Open_men%27s_singles_champions"],
        extractor: TableRecordExtractor::new(TableSelector::new(FINALS_TABLE, 1), singles_shape()),
        output_file: "australian_open_men_singles_champions.csv",
    }
}

/// Women's singles, first finals table on the page
pub fn womens_singles_finals() -> TableSource {
    TableSource {
        name: "ao-womens-singles",
        description: "Australian Open women's singles finals",
        data_source: DataSource::Wikipedia,
        urls: vec![
            "https://en.wikipedia.org/wiki/List_of_Australian_Open_women%27s_singles_champions",
        ],
        extractor: TableRecordExtractor::new(TableSelector::new(FINALS_TABLE, 0), singles_shape()),
        output_file: "australian_open_women_singles_champions.csv",
    }
}

/// Women's doubles: teams share one cell, each player preceded by a flag
pub fn womens_doubles_finals() -> TableSource {
    let shape = TableShape::new(vec![
        ColumnRule::new("Year", 0, plain_text),
        ColumnRule::new("Champions_Countries", 1, flag_countries),
        ColumnRule::new("Champions", 1, linked_names),
        ColumnRule::new("Runners_up_Countries", 2, flag_countries),
        ColumnRule::new("Runners-up", 2, linked_names),
        ColumnRule::new("Score_in_final", 3, plain_text),
    ]);

    TableSource {
        name: "ao-womens-doubles",
        description: "Australian Open women's doubles finals",
        data_source: DataSource::Wikipedia,
        urls: vec![
            "https://en.wikipedia.org/wiki/List_of_Australian_Open_women%27s_doubles_champions",
        ],
        extractor: TableRecordExtractor::new(TableSelector::new(FINALS_TABLE, 2), shape),
        output_file: "australian_open_womens_doubles_finals_data.csv",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENS_PAGE: &str = r##"
        <html><body>
        <table class="wikitable sortable"><tr><th>Year</th></tr>
            <tr><td>1905</td><td>AUS</td><td>Rodney Heath</td><td>AUS</td><td>Arthur Curtis</td><td>4–6</td></tr>
        </table>
        <table class="wikitable sortable">
            <tr><th>Year</th><th>Country</th><th>Champion</th><th>Country</th><th>Runner-up</th><th>Score in the final</th></tr>
            <tr><td>1969</td><td><span class="flagicon"><img alt="Australia"></span>AUS</td>
                <td><a href="/wiki/Rod_Laver">Rod Laver</a><sup>(1/1)</sup></td><td>ESP</td>
                <td><a href="/wiki/Andr%C3%A9s_Gimeno">Andrés Gimeno</a></td><td>6–3, 6–4, 7–5</td></tr>
            <tr><td>1977 (Dec)</td><td><span class="flagicon"><img alt="United States"></span></td>
                <td>Vitas Gerulaitis</td><td>AUS</td><td><a href="/wiki/John_Lloyd">John Lloyd</a></td>
                <td>6–3, 7–6, 5–7, 3–6, 6–2<sup class="reference"><a href="#cite_note-4">[4]</a></sup></td></tr>
            <tr><td>1986</td><td colspan="5">No competition (tournament moved)</td></tr>
        </table>
        </body></html>
    "##;

    const DOUBLES_PAGE: &str = r#"
        <table class="wikitable sortable"><tr><td>a</td></tr></table>
        <table class="wikitable sortable"><tr><td>b</td></tr></table>
        <table class="wikitable sortable">
            <tr><th>Year</th><th>Champions</th><th>Runners-up</th><th>Score</th></tr>
            <tr><td>1977 (Dec)</td>
                <td><span class="flagicon"><img alt="Australia"></span> <a href="/e">Evonne Goolagong</a><br>
                    <span class="flagicon"><img alt="Australia"></span> <a href="/h">Helen Gourlay</a></td>
                <td><span class="flagicon"><img alt="Australia"></span> <a href="/m">Mona Guerrant</a><br>
                    <span class="flagicon"><img alt="United States"></span> <a href="/k">Kerry Reid</a></td>
                <td>Final not played<sup>[a]</sup></td></tr>
            <tr><td>1986</td><td>No competition</td></tr>
        </table>
    "#;

    #[test]
    fn test_mens_singles_open_era() {
        let batch = mens_singles_finals().parse_page(MENS_PAGE).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.skipped, 1);
        assert_eq!(
            batch.records[0].fields(),
            &["1969", "AUS", "Rod Laver", "ESP", "Andrés Gimeno", "6–3, 6–4, 7–5"]
        );
        // unlinked name falls back to text, flag-only country to the alt text
        assert_eq!(
            batch.records[1].fields(),
            &[
                "1977 (Dec)",
                "United States",
                "Vitas Gerulaitis",
                "AUS",
                "John Lloyd",
                "6–3, 7–6, 5–7, 3–6, 6–2"
            ]
        );
    }

    #[test]
    fn test_womens_singles_uses_first_table() {
        let batch = womens_singles_finals().parse_page(MENS_PAGE).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records[0].get(2), Some("Rodney Heath"));
    }

    #[test]
    fn test_womens_doubles_teams() {
        let source = womens_doubles_finals();
        let batch = source.parse_page(DOUBLES_PAGE).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(
            batch.records[0].fields(),
            &[
                "1977 (Dec)",
                "Australia, Australia",
                "Evonne Goolagong, Helen Gourlay",
                "Australia, United States",
                "Mona Guerrant, Kerry Reid",
                "Final not played"
            ]
        );
        assert_eq!(source.headers().len(), batch.records[0].len());
    }

    #[test]
    fn test_doubles_page_without_third_table() {
        let err = womens_doubles_finals().parse_page(MENS_PAGE).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
