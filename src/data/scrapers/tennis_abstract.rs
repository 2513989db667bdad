//! Tennis Abstract WTA serve-statistics leaderboard
//!
//! The leaderboard is rendered client-side, so the live URLs usually need
//! to be saved from a browser and fed through `parse`.

use super::TableSource;
use crate::data::extract::column::{bracketed_code, link_text, plain_text};
use crate::data::extract::{ColumnRule, TableRecordExtractor, TableSelector, TableShape};
use crate::{DataSource, Result};

/// Leaderboard rows, 19 cells wide; only the serve columns are kept
pub fn wta_rankings() -> Result<TableSource> {
    let shape = TableShape::new(vec![
        ColumnRule::new("Rank", 0, plain_text),
        ColumnRule::new("Player_Name", 1, link_text),
        ColumnRule::new("Country_Code", 1, bracketed_code),
        ColumnRule::new("Total_Matches", 2, link_text),
        ColumnRule::new("Win-Loss", 3, plain_text),
        ColumnRule::new("Win-Loss_Percentage", 4, plain_text),
        ColumnRule::new("Service_Points_Won_Percentage", 5, plain_text),
        ColumnRule::new("Ace_Rate_Percentage", 8, plain_text),
        ColumnRule::new("Double_Fault_Rate", 10, plain_text),
        ColumnRule::new("First_Serves_In_Percentage", 12, plain_text),
        ColumnRule::new("First_Serve_Points_Won_Percentage", 13, plain_text),
        ColumnRule::new("Second_Serve_Points_Won_Percentage", 14, plain_text),
        ColumnRule::new("Service_Games_Won_Percentage", 16, plain_text),
        ColumnRule::new("Points_Per_Service_Game", 17, plain_text),
        ColumnRule::new("Points_Lost_Per_Service_Game", 18, plain_text),
    ])
    .with_min_cells(19)
    .require(&["Rank", "Player_Name", "Country_Code", "Total_Matches"])?;

    Ok(TableSource {
        name: "wta-rankings",
        description: "WTA serve statistics leaderboard, players 1-100",
        data_source: DataSource::TennisAbstract,
        urls: vec![
            "https://www.tennisabstract.com/cgi-bin/leaders_wta.cgi",
            "https://www.tennisabstract.com/cgi-bin/leaders_wta.cgi?players=51-100",
        ],
        extractor: TableRecordExtractor::new(TableSelector::new("table.tablesorter", 0), shape),
        output_file: "ao_wta_rankings_data.csv",
    })
}
