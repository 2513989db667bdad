//! Historical ATP match data
//!
//! Loads the match CSV (one row per match with both players' ranks, points
//! and betting odds) and applies the cleaning rules used before training.

use crate::{Result, TennisError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Odds assumed when a bookmaker price is missing (roughly even money)
pub const NEUTRAL_ODD: f64 = 1.9;
/// Missing ranks are set this far beyond the worst known rank
pub const MISSING_RANK_OFFSET: f64 = 1000.0;

/// One CSV row as found in the file
#[derive(Debug, Clone, Deserialize)]
struct RawMatch {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Tour Name Date", default)]
    tour_name_date: Option<String>,
    #[serde(rename = "Surface", default)]
    surface: String,
    #[serde(rename = "Round", default)]
    round: String,
    #[serde(rename = "Best of", default, deserialize_with = "csv::invalid_option")]
    best_of: Option<f64>,
    #[serde(rename = "Player_1", default)]
    player_1: String,
    #[serde(rename = "Player_2", default)]
    player_2: String,
    #[serde(rename = "Winner", default)]
    winner: Option<String>,
    #[serde(rename = "Rank_1", default, deserialize_with = "csv::invalid_option")]
    rank_1: Option<f64>,
    #[serde(rename = "Rank_2", default, deserialize_with = "csv::invalid_option")]
    rank_2: Option<f64>,
    #[serde(rename = "Pts_1", default, deserialize_with = "csv::invalid_option")]
    pts_1: Option<f64>,
    #[serde(rename = "Pts_2", default, deserialize_with = "csv::invalid_option")]
    pts_2: Option<f64>,
    #[serde(rename = "Odd_1", default, deserialize_with = "csv::invalid_option")]
    odd_1: Option<f64>,
    #[serde(rename = "Odd_2", default, deserialize_with = "csv::invalid_option")]
    odd_2: Option<f64>,
}

impl RawMatch {
    /// `Tour Name Date` when present and readable, else `Date`
    fn match_date(&self) -> Option<NaiveDate> {
        [&self.tour_name_date, &self.date]
            .into_iter()
            .flatten()
            .find_map(|s| parse_match_date(s))
    }
}

/// A cleaned match, every numeric field filled in
#[derive(Debug, Clone, PartialEq)]
pub struct AtpMatch {
    pub date: NaiveDate,
    pub surface: String,
    pub round: String,
    pub best_of: f64,
    pub player_1: String,
    pub player_2: String,
    pub winner: String,
    pub rank_1: f64,
    pub rank_2: f64,
    pub pts_1: f64,
    pub pts_2: f64,
    pub odd_1: f64,
    pub odd_2: f64,
}

/// Parse `20240114` or `2024-01-14`
pub fn parse_match_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Load and clean the match file
pub fn load_matches<P: AsRef<Path>>(path: P) -> Result<Vec<AtpMatch>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        TennisError::Dataset(format!("cannot open {}: {}", path.display(), e))
    })?;
    let matches = read_matches(file)?;
    log::info!("Loaded {} matches from {}", matches.len(), path.display());
    Ok(matches)
}

/// Read and clean matches from any CSV source
pub fn read_matches<R: Read>(reader: R) -> Result<Vec<AtpMatch>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut raw = Vec::new();
    for row in csv_reader.deserialize::<RawMatch>() {
        raw.push(row?);
    }
    if raw.is_empty() {
        return Err(TennisError::Dataset("match file has no rows".into()));
    }
    Ok(clean(raw))
}

fn clean(raw: Vec<RawMatch>) -> Vec<AtpMatch> {
    let total = raw.len();
    let rank_fill_1 = max_or_zero(raw.iter().filter_map(|m| m.rank_1)) + MISSING_RANK_OFFSET;
    let rank_fill_2 = max_or_zero(raw.iter().filter_map(|m| m.rank_2)) + MISSING_RANK_OFFSET;

    let mut no_winner = 0usize;
    let mut void_odds = 0usize;
    let mut bad_rows = 0usize;
    let mut cleaned = Vec::with_capacity(total);

    for m in raw {
        let winner = match m.winner.as_deref().map(str::trim) {
            Some(w) if !w.is_empty() => w.to_string(),
            _ => {
                no_winner += 1;
                continue;
            }
        };

        let odd_1 = m.odd_1.unwrap_or(NEUTRAL_ODD);
        let odd_2 = m.odd_2.unwrap_or(NEUTRAL_ODD);
        if odd_1 == -1.0 || odd_2 == -1.0 {
            void_odds += 1;
            continue;
        }

        let (Some(date), Some(best_of)) = (m.match_date(), m.best_of) else {
            bad_rows += 1;
            continue;
        };

        cleaned.push(AtpMatch {
            date,
            surface: m.surface.trim().to_string(),
            round: m.round.trim().to_string(),
            best_of,
            player_1: m.player_1.trim().to_string(),
            player_2: m.player_2.trim().to_string(),
            winner,
            rank_1: m.rank_1.unwrap_or(rank_fill_1),
            rank_2: m.rank_2.unwrap_or(rank_fill_2),
            pts_1: m.pts_1.unwrap_or(0.0),
            pts_2: m.pts_2.unwrap_or(0.0),
            odd_1,
            odd_2,
        });
    }

    if bad_rows > 0 {
        log::warn!("Dropped {} row(s) with an unreadable date or best-of", bad_rows);
    }
    log::debug!(
        "Cleaning: {} rows in, {} without winner, {} with void odds, {} kept",
        total,
        no_winner,
        void_odds,
        cleaned.len()
    );
    cleaned
}

fn max_or_zero(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0)
}
