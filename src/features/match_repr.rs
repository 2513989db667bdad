//! Match representation from one player's perspective
//!
//! Every historical match yields two samples, one per player, so the model
//! never learns an ordering bias from which player the file lists first.

use crate::data::dataset::AtpMatch;
use chrono::NaiveDate;

/// A player as seen by the predictor: ranking, points and bookmaker odds
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEstimate {
    pub name: String,
    pub rank: f64,
    pub points: f64,
    pub odd: f64,
}

impl PlayerEstimate {
    pub fn new(name: impl Into<String>, rank: f64, points: f64, odd: f64) -> Self {
        PlayerEstimate {
            name: name.into(),
            rank,
            points,
            odd,
        }
    }
}

/// Conditions of the match being played
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    pub surface: String,
    pub round: String,
    pub best_of: f64,
}

/// One match from the point of view of player P against opponent OP
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveSample {
    pub date: Option<NaiveDate>,
    pub surface: String,
    pub round: String,
    pub best_of: f64,
    /// P_Rank - OP_Rank
    pub rank_diff: f64,
    /// P_Pts - OP_Pts
    pub pts_diff: f64,
    /// ln(P_Odd / OP_Odd)
    pub odd_ratio_log: f64,
    /// Did P win
    pub label: bool,
}

impl PerspectiveSample {
    /// Numeric features in encoder order
    pub const NUMERIC_NAMES: [&'static str; 4] = ["Best of", "Rank_Diff", "Pts_Diff", "Odd_Ratio_Log"];

    /// Both perspectives of a match: player 1 first, then player 2
    pub fn from_match(m: &AtpMatch) -> [PerspectiveSample; 2] {
        let p1 = PlayerEstimate::new(m.player_1.clone(), m.rank_1, m.pts_1, m.odd_1);
        let p2 = PlayerEstimate::new(m.player_2.clone(), m.rank_2, m.pts_2, m.odd_2);
        let ctx = MatchContext {
            surface: m.surface.clone(),
            round: m.round.clone(),
            best_of: m.best_of,
        };

        let mut first = Self::matchup(&p1, &p2, &ctx);
        first.date = Some(m.date);
        first.label = m.winner == m.player_1;

        let mut second = Self::matchup(&p2, &p1, &ctx);
        second.date = Some(m.date);
        second.label = m.winner == m.player_2;

        [first, second]
    }

    /// An unplayed matchup, seen from `player`'s side; label is unset
    pub fn matchup(player: &PlayerEstimate, opponent: &PlayerEstimate, ctx: &MatchContext) -> Self {
        PerspectiveSample {
            date: None,
            surface: ctx.surface.clone(),
            round: ctx.round.clone(),
            best_of: ctx.best_of,
            rank_diff: player.rank - opponent.rank,
            pts_diff: player.points - opponent.points,
            odd_ratio_log: odd_ratio_log(player.odd, opponent.odd),
            label: false,
        }
    }

    pub fn numeric(&self) -> [f64; 4] {
        [self.best_of, self.rank_diff, self.pts_diff, self.odd_ratio_log]
    }
}

/// ln(own / opponent), 0 when either side has no usable price
pub fn odd_ratio_log(own: f64, opponent: f64) -> f64 {
    if opponent <= 0.0 || own <= 0.0 {
        return 0.0;
    }
    (own / opponent).ln()
}

/// Expand matches into perspective samples, two per match
pub fn perspective_samples(matches: &[AtpMatch]) -> Vec<PerspectiveSample> {
    matches
        .iter()
        .flat_map(PerspectiveSample::from_match)
        .collect()
}
