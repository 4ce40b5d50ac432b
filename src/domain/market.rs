//! Betting markets and outcomes.
//!
//! Markets and outcomes are closed enums. Every outcome belongs to exactly
//! one market, and the human-readable description table is an exhaustive
//! match so adding a variant without a description fails to compile.

use serde::{Deserialize, Serialize};

/// Supported betting markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketType {
    /// Full-time result: home / draw / away.
    #[serde(rename = "1x2")]
    MatchResult,
    /// Total goals over/under the 2.5 line.
    #[serde(rename = "over_under")]
    OverUnder,
    /// Both teams to score.
    #[serde(rename = "btts")]
    Btts,
}

impl MarketType {
    /// All markets in canonical order.
    pub const ALL: [Self; 3] = [Self::MatchResult, Self::OverUnder, Self::Btts];

    /// Stable wire name, also used for deterministic tie-breaks.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MatchResult => "1x2",
            Self::OverUnder => "over_under",
            Self::Btts => "btts",
        }
    }

    /// Outcomes that belong to this market.
    pub const fn outcomes(self) -> &'static [Outcome] {
        match self {
            Self::MatchResult => &[Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin],
            Self::OverUnder => &[Outcome::Over2_5, Outcome::Under2_5],
            Self::Btts => &[Outcome::BttsYes, Outcome::BttsNo],
        }
    }

    /// Maps a bookmaker market label (`h2h`, `totals`, ...) to a market.
    pub fn from_bookmaker_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "h2h" | "1x2" => Some(Self::MatchResult),
            "totals" | "over_under" => Some(Self::OverUnder),
            "btts" => Some(Self::Btts),
            _ => None,
        }
    }
}

impl std::fmt::Display for MarketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single selectable outcome within a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "home_win")]
    HomeWin,
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "away_win")]
    AwayWin,
    #[serde(rename = "over_2_5")]
    Over2_5,
    #[serde(rename = "under_2_5")]
    Under2_5,
    #[serde(rename = "yes")]
    BttsYes,
    #[serde(rename = "no")]
    BttsNo,
}

impl Outcome {
    /// Market this outcome is priced in.
    pub const fn market(self) -> MarketType {
        match self {
            Self::HomeWin | Self::Draw | Self::AwayWin => MarketType::MatchResult,
            Self::Over2_5 | Self::Under2_5 => MarketType::OverUnder,
            Self::BttsYes | Self::BttsNo => MarketType::Btts,
        }
    }

    /// Outcome key as emitted by the prediction oracle.
    pub const fn key(self) -> &'static str {
        match self {
            Self::HomeWin => "home_win",
            Self::Draw => "draw",
            Self::AwayWin => "away_win",
            Self::Over2_5 => "over_2_5",
            Self::Under2_5 => "under_2_5",
            Self::BttsYes => "yes",
            Self::BttsNo => "no",
        }
    }

    /// Human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::HomeWin => "Home Win",
            Self::Draw => "Draw",
            Self::AwayWin => "Away Win",
            Self::Over2_5 => "Over 2.5 Goals",
            Self::Under2_5 => "Under 2.5 Goals",
            Self::BttsYes => "BTTS Yes",
            Self::BttsNo => "BTTS No",
        }
    }

    /// Maps a bookmaker `(market, outcome)` label pair to an outcome.
    ///
    /// Labels are matched case-insensitively. Totals are assumed to be
    /// quoted on the 2.5 line.
    pub fn from_bookmaker_label(market: &str, outcome: &str) -> Option<Self> {
        let market = MarketType::from_bookmaker_label(market)?;
        let outcome = outcome.to_ascii_lowercase();
        match (market, outcome.as_str()) {
            (MarketType::MatchResult, "home" | "home_win") => Some(Self::HomeWin),
            (MarketType::MatchResult, "draw") => Some(Self::Draw),
            (MarketType::MatchResult, "away" | "away_win") => Some(Self::AwayWin),
            (MarketType::OverUnder, "over" | "over_2_5") => Some(Self::Over2_5),
            (MarketType::OverUnder, "under" | "under_2_5") => Some(Self::Under2_5),
            (MarketType::Btts, "yes") => Some(Self::BttsYes),
            (MarketType::Btts, "no") => Some(Self::BttsNo),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_outcome_belongs_to_its_market() {
        for market in MarketType::ALL {
            for outcome in market.outcomes() {
                assert_eq!(outcome.market(), market);
            }
        }
    }

    #[test]
    fn test_bookmaker_labels() {
        assert_eq!(Outcome::from_bookmaker_label("h2h", "Home"), Some(Outcome::HomeWin));
        assert_eq!(Outcome::from_bookmaker_label("1x2", "draw"), Some(Outcome::Draw));
        assert_eq!(Outcome::from_bookmaker_label("totals", "Under"), Some(Outcome::Under2_5));
        assert_eq!(Outcome::from_bookmaker_label("btts", "Yes"), Some(Outcome::BttsYes));
        assert_eq!(Outcome::from_bookmaker_label("btts", "Home"), None);
        assert_eq!(Outcome::from_bookmaker_label("corners", "over"), None);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&MarketType::MatchResult).unwrap();
        assert_eq!(json, "\"1x2\"");
        let outcome: Outcome = serde_json::from_str("\"over_2_5\"").unwrap();
        assert_eq!(outcome, Outcome::Over2_5);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(Outcome::BttsNo.description(), "BTTS No");
        assert_eq!(Outcome::AwayWin.to_string(), "away_win");
        assert_eq!(MarketType::OverUnder.to_string(), "over_under");
    }
}
