//! Recommendation records produced by the engine.
//!
//! All records are plain values: an accumulator leg copies the data it
//! needs from the single-bet recommendation it came from, so combinations
//! never alias each other.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::fixture::{Fixture, FixtureId, TeamId};
use super::market::{MarketType, Outcome};

/// Bookmaker name used for odds derived from the model probability.
pub const SYNTHETIC_BOOKMAKER: &str = "synthetic";

/// Where the odds on a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsSource {
    /// Quoted by a bookmaker.
    Quoted,
    /// Fair odds minus a margin, used when no quote exists.
    Synthetic,
}

/// Confidence tier attached to recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Tier for an accumulator from its EV (high >= 20%, medium >= 10%).
    pub fn from_ev(ev: f64) -> Self {
        if ev >= 0.20 {
            Self::High
        } else if ev >= 0.10 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Tier for a model confidence score (high > 0.6, medium > 0.5).
    pub fn from_model_confidence(confidence: f64) -> Self {
        if confidence > 0.6 {
            Self::High
        } else if confidence > 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One priced outcome of a market, as evaluated for a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutcome {
    pub market: MarketType,
    pub outcome: Outcome,
    /// Model probability in [0, 1].
    pub probability: f64,
    /// Decimal odds (> 1 for any usable outcome).
    pub odds: f64,
    pub bookmaker: String,
    pub odds_source: OddsSource,
    /// Model confidence for the market.
    pub confidence: f64,
    pub confidence_tier: ConfidenceTier,
}

/// A single-bet recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecommendation {
    pub fixture_id: FixtureId,
    #[serde(flatten)]
    pub outcome: MarketOutcome,
    pub description: String,
    pub ev: f64,
    pub ev_percent: f64,
    /// Fractional-Kelly stake, rounded to cents.
    pub stake: f64,
}

impl BetRecommendation {
    /// Ranking order: EV desc, probability desc, market name, outcome key,
    /// then fixture ID.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .ev
            .total_cmp(&self.ev)
            .then_with(|| other.outcome.probability.total_cmp(&self.outcome.probability))
            .then_with(|| {
                self.outcome
                    .market
                    .as_str()
                    .cmp(other.outcome.market.as_str())
            })
            .then_with(|| self.outcome.outcome.key().cmp(other.outcome.outcome.key()))
            .then_with(|| self.fixture_id.cmp(&other.fixture_id))
    }

    /// Potential payout if the bet wins, rounded to cents.
    pub fn potential_payout(&self) -> f64 {
        super::kelly::round_money(self.stake * self.outcome.odds)
    }
}

/// A candidate component of an accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorLeg {
    pub fixture_id: FixtureId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub market: MarketType,
    pub outcome: Outcome,
    pub description: String,
    pub probability: f64,
    pub odds: f64,
    pub bookmaker: String,
    /// EV of the leg as a single bet.
    pub single_ev: f64,
}

impl AccumulatorLeg {
    /// Copies a single-bet recommendation into a leg.
    pub fn from_recommendation(bet: &BetRecommendation, fixture: &Fixture) -> Self {
        Self {
            fixture_id: fixture.id,
            home_team_id: fixture.home_team_id,
            away_team_id: fixture.away_team_id,
            market: bet.outcome.market,
            outcome: bet.outcome.outcome,
            description: bet.description.clone(),
            probability: bet.outcome.probability,
            odds: bet.outcome.odds,
            bookmaker: bet.outcome.bookmaker.clone(),
            single_ev: bet.ev,
        }
    }

    /// Both teams of the leg's fixture.
    pub const fn teams(&self) -> [TeamId; 2] {
        [self.home_team_id, self.away_team_id]
    }

    /// Deterministic identity used for tie-breaks.
    pub fn sort_key(&self) -> (FixtureId, &'static str, &'static str) {
        (self.fixture_id, self.market.as_str(), self.outcome.key())
    }

    /// Candidate order: single EV desc, then fixture, market, outcome.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .single_ev
            .total_cmp(&self.single_ev)
            .then_with(|| self.sort_key().cmp(&other.sort_key()))
    }
}

/// A multi-leg accumulator (parlay) recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorRecommendation {
    /// Deterministic ID `acc_{legs}_{n}`, assigned after ranking.
    pub id: String,
    pub legs: Vec<AccumulatorLeg>,
    pub num_legs: usize,
    /// Product of leg probabilities (independence assumption).
    pub combined_probability: f64,
    /// Product of leg odds.
    pub combined_odds: f64,
    pub expected_value: f64,
    pub ev_percent: f64,
    pub suggested_stake: f64,
    pub potential_payout: f64,
    pub confidence: ConfidenceTier,
}

impl AccumulatorRecommendation {
    /// Ranking order: EV desc, then leg-by-leg sort keys, then leg count.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .expected_value
            .total_cmp(&self.expected_value)
            .then_with(|| {
                let a = self.legs.iter().map(AccumulatorLeg::sort_key);
                let b = other.legs.iter().map(AccumulatorLeg::sort_key);
                a.cmp(b)
            })
            .then_with(|| self.num_legs.cmp(&other.num_legs))
    }
}
