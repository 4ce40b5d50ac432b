//! Odds Catalog Port - Bookmaker Odds Interface
//!
//! Defines the trait for reading the latest bookmaker quotes for a
//! fixture. Quotes carry the bookmaker's own market/outcome labels;
//! mapping them onto engine outcomes happens in the evaluator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::fixture::FixtureId;
use crate::domain::market::Outcome;

/// A single bookmaker quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
  /// Bookmaker market label (e.g., "h2h", "totals", "btts").
  pub market: String,
  /// Bookmaker outcome label (e.g., "Home", "Over", "Yes").
  pub outcome: String,
  /// Decimal odds.
  pub value: f64,
  /// Bookmaker name.
  pub bookmaker: String,
  /// When the quote was recorded.
  #[serde(default)]
  pub timestamp: Option<DateTime<Utc>>,
}

impl OddsQuote {
  /// Engine outcome this quote prices, if the labels are recognised.
  pub fn outcome(&self) -> Option<Outcome> {
    Outcome::from_bookmaker_label(&self.market, &self.outcome)
  }
}

/// Trait for odds providers.
///
/// An empty list is a valid answer: the evaluator falls back to
/// synthetic odds for outcomes without a quote.
#[async_trait]
pub trait OddsCatalog: Send + Sync + 'static {
  /// Latest quotes for a fixture.
  async fn latest_odds(&self, fixture_id: FixtureId) -> anyhow::Result<Vec<OddsQuote>>;
}
