//! Snapshot Source - JSON Fixture/Prediction/Odds File
//!
//! Loads a single JSON document holding the fixtures of a week, the
//! model predictions for them and the latest bookmaker quotes, and
//! serves it through both read ports. Used by the CLI and for replays.
//!
//! ```json
//! {
//!   "fixtures":    [{ "id": 101, "home_team_id": 1, "away_team_id": 2 }],
//!   "predictions": [{ "fixture_id": 101, "markets": { "1x2": { ... } } }],
//!   "odds":        { "101": [{ "market": "h2h", "outcome": "Home", ... }] }
//! }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::domain::fixture::{Fixture, FixtureId};
use crate::ports::odds::{OddsCatalog, OddsQuote};
use crate::ports::oracle::{Prediction, ProbabilityOracle};

/// On-disk snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub odds: BTreeMap<FixtureId, Vec<OddsQuote>>,
}

/// In-memory snapshot indexed by fixture ID.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    fixtures: Vec<Fixture>,
    predictions: HashMap<FixtureId, Prediction>,
    odds: HashMap<FixtureId, Vec<OddsQuote>>,
}

impl SnapshotSource {
    /// Read and index a snapshot file.
    #[instrument]
    pub async fn load(path: &str) -> Result<Self> {
        let path = Path::new(path);
        let json = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

        let snapshot: Snapshot =
            serde_json::from_str(&json).context("Failed to parse snapshot JSON")?;

        let source = Self::from_snapshot(snapshot);
        info!(
            path = %path.display(),
            fixtures = source.fixtures.len(),
            predictions = source.predictions.len(),
            quoted = source.odds.len(),
            "Snapshot loaded"
        );
        Ok(source)
    }

    /// Index an already-parsed snapshot. A fixture listed twice keeps its
    /// first entry; later duplicates of a prediction replace earlier ones.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut seen = HashSet::with_capacity(snapshot.fixtures.len());
        let mut fixtures = Vec::with_capacity(snapshot.fixtures.len());
        for fixture in snapshot.fixtures {
            if seen.insert(fixture.id) {
                fixtures.push(fixture);
            } else {
                warn!(
                    fixture_id = fixture.id,
                    fixture = %fixture.label(),
                    "Duplicate fixture in snapshot, keeping the first one"
                );
            }
        }

        let mut predictions = HashMap::with_capacity(snapshot.predictions.len());
        for prediction in snapshot.predictions {
            let fixture_id = prediction.fixture_id;
            if predictions.insert(fixture_id, prediction).is_some() {
                warn!(fixture_id, "Duplicate prediction in snapshot, keeping the last one");
            }
        }

        Self {
            fixtures,
            predictions,
            odds: snapshot.odds.into_iter().collect(),
        }
    }

    /// Fixtures in file order.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }
}

#[async_trait]
impl ProbabilityOracle for SnapshotSource {
    async fn predict(&self, fixture: &Fixture) -> Result<Option<Prediction>> {
        Ok(self.predictions.get(&fixture.id).cloned())
    }
}

#[async_trait]
impl OddsCatalog for SnapshotSource {
    async fn latest_odds(&self, fixture_id: FixtureId) -> Result<Vec<OddsQuote>> {
        Ok(self.odds.get(&fixture_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{MarketType, Outcome};

    const SNAPSHOT: &str = r#"{
        "fixtures": [
            { "id": 101, "home_team_id": 1, "away_team_id": 2, "home_team": "Arsenal", "away_team": "Chelsea" },
            { "id": 102, "home_team_id": 3, "away_team_id": 4 }
        ],
        "predictions": [
            {
                "fixture_id": 101,
                "model_version": "v2",
                "markets": {
                    "1x2": { "probabilities": { "home_win": 0.65, "draw": 0.2, "away_win": 0.15 }, "confidence": 0.62 },
                    "btts": { "probabilities": { "yes": 0.55, "no": 0.45 } }
                }
            }
        ],
        "odds": {
            "101": [ { "market": "h2h", "outcome": "Home", "value": 1.8, "bookmaker": "bet365" } ]
        }
    }"#;

    fn source() -> SnapshotSource {
        SnapshotSource::from_snapshot(serde_json::from_str(SNAPSHOT).unwrap())
    }

    #[tokio::test]
    async fn test_snapshot_serves_both_ports() {
        let source = source();
        assert_eq!(source.fixtures().len(), 2);

        let prediction = source.predict(&source.fixtures()[0]).await.unwrap().unwrap();
        assert_eq!(prediction.model_version, "v2");
        let match_result = &prediction.markets[&MarketType::MatchResult];
        assert!((match_result.probabilities[&Outcome::HomeWin] - 0.65).abs() < 1e-12);
        assert_eq!(prediction.markets[&MarketType::Btts].confidence, 0.0);

        let quotes = source.latest_odds(101).await.unwrap();
        assert_eq!(quotes[0].outcome(), Some(Outcome::HomeWin));
    }

    #[tokio::test]
    async fn test_missing_entries_are_empty() {
        let source = source();
        assert!(source.predict(&source.fixtures()[1]).await.unwrap().is_none());
        assert!(source.latest_odds(102).await.unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_fixtures_keep_first_entry() {
        let mut snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let mut renamed = snapshot.fixtures[0].clone();
        renamed.home_team = "Arsenal FC".to_string();
        let repeated = snapshot.fixtures[1].clone();
        snapshot.fixtures.push(renamed);
        snapshot.fixtures.push(repeated);

        let source = SnapshotSource::from_snapshot(snapshot);
        let ids: Vec<_> = source.fixtures().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![101, 102]);
        assert_eq!(source.fixtures()[0].home_team, "Arsenal");
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        assert!(SnapshotSource::load("does/not/exist.json").await.is_err());
    }
}
