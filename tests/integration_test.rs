//! Integration Tests - Engine Against Mocked Ports
//!
//! Drives `RecommendationEngine` through mocked oracle and odds ports.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mockall::mock;
use mockall::predicate::*;

use oddsiq_engine::adapters::cache::CachedOracle;
use oddsiq_engine::config::EngineConfig;
use oddsiq_engine::domain::error::EngineError;
use oddsiq_engine::domain::fixture::Fixture;
use oddsiq_engine::domain::market::{MarketType, Outcome};
use oddsiq_engine::domain::recommendation::OddsSource;
use oddsiq_engine::ports::odds::OddsQuote;
use oddsiq_engine::ports::oracle::{MarketPrediction, Prediction};
use oddsiq_engine::usecases::{RecommendationEngine, evaluate_fixture};

// ---- Mock Definitions ----

mock! {
    pub Oracle {}

    #[async_trait::async_trait]
    impl oddsiq_engine::ports::oracle::ProbabilityOracle for Oracle {
        async fn predict(
            &self,
            fixture: &oddsiq_engine::domain::fixture::Fixture,
        ) -> anyhow::Result<Option<oddsiq_engine::ports::oracle::Prediction>>;
    }
}

mock! {
    pub Odds {}

    #[async_trait::async_trait]
    impl oddsiq_engine::ports::odds::OddsCatalog for Odds {
        async fn latest_odds(
            &self,
            fixture_id: oddsiq_engine::domain::fixture::FixtureId,
        ) -> anyhow::Result<Vec<oddsiq_engine::ports::odds::OddsQuote>>;
    }
}

// ---- Fixtures ----

fn fixture(id: u64) -> Fixture {
    Fixture {
        id,
        home_team_id: id * 10,
        away_team_id: id * 10 + 1,
        home_team: format!("Home {id}"),
        away_team: format!("Away {id}"),
        kickoff: None,
        round: Some("Regular Season - 9".to_string()),
    }
}

/// Home-win-only prediction.
fn home_prediction(fixture_id: u64, probability: f64) -> Prediction {
    Prediction {
        fixture_id,
        model_version: "test".to_string(),
        markets: BTreeMap::from([(
            MarketType::MatchResult,
            MarketPrediction {
                probabilities: BTreeMap::from([(Outcome::HomeWin, probability)]),
                confidence: 0.6,
            },
        )]),
    }
}

fn home_quote(value: f64) -> OddsQuote {
    OddsQuote {
        market: "h2h".to_string(),
        outcome: "Home".to_string(),
        value,
        bookmaker: "bet365".to_string(),
        timestamp: None,
    }
}

/// Scenario B legs: (0.65, 1.80), (0.68, 1.70), (0.55, 2.20).
fn scenario_b() -> (Vec<Fixture>, MockOracle, MockOdds) {
    let legs = [(1, 0.65, 1.80), (2, 0.68, 1.70), (3, 0.55, 2.20)];

    let mut oracle = MockOracle::new();
    oracle
        .expect_predict()
        .times(3)
        .returning(move |f| {
            let (_, p, _) = legs.iter().find(|(id, _, _)| *id == f.id).copied().unwrap();
            Ok(Some(home_prediction(f.id, p)))
        });

    let mut odds = MockOdds::new();
    odds.expect_latest_odds().times(3).returning(move |id| {
        let (_, _, o) = legs.iter().find(|(fid, _, _)| *fid == id).copied().unwrap();
        Ok(vec![home_quote(o)])
    });

    (vec![fixture(1), fixture(2), fixture(3)], oracle, odds)
}

// ---- Integration Tests ----

#[tokio::test]
async fn test_weekly_picks_ranked_by_ev() {
    let (fixtures, oracle, odds) = scenario_b();
    let engine =
        RecommendationEngine::new(Arc::new(oracle), Arc::new(odds), no_cap_config()).unwrap();

    let weekly = engine.weekly_picks(&fixtures, 1000.0).await.unwrap();

    // EV: f3 = 0.21, f1 = 0.17, f2 = 0.156
    let ids: Vec<_> = weekly.picks.iter().map(|p| p.fixture_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(weekly.picks[1].stake, 50.0);
    assert!(weekly.unevaluable.is_empty());
}

#[tokio::test]
async fn test_weekly_report_builds_treble() {
    let (fixtures, oracle, odds) = scenario_b();
    let engine =
        RecommendationEngine::new(Arc::new(oracle), Arc::new(odds), no_cap_config()).unwrap();

    let report = engine.weekly_report(&fixtures, 1000.0, None).await.unwrap();
    let accs = &report.accumulators.accumulators;

    assert_eq!(report.accumulators.stats.combinations_considered, 4);
    let treble = accs.iter().find(|a| a.num_legs == 3).unwrap();
    assert_eq!(treble.id, "acc_3_1");
    assert!((treble.combined_odds - 6.732).abs() < 1e-9);
    assert!((treble.combined_probability - 0.2431).abs() < 1e-9);
    assert!((treble.expected_value - 0.6365492).abs() < 1e-6);
    // highest EV first
    assert_eq!(accs[0].id, treble.id);

    let total: f64 = accs.iter().map(|a| a.suggested_stake).sum();
    assert!(total <= 1000.0 * 0.20 + 1e-9);
    assert_eq!(report.accumulators.summary.trebles, 1);
    assert_eq!(report.accumulators.summary.doubles, 3);
}

#[tokio::test]
async fn test_oracle_failure_marks_fixture_unevaluable() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_predict()
        .withf(|f| f.id == 1)
        .returning(|f| Ok(Some(home_prediction(f.id, 0.65))));
    oracle
        .expect_predict()
        .withf(|f| f.id == 2)
        .returning(|_| Err(anyhow::anyhow!("model timeout")));

    let mut odds = MockOdds::new();
    odds.expect_latest_odds()
        .returning(|_| Ok(vec![home_quote(1.80)]));

    let engine =
        RecommendationEngine::new(Arc::new(oracle), Arc::new(odds), no_cap_config()).unwrap();
    let weekly = engine
        .weekly_picks(&[fixture(1), fixture(2)], 1000.0)
        .await
        .unwrap();

    assert_eq!(weekly.unevaluable, vec![2]);
    assert_eq!(weekly.picks.len(), 1);
}

#[tokio::test]
async fn test_odds_failure_falls_back_to_synthetic_odds() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_predict()
        .returning(|f| Ok(Some(home_prediction(f.id, 0.5))));

    let mut odds = MockOdds::new();
    odds.expect_latest_odds()
        .with(eq(1))
        .returning(|_| Err(anyhow::anyhow!("provider down")));

    let engine =
        RecommendationEngine::new(Arc::new(oracle), Arc::new(odds), EngineConfig::default())
            .unwrap();
    let inputs = engine.gather(&[fixture(1)]).await;
    assert!(inputs[0].quotes.is_empty());

    let evaluation = evaluate_fixture(&inputs[0], 1000.0, engine.config()).unwrap();
    let bet = &evaluation.all_outcomes[0];
    assert_eq!(bet.outcome.odds_source, OddsSource::Synthetic);
    assert!((bet.outcome.odds - 1.9).abs() < 1e-12);
    assert!(evaluation.best_outcome.is_none());
}

#[tokio::test]
async fn test_cached_oracle_predicts_once_per_fixture() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_predict()
        .times(2)
        .returning(|f| Ok(Some(home_prediction(f.id, 0.65))));

    let mut odds = MockOdds::new();
    odds.expect_latest_odds()
        .times(4)
        .returning(|_| Ok(vec![home_quote(1.80)]));

    let engine = RecommendationEngine::new(
        Arc::new(CachedOracle::new(oracle, 3600)),
        Arc::new(odds),
        no_cap_config(),
    )
    .unwrap();

    let fixtures = [fixture(1), fixture(2)];
    let first = engine.weekly_picks(&fixtures, 1000.0).await.unwrap();
    let second = engine.weekly_picks(&fixtures, 1000.0).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_gather_follows_input_order() {
    struct SlowOracle;

    #[async_trait::async_trait]
    impl oddsiq_engine::ports::oracle::ProbabilityOracle for SlowOracle {
        async fn predict(&self, fixture: &Fixture) -> anyhow::Result<Option<Prediction>> {
            // Earlier fixtures finish last
            tokio::time::sleep(Duration::from_millis(40 - fixture.id * 10)).await;
            Ok(Some(home_prediction(fixture.id, 0.6)))
        }
    }

    let mut odds = MockOdds::new();
    odds.expect_latest_odds().returning(|_| Ok(Vec::new()));

    let engine =
        RecommendationEngine::new(Arc::new(SlowOracle), Arc::new(odds), EngineConfig::default())
            .unwrap();
    let inputs = engine.gather(&[fixture(1), fixture(2), fixture(3)]).await;

    let ids: Vec<_> = inputs.iter().map(|i| i.fixture.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_invalid_configuration_rejected() {
    let mut config = EngineConfig::default();
    config.accumulator.min_legs = 3;
    config.accumulator.max_legs = 2;

    let result = RecommendationEngine::new(
        Arc::new(MockOracle::new()),
        Arc::new(MockOdds::new()),
        config,
    );
    assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
}

#[tokio::test]
async fn test_past_deadline_aborts_accumulators() {
    let (fixtures, oracle, odds) = scenario_b();
    let engine =
        RecommendationEngine::new(Arc::new(oracle), Arc::new(odds), no_cap_config()).unwrap();

    let deadline = Instant::now();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let result = engine.accumulators(&fixtures, 1000.0, Some(deadline)).await;
    assert!(matches!(result, Err(EngineError::DeadlineExceeded { .. })));
}

fn no_cap_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.weekly.max_market_share = None;
    config
}
