//! Property-Based Tests - Engine Invariants
//!
//! Uses `proptest` to verify that the EV, Kelly, accumulator and summary
//! components maintain their invariants across random inputs.

use proptest::prelude::*;

use oddsiq_engine::config::AccumulatorConfig;
use oddsiq_engine::domain::combinations::{Combinations, binomial};
use oddsiq_engine::domain::ev::expected_value;
use oddsiq_engine::domain::kelly::KellyCriterion;
use oddsiq_engine::domain::market::Outcome;
use oddsiq_engine::domain::recommendation::AccumulatorLeg;
use oddsiq_engine::usecases::{AccumulatorGenerator, PerformanceSummarizer};

/// Random leg on one of a small set of fixtures, so overlaps happen.
fn arb_leg() -> impl Strategy<Value = AccumulatorLeg> {
    (1u64..8, 0.3f64..0.9, 1.2f64..4.0, 0usize..3).prop_map(|(fixture, p, odds, pick)| {
        let outcome = [Outcome::HomeWin, Outcome::Over2_5, Outcome::BttsYes][pick];
        AccumulatorLeg {
            fixture_id: fixture,
            home_team_id: fixture * 2,
            away_team_id: fixture * 2 + 1,
            market: outcome.market(),
            outcome,
            description: outcome.description().to_string(),
            probability: p,
            odds,
            bookmaker: "bet365".to_string(),
            single_ev: expected_value(p, odds),
        }
    })
}

fn arb_config() -> impl Strategy<Value = AccumulatorConfig> {
    (2usize..=3, 0.01f64..0.5, 0.0f64..0.2).prop_map(|(max_legs, portfolio, min_ev)| {
        AccumulatorConfig {
            min_legs: 2,
            max_legs,
            min_leg_probability: 0.3,
            min_leg_ev: -1.0,
            min_accumulator_ev: min_ev,
            max_portfolio_fraction: portfolio,
            max_returned: 10,
            ..AccumulatorConfig::default()
        }
    })
}

// ── EV + Kelly Properties ───────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig { max_global_rejects: 65536, ..ProptestConfig::default() })]

    /// EV is exactly p * odds - 1.
    #[test]
    fn ev_identity(p in 0.0f64..=1.0, odds in 0.01f64..100.0) {
        prop_assert_eq!(expected_value(p, odds), p * odds - 1.0);
    }

    /// No edge, no stake.
    #[test]
    fn stake_zero_without_edge(p in 0.0f64..=1.0, odds in 1.0f64..20.0, bankroll in 1.0f64..1e6) {
        prop_assume!(p * odds <= 1.0);
        let kelly = KellyCriterion::new(0.25, 0.05);
        prop_assert_eq!(kelly.stake(bankroll, p, odds), 0.0);
    }

    /// Stake never decreases as probability rises (odds fixed).
    #[test]
    fn stake_monotonic_in_probability(
        p in 0.0f64..0.95,
        delta in 0.0f64..0.05,
        odds in 1.01f64..10.0,
        fraction in 0.05f64..=1.0,
    ) {
        let kelly = KellyCriterion::new(fraction, 0.2);
        let low = kelly.stake(1000.0, p, odds);
        let high = kelly.stake(1000.0, p + delta, odds);
        prop_assert!(high >= low, "stake({}) = {} < stake({}) = {}", p + delta, high, p, low);
    }

    /// Stake stays within [0, max * bankroll] (plus half a cent of rounding).
    #[test]
    fn stake_within_cap(p in 0.0f64..=1.0, odds in 1.01f64..50.0, bankroll in 1.0f64..1e5) {
        let kelly = KellyCriterion::new(0.25, 0.05);
        let stake = kelly.stake(bankroll, p, odds);
        prop_assert!(stake >= 0.0);
        prop_assert!(stake <= bankroll * 0.05 + 0.005);
    }
}

// ── Combination Generator Properties ────────────────────────

proptest! {
    /// Partitioning by first index covers exactly C(n, k) combinations.
    #[test]
    fn partitions_cover_all_combinations(n in 0usize..12, k in 1usize..5) {
        let full: Vec<_> = Combinations::new(n, k).collect();
        prop_assert_eq!(full.len() as u64, binomial(n, k));

        let partitioned: Vec<_> = (0..n)
            .flat_map(|first| Combinations::starting_at(n, k, first))
            .collect();
        prop_assert_eq!(full, partitioned);
    }
}

// ── Accumulator Properties ──────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Combined values are the exact products of the legs.
    #[test]
    fn combined_values_are_products(
        legs in prop::collection::vec(arb_leg(), 0..10),
        config in arb_config(),
    ) {
        let batch = AccumulatorGenerator::new(&config).generate(legs, 1000.0, None).unwrap();
        for acc in &batch.accumulators {
            let p: f64 = acc.legs.iter().map(|l| l.probability).product();
            let o: f64 = acc.legs.iter().map(|l| l.odds).product();
            prop_assert!((acc.combined_probability - p).abs() < 1e-9);
            prop_assert!((acc.combined_odds - o).abs() < 1e-9);
            prop_assert_eq!(acc.num_legs, acc.legs.len());
            prop_assert!(acc.num_legs >= config.min_legs && acc.num_legs <= config.max_legs);
            prop_assert!(acc.expected_value >= config.min_accumulator_ev);
        }
    }

    /// No accumulator holds two legs of one fixture or one team.
    #[test]
    fn no_shared_fixture_or_team(
        legs in prop::collection::vec(arb_leg(), 0..10),
        config in arb_config(),
    ) {
        let batch = AccumulatorGenerator::new(&config).generate(legs, 1000.0, None).unwrap();
        for acc in &batch.accumulators {
            let mut fixtures: Vec<_> = acc.legs.iter().map(|l| l.fixture_id).collect();
            fixtures.sort_unstable();
            fixtures.dedup();
            prop_assert_eq!(fixtures.len(), acc.legs.len());

            let mut teams: Vec<_> = acc.legs.iter().flat_map(AccumulatorLeg::teams).collect();
            let total = teams.len();
            teams.sort_unstable();
            teams.dedup();
            prop_assert_eq!(teams.len(), total);
        }
    }

    /// Total stake fits the portfolio budget.
    #[test]
    fn portfolio_cap_respected(
        legs in prop::collection::vec(arb_leg(), 0..10),
        config in arb_config(),
        bankroll in 100.0f64..100_000.0,
    ) {
        let batch = AccumulatorGenerator::new(&config).generate(legs, bankroll, None).unwrap();
        let total: f64 = batch.accumulators.iter().map(|a| a.suggested_stake).sum();
        prop_assert!(
            total <= bankroll * config.max_portfolio_fraction + 1e-6,
            "total {} exceeds budget {}",
            total,
            bankroll * config.max_portfolio_fraction
        );
        prop_assert!(batch.accumulators.len() <= config.max_returned);
    }

    /// Same input, same output, same order; partitioned matches sequential.
    #[test]
    fn generation_is_deterministic(
        legs in prop::collection::vec(arb_leg(), 0..9),
        config in arb_config(),
    ) {
        let generator = AccumulatorGenerator::new(&config);
        let first = generator.generate(legs.clone(), 1000.0, None).unwrap();
        let second = generator.generate(legs.clone(), 1000.0, None).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let partitioned = tokio_test::block_on(generator.generate_partitioned(legs, 1000.0, None)).unwrap();
        prop_assert_eq!(first, partitioned);
    }

    /// Summarizing twice gives the same summary.
    #[test]
    fn summarizer_is_idempotent(
        legs in prop::collection::vec(arb_leg(), 0..8),
        config in arb_config(),
    ) {
        let batch = AccumulatorGenerator::new(&config).generate(legs, 1000.0, None).unwrap();
        let once = PerformanceSummarizer::summarize(&batch.accumulators, 1000.0);
        let twice = PerformanceSummarizer::summarize(&batch.accumulators, 1000.0);
        prop_assert_eq!(once, twice);
    }
}
