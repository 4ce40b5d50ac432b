//! Structural correlation between accumulator legs.
//!
//! This is a heuristic, not a statistical dependence estimate: two legs
//! are treated as correlated when they share a fixture or a team.

use super::recommendation::AccumulatorLeg;

/// Verdict for a pair of legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correlation {
    /// Legs may be combined.
    Independent,
    /// Both legs are on the same fixture.
    SameFixture,
    /// The fixtures share a home or away team.
    SharedTeam,
}

impl Correlation {
    pub const fn is_correlated(self) -> bool {
        !matches!(self, Self::Independent)
    }
}

/// Pairwise structural-overlap classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrelationClassifier {
    allow_same_fixture: bool,
    allow_same_team: bool,
}

impl CorrelationClassifier {
    pub const fn new(allow_same_fixture: bool, allow_same_team: bool) -> Self {
        Self {
            allow_same_fixture,
            allow_same_team,
        }
    }

    /// Classifies a pair. Rules are evaluated in order and the first rule
    /// whose condition holds decides:
    /// 1. same fixture: correlated unless `allow_same_fixture`
    /// 2. shared team: correlated unless `allow_same_team`
    pub fn classify(&self, a: &AccumulatorLeg, b: &AccumulatorLeg) -> Correlation {
        if a.fixture_id == b.fixture_id {
            return if self.allow_same_fixture {
                Correlation::Independent
            } else {
                Correlation::SameFixture
            };
        }

        let shared_team = a.teams().iter().any(|t| b.teams().contains(t));
        if shared_team && !self.allow_same_team {
            return Correlation::SharedTeam;
        }

        Correlation::Independent
    }

    pub fn is_correlated(&self, a: &AccumulatorLeg, b: &AccumulatorLeg) -> bool {
        self.classify(a, b).is_correlated()
    }

    /// Whether any pair among `legs` is correlated. Checks all C(k, 2) pairs.
    pub fn any_correlated<'a, I>(&self, legs: I) -> bool
    where
        I: IntoIterator<Item = &'a AccumulatorLeg>,
    {
        let legs: Vec<&AccumulatorLeg> = legs.into_iter().collect();
        legs.iter().enumerate().any(|(i, a)| {
            legs[i + 1..].iter().any(|b| self.is_correlated(a, b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::Outcome;

    fn leg(fixture_id: u64, home: u64, away: u64, outcome: Outcome) -> AccumulatorLeg {
        AccumulatorLeg {
            fixture_id,
            home_team_id: home,
            away_team_id: away,
            market: outcome.market(),
            outcome,
            description: outcome.description().to_string(),
            probability: 0.6,
            odds: 1.9,
            bookmaker: "pinnacle".to_string(),
            single_ev: 0.14,
        }
    }

    #[test]
    fn test_same_fixture_correlated() {
        let c = CorrelationClassifier::default();
        let a = leg(1, 10, 11, Outcome::HomeWin);
        let b = leg(1, 10, 11, Outcome::Over2_5);
        assert_eq!(c.classify(&a, &b), Correlation::SameFixture);
        assert!(c.is_correlated(&a, &b));
    }

    #[test]
    fn test_same_fixture_allowed() {
        let c = CorrelationClassifier::new(true, false);
        let a = leg(1, 10, 11, Outcome::HomeWin);
        let b = leg(1, 10, 11, Outcome::BttsYes);
        assert_eq!(c.classify(&a, &b), Correlation::Independent);
    }

    #[test]
    fn test_shared_team_across_fixtures() {
        let a = leg(1, 10, 11, Outcome::HomeWin);
        // Team 11 plays at home in the second fixture
        let b = leg(2, 11, 12, Outcome::AwayWin);
        assert_eq!(
            CorrelationClassifier::default().classify(&a, &b),
            Correlation::SharedTeam
        );
        assert!(!CorrelationClassifier::new(false, true).is_correlated(&a, &b));
    }

    #[test]
    fn test_disjoint_fixtures_independent() {
        let a = leg(1, 10, 11, Outcome::HomeWin);
        let b = leg(2, 12, 13, Outcome::HomeWin);
        assert!(!CorrelationClassifier::default().is_correlated(&a, &b));
    }

    #[test]
    fn test_any_correlated_checks_every_pair() {
        let c = CorrelationClassifier::default();
        let legs = [
            leg(1, 10, 11, Outcome::HomeWin),
            leg(2, 12, 13, Outcome::Draw),
            leg(3, 14, 10, Outcome::AwayWin),
        ];
        // Only the first/last pair overlaps
        assert!(c.any_correlated(&legs));
        assert!(!c.any_correlated(&legs[..2]));
    }
}
