//! Expected value of a fixed-odds bet.

/// Expected profit per unit stake: `probability * odds - 1`.
///
/// Total over all inputs; callers exclude odds <= 1 before relying on it.
#[inline]
pub fn expected_value(probability: f64, odds: f64) -> f64 {
    probability * odds - 1.0
}

/// EV expressed as a percentage.
#[inline]
pub fn ev_percent(ev: f64) -> f64 {
    ev * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_ev() {
        let ev = expected_value(0.65, 1.80);
        assert!((ev - 0.17).abs() < 1e-12);
        assert!((ev_percent(ev) - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_fair_odds_are_zero_ev() {
        assert!(expected_value(0.5, 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_probability_loses_stake() {
        assert_eq!(expected_value(0.0, 3.5), -1.0);
    }
}
