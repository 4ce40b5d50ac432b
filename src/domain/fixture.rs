//! Fixtures (matches) the engine evaluates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixture identifier.
pub type FixtureId = u64;

/// Team identifier.
pub type TeamId = u64;

/// A scheduled match between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Internal fixture ID.
    pub id: FixtureId,
    /// Home team ID.
    pub home_team_id: TeamId,
    /// Away team ID.
    pub away_team_id: TeamId,
    /// Home team display name.
    #[serde(default)]
    pub home_team: String,
    /// Away team display name.
    #[serde(default)]
    pub away_team: String,
    /// Scheduled kick-off time.
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
    /// Competition round label (e.g., "Regular Season - 12").
    #[serde(default)]
    pub round: Option<String>,
}

impl Fixture {
    /// "Home vs Away" label, falling back to team IDs.
    pub fn label(&self) -> String {
        if self.home_team.is_empty() || self.away_team.is_empty() {
            format!("#{} vs #{}", self.home_team_id, self.away_team_id)
        } else {
            format!("{} vs {}", self.home_team, self.away_team)
        }
    }
}
