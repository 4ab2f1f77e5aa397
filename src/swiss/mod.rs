use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod bout;
pub mod competition;
pub mod error;
pub mod matching;
pub mod pairer;
pub mod participant;
pub mod score;

pub use bout::{Entrant, Match, MatchOutcome};
pub use competition::Competition;
pub use error::SwissError;
pub use pairer::Round;
pub use participant::{Fencer, Gender, Participant, ParticipantKey, ScoreKey, Standing, Team};
pub use score::{Score, ScoreStatus};

/// Which variant of participant a competition (and every match in it) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantKind {
    Individual,
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    Foil,
    Epee,
    Sabre,
    Laser,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Division {
    Men,
    Women,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwissConfig {
    pub name: String,
    pub weapon: Weapon,
    pub division: Division,
    pub category: String,
    pub kind: ParticipantKind,
    pub maximum_score: u32,
    pub licences_required: bool,
    pub draws_allowed: bool,
    pub pairing_deadline_ms: Option<u64>, // None = pairing is not time-bounded
}

impl Default for SwissConfig {
    fn default() -> Self {
        Self {
            name: "Swiss tournament".to_string(),
            weapon: Weapon::Epee,
            division: Division::Mixed,
            category: "Senior".to_string(),
            kind: ParticipantKind::Individual,
            maximum_score: 15,
            licences_required: false,
            draws_allowed: true,
            pairing_deadline_ms: None,
        }
    }
}

impl SwissConfig {
    /// Parses a JSON configuration document. Absent fields keep their
    /// default values; the result is validated before being returned.
    pub fn from_json(raw: &str) -> Result<Self, SwissError> {
        let config: SwissConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SwissError> {
        if self.name.trim().is_empty() {
            return Err(SwissError::Config("`name` must not be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(SwissError::Config("`category` must not be empty".to_string()));
        }
        if self.maximum_score == 0 {
            return Err(SwissError::Config(
                "`maximum_score` must be greater than 0".to_string(),
            ));
        }
        if self.pairing_deadline_ms == Some(0) {
            return Err(SwissError::Config(
                "`pairing_deadline_ms` must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pairing_deadline(&self) -> Option<Duration> {
        self.pairing_deadline_ms.map(Duration::from_millis)
    }
}
