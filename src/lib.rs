pub mod swiss;

pub use swiss::{
    Competition, Division, Entrant, Fencer, Gender, Match, MatchOutcome, Participant,
    ParticipantKey, ParticipantKind, Round, Score, ScoreKey, ScoreStatus, Standing, SwissConfig,
    SwissError, Team, Weapon,
};
