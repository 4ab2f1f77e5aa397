use serde::{Deserialize, Serialize};

use super::ParticipantKind;
use super::error::{SwissError, invalid};
use super::participant::{Participant, pair_mut};
use super::score::Score;

/// A seat in a match: the participant's position in the arena slice the
/// round was built from, plus its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub index: usize,
    pub kind: ParticipantKind,
}

impl Entrant {
    pub fn of(index: usize, participant: &Participant) -> Self {
        Self {
            index,
            kind: participant.kind(),
        }
    }
}

/// What `Match::validate` applied to the participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Bye(usize),
    Win { winner: usize, loser: usize },
    Draw(usize, usize),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    max_score: u32,
    draw_allowed: bool,
    participant1: Option<Entrant>,
    score1: Option<Score>,
    participant2: Option<Entrant>,
    score2: Option<Score>,
}

fn check_same_kind(one: Option<Entrant>, other: Option<Entrant>) -> Result<(), SwissError> {
    if let (Some(a), Some(b)) = (one, other) {
        if a.kind != b.kind {
            return Err(invalid(format!(
                "a match cannot oppose {:?} and {:?} participants",
                a.kind, b.kind
            )));
        }
    }
    Ok(())
}

impl Match {
    pub fn new(
        max_score: u32,
        draw_allowed: bool,
        participant1: Option<Entrant>,
        participant2: Option<Entrant>,
    ) -> Result<Self, SwissError> {
        if max_score == 0 {
            return Err(invalid("`max_score` must be greater than 0"));
        }
        check_same_kind(participant1, participant2)?;
        Ok(Self {
            max_score,
            draw_allowed,
            participant1,
            score1: None,
            participant2,
            score2: None,
        })
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn draw_allowed(&self) -> bool {
        self.draw_allowed
    }

    pub fn participant1(&self) -> Option<Entrant> {
        self.participant1
    }

    pub fn participant2(&self) -> Option<Entrant> {
        self.participant2
    }

    pub fn set_participant1(&mut self, entrant: Option<Entrant>) -> Result<(), SwissError> {
        check_same_kind(entrant, self.participant2)?;
        self.participant1 = entrant;
        Ok(())
    }

    pub fn set_participant2(&mut self, entrant: Option<Entrant>) -> Result<(), SwissError> {
        check_same_kind(self.participant1, entrant)?;
        self.participant2 = entrant;
        Ok(())
    }

    pub fn score1(&self) -> Option<Score> {
        self.score1
    }

    pub fn score2(&self) -> Option<Score> {
        self.score2
    }

    pub fn set_score1(&mut self, score: Option<Score>) {
        self.score1 = score;
    }

    pub fn set_score2(&mut self, score: Option<Score>) {
        self.score2 = score;
    }

    /// A match with exactly one participant is that participant's bye.
    pub fn is_bye(&self) -> bool {
        self.participant1.is_some() != self.participant2.is_some()
    }

    /// Applies the result to the participants it seats. Not idempotent:
    /// the caller validates each resolved match exactly once.
    pub fn validate(&self, participants: &mut [Participant]) -> Result<MatchOutcome, SwissError> {
        match (self.participant1, self.participant2) {
            (None, None) => Ok(MatchOutcome::Empty),
            (Some(only), None) | (None, Some(only)) => {
                let participant = seat(participants, only)?;
                participant.bye()?;
                log::debug!("{} receives a bye", participant.key());
                Ok(MatchOutcome::Bye(only.index))
            }
            (Some(first), Some(second)) => {
                let (score1, score2) = match (self.score1, self.score2) {
                    (Some(s1), Some(s2)) => (s1, s2),
                    _ => {
                        return Err(invalid(
                            "both scores must be entered before validating a match",
                        ));
                    }
                };
                seat(participants, first)?;
                seat(participants, second)?;
                let (p1, p2) = pair_mut(participants, first.index, second.index)?;

                if score1 > score2 {
                    p1.win(p2, score1.touches(), score2.touches())?;
                    Ok(MatchOutcome::Win {
                        winner: first.index,
                        loser: second.index,
                    })
                } else if score1 < score2 {
                    p2.win(p1, score2.touches(), score1.touches())?;
                    Ok(MatchOutcome::Win {
                        winner: second.index,
                        loser: first.index,
                    })
                } else {
                    p1.draw(p2, score1.touches())?;
                    Ok(MatchOutcome::Draw(first.index, second.index))
                }
            }
        }
    }
}

fn seat(participants: &mut [Participant], entrant: Entrant) -> Result<&mut Participant, SwissError> {
    let count = participants.len();
    let participant = participants.get_mut(entrant.index).ok_or_else(|| {
        invalid(format!(
            "participant #{} is out of range for {count} participants",
            entrant.index
        ))
    })?;
    if participant.kind() != entrant.kind {
        return Err(invalid(format!(
            "participant #{} is {:?}, the match expected {:?}",
            entrant.index,
            participant.kind(),
            entrant.kind
        )));
    }
    Ok(participant)
}
