use std::cmp::Reverse;

use super::bout::Match;
use super::error::{SwissError, invalid};
use super::pairer::Round;
use super::participant::{Participant, ParticipantKey};
use super::score::Score;
use super::{ParticipantKind, SwissConfig};

/// A Swiss competition: its configuration, the participant arena every
/// round borrows, and how many rounds have been closed.
#[derive(Debug, Clone)]
pub struct Competition {
    config: SwissConfig,
    participants: Vec<Participant>,
    rounds_played: u32,
}

impl Competition {
    pub fn new(config: SwissConfig) -> Result<Self, SwissError> {
        config.validate()?;
        log::info!(
            "competition '{}' created ({:?}, {:?} {:?}, {})",
            config.name,
            config.kind,
            config.weapon,
            config.division,
            config.category
        );
        Ok(Self {
            config,
            participants: Vec::new(),
            rounds_played: 0,
        })
    }

    pub fn config(&self) -> &SwissConfig {
        &self.config
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn position(&self, key: &ParticipantKey) -> Option<usize> {
        self.participants.iter().position(|p| &p.key() == key)
    }

    fn ensure_registration_open(&self) -> Result<(), SwissError> {
        if self.rounds_played > 0 {
            return Err(invalid(format!(
                "registration is closed after round {}",
                self.rounds_played
            )));
        }
        Ok(())
    }

    /// Registers a participant and returns its arena index.
    pub fn add_participant(
        &mut self,
        participant: impl Into<Participant>,
    ) -> Result<usize, SwissError> {
        self.ensure_registration_open()?;
        let participant = participant.into();

        if participant.kind() != self.config.kind {
            return Err(invalid(format!(
                "{} is not a {:?} participant",
                participant.key(),
                self.config.kind
            )));
        }
        if self.position(&participant.key()).is_some() {
            return Err(invalid(format!(
                "{} is already registered",
                participant.key()
            )));
        }

        match &participant {
            Participant::Fencer(fencer) => {
                if fencer.has_team() {
                    return Err(invalid(format!(
                        "{} is registered as a team member",
                        fencer.full_name()
                    )));
                }
                if self.config.licences_required && !fencer.is_licensed() {
                    return Err(invalid(format!(
                        "{} needs a club and a licence",
                        fencer.full_name()
                    )));
                }
            }
            Participant::Team(team) => {
                if self.config.licences_required {
                    if let Some(member) = team.members().iter().find(|m| !m.is_licensed()) {
                        return Err(invalid(format!(
                            "{} of team {} needs a club and a licence",
                            member.full_name(),
                            team.name()
                        )));
                    }
                }
            }
        }

        log::debug!("registered {}", participant.key());
        self.participants.push(participant);
        Ok(self.participants.len() - 1)
    }

    /// Withdraws a participant. Indices of later participants shift down.
    pub fn remove_participant(&mut self, key: &ParticipantKey) -> Result<Participant, SwissError> {
        self.ensure_registration_open()?;
        let index = self
            .position(key)
            .ok_or_else(|| invalid(format!("{key} is not registered")))?;
        Ok(self.participants.remove(index))
    }

    fn round(&self) -> Result<Round<'_>, SwissError> {
        let round = Round::new(
            self.rounds_played + 1,
            self.config.maximum_score,
            self.config.draws_allowed,
            &self.participants,
        )?;
        Ok(match self.config.pairing_deadline() {
            Some(deadline) => round.with_deadline(deadline),
            None => round,
        })
    }

    /// Pairs the next round from the current standings.
    pub fn next_round(&self) -> Result<Vec<Match>, SwissError> {
        self.round()?.matches()
    }

    /// Enters both scores of a match, enforcing the competition's maximum
    /// score and draw policy.
    pub fn enter_scores(
        &self,
        bout: &mut Match,
        score1: Score,
        score2: Score,
    ) -> Result<(), SwissError> {
        if bout.is_bye() {
            return Err(invalid("a bye takes no scores"));
        }
        let max = self.config.maximum_score;
        for score in [score1, score2] {
            if score.touches() > max {
                return Err(invalid(format!(
                    "{} touches exceeds the maximum score of {max}",
                    score.touches()
                )));
            }
        }
        if score1 == score2 && !self.config.draws_allowed {
            return Err(invalid(format!(
                "{score1} - {score2} is a draw, and draws are not allowed"
            )));
        }
        bout.set_score1(Some(score1));
        bout.set_score2(Some(score2));
        Ok(())
    }

    /// Applies every match of the round, in order, and closes it. The round
    /// is all or nothing: if any match is rejected, no standing changes.
    pub fn close_round(&mut self, matches: &[Match]) -> Result<(), SwissError> {
        for (position, bout) in matches.iter().enumerate() {
            let seated = bout.participant1().is_some() && bout.participant2().is_some();
            if seated && (bout.score1().is_none() || bout.score2().is_none()) {
                return Err(invalid(format!("match #{} has no result yet", position + 1)));
            }
        }
        let mut applied = self.participants.clone();
        for (position, bout) in matches.iter().enumerate() {
            let outcome = bout.validate(&mut applied).map_err(|err| {
                log::warn!(
                    "round {}: match #{} rejected, nothing applied",
                    self.rounds_played + 1,
                    position + 1
                );
                err
            })?;
            log::debug!("round {}: {:?}", self.rounds_played + 1, outcome);
        }
        self.participants = applied;
        self.rounds_played += 1;
        log::info!(
            "round {} of '{}' closed",
            self.rounds_played,
            self.config.name
        );
        Ok(())
    }

    /// Participants ranked by descending `(victories, indicator, touches)`.
    /// Equal tuples share a rank, and the next rank skips accordingly.
    pub fn standings(&self) -> Vec<(usize, &Participant)> {
        let mut ordered: Vec<&Participant> = self.participants.iter().collect();
        ordered.sort_by_key(|p| Reverse(p.score_key()));

        let mut standings: Vec<(usize, &Participant)> = Vec::with_capacity(ordered.len());
        for (position, participant) in ordered.into_iter().enumerate() {
            let rank = match standings.last() {
                Some(&(rank, previous)) if participant.score_key() == previous.score_key() => rank,
                _ => position + 1,
            };
            standings.push((rank, participant));
        }
        standings
    }

    pub fn kind(&self) -> ParticipantKind {
        self.config.kind
    }
}
