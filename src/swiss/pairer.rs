use std::time::{Duration, Instant};

use super::bout::{Entrant, Match};
use super::error::{SwissError, invalid};
use super::matching::{BracketPairing, pair_bracket};
use super::participant::{Participant, ScoreKey};

/// One round of a Swiss competition. The round borrows the participant
/// arena; every match it produces seats participants by their index in it.
pub struct Round<'a> {
    number: u32,
    max_score: u32,
    draw_allowed: bool,
    participants: &'a [Participant],
    deadline: Option<Duration>,
}

/// Participants sharing one victories value, best ranked first.
struct Bucket {
    victories: f32,
    members: Vec<usize>,
}

/// A run of adjacent buckets whose combined group was paired perfectly.
struct Commitment {
    levels: Vec<f32>,
    members: Vec<usize>,
    pairs: Vec<(usize, usize)>,
}

impl<'a> Round<'a> {
    pub fn new(
        number: u32,
        max_score: u32,
        draw_allowed: bool,
        participants: &'a [Participant],
    ) -> Result<Self, SwissError> {
        if max_score == 0 {
            return Err(invalid("`max_score` must be greater than 0"));
        }
        Ok(Self {
            number,
            max_score,
            draw_allowed,
            participants,
            deadline: None,
        })
    }

    /// Bounds the pairing computation; reaching it fails the whole round.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn participants(&self) -> &'a [Participant] {
        self.participants
    }

    /// Builds this round's matches from the current standings: the pairings
    /// of every bracket, then the bye (if any) as a single-seat match.
    pub fn matches(&self) -> Result<Vec<Match>, SwissError> {
        let started = Instant::now();
        let mut ranked = self.ranked()?;

        let exempted = if ranked.len() % 2 != 0 {
            Some(self.pick_bye(&mut ranked)?)
        } else {
            None
        };

        let buckets = cascade_odd_buckets(group_by_victories(&ranked));
        let commitments = self.pair_buckets(&buckets, started)?;

        let mut matches = Vec::with_capacity(ranked.len() / 2 + 1);
        for commitment in &commitments {
            for &(first, second) in &commitment.pairs {
                matches.push(Match::new(
                    self.max_score,
                    self.draw_allowed,
                    Some(self.entrant(first)),
                    Some(self.entrant(second)),
                )?);
            }
        }
        if let Some(index) = exempted {
            matches.push(Match::new(
                self.max_score,
                self.draw_allowed,
                Some(self.entrant(index)),
                None,
            )?);
        }

        log::info!(
            "round {}: {} matches for {} participants{}",
            self.number,
            matches.len(),
            self.participants.len(),
            if exempted.is_some() { " (one bye)" } else { "" }
        );
        Ok(matches)
    }

    fn entrant(&self, index: usize) -> Entrant {
        Entrant::of(index, &self.participants[index])
    }

    /// Arena indices sorted by descending ranking tuple. Ties keep arena order.
    fn ranked(&self) -> Result<Vec<(usize, ScoreKey)>, SwissError> {
        let mut ranked = Vec::with_capacity(self.participants.len());
        let mut kind = None;
        for (index, participant) in self.participants.iter().enumerate() {
            match kind {
                None => kind = Some(participant.kind()),
                Some(k) if k != participant.kind() => {
                    return Err(invalid(format!(
                        "round {} mixes {:?} and {:?} participants",
                        self.number,
                        k,
                        participant.kind()
                    )));
                }
                Some(_) => {}
            }
            ranked.push((index, participant.scoring()?.score_key()));
        }
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(ranked)
    }

    /// Takes the lowest-ranked participant who has not been exempted yet.
    fn pick_bye(&self, ranked: &mut Vec<(usize, ScoreKey)>) -> Result<usize, SwissError> {
        let position = ranked
            .iter()
            .rposition(|&(index, _)| {
                self.participants[index]
                    .standing()
                    .is_some_and(|s| !s.has_been_exempted())
            })
            .ok_or_else(|| {
                log::warn!("round {}: every participant already had a bye", self.number);
                SwissError::PairingIncomplete(format!(
                    "round {}: odd participant count and every participant was already exempted",
                    self.number
                ))
            })?;
        let (index, _) = ranked.remove(position);
        log::debug!(
            "round {}: bye for {}",
            self.number,
            self.participants[index].key()
        );
        Ok(index)
    }

    fn try_pair(&self, group: &[usize], started: Instant) -> Result<BracketPairing, SwissError> {
        if let Some(deadline) = self.deadline {
            let elapsed = started.elapsed();
            if elapsed >= deadline {
                log::warn!("round {}: pairing exceeded {deadline:?}", self.number);
                return Err(SwissError::PairingTimeout { elapsed, deadline });
            }
        }
        pair_bracket(group, self.participants)
    }

    /// Walks the buckets from the top, merging each unpairable group into the
    /// next bucket down. A remainder that still cannot be paired re-opens the
    /// committed groups from the lowest upwards.
    fn pair_buckets(
        &self,
        buckets: &[Bucket],
        started: Instant,
    ) -> Result<Vec<Commitment>, SwissError> {
        let mut commitments: Vec<Commitment> = Vec::new();
        let mut levels = Vec::new();
        let mut group: Vec<usize> = Vec::new();
        let mut settled = true;

        for bucket in buckets {
            levels.push(bucket.victories);
            group.extend_from_slice(&bucket.members);
            let pairing = self.try_pair(&group, started)?;
            settled = pairing.is_perfect;
            if settled {
                commitments.push(Commitment {
                    levels: std::mem::take(&mut levels),
                    members: std::mem::take(&mut group),
                    pairs: pairing.pairs,
                });
            } else {
                log::debug!(
                    "round {}: {} participants at {:?} cannot be paired, merging down",
                    self.number,
                    group.len(),
                    levels
                );
            }
        }

        while !settled {
            let Some(reopened) = commitments.pop() else {
                log::warn!(
                    "round {}: {} participants at {:?} cannot be paired",
                    self.number,
                    group.len(),
                    levels
                );
                return Err(SwissError::PairingIncomplete(format!(
                    "round {}: no pairing avoids repeat encounters for {} participants",
                    self.number,
                    group.len()
                )));
            };
            log::debug!(
                "round {}: re-opening bracket {:?} to pair {:?}",
                self.number,
                reopened.levels,
                levels
            );
            // keep the merged group in rank order: re-opened members sit above
            let mut merged_levels = reopened.levels;
            merged_levels.append(&mut levels);
            let mut merged = reopened.members;
            merged.append(&mut group);
            levels = merged_levels;
            group = merged;

            let pairing = self.try_pair(&group, started)?;
            settled = pairing.is_perfect;
            if settled {
                commitments.push(Commitment {
                    levels: std::mem::take(&mut levels),
                    members: std::mem::take(&mut group),
                    pairs: pairing.pairs,
                });
            }
        }
        Ok(commitments)
    }
}

fn group_by_victories(ranked: &[(usize, ScoreKey)]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for &(index, key) in ranked {
        match buckets.last_mut() {
            Some(bucket) if bucket.victories.total_cmp(&key.victories).is_eq() => {
                bucket.members.push(index)
            }
            _ => buckets.push(Bucket {
                victories: key.victories,
                members: vec![index],
            }),
        }
    }
    buckets
}

/// Moves the lowest member of every odd bucket to the top of the next
/// bucket down. Only the last bucket can stay odd.
fn cascade_odd_buckets(mut buckets: Vec<Bucket>) -> Vec<Bucket> {
    for i in 0..buckets.len().saturating_sub(1) {
        if buckets[i].members.len() % 2 != 0 {
            if let Some(floater) = buckets[i].members.pop() {
                buckets[i + 1].members.insert(0, floater);
            }
        }
    }
    buckets
}
