use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::ParticipantKind;
use super::error::{SwissError, invalid};

/// Stable identity of a participant. Opponent histories store keys, never
/// live references, so equality here ignores every piece of scoring state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParticipantKey {
    Fencer { lastname: String, firstname: String },
    Team { name: String },
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantKey::Fencer { lastname, firstname } => write!(f, "{lastname} {firstname}"),
            ParticipantKey::Team { name } => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = SwissError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(invalid(format!(
                "gender must be one of 'male', 'female', 'other', got '{raw}'"
            ))),
        }
    }
}

/// Canonical ranking tuple `(victories, indicator, touches_scored)`.
/// Higher is better; standings sort by it in descending order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreKey {
    pub victories: f32,
    pub indicator: i64,
    pub touches_scored: u32,
}

impl Ord for ScoreKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.victories
            .total_cmp(&other.victories)
            .then(self.indicator.cmp(&other.indicator))
            .then(self.touches_scored.cmp(&other.touches_scored))
    }
}

impl PartialOrd for ScoreKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScoreKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoreKey {}

/// Accumulated results of one scoring entity over the competition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    victories: f32,
    touches_scored: u32,
    touches_received: u32,
    opponents_encountered: BTreeSet<ParticipantKey>,
    has_been_exempted: bool,
}

impl Standing {
    pub fn victories(&self) -> f32 {
        self.victories
    }

    pub fn touches_scored(&self) -> u32 {
        self.touches_scored
    }

    pub fn touches_received(&self) -> u32 {
        self.touches_received
    }

    pub fn opponents_encountered(&self) -> &BTreeSet<ParticipantKey> {
        &self.opponents_encountered
    }

    pub fn has_been_exempted(&self) -> bool {
        self.has_been_exempted
    }

    pub fn has_encountered(&self, opponent: &ParticipantKey) -> bool {
        self.opponents_encountered.contains(opponent)
    }

    pub fn indicator(&self) -> i64 {
        i64::from(self.touches_scored) - i64::from(self.touches_received)
    }

    pub fn score_key(&self) -> ScoreKey {
        ScoreKey {
            victories: self.victories,
            indicator: self.indicator(),
            touches_scored: self.touches_scored,
        }
    }

    fn record_bout(&mut self, opponent: &ParticipantKey, scored: u32, received: u32) {
        self.touches_scored = self.touches_scored.saturating_add(scored);
        self.touches_received = self.touches_received.saturating_add(received);
        self.opponents_encountered.insert(opponent.clone());
    }
}

/// An individual fencer. A fencer registered for a team competition carries
/// no scoring state of their own: their results live on the team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fencer {
    lastname: String,
    firstname: String,
    gender: Gender,
    age: u32,
    club: Option<String>,
    licence: Option<u32>,
    standing: Option<Standing>,
}

fn non_empty(field: &str, value: String) -> Result<String, SwissError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("`{field}` must not be empty")));
    }
    Ok(value)
}

fn positive(field: &str, value: u32) -> Result<u32, SwissError> {
    if value == 0 {
        return Err(invalid(format!("`{field}` must be greater than 0")));
    }
    Ok(value)
}

impl Fencer {
    /// Registers an individually scored fencer with an empty record.
    pub fn new(
        lastname: impl Into<String>,
        firstname: impl Into<String>,
        gender: Gender,
        age: u32,
    ) -> Result<Self, SwissError> {
        Ok(Self {
            lastname: non_empty("lastname", lastname.into())?,
            firstname: non_empty("firstname", firstname.into())?,
            gender,
            age: positive("age", age)?,
            club: None,
            licence: None,
            standing: Some(Standing::default()),
        })
    }

    pub fn with_club(mut self, club: impl Into<String>) -> Result<Self, SwissError> {
        self.set_club(club)?;
        Ok(self)
    }

    pub fn with_licence(mut self, licence: u32) -> Result<Self, SwissError> {
        self.set_licence(licence)?;
        Ok(self)
    }

    /// Drops the individual record so the fencer can join a team.
    pub fn into_team_member(mut self) -> Self {
        self.standing = None;
        self
    }

    pub fn key(&self) -> ParticipantKey {
        ParticipantKey::Fencer {
            lastname: self.lastname.clone(),
            firstname: self.firstname.clone(),
        }
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.lastname, self.firstname)
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn set_age(&mut self, age: u32) -> Result<(), SwissError> {
        self.age = positive("age", age)?;
        Ok(())
    }

    pub fn club(&self) -> Option<&str> {
        self.club.as_deref()
    }

    pub fn set_club(&mut self, club: impl Into<String>) -> Result<(), SwissError> {
        self.club = Some(non_empty("club", club.into())?);
        Ok(())
    }

    pub fn licence(&self) -> Option<u32> {
        self.licence
    }

    pub fn set_licence(&mut self, licence: u32) -> Result<(), SwissError> {
        self.licence = Some(positive("licence", licence)?);
        Ok(())
    }

    pub fn is_licensed(&self) -> bool {
        self.club.is_some() && self.licence.is_some()
    }

    /// True when the fencer's results are kept by their team.
    pub fn has_team(&self) -> bool {
        self.standing.is_none()
    }

    pub fn standing(&self) -> Option<&Standing> {
        self.standing.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    name: String,
    members: Vec<Fencer>,
    standing: Standing,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Result<Self, SwissError> {
        Ok(Self {
            name: non_empty("name", name.into())?,
            members: Vec::new(),
            standing: Standing::default(),
        })
    }

    pub fn key(&self) -> ParticipantKey {
        ParticipantKey::Team {
            name: self.name.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), SwissError> {
        self.name = non_empty("name", name.into())?;
        Ok(())
    }

    pub fn members(&self) -> &[Fencer] {
        &self.members
    }

    /// Adds a team-affiliated fencer. Adding a fencer already on the roster
    /// is a no-op.
    pub fn add_fencer(&mut self, fencer: Fencer) -> Result<(), SwissError> {
        if !fencer.has_team() {
            return Err(invalid(format!(
                "fencer {} is scored individually and cannot join team {}",
                fencer.full_name(),
                self.name
            )));
        }
        let key = fencer.key();
        if !self.members.iter().any(|m| m.key() == key) {
            self.members.push(fencer);
        }
        Ok(())
    }

    pub fn remove_fencer(&mut self, key: &ParticipantKey) -> Option<Fencer> {
        let position = self.members.iter().position(|m| &m.key() == key)?;
        Some(self.members.remove(position))
    }

    pub fn standing(&self) -> &Standing {
        &self.standing
    }
}

/// A competitor in a Swiss round: either an individual fencer or a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Participant {
    Fencer(Fencer),
    Team(Team),
}

impl From<Fencer> for Participant {
    fn from(fencer: Fencer) -> Self {
        Participant::Fencer(fencer)
    }
}

impl From<Team> for Participant {
    fn from(team: Team) -> Self {
        Participant::Team(team)
    }
}

impl Participant {
    pub fn kind(&self) -> ParticipantKind {
        match self {
            Participant::Fencer(_) => ParticipantKind::Individual,
            Participant::Team(_) => ParticipantKind::Team,
        }
    }

    pub fn key(&self) -> ParticipantKey {
        match self {
            Participant::Fencer(fencer) => fencer.key(),
            Participant::Team(team) => team.key(),
        }
    }

    /// Scoring state, absent for a fencer whose team keeps their results.
    pub fn standing(&self) -> Option<&Standing> {
        match self {
            Participant::Fencer(fencer) => fencer.standing.as_ref(),
            Participant::Team(team) => Some(&team.standing),
        }
    }

    pub fn score_key(&self) -> Option<ScoreKey> {
        self.standing().map(Standing::score_key)
    }

    pub fn has_encountered(&self, other: &Participant) -> bool {
        self.standing()
            .is_some_and(|s| s.has_encountered(&other.key()))
    }

    /// Orders participants by their ranking tuple alone, the same as comparing
    /// their `score_key()`s. Participants without scoring state rank below
    /// everyone else.
    pub fn cmp_standing(&self, other: &Participant) -> Ordering {
        self.score_key().cmp(&other.score_key())
    }

    pub(crate) fn scoring(&self) -> Result<&Standing, SwissError> {
        self.standing().ok_or_else(|| self.team_delegated())
    }

    fn scoring_mut(&mut self) -> Result<&mut Standing, SwissError> {
        let err = self.team_delegated();
        match self {
            Participant::Fencer(fencer) => fencer.standing.as_mut().ok_or(err),
            Participant::Team(team) => Ok(&mut team.standing),
        }
    }

    fn team_delegated(&self) -> SwissError {
        invalid(format!("{} is scored through their team", self.key()))
    }

    fn check_opponent(&self, opponent: &Participant) -> Result<(), SwissError> {
        if self.kind() != opponent.kind() {
            return Err(invalid(format!(
                "{} ({:?}) cannot meet {} ({:?})",
                self.key(),
                self.kind(),
                opponent.key(),
                opponent.kind()
            )));
        }
        self.scoring()?;
        opponent.scoring()?;
        Ok(())
    }

    /// Records a won bout against `opponent`. Both sides get their touch
    /// tallies and remember each other; only `self` gains a victory.
    pub fn win(
        &mut self,
        opponent: &mut Participant,
        self_touches: u32,
        opponent_touches: u32,
    ) -> Result<(), SwissError> {
        self.check_opponent(opponent)?;
        let (self_key, opponent_key) = (self.key(), opponent.key());

        let winner = self.scoring_mut()?;
        winner.victories += 1.0;
        winner.record_bout(&opponent_key, self_touches, opponent_touches);

        opponent
            .scoring_mut()?
            .record_bout(&self_key, opponent_touches, self_touches);
        Ok(())
    }

    /// Records a drawn bout: half a victory each, `touches` both ways.
    pub fn draw(&mut self, opponent: &mut Participant, touches: u32) -> Result<(), SwissError> {
        self.check_opponent(opponent)?;
        let (self_key, opponent_key) = (self.key(), opponent.key());

        let own = self.scoring_mut()?;
        own.victories += 0.5;
        own.record_bout(&opponent_key, touches, touches);

        let other = opponent.scoring_mut()?;
        other.victories += 0.5;
        other.record_bout(&self_key, touches, touches);
        Ok(())
    }

    pub fn bye(&mut self) -> Result<(), SwissError> {
        let standing = self.scoring_mut()?;
        standing.victories += 1.0;
        standing.has_been_exempted = true;
        Ok(())
    }
}

/// Borrows two distinct slots of the participant arena mutably.
pub(crate) fn pair_mut<T>(
    items: &mut [T],
    first: usize,
    second: usize,
) -> Result<(&mut T, &mut T), SwissError> {
    if first == second {
        return Err(invalid(format!(
            "participant #{first} cannot be paired against itself"
        )));
    }
    let len = items.len();
    if first >= len || second >= len {
        return Err(invalid(format!(
            "participant index out of range ({first}, {second}) for {len} participants"
        )));
    }
    if first < second {
        let (head, tail) = items.split_at_mut(second);
        Ok((&mut head[first], &mut tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(first);
        Ok((&mut tail[0], &mut head[second]))
    }
}
