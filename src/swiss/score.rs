use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::{SwissError, invalid};

/// Explicit result attached to a score, written as a single letter in the
/// compact text form: `V` (win), `D` (loss), `N` (draw).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreStatus {
    Win,
    Loss,
    Draw,
}

impl ScoreStatus {
    pub fn letter(self) -> char {
        match self {
            ScoreStatus::Win => 'V',
            ScoreStatus::Loss => 'D',
            ScoreStatus::Draw => 'N',
        }
    }

    // Loss < Draw == unset < Win among equal touches
    fn rank(status: Option<ScoreStatus>) -> u8 {
        match status {
            Some(ScoreStatus::Loss) => 0,
            Some(ScoreStatus::Draw) | None => 1,
            Some(ScoreStatus::Win) => 2,
        }
    }
}

impl TryFrom<char> for ScoreStatus {
    type Error = SwissError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        match letter {
            'V' => Ok(ScoreStatus::Win),
            'D' => Ok(ScoreStatus::Loss),
            'N' => Ok(ScoreStatus::Draw),
            other => Err(invalid(format!(
                "score status must be one of 'V', 'D', 'N', got '{other}'"
            ))),
        }
    }
}

/// Touches scored by one side of a match, with an optional explicit status.
///
/// Scores are totally ordered: by touches first, then by status, where a
/// loss ranks below a draw or an unset status, which both rank below a win.
/// Equality follows the same ordering, so `N12` and `12` compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Score {
    touches: u32,
    status: Option<ScoreStatus>,
}

impl Score {
    pub fn new(touches: u32, status: Option<ScoreStatus>) -> Self {
        Self { touches, status }
    }

    pub fn touches(&self) -> u32 {
        self.touches
    }

    pub fn status(&self) -> Option<ScoreStatus> {
        self.status
    }

    pub fn set_touches(&mut self, touches: u32) {
        self.touches = touches;
    }

    pub fn set_status(&mut self, status: Option<ScoreStatus>) {
        self.status = status;
    }

    /// Sets the status from its letter form; `None` clears it.
    pub fn set_status_letter(&mut self, letter: Option<char>) -> Result<(), SwissError> {
        self.status = letter.map(ScoreStatus::try_from).transpose()?;
        Ok(())
    }

    /// Parses the compact text form: `12`, `V5`, `D0`, `N3`.
    pub fn from_text(raw: &str) -> Result<Self, SwissError> {
        raw.parse()
    }
}

fn parse_touches(digits: &str, raw: &str) -> Result<u32, SwissError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SwissError::ParseError(format!(
            "'{raw}' is not a score: expected digits, optionally prefixed by V, D or N"
        )));
    }
    digits
        .parse::<u32>()
        .map_err(|e| SwissError::ParseError(format!("touches in '{raw}' out of range: {e}")))
}

impl FromStr for Score {
    type Err = SwissError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut chars = raw.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return Err(SwissError::ParseError("score text is empty".to_string())),
        };

        if first.is_ascii_digit() {
            return Ok(Score::new(parse_touches(raw, raw)?, None));
        }

        if !first.is_alphabetic() {
            return Err(SwissError::ParseError(format!("'{raw}' is not a score")));
        }
        let touches = parse_touches(chars.as_str(), raw)?;
        let status = ScoreStatus::try_from(first).map_err(|_| {
            SwissError::ParseError(format!(
                "status letter '{first}' in '{raw}' must be one of V, D, N"
            ))
        })?;
        Ok(Score::new(touches, Some(status)))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{}{}", status.letter(), self.touches),
            None => write!(f, "{}", self.touches),
        }
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.touches
            .cmp(&other.touches)
            .then(ScoreStatus::rank(self.status).cmp(&ScoreStatus::rank(other.status)))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_touches_only() {
        let score: Score = "12".parse().unwrap();
        assert_eq!(score.touches(), 12);
        assert_eq!(score.status(), None);
        assert_eq!(score, Score::new(12, None));
    }

    #[test]
    fn test_parse_with_status() {
        assert_eq!(
            Score::from_text("V5").unwrap(),
            Score::new(5, Some(ScoreStatus::Win))
        );
        assert_eq!(
            Score::from_text("D0").unwrap().status(),
            Some(ScoreStatus::Loss)
        );
        assert_eq!(
            Score::from_text("N3").unwrap().status(),
            Some(ScoreStatus::Draw)
        );
    }

    #[test]
    fn test_parse_failures() {
        for raw in ["", "X", "V", "X5", "5V", "V-3", "-3", "1 2", "VV2", "+4", "99999999999"] {
            assert!(
                matches!(Score::from_text(raw), Err(SwissError::ParseError(_))),
                "'{raw}' should not parse"
            );
        }
    }

    #[test]
    fn test_display_round_trips_text_form() {
        for raw in ["0", "15", "V5", "D4", "N3"] {
            assert_eq!(Score::from_text(raw).unwrap().to_string(), raw);
        }
    }

    fn grid() -> Vec<Score> {
        let statuses = [
            None,
            Some(ScoreStatus::Win),
            Some(ScoreStatus::Loss),
            Some(ScoreStatus::Draw),
        ];
        (0..4)
            .flat_map(|touches| statuses.iter().map(move |&s| Score::new(touches, s)))
            .collect()
    }

    #[test]
    fn test_touches_dominate_status() {
        for a in grid() {
            for b in grid() {
                if a.touches() < b.touches() {
                    assert!(a < b, "{a} should rank below {b}");
                } else if a.touches() > b.touches() {
                    assert!(a > b, "{a} should rank above {b}");
                }
            }
        }
        assert!(Score::from_text("V4").unwrap() < Score::from_text("D5").unwrap());
    }

    #[test]
    fn test_status_breaks_equal_touches() {
        let loss = Score::new(12, Some(ScoreStatus::Loss));
        let draw = Score::new(12, Some(ScoreStatus::Draw));
        let unset = Score::new(12, None);
        let win = Score::new(12, Some(ScoreStatus::Win));

        assert!(loss < unset);
        assert!(loss < draw);
        assert!(unset < win);
        assert!(draw < win);
        assert_eq!(draw, unset);
        assert_eq!(Score::from_text("N12").unwrap(), Score::from_text("12").unwrap());
        assert_ne!(loss, unset);
    }

    #[test]
    fn test_order_is_consistent_and_transitive() {
        let scores = grid();
        for a in &scores {
            for b in &scores {
                assert_eq!(a.cmp(b) == Ordering::Equal, a == b, "{a} vs {b}");
                assert_eq!(a.cmp(b), b.cmp(a).reverse(), "{a} vs {b}");
                assert_eq!(a.partial_cmp(b), Some(a.cmp(b)));
                for c in &scores {
                    if a <= b && b <= c {
                        assert!(a <= c, "{a} <= {b} <= {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_status_letter_setter() {
        let mut score = Score::new(4, None);
        score.set_status_letter(Some('V')).unwrap();
        assert_eq!(score.status(), Some(ScoreStatus::Win));
        assert!(matches!(
            score.set_status_letter(Some('W')),
            Err(SwissError::InvalidValue(_))
        ));
        assert_eq!(score.status(), Some(ScoreStatus::Win));
        score.set_status_letter(None).unwrap();
        assert_eq!(score.status(), None);
    }
}
