//! Letter rating bands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deal quality rating, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    /// Final score of 9 or more.
    #[serde(rename = "A+")]
    APlus,
    /// Final score of 8 or more.
    A,
    /// Final score of 7 or more.
    #[serde(rename = "B+")]
    BPlus,
    /// Final score of 6 or more.
    B,
    /// Final score of 5 or more.
    C,
    /// Anything lower.
    D,
}

/// Minimum final score for each band, evaluated top to bottom.
pub const RATING_BANDS: &[(f64, Rating)] = &[
    (9.0, Rating::APlus),
    (8.0, Rating::A),
    (7.0, Rating::BPlus),
    (6.0, Rating::B),
    (5.0, Rating::C),
];

impl Rating {
    /// Maps a final score to its band. Band minimums are inclusive.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        RATING_BANDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map_or(Rating::D, |&(_, rating)| rating)
    }

    /// The rating as printed, e.g. `"B+"`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
