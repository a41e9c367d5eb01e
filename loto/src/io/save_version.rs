//! Save-file versioning for backward compatibility.

use std::fmt;

/// Version tag written at the head of every binary save
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SaveVersion {
    /// V1: identity fields and rounds with event-wide draws
    V1,
    /// V2: adds the rules text
    V2,
    /// V3: adds round ids and a short-lived sanity-rules field
    V3,
    /// V4: per sub-round status, prize value, winner name and draws
    V4,
    /// V5: slideshow settings for pause rounds
    V5,
    /// V6: sub-round start and end times
    V6,
}

impl SaveVersion {
    /// Get the version writers emit
    pub const fn current() -> Self {
        SaveVersion::V6
    }

    pub const fn raw(self) -> u16 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
            Self::V6 => 6,
        }
    }

    /// Map a stored tag to a known version. Returns `None` for tags written by
    /// a newer release.
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 | 1 => Some(Self::V1),
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            5 => Some(Self::V5),
            6 => Some(Self::V6),
            _ => None,
        }
    }

    /// Which optional fields a stream of this version carries.
    pub const fn layout(self) -> Layout {
        let v = self.raw();
        Layout {
            rules: v >= 2,
            sanity_rules: v == 3,
            round_id: v >= 3,
            round_draws: v < 4,
            sub_round_status: v >= 4,
            named_winner: v >= 4,
            sub_round_draws: v >= 4,
            diaporama: v >= 5,
            sub_round_times: v >= 6,
        }
    }
}

impl Default for SaveVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for SaveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.raw())
    }
}

/// Per-version decode table. Each flag says whether the matching field is
/// present in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Event rules text.
    pub rules: bool,
    /// Sanity-rules text, read and dropped.
    pub sanity_rules: bool,
    pub round_id: bool,
    /// Draws stored once per round instead of per sub-round.
    pub round_draws: bool,
    pub sub_round_status: bool,
    /// Prize value and winner name instead of a bare winner flag.
    pub named_winner: bool,
    pub sub_round_draws: bool,
    /// Slideshow record on pause rounds.
    pub diaporama: bool,
    pub sub_round_times: bool,
}
