use chrono::{DateTime, TimeDelta, Utc};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::io::SerializationError;

/// A drawn number. Valid draws live in `MIN_NUMBER..=MAX_NUMBER`.
pub type Number = u8;

/// Wall-clock instant used for round and event timing.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Elapsed time between two instants, clamped to zero when `end` was never
/// recorded.
#[must_use]
pub fn elapsed(start: Timestamp, end: Timestamp) -> TimeDelta {
    if end > start {
        end - start
    } else {
        TimeDelta::zero()
    }
}

/// Error returned when a localized type name does not match any known type.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown type name: {0}")]
pub struct UnknownTypeName(pub String);

fn unknown_discriminant(what: &str, value: u8) -> SerializationError {
    SerializationError::InvalidFormat(format!("unknown {what} discriminant {value}"))
}

/// Win condition of a sub-round.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum SubRoundType {
    /// First completed line wins.
    #[default]
    OneQuine = 1,
    /// First card with two completed lines wins.
    TwoQuines = 2,
    /// First full card wins.
    FullCard = 3,
    /// Players are eliminated as soon as one of their numbers is drawn.
    Inverse = 4,
}

impl SubRoundType {
    pub const ALL: [Self; 4] = [Self::OneQuine, Self::TwoQuines, Self::FullCard, Self::Inverse];
}

impl fmt::Display for SubRoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::OneQuine => "simple quine",
            Self::TwoQuines => "double quine",
            Self::FullCard => "carton plein",
            Self::Inverse => "inverse",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for SubRoundType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

impl TryFrom<u8> for SubRoundType {
    type Error = SerializationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::OneQuine),
            2 => Ok(Self::TwoQuines),
            3 => Ok(Self::FullCard),
            4 => Ok(Self::Inverse),
            v => Err(unknown_discriminant("sub-round type", v)),
        }
    }
}

/// Lifecycle of a sub-round. Transitions only ever move forward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum SubRoundStatus {
    #[default]
    Ready = 1,
    /// The prize is being presented before the draws begin.
    PreScreen = 2,
    Running = 3,
    Done = 4,
}

impl fmt::Display for SubRoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Ready => "prêt",
            Self::PreScreen => "affichage",
            Self::Running => "en cours",
            Self::Done => "fini",
        };
        write!(f, "{repr}")
    }
}

impl TryFrom<u8> for SubRoundStatus {
    type Error = SerializationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ready),
            2 => Ok(Self::PreScreen),
            3 => Ok(Self::Running),
            4 => Ok(Self::Done),
            v => Err(unknown_discriminant("sub-round status", v)),
        }
    }
}

/// Kind of a game round ("partie"). The kind decides which sub-rounds the
/// round is made of.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum RoundType {
    OneQuine = 1,
    TwoQuines = 2,
    FullCard = 3,
    OneQuineFullCard = 4,
    /// The regular round: one line, then two lines, then the full card.
    #[default]
    OneTwoQuineFullCard = 5,
    /// Children's round, played like a single line.
    Enfant = 6,
    Inverse = 7,
    /// Intermission. Has no sub-rounds.
    Pause = 8,
}

impl RoundType {
    pub const ALL: [Self; 8] = [
        Self::OneQuine,
        Self::TwoQuines,
        Self::FullCard,
        Self::OneQuineFullCard,
        Self::OneTwoQuineFullCard,
        Self::Enfant,
        Self::Inverse,
        Self::Pause,
    ];

    /// Sub-round kinds a round of this kind is made of, in play order.
    #[must_use]
    pub const fn sub_round_types(self) -> &'static [SubRoundType] {
        match self {
            Self::OneQuine | Self::Enfant => &[SubRoundType::OneQuine],
            Self::TwoQuines => &[SubRoundType::TwoQuines],
            Self::FullCard | Self::Inverse => &[SubRoundType::FullCard],
            Self::OneQuineFullCard => &[SubRoundType::OneQuine, SubRoundType::FullCard],
            Self::OneTwoQuineFullCard => &[
                SubRoundType::OneQuine,
                SubRoundType::TwoQuines,
                SubRoundType::FullCard,
            ],
            Self::Pause => &[],
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::OneQuine => "Simple quine",
            Self::TwoQuines => "Double quine",
            Self::FullCard => "Gros lot",
            Self::OneQuineFullCard => "une quine et carton",
            Self::OneTwoQuineFullCard => "normale",
            Self::Enfant => "Enfant",
            Self::Inverse => "Inverse",
            Self::Pause => "Pause",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for RoundType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

impl TryFrom<u8> for RoundType {
    type Error = SerializationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::OneQuine),
            2 => Ok(Self::TwoQuines),
            3 => Ok(Self::FullCard),
            4 => Ok(Self::OneQuineFullCard),
            5 => Ok(Self::OneTwoQuineFullCard),
            6 => Ok(Self::Enfant),
            7 => Ok(Self::Inverse),
            8 => Ok(Self::Pause),
            v => Err(unknown_discriminant("round type", v)),
        }
    }
}

/// Lifecycle of a game round.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum RoundStatus {
    #[default]
    Ready = 1,
    Running = 2,
    /// Results are on screen, waiting for the operator to move on.
    PostScreen = 3,
    Done = 4,
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Ready => "prêt",
            Self::Running => "démarré",
            Self::PostScreen => "écran de fin",
            Self::Done => "terminé",
        };
        write!(f, "{repr}")
    }
}

impl TryFrom<u8> for RoundStatus {
    type Error = SerializationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ready),
            2 => Ok(Self::Running),
            3 => Ok(Self::PostScreen),
            4 => Ok(Self::Done),
            v => Err(unknown_discriminant("round status", v)),
        }
    }
}

/// Lifecycle of the whole event.
///
/// `Invalid`, `MissingParties` and `Ready` are the editing states and are
/// re-derived after every edit. `DisplayRules` is an overlay that can be
/// toggled on top of the running states.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum EventStatus {
    #[default]
    Invalid = 0,
    MissingParties = 1,
    Ready = 2,
    EventStarting = 3,
    GameRunning = 4,
    DisplayRules = 5,
    EventEnding = 6,
    Finished = 7,
}

impl EventStatus {
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Invalid | Self::MissingParties | Self::Ready)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Invalid => "invalide",
            Self::MissingParties => "parties manquantes",
            Self::Ready => "prêt",
            Self::EventStarting => "début de l'événement",
            Self::GameRunning => "partie en cours",
            Self::DisplayRules => "affichage des règles",
            Self::EventEnding => "fin de l'événement",
            Self::Finished => "terminé",
        };
        write!(f, "{repr}")
    }
}

impl TryFrom<u32> for EventStatus {
    type Error = SerializationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Invalid),
            1 => Ok(Self::MissingParties),
            2 => Ok(Self::Ready),
            3 => Ok(Self::EventStarting),
            4 => Ok(Self::GameRunning),
            5 => Ok(Self::DisplayRules),
            6 => Ok(Self::EventEnding),
            7 => Ok(Self::Finished),
            v => Err(SerializationError::InvalidFormat(format!(
                "unknown event status discriminant {v}"
            ))),
        }
    }
}
