use chrono::TimeDelta;
use log::{debug, trace};
use std::io::{Read, Write};

use super::{
    constants::{LEGACY_WINNER, is_valid_number},
    entities::{Number, SubRoundStatus, SubRoundType, Timestamp, elapsed, now},
};
use crate::io::{
    Result, SaveVersion, Serializable, SerializationError,
    binary::{
        read_bytes, read_string, read_timestamp, read_value, write_bytes, write_string,
        write_timestamp, write_value,
    },
    documents::SubRoundDocument,
};

/// One win-condition phase of a round ("sous-partie").
///
/// ```text
/// Ready -> [PreScreen] -> Running -> Done
/// ```
///
/// `PreScreen` is only visited when there is prize text to present. Draws
/// only change while `Running`, and the phase is closed by naming a winner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubGameRound {
    kind: SubRoundType,
    status: SubRoundStatus,
    prices: String,
    value: f64,
    winner: String,
    draws: Vec<Number>,
    start: Timestamp,
    end: Timestamp,
}

impl SubGameRound {
    #[must_use]
    pub fn new(kind: SubRoundType, prices: impl Into<String>, value: f64) -> Self {
        Self {
            kind,
            prices: prices.into(),
            value,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn kind(&self) -> SubRoundType {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> SubRoundStatus {
        self.status
    }

    #[must_use]
    pub fn status_str(&self) -> String {
        self.status.to_string()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == SubRoundStatus::Done
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == SubRoundStatus::Running
    }

    #[must_use]
    pub fn prices(&self) -> &str {
        &self.prices
    }

    /// Prize text can only change before the phase starts.
    pub fn set_prices(&mut self, prices: impl Into<String>) {
        if self.status == SubRoundStatus::Ready {
            self.prices = prices.into();
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        if self.status == SubRoundStatus::Ready {
            self.value = value;
        }
    }

    #[must_use]
    pub fn winner(&self) -> &str {
        &self.winner
    }

    #[must_use]
    pub fn has_winner(&self) -> bool {
        !self.winner.is_empty()
    }

    #[must_use]
    pub fn draws(&self) -> &[Number] {
        &self.draws
    }

    #[must_use]
    pub fn empty_draws(&self) -> bool {
        self.draws.is_empty()
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Time spent between entering `Running` and closing the phase.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        elapsed(self.start, self.end)
    }

    /// Advances one step. Leaving `Running` requires a winner. Returns whether
    /// the status changed.
    pub fn next_status(&mut self) -> bool {
        let next = match self.status {
            SubRoundStatus::Ready if !self.prices.is_empty() => SubRoundStatus::PreScreen,
            SubRoundStatus::Ready | SubRoundStatus::PreScreen => SubRoundStatus::Running,
            SubRoundStatus::Running if self.has_winner() => SubRoundStatus::Done,
            SubRoundStatus::Running | SubRoundStatus::Done => {
                trace!("{} sub-round stays {}", self.kind, self.status);
                return false;
            }
        };
        match next {
            SubRoundStatus::Running => self.start = now(),
            // Keeps `end` strictly after `start` even on coarse clocks.
            SubRoundStatus::Done => self.end = now().max(self.start + TimeDelta::nanoseconds(1)),
            _ => {}
        }
        debug!("{} sub-round: {} -> {}", self.kind, self.status, next);
        self.status = next;
        true
    }

    /// Records a draw. Ignored unless running, or when the number is out of
    /// range or already drawn in this phase.
    pub fn add_picked_number(&mut self, number: Number) -> bool {
        if !self.is_running() || !is_valid_number(number) || self.draws.contains(&number) {
            trace!("draw {number} ignored by {} sub-round ({})", self.kind, self.status);
            return false;
        }
        self.draws.push(number);
        true
    }

    /// Cancels the last draw. Ignored unless running.
    pub fn remove_last_pick(&mut self) -> Option<Number> {
        if !self.is_running() {
            return None;
        }
        self.draws.pop()
    }

    /// Names the winner and closes the phase. Ignored unless running or when
    /// the name is empty.
    pub fn set_winner(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if !self.is_running() || name.is_empty() {
            trace!("winner ignored by {} sub-round ({})", self.kind, self.status);
            return false;
        }
        self.winner = name;
        self.next_status()
    }

    /// Draws inherited from a pre-v4 save, where they were stored per round.
    pub(crate) fn set_legacy_draws(&mut self, draws: Vec<Number>) {
        self.draws = draws;
    }
}

/// Draws must be in range and appear at most once.
pub(crate) fn check_draws(draws: &[Number]) -> Result<()> {
    for (index, n) in draws.iter().enumerate() {
        if !is_valid_number(*n) {
            return Err(SerializationError::InvalidFormat(format!("draw {n} out of range")));
        }
        if draws[..index].contains(n) {
            return Err(SerializationError::InvalidFormat(format!("draw {n} repeated")));
        }
    }
    Ok(())
}

/// Saves that predate per-phase statuses only know whether there is a winner.
fn derived_status(winner: &str) -> SubRoundStatus {
    if winner.is_empty() {
        SubRoundStatus::Ready
    } else {
        SubRoundStatus::Done
    }
}

impl Serializable for SubGameRound {
    type Document = SubRoundDocument;

    fn read<R: Read>(&mut self, reader: &mut R, version: SaveVersion) -> Result<()> {
        let layout = version.layout();
        let kind = SubRoundType::try_from(read_value::<u8, _>(reader)?)?;
        let status = if layout.sub_round_status {
            Some(SubRoundStatus::try_from(read_value::<u8, _>(reader)?)?)
        } else {
            None
        };
        let (value, winner) = if layout.named_winner {
            let value: f64 = read_value(reader)?;
            (value, read_string(reader)?)
        } else {
            let flag: u32 = read_value(reader)?;
            let winner = if flag == 0 { String::new() } else { LEGACY_WINNER.to_string() };
            (0.0, winner)
        };
        let prices = read_string(reader)?;
        let draws = if layout.sub_round_draws {
            read_bytes(reader)?
        } else {
            Vec::new()
        };
        check_draws(&draws)?;
        let (start, end) = if layout.sub_round_times {
            (read_timestamp(reader)?, read_timestamp(reader)?)
        } else {
            (Timestamp::default(), Timestamp::default())
        };

        *self = Self {
            kind,
            status: status.unwrap_or_else(|| derived_status(&winner)),
            prices,
            value,
            winner,
            draws,
            start,
            end,
        };
        Ok(())
    }

    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_value(writer, &(self.kind as u8))?;
        write_value(writer, &(self.status as u8))?;
        write_value(writer, &self.value)?;
        write_string(writer, &self.winner)?;
        write_string(writer, &self.prices)?;
        write_bytes(writer, &self.draws)?;
        write_timestamp(writer, &self.start)?;
        write_timestamp(writer, &self.end)
    }

    fn to_document(&self) -> SubRoundDocument {
        SubRoundDocument {
            kind: self.kind.to_string(),
            prices: self.prices.clone(),
            value: self.value,
            winner: self.winner.clone(),
            draws: self.draws.clone(),
        }
    }

    fn apply_document(&mut self, document: SubRoundDocument) -> Result<()> {
        let kind = document
            .kind
            .parse::<SubRoundType>()
            .map_err(|error| SerializationError::InvalidFormat(error.to_string()))?;
        check_draws(&document.draws)?;
        *self = Self {
            kind,
            status: derived_status(&document.winner),
            prices: document.prices,
            value: document.value,
            winner: document.winner,
            draws: document.draws,
            ..Default::default()
        };
        Ok(())
    }
}
