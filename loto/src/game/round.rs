use chrono::TimeDelta;
use log::{debug, trace, warn};
use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

use super::{
    entities::{Number, RoundStatus, RoundType, Timestamp, elapsed, now},
    sub_round::{SubGameRound, check_draws},
};
use crate::{
    config::LotoConfig,
    io::{
        Result, SaveVersion, Serializable, SerializationError,
        binary::{
            read_bytes, read_count, read_string, read_timestamp, read_value, write_count,
            write_string, write_timestamp, write_value,
        },
        documents::RoundDocument,
        split_legacy_draws,
    },
};

/// Slideshow shown during a pause round.
#[derive(Clone, Debug, PartialEq)]
pub struct Diaporama {
    path: PathBuf,
    delay_secs: f64,
}

impl Diaporama {
    /// Returns `None` when there is nothing to show: an empty path or a
    /// delay that is not strictly positive.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, delay_secs: f64) -> Option<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() || !(delay_secs > 0.0) {
            return None;
        }
        Some(Self { path, delay_secs })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn delay_secs(&self) -> f64 {
        self.delay_secs
    }

    /// Whether the slide shown since `last_switch` has been up long enough.
    #[must_use]
    pub fn is_due(&self, last_switch: Timestamp, now: Timestamp) -> bool {
        let shown = elapsed(last_switch, now).num_milliseconds() as f64 / 1000.0;
        shown >= self.delay_secs
    }
}

/// One complete game ("partie") made of sub-rounds played in order.
///
/// ```text
/// Ready -> Running -> PostScreen -> Done
/// ```
///
/// While `Running`, advances and draws go to the current sub-round: the first
/// one that is not finished. Pause rounds have no sub-rounds and no result
/// screen, they go from `Running` straight to `Done`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRound {
    id: i32,
    kind: RoundType,
    status: RoundStatus,
    sub_rounds: Vec<SubGameRound>,
    start: Timestamp,
    end: Timestamp,
    diaporama: Option<Diaporama>,
}

impl GameRound {
    #[must_use]
    pub fn new(kind: RoundType) -> Self {
        Self {
            id: 0,
            kind,
            status: RoundStatus::Ready,
            sub_rounds: sub_rounds_for(kind),
            start: Timestamp::default(),
            end: Timestamp::default(),
            diaporama: None,
        }
    }

    #[must_use]
    pub fn with_id(kind: RoundType, id: i32) -> Self {
        Self { id, ..Self::new(kind) }
    }

    #[must_use]
    pub fn from_config(config: &LotoConfig) -> Self {
        Self::new(config.default_round_type)
    }

    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        if self.is_editable() {
            self.id = id;
        }
    }

    #[must_use]
    pub fn kind(&self) -> RoundType {
        self.kind
    }

    #[must_use]
    pub fn kind_str(&self) -> String {
        self.kind.to_string()
    }

    /// Changes the kind and rebuilds the sub-rounds from it. Ignored once the
    /// round has started.
    pub fn set_kind(&mut self, kind: RoundType) {
        if !self.is_editable() {
            warn!("cannot retype {} while {}", self.name(), self.status);
            return;
        }
        self.kind = kind;
        self.sub_rounds = sub_rounds_for(kind);
        if kind != RoundType::Pause {
            self.diaporama = None;
        }
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    #[must_use]
    pub fn status_str(&self) -> String {
        self.status.to_string()
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status == RoundStatus::Ready
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == RoundStatus::Done
    }

    #[must_use]
    pub fn sub_rounds(&self) -> &[SubGameRound] {
        &self.sub_rounds
    }

    /// Mutable access for prize configuration.
    pub fn sub_round_mut(&mut self, index: usize) -> Option<&mut SubGameRound> {
        self.sub_rounds.get_mut(index)
    }

    #[must_use]
    pub fn current_sub_round_index(&self) -> Option<usize> {
        self.sub_rounds.iter().position(|sub| !sub.is_finished())
    }

    #[must_use]
    pub fn current_sub_round(&self) -> Option<&SubGameRound> {
        self.sub_rounds.iter().find(|sub| !sub.is_finished())
    }

    fn current_sub_round_mut(&mut self) -> Option<&mut SubGameRound> {
        self.sub_rounds.iter_mut().find(|sub| !sub.is_finished())
    }

    #[must_use]
    pub fn is_current_sub_round_last(&self) -> bool {
        match self.sub_rounds.as_slice() {
            [.., before_last, last] => before_last.is_finished() && !last.is_finished(),
            _ => true,
        }
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        elapsed(self.start, self.end)
    }

    #[must_use]
    pub fn diaporama(&self) -> Option<&Diaporama> {
        self.diaporama.as_ref()
    }

    /// Sets the pause slideshow. A non-positive delay clears it. Ignored on
    /// rounds that are not pauses.
    pub fn set_diapo(&mut self, path: impl Into<PathBuf>, delay_secs: f64) {
        if self.kind != RoundType::Pause {
            warn!("slideshow ignored on {}", self.name());
            return;
        }
        self.diaporama = Diaporama::new(path, delay_secs);
    }

    pub fn set_default_diapo(&mut self, path: impl Into<PathBuf>, config: &LotoConfig) {
        self.set_diapo(path, config.diaporama_delay_secs);
    }

    /// `Ready -> Running`, then moves the first sub-round out of `Ready`.
    pub fn start_game_round(&mut self) -> bool {
        if self.status != RoundStatus::Ready {
            return false;
        }
        self.start = now();
        self.status = RoundStatus::Running;
        debug!("{} started", self.name());
        if let Some(sub) = self.current_sub_round_mut() {
            sub.next_status();
        }
        true
    }

    /// Advances one step. Returns whether anything moved.
    pub fn next_status(&mut self) -> bool {
        match self.status {
            RoundStatus::Ready => self.start_game_round(),
            RoundStatus::Running => match self.current_sub_round_mut() {
                Some(sub) => sub.next_status(),
                None => {
                    self.end = now().max(self.start + TimeDelta::nanoseconds(1));
                    self.status = if self.kind == RoundType::Pause {
                        RoundStatus::Done
                    } else {
                        RoundStatus::PostScreen
                    };
                    debug!("{} -> {}", self.name(), self.status);
                    true
                }
            },
            RoundStatus::PostScreen => {
                self.status = RoundStatus::Done;
                debug!("{} -> {}", self.name(), self.status);
                true
            }
            RoundStatus::Done => {
                trace!("{} already done", self.name());
                false
            }
        }
    }

    /// Forwards a draw to the current sub-round. The number must not have
    /// been drawn earlier in this round.
    pub fn add_picked_number(&mut self, number: Number) -> bool {
        if self.status != RoundStatus::Running || self.all_draws().contains(&number) {
            return false;
        }
        self.current_sub_round_mut()
            .is_some_and(|sub| sub.add_picked_number(number))
    }

    pub fn remove_last_pick(&mut self) -> Option<Number> {
        if self.status != RoundStatus::Running {
            return None;
        }
        self.current_sub_round_mut()?.remove_last_pick()
    }

    /// Names the winner of the current sub-round. Closing the last sub-round
    /// moves the round to its result screen.
    pub fn add_winner(&mut self, name: impl Into<String>) -> bool {
        if self.status != RoundStatus::Running {
            return false;
        }
        let closed = self
            .current_sub_round_mut()
            .is_some_and(|sub| sub.set_winner(name));
        if closed && self.current_sub_round().is_none() {
            self.next_status();
        }
        closed
    }

    /// Title shown to the audience, e.g. `"Partie 3 Gros lot"`.
    #[must_use]
    pub fn name(&self) -> String {
        let mut name = String::from("Partie");
        if self.id > 0 {
            name.push_str(&format!(" {}", self.id));
        }
        if self.kind != RoundType::OneTwoQuineFullCard {
            name.push_str(&format!(" {}", self.kind));
        }
        name
    }

    #[must_use]
    pub fn state_string(&self) -> String {
        match (self.status, self.current_sub_round()) {
            (RoundStatus::Running, Some(sub)) => format!("{} - {}", sub.kind(), sub.status()),
            (status, _) => status.to_string(),
        }
    }

    #[must_use]
    pub fn all_draws(&self) -> Vec<Number> {
        self.sub_rounds
            .iter()
            .flat_map(|sub| sub.draws().iter().copied())
            .collect()
    }

    #[must_use]
    pub fn draws_count(&self) -> usize {
        self.sub_rounds.iter().map(|sub| sub.draws().len()).sum()
    }

    /// The draw `remove_last_pick` would cancel, if any.
    #[must_use]
    pub fn last_cancelable_draw(&self) -> Option<Number> {
        if self.status != RoundStatus::Running {
            return None;
        }
        self.current_sub_round()
            .filter(|sub| sub.is_running())
            .and_then(|sub| sub.draws().last().copied())
    }

    /// One `"<sub-round>: n n n"` line per sub-round that has draws.
    #[must_use]
    pub fn draw_str(&self) -> String {
        let mut result = String::new();
        for sub in self.sub_rounds.iter().take_while(|sub| !sub.empty_draws()) {
            let draws: Vec<String> = sub.draws().iter().map(Number::to_string).collect();
            result.push_str(&format!("{}: {}\n", sub.kind(), draws.join(" ")));
        }
        result
    }

    /// One `"<sub-round>: <winner>"` line per sub-round already won.
    #[must_use]
    pub fn winner_str(&self) -> String {
        let mut result = String::new();
        for sub in self.sub_rounds.iter().take_while(|sub| sub.has_winner()) {
            result.push_str(&format!("{}: {}\n", sub.kind(), sub.winner()));
        }
        result
    }
}

impl Default for GameRound {
    fn default() -> Self {
        Self::new(RoundType::default())
    }
}

fn sub_rounds_for(kind: RoundType) -> Vec<SubGameRound> {
    kind.sub_round_types()
        .iter()
        .map(|sub_kind| SubGameRound::new(*sub_kind, "", 0.0))
        .collect()
}

impl Serializable for GameRound {
    type Document = RoundDocument;

    fn read<R: Read>(&mut self, reader: &mut R, version: SaveVersion) -> Result<()> {
        let layout = version.layout();
        let id: i32 = if layout.round_id { read_value(reader)? } else { 0 };
        let kind = RoundType::try_from(read_value::<u8, _>(reader)?)?;
        let status = RoundStatus::try_from(read_value::<u8, _>(reader)?)?;
        let start = read_timestamp(reader)?;
        let end = read_timestamp(reader)?;
        let legacy_draws = if layout.round_draws {
            Some(read_bytes(reader)?)
        } else {
            None
        };

        let count = read_count(reader)?;
        let mut sub_rounds = Vec::with_capacity(count.min(16));
        for _ in 0..count {
            let mut sub = SubGameRound::default();
            sub.read(reader, version)?;
            sub_rounds.push(sub);
        }

        if let Some(draws) = legacy_draws.filter(|draws| !draws.is_empty()) {
            check_draws(&draws)?;
            if sub_rounds.is_empty() {
                warn!("dropping {} draws of a round without sub-rounds", draws.len());
            } else {
                let parts = split_legacy_draws(&draws, sub_rounds.len());
                for (sub, part) in sub_rounds.iter_mut().zip(parts) {
                    sub.set_legacy_draws(part);
                }
            }
        }

        let round_draws: Vec<Number> = sub_rounds
            .iter()
            .flat_map(|sub| sub.draws().iter().copied())
            .collect();
        check_draws(&round_draws)?;

        let diaporama = if kind == RoundType::Pause && layout.diaporama {
            let path = read_string(reader)?;
            if path.is_empty() {
                None
            } else {
                let delay: f64 = read_value(reader)?;
                Diaporama::new(path, delay)
            }
        } else {
            None
        };

        *self = Self {
            id,
            kind,
            status,
            sub_rounds,
            start,
            end,
            diaporama,
        };
        Ok(())
    }

    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_value(writer, &self.id)?;
        write_value(writer, &(self.kind as u8))?;
        write_value(writer, &(self.status as u8))?;
        write_timestamp(writer, &self.start)?;
        write_timestamp(writer, &self.end)?;
        write_count(writer, self.sub_rounds.len())?;
        for sub in &self.sub_rounds {
            sub.write(writer)?;
        }
        if self.kind == RoundType::Pause {
            match &self.diaporama {
                Some(diaporama) => {
                    write_string(writer, &diaporama.path.to_string_lossy())?;
                    write_value(writer, &diaporama.delay_secs)?;
                }
                None => write_string(writer, "")?,
            }
        }
        Ok(())
    }

    fn to_document(&self) -> RoundDocument {
        RoundDocument {
            kind: self.kind.to_string(),
            id: self.id,
            sub_games: self.sub_rounds.iter().map(SubGameRound::to_document).collect(),
        }
    }

    /// Rebuilds a fresh `Ready` round. The listed sub-rounds must match the
    /// ones the round kind calls for; an empty list keeps the defaults.
    fn apply_document(&mut self, document: RoundDocument) -> Result<()> {
        let kind = document
            .kind
            .parse::<RoundType>()
            .map_err(|error| SerializationError::InvalidFormat(error.to_string()))?;
        let mut round = Self::with_id(kind, document.id);
        if !document.sub_games.is_empty() {
            if document.sub_games.len() != round.sub_rounds.len() {
                return Err(SerializationError::InvalidFormat(format!(
                    "{} expects {} sub-rounds, got {}",
                    round.name(),
                    round.sub_rounds.len(),
                    document.sub_games.len()
                )));
            }
            for (sub, sub_document) in round.sub_rounds.iter_mut().zip(document.sub_games) {
                let expected = sub.kind();
                sub.apply_document(sub_document)?;
                if sub.kind() != expected {
                    return Err(SerializationError::InvalidFormat(format!(
                        "expected a {expected} sub-round, got {}",
                        sub.kind()
                    )));
                }
            }
        }
        *self = round;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{SubRoundStatus, SubRoundType};
    use std::io::Cursor;

    fn running(kind: RoundType) -> GameRound {
        let mut round = GameRound::new(kind);
        assert!(round.start_game_round());
        round
    }

    #[test]
    fn test_types() {
        assert_eq!(GameRound::default().kind(), RoundType::OneTwoQuineFullCard);
        assert_eq!(GameRound::default().sub_rounds().len(), 3);
        assert_eq!(GameRound::new(RoundType::OneQuineFullCard).sub_rounds().len(), 2);
        assert!(GameRound::new(RoundType::Pause).sub_rounds().is_empty());
        assert_eq!(GameRound::new(RoundType::Enfant).kind_str(), "Enfant");
    }

    #[test]
    fn test_set_kind_only_when_ready() {
        let mut round = GameRound::new(RoundType::OneQuine);
        round.set_kind(RoundType::OneTwoQuineFullCard);
        assert_eq!(round.sub_rounds().len(), 3);
        round.start_game_round();
        round.set_kind(RoundType::Pause);
        assert_eq!(round.kind(), RoundType::OneTwoQuineFullCard);
        assert_eq!(round.sub_rounds().len(), 3);
    }

    #[test]
    fn test_full_flow() {
        let mut round = GameRound::default();
        assert_eq!(round.status_str(), "prêt");
        assert!(round.current_sub_round().is_some());
        assert!(!round.add_picked_number(12));

        round.next_status();
        assert_eq!(round.status(), RoundStatus::Running);
        assert_eq!(round.sub_rounds()[0].status(), SubRoundStatus::Running);
        assert!(!round.is_current_sub_round_last());

        for n in [5, 78, 45, 23] {
            assert!(round.add_picked_number(n));
        }
        assert!(!round.add_picked_number(5));
        assert!(round.add_winner("Alice"));
        assert_eq!(round.current_sub_round_index(), Some(1));
        assert_eq!(round.sub_rounds()[1].status(), SubRoundStatus::Ready);

        round.next_status();
        assert_eq!(round.sub_rounds()[1].status(), SubRoundStatus::Running);
        round.add_picked_number(6);
        round.add_winner("Bob");
        assert!(round.is_current_sub_round_last());

        round.next_status();
        round.add_picked_number(7);
        assert!(round.add_winner("Chloé"));
        assert_eq!(round.status(), RoundStatus::PostScreen);
        assert!(round.end() > round.start());

        assert_eq!(
            round.draw_str(),
            "simple quine: 5 78 45 23\ndouble quine: 6\ncarton plein: 7\n"
        );
        assert_eq!(
            round.winner_str(),
            "simple quine: Alice\ndouble quine: Bob\ncarton plein: Chloé\n"
        );
        assert_eq!(round.draws_count(), 6);

        round.next_status();
        assert!(round.is_finished());
        assert!(!round.next_status());
    }

    #[test]
    fn test_next_status_needs_winner() {
        let mut round = running(RoundType::OneQuine);
        assert!(!round.next_status());
        assert_eq!(round.status(), RoundStatus::Running);
    }

    #[test]
    fn test_pause_skips_post_screen() {
        let mut round = GameRound::new(RoundType::Pause);
        round.next_status();
        assert_eq!(round.status(), RoundStatus::Running);
        assert!(!round.add_winner("nobody"));
        round.next_status();
        assert_eq!(round.status(), RoundStatus::Done);
    }

    #[test]
    fn test_draws_only_when_running() {
        let mut round = GameRound::new(RoundType::FullCard);
        assert!(!round.add_picked_number(4));
        round.start_game_round();
        assert!(round.add_picked_number(4));
        assert!(round.add_picked_number(9));
        assert_eq!(round.last_cancelable_draw(), Some(9));
        assert_eq!(round.remove_last_pick(), Some(9));
        round.add_winner("Alice");
        assert_eq!(round.last_cancelable_draw(), None);
        assert_eq!(round.remove_last_pick(), None);
        assert_eq!(round.all_draws(), vec![4]);
    }

    #[test]
    fn test_prescreen_blocks_draws() {
        let mut round = GameRound::new(RoundType::OneQuine);
        round.sub_round_mut(0).unwrap().set_prices("un panier garni");
        round.start_game_round();
        assert_eq!(round.sub_rounds()[0].status(), SubRoundStatus::PreScreen);
        assert!(!round.add_picked_number(3));
        round.next_status();
        assert!(round.add_picked_number(3));
    }

    #[test]
    fn test_name() {
        assert_eq!(GameRound::default().name(), "Partie");
        assert_eq!(GameRound::with_id(RoundType::OneTwoQuineFullCard, 2).name(), "Partie 2");
        assert_eq!(GameRound::with_id(RoundType::FullCard, 3).name(), "Partie 3 Gros lot");
        assert_eq!(GameRound::new(RoundType::Enfant).name(), "Partie Enfant");
    }

    #[test]
    fn test_state_string() {
        let mut round = GameRound::new(RoundType::OneQuine);
        assert_eq!(round.state_string(), "prêt");
        round.start_game_round();
        assert_eq!(round.state_string(), "simple quine - en cours");
    }

    #[test]
    fn test_current_sub_round_last() {
        let mut round = GameRound::new(RoundType::OneQuineFullCard);
        assert!(!round.is_current_sub_round_last());
        round.start_game_round();
        round.add_winner("Alice");
        assert!(round.is_current_sub_round_last());
        assert!(GameRound::new(RoundType::Pause).is_current_sub_round_last());
    }

    #[test]
    fn test_diaporama() {
        let mut round = GameRound::new(RoundType::Pause);
        round.set_diapo("/srv/slides", 0.0);
        assert!(round.diaporama().is_none());
        round.set_diapo("/srv/slides", 4.5);
        assert_eq!(round.diaporama().unwrap().delay_secs(), 4.5);

        let mut game = GameRound::new(RoundType::FullCard);
        game.set_diapo("/srv/slides", 4.5);
        assert!(game.diaporama().is_none());
    }

    #[test]
    fn test_diaporama_is_due() {
        let diaporama = Diaporama::new("slides", 2.0).unwrap();
        let shown = now();
        assert!(!diaporama.is_due(shown, shown + TimeDelta::milliseconds(1999)));
        assert!(diaporama.is_due(shown, shown + TimeDelta::seconds(2)));
        assert!(Diaporama::new("", 2.0).is_none());
        assert!(Diaporama::new("slides", f64::NAN).is_none());
    }

    #[test]
    fn test_binary_round_trip() {
        let mut round = GameRound::with_id(RoundType::OneQuineFullCard, 7);
        round.sub_round_mut(1).unwrap().set_prices("Un téléviseur\n55 pouces");
        round.start_game_round();
        round.add_picked_number(33);
        round.add_winner("Alice");

        let mut buf = Vec::new();
        round.write(&mut buf).unwrap();
        let mut read = GameRound::default();
        read.read(&mut Cursor::new(buf), SaveVersion::current()).unwrap();
        assert_eq!(read, round);
    }

    #[test]
    fn test_pause_round_trip() {
        let mut pause = GameRound::new(RoundType::Pause);
        pause.set_diapo("photos/été", 3.0);
        let mut buf = Vec::new();
        pause.write(&mut buf).unwrap();
        let mut read = GameRound::default();
        read.read(&mut Cursor::new(buf), SaveVersion::current()).unwrap();
        assert_eq!(read.diaporama(), pause.diaporama());

        let bare = GameRound::new(RoundType::Pause);
        let mut buf = Vec::new();
        bare.write(&mut buf).unwrap();
        read.read(&mut Cursor::new(buf), SaveVersion::current()).unwrap();
        assert!(read.diaporama().is_none());
        assert_eq!(read.kind(), RoundType::Pause);
    }

    #[test]
    fn test_legacy_draws_split() {
        let mut buf = Vec::new();
        write_value(&mut buf, &(RoundType::OneQuineFullCard as u8)).unwrap();
        write_value(&mut buf, &(RoundStatus::Done as u8)).unwrap();
        write_timestamp(&mut buf, &Timestamp::default()).unwrap();
        write_timestamp(&mut buf, &Timestamp::default()).unwrap();
        crate::io::binary::write_bytes(&mut buf, &[1, 2, 3, 4, 5]).unwrap();
        write_count(&mut buf, 2).unwrap();
        for kind in [SubRoundType::OneQuine, SubRoundType::FullCard] {
            write_value(&mut buf, &(kind as u8)).unwrap();
            write_value(&mut buf, &1u32).unwrap();
            write_string(&mut buf, "").unwrap();
        }

        let mut round = GameRound::default();
        round.read(&mut Cursor::new(buf), SaveVersion::V2).unwrap();
        assert_eq!(round.id(), 0);
        assert_eq!(round.status(), RoundStatus::Done);
        assert_eq!(round.sub_rounds()[0].draws(), &[1, 2, 3]);
        assert_eq!(round.sub_rounds()[1].draws(), &[4, 5]);
        assert!(round.sub_rounds().iter().all(SubGameRound::is_finished));
    }

    fn legacy_round(draws: &[Number]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_value(&mut buf, &(RoundType::OneQuineFullCard as u8)).unwrap();
        write_value(&mut buf, &(RoundStatus::Running as u8)).unwrap();
        write_timestamp(&mut buf, &Timestamp::default()).unwrap();
        write_timestamp(&mut buf, &Timestamp::default()).unwrap();
        crate::io::binary::write_bytes(&mut buf, draws).unwrap();
        write_count(&mut buf, 2).unwrap();
        for kind in [SubRoundType::OneQuine, SubRoundType::FullCard] {
            write_value(&mut buf, &(kind as u8)).unwrap();
            write_value(&mut buf, &0u32).unwrap();
            write_string(&mut buf, "").unwrap();
        }
        buf
    }

    #[test]
    fn test_legacy_draws_validated() {
        let rejected: [&[Number]; 3] = [&[0, 7], &[7, 200], &[7, 8, 7, 9]];
        for draws in rejected {
            let mut round = GameRound::with_id(RoundType::Inverse, 3);
            let before = round.clone();
            let err = round
                .read(&mut Cursor::new(legacy_round(draws)), SaveVersion::V2)
                .unwrap_err();
            assert!(matches!(err, SerializationError::InvalidFormat(_)));
            assert_eq!(round, before);
        }

        let mut round = GameRound::default();
        round
            .read(&mut Cursor::new(legacy_round(&[7, 8, 9])), SaveVersion::V2)
            .unwrap();
        assert_eq!(round.all_draws(), vec![7, 8, 9]);
    }

    #[test]
    fn test_draws_repeated_across_sub_rounds_rejected() {
        let mut round = GameRound::new(RoundType::OneQuineFullCard);
        round.sub_round_mut(0).unwrap().set_legacy_draws(vec![12, 40]);
        round.sub_round_mut(1).unwrap().set_legacy_draws(vec![13, 12]);
        let mut buf = Vec::new();
        round.write(&mut buf).unwrap();

        let mut read = GameRound::default();
        let err = read.read(&mut Cursor::new(buf), SaveVersion::current()).unwrap_err();
        assert!(matches!(err, SerializationError::InvalidFormat(_)));
        assert_eq!(read, GameRound::default());
    }

    #[test]
    fn test_document_round_trip() {
        let mut round = GameRound::with_id(RoundType::OneTwoQuineFullCard, 4);
        round.sub_round_mut(2).unwrap().set_prices("Un vélo");
        round.sub_round_mut(2).unwrap().set_value(250.0);

        let mut imported = GameRound::new(RoundType::Pause);
        imported.from_json(round.to_json().unwrap()).unwrap();
        assert_eq!(imported, round);

        let mut from_yaml = GameRound::new(RoundType::Pause);
        from_yaml.from_yaml(round.to_yaml().unwrap()).unwrap();
        assert_eq!(from_yaml, round);
    }

    #[test]
    fn test_document_mismatch_rejected() {
        let mut round = GameRound::new(RoundType::Pause);
        let json = serde_json::json!({
            "type": "Gros lot",
            "Id": 1,
            "subGames": [
                {"type": "carton plein"},
                {"type": "carton plein"}
            ]
        });
        assert!(round.from_json(json).is_err());
        assert_eq!(round.kind(), RoundType::Pause);
    }
}
