use log::{debug, info, trace, warn};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use super::{
    entities::{EventStatus, Number, RoundStatus, RoundType, Timestamp, now},
    round::GameRound,
    statistics::Statistics,
};
use crate::io::{
    Result, SaveVersion, Serializable,
    binary::{
        read_count, read_string, read_timestamp, read_value, write_count, write_string,
        write_timestamp, write_value,
    },
    documents::EventDocument,
};

/// A whole loto session: who runs it, what is played and where it stands.
///
/// ```text
/// Invalid <-> MissingParties <-> Ready -> EventStarting -> GameRunning -> EventEnding -> Finished
///                                                ^              |
///                                                +- DisplayRules+
/// ```
///
/// The first three states are editing states, re-derived after every edit.
/// Once started, [`next_state`](Self::next_state) is the only driver and the
/// rounds can no longer be added, removed or reordered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    status: EventStatus,
    previous_status: EventStatus,
    organizer_name: String,
    organizer_logo: PathBuf,
    name: String,
    logo: PathBuf,
    location: String,
    rules: String,
    rounds: Vec<GameRound>,
    start: Timestamp,
    end: Timestamp,
    base_path: PathBuf,
    changed: bool,
}

impl Event {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a binary save. Logo paths resolve against the file's folder.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut event = Self::default();
        event.set_base_path(path);
        let mut reader = BufReader::new(File::open(path)?);
        event.read(&mut reader, SaveVersion::current())?;
        info!("loaded event {:?} from {}", event.name, path.display());
        Ok(event)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Saves to a new location, rebasing relative logo paths on it first.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.set_base_path(path.as_ref());
        self.save(path)
    }

    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, &self.to_document())?;
        writer.flush()?;
        Ok(())
    }

    pub fn import_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        self.from_json(value)
    }

    pub fn export_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_yaml::to_writer(&mut writer, &self.to_document())?;
        writer.flush()?;
        Ok(())
    }

    pub fn import_yaml(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let value: serde_yaml::Value = serde_yaml::from_reader(reader)?;
        self.from_yaml(value)
    }

    // ---- status ----

    #[must_use]
    pub fn status(&self) -> EventStatus {
        self.status
    }

    #[must_use]
    pub fn status_str(&self) -> String {
        self.status.to_string()
    }

    /// Status restored when the rules overlay closes.
    #[must_use]
    pub fn previous_status(&self) -> EventStatus {
        self.previous_status
    }

    /// Status line for the operator, with the current round while playing.
    #[must_use]
    pub fn state_string(&self) -> String {
        match (self.status, self.current_round()) {
            (EventStatus::GameRunning, Some(round)) => {
                format!("{} - {}: {}", self.status, round.name(), round.state_string())
            }
            (status, _) => status.to_string(),
        }
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == EventStatus::Finished
    }

    /// Returns and clears the "needs redraw" flag.
    pub fn check_state_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Share of rounds already done, between 0 and 1.
    #[must_use]
    pub fn progression(&self) -> f64 {
        if self.rounds.is_empty() {
            return 0.0;
        }
        let done = self.rounds.iter().filter(|round| round.is_finished()).count();
        done as f64 / self.rounds.len() as f64
    }

    /// Whether a number can be drawn right now.
    #[must_use]
    pub fn can_draw(&self) -> bool {
        self.status == EventStatus::GameRunning
            && self.current_round().is_some_and(|round| {
                round.status() == RoundStatus::Running
                    && round.current_sub_round().is_some_and(|sub| sub.is_running())
            })
    }

    fn check_valid_config(&mut self) {
        self.status = if self.organizer_name.is_empty() || self.name.is_empty() {
            EventStatus::Invalid
        } else if self.rounds.is_empty() {
            EventStatus::MissingParties
        } else {
            EventStatus::Ready
        };
        self.previous_status = self.status;
    }

    fn change_status(&mut self, next: EventStatus) {
        info!("event {:?}: {} -> {}", self.name, self.status, next);
        self.status = next;
        self.changed = true;
    }

    // ---- identity ----

    #[must_use]
    pub fn organizer_name(&self) -> &str {
        &self.organizer_name
    }

    pub fn set_organizer_name(&mut self, name: impl Into<String>) {
        if self.reject_edit("organizer name") {
            return;
        }
        self.organizer_name = name.into();
        self.check_valid_config();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.reject_edit("name") {
            return;
        }
        self.name = name.into();
        self.check_valid_config();
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        if self.reject_edit("location") {
            return;
        }
        self.location = location.into();
        self.check_valid_config();
    }

    #[must_use]
    pub fn rules(&self) -> &str {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: impl Into<String>) {
        if self.reject_edit("rules") {
            return;
        }
        self.rules = rules.into();
        self.check_valid_config();
    }

    /// Logo as stored, relative to [`base_path`](Self::base_path) when possible.
    #[must_use]
    pub fn logo(&self) -> &Path {
        &self.logo
    }

    #[must_use]
    pub fn logo_full(&self) -> PathBuf {
        self.full_path(&self.logo)
    }

    pub fn set_logo(&mut self, logo: impl AsRef<Path>) {
        if self.reject_edit("logo") {
            return;
        }
        self.logo = self.relative_path(logo.as_ref());
        self.check_valid_config();
    }

    #[must_use]
    pub fn organizer_logo(&self) -> &Path {
        &self.organizer_logo
    }

    #[must_use]
    pub fn organizer_logo_full(&self) -> PathBuf {
        self.full_path(&self.organizer_logo)
    }

    pub fn set_organizer_logo(&mut self, logo: impl AsRef<Path>) {
        if self.reject_edit("organizer logo") {
            return;
        }
        self.organizer_logo = self.relative_path(logo.as_ref());
        self.check_valid_config();
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Moves the folder logos are resolved against. `path` may be the save
    /// file itself, in which case its parent folder is used. Both logos keep
    /// pointing at the same files.
    pub fn set_base_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let logo = self.logo_full();
        let organizer_logo = self.organizer_logo_full();
        self.base_path = if path.is_dir() {
            path.to_path_buf()
        } else {
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        };
        self.logo = self.relative_path(&logo);
        self.organizer_logo = self.relative_path(&organizer_logo);
        debug!("event base path is now {}", self.base_path.display());
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        if path.as_os_str().is_empty() {
            PathBuf::new()
        } else {
            self.base_path.join(path)
        }
    }

    /// Paths outside of the base folder stay absolute.
    fn relative_path(&self, path: &Path) -> PathBuf {
        if path.as_os_str().is_empty()
            || path.is_relative()
            || self.base_path.as_os_str().is_empty()
        {
            return path.to_path_buf();
        }
        path.strip_prefix(&self.base_path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    fn reject_edit(&self, what: &str) -> bool {
        if self.is_editable() {
            return false;
        }
        warn!("cannot change the {what} of event {:?} while {}", self.name, self.status);
        true
    }

    // ---- rounds ----

    #[must_use]
    pub fn rounds(&self) -> &[GameRound] {
        &self.rounds
    }

    #[must_use]
    pub fn rounds_len(&self) -> usize {
        self.rounds.len()
    }

    #[must_use]
    pub fn round(&self, index: usize) -> Option<&GameRound> {
        self.rounds.get(index)
    }

    /// Mutable access to a round for configuration. `None` once the event
    /// has started.
    pub fn round_mut(&mut self, index: usize) -> Option<&mut GameRound> {
        if self.reject_edit("rounds") {
            return None;
        }
        self.rounds.get_mut(index)
    }

    pub fn push_game_round(&mut self, round: GameRound) {
        if self.reject_edit("rounds") {
            return;
        }
        self.rounds.push(round);
        self.check_valid_config();
    }

    /// Out-of-range indices are ignored.
    pub fn delete_round_by_index(&mut self, index: usize) {
        if self.reject_edit("rounds") || index >= self.rounds.len() {
            return;
        }
        self.rounds.remove(index);
        self.check_valid_config();
    }

    /// Out-of-range indices are ignored.
    pub fn swap_round_by_index(&mut self, first: usize, second: usize) {
        if self.reject_edit("rounds") || first.max(second) >= self.rounds.len() {
            return;
        }
        self.rounds.swap(first, second);
    }

    /// Index of the first round not done yet.
    #[must_use]
    pub fn current_round_index(&self) -> Option<usize> {
        self.rounds.iter().position(|round| !round.is_finished())
    }

    #[must_use]
    pub fn current_round(&self) -> Option<&GameRound> {
        self.rounds.iter().find(|round| !round.is_finished())
    }

    pub fn current_round_mut(&mut self) -> Option<&mut GameRound> {
        self.rounds.iter_mut().find(|round| !round.is_finished())
    }

    /// The round played after the current one.
    #[must_use]
    pub fn next_round(&self) -> Option<&GameRound> {
        self.current_round_index()
            .and_then(|index| self.rounds.get(index + 1))
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    // ---- flow ----

    /// Moves the event one step forward.
    ///
    /// A round finished by this step immediately hands over to the next one,
    /// or closes the game phase when it was the last. Each iteration either
    /// finishes a round or stops, so the loop runs at most once per round.
    pub fn next_state(&mut self) {
        while self.step() {}
    }

    /// One transition. Returns whether a round just finished and the
    /// advance should carry on.
    fn step(&mut self) -> bool {
        match self.status {
            EventStatus::Invalid | EventStatus::MissingParties => {
                self.check_valid_config();
                false
            }
            EventStatus::Ready => {
                self.start = now();
                self.change_status(EventStatus::EventStarting);
                false
            }
            EventStatus::EventStarting => {
                if let Some(round) = self.current_round_mut() {
                    round.start_game_round();
                }
                self.change_status(EventStatus::GameRunning);
                false
            }
            EventStatus::DisplayRules => {
                let back = if self.previous_status == EventStatus::EventEnding {
                    EventStatus::EventEnding
                } else {
                    EventStatus::GameRunning
                };
                self.change_status(back);
                false
            }
            EventStatus::GameRunning => {
                let Some(round) = self.current_round_mut() else {
                    self.change_status(EventStatus::EventEnding);
                    return false;
                };
                let advanced = round.next_status();
                let finished = round.is_finished();
                if advanced {
                    self.changed = true;
                }
                if finished {
                    self.end = now();
                }
                finished
            }
            EventStatus::EventEnding => {
                self.change_status(EventStatus::Finished);
                false
            }
            EventStatus::Finished => {
                trace!("event {:?} is finished", self.name);
                false
            }
        }
    }

    /// Names the winner of the current sub-round. Returns whether it was
    /// accepted.
    ///
    /// Closing the last sub-round of the last round ends the game phase
    /// right away. Earlier rounds stay on their result screen until the
    /// next [`next_state`](Self::next_state).
    pub fn add_winner_to_current_round(&mut self, name: impl Into<String>) -> bool {
        if self.status != EventStatus::GameRunning {
            return false;
        }
        let is_last = self
            .current_round_index()
            .is_some_and(|index| index + 1 == self.rounds.len());
        let Some(round) = self.current_round_mut() else {
            return false;
        };
        let accepted = round.add_winner(name);
        let closed = round.status() == RoundStatus::PostScreen;
        if accepted {
            self.changed = true;
            if closed && is_last {
                self.next_state();
            }
        }
        accepted
    }

    /// Toggles the rules overlay. Ignored while editing and once finished.
    pub fn display_rules(&mut self) {
        match self.status {
            s if s.is_editable() || s == EventStatus::Finished => {
                trace!("rules overlay not available while {s}");
            }
            EventStatus::DisplayRules => self.change_status(self.previous_status),
            current => {
                self.previous_status = current;
                self.change_status(EventStatus::DisplayRules);
            }
        }
    }

    /// Records a draw on the current sub-round.
    pub fn add_picked_number(&mut self, number: Number) -> bool {
        if !self.can_draw() {
            return false;
        }
        let added = self
            .current_round_mut()
            .is_some_and(|round| round.add_picked_number(number));
        self.changed |= added;
        added
    }

    pub fn remove_last_pick(&mut self) -> Option<Number> {
        if self.status != EventStatus::GameRunning {
            return None;
        }
        let removed = self.current_round_mut()?.remove_last_pick();
        self.changed |= removed.is_some();
        removed
    }

    /// Statistics over the rounds played so far. Pause rounds never count;
    /// children's rounds are skipped when `without_child` is set.
    #[must_use]
    pub fn stats(&self, without_child: bool) -> Statistics {
        let mut stats = Statistics::default();
        let counted = self
            .rounds
            .iter()
            .take_while(|round| round.status() != RoundStatus::Ready)
            .filter(|round| match round.kind() {
                RoundType::Pause => false,
                RoundType::Enfant => !without_child,
                _ => true,
            });
        for round in counted {
            stats.push_round(round);
        }
        stats
    }
}

impl Serializable for Event {
    type Document = EventDocument;

    /// Reads a full save. The stream's own header picks the layout;
    /// `version` is the newest layout accepted. Newer saves leave a blank
    /// event behind.
    fn read<R: Read>(&mut self, reader: &mut R, version: SaveVersion) -> Result<()> {
        let raw: u16 = read_value(reader)?;
        let base_path = self.base_path.clone();
        let stream_version = match SaveVersion::from_raw(raw) {
            Some(stream_version) if stream_version <= version => stream_version,
            _ => {
                warn!("save version {raw} is newer than {version}, nothing loaded");
                *self = Self {
                    base_path,
                    ..Default::default()
                };
                return Ok(());
            }
        };
        let layout = stream_version.layout();

        let status = EventStatus::try_from(read_value::<u32, _>(reader)?)?;
        let organizer_name = read_string(reader)?;
        let organizer_logo = PathBuf::from(read_string(reader)?);
        let name = read_string(reader)?;
        let logo = PathBuf::from(read_string(reader)?);
        let location = read_string(reader)?;
        let rules = if layout.rules {
            read_string(reader)?
        } else {
            String::new()
        };
        if layout.sanity_rules {
            read_string(reader)?;
        }

        let count = read_count(reader)?;
        let mut rounds = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            let mut round = GameRound::default();
            round.read(reader, stream_version)?;
            rounds.push(round);
        }
        let start = read_timestamp(reader)?;
        let end = read_timestamp(reader)?;

        let previous_status = if status == EventStatus::DisplayRules {
            EventStatus::GameRunning
        } else {
            status
        };
        debug!("read {stream_version} save with {} rounds", rounds.len());
        *self = Self {
            status,
            previous_status,
            organizer_name,
            organizer_logo,
            name,
            logo,
            location,
            rules,
            rounds,
            start,
            end,
            base_path,
            changed: true,
        };
        Ok(())
    }

    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_value(writer, &SaveVersion::current().raw())?;
        write_value(writer, &(self.status as u32))?;
        write_string(writer, &self.organizer_name)?;
        write_string(writer, &self.organizer_logo.to_string_lossy())?;
        write_string(writer, &self.name)?;
        write_string(writer, &self.logo.to_string_lossy())?;
        write_string(writer, &self.location)?;
        write_string(writer, &self.rules)?;
        write_count(writer, self.rounds.len())?;
        for round in &self.rounds {
            round.write(writer)?;
        }
        write_timestamp(writer, &self.start)?;
        write_timestamp(writer, &self.end)
    }

    fn to_document(&self) -> EventDocument {
        EventDocument {
            rounds: self.rounds.iter().map(GameRound::to_document).collect(),
        }
    }

    /// Replaces the rounds with fresh ones. Ignored once the event started.
    fn apply_document(&mut self, document: EventDocument) -> Result<()> {
        if self.reject_edit("rounds") {
            return Ok(());
        }
        let mut rounds = Vec::with_capacity(document.rounds.len());
        for round_document in document.rounds {
            let mut round = GameRound::default();
            round.apply_document(round_document)?;
            rounds.push(round);
        }
        self.rounds = rounds;
        self.changed = true;
        self.check_valid_config();
        Ok(())
    }
}
