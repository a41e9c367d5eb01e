use log::debug;
use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};
use thiserror::Error;

use super::{
    constants::{LINES_PER_CARD, NUMBERS_PER_CARD, NUMBERS_PER_LINE, is_valid_number},
    entities::Number,
    rng::RandomNumberGenerator,
};
use crate::{
    config::LotoConfig,
    io::{
        Result, SaveVersion, Serializable, SerializationError,
        binary::{read_count, read_string, read_value, write_count, write_string, write_value},
        documents::CardPackDocument,
    },
};

/// Number of `;`-separated fields in the text form of a card.
const CARD_FIELDS: usize = 2 + LINES_PER_CARD * (NUMBERS_PER_LINE + 1) + 1;

/// Errors from parsing the text form of a card
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("card has {actual} fields, expected {expected}")]
    FieldCount { expected: usize, actual: usize },

    #[error("field {index} should be empty, found {found:?}")]
    MissingSeparator { index: usize, found: String },

    #[error("invalid card number: {0:?}")]
    InvalidNumber(String),

    /// Parsed fine but outside of the bag
    #[error("number {0} is out of range")]
    OutOfRange(u32),

    #[error("number {0} appears twice")]
    Duplicate(Number),
}

/// Progress of a card during a round.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CardStatus {
    /// The card was taken out of the game.
    OutGame,
    #[default]
    InGame,
    AlmostOneLine,
    OneLine,
    AlmostTwoLines,
    TwoLines,
    AlmostFull,
    Full,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::OutGame => "hors jeu",
            Self::InGame => "en jeu",
            Self::AlmostOneLine => "presque une ligne",
            Self::OneLine => "une ligne",
            Self::AlmostTwoLines => "presque deux lignes",
            Self::TwoLines => "deux lignes",
            Self::AlmostFull => "presque plein",
            Self::Full => "plein",
        };
        write!(f, "{repr}")
    }
}

/// A player card: an id and three lines of five numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridCard {
    id: u32,
    lines: [[Number; NUMBERS_PER_LINE]; LINES_PER_CARD],
    marked: [[bool; NUMBERS_PER_LINE]; LINES_PER_CARD],
    active: bool,
}

impl Default for GridCard {
    fn default() -> Self {
        Self {
            id: 0,
            lines: [[0; NUMBERS_PER_LINE]; LINES_PER_CARD],
            marked: [[false; NUMBERS_PER_LINE]; LINES_PER_CARD],
            active: true,
        }
    }
}

impl GridCard {
    /// Builds a card with 15 distinct numbers. Each line is sorted.
    ///
    /// The generator's bag is emptied before and after, so consecutive cards
    /// are independent.
    pub fn generate(id: u32, rng: &mut RandomNumberGenerator) -> Self {
        rng.reset_pick();
        let numbers: Vec<Number> = (0..NUMBERS_PER_CARD).filter_map(|_| rng.pick()).collect();
        rng.reset_pick();

        let mut card = Self { id, ..Default::default() };
        for (line, chunk) in card.lines.iter_mut().zip(numbers.chunks(NUMBERS_PER_LINE)) {
            for (slot, number) in line.iter_mut().zip(chunk) {
                *slot = *number;
            }
            line.sort_unstable();
        }
        card
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn lines(&self) -> &[[Number; NUMBERS_PER_LINE]; LINES_PER_CARD] {
        &self.lines
    }

    #[must_use]
    pub fn contains(&self, number: Number) -> bool {
        self.lines.iter().flatten().any(|n| *n == number)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Marks `number` if it is on the card.
    pub fn play_number(&mut self, number: Number) {
        self.set_mark(number, true);
    }

    pub fn unplay_number(&mut self, number: Number) {
        self.set_mark(number, false);
    }

    /// Clears every mark.
    pub fn reset(&mut self) {
        self.marked = [[false; NUMBERS_PER_LINE]; LINES_PER_CARD];
    }

    fn set_mark(&mut self, number: Number, value: bool) {
        for (line, marks) in self.lines.iter().zip(self.marked.iter_mut()) {
            for (n, mark) in line.iter().zip(marks.iter_mut()) {
                if *n == number {
                    *mark = value;
                }
            }
        }
    }

    /// A line is "almost" done with one number missing.
    #[must_use]
    pub fn status(&self) -> CardStatus {
        if !self.active {
            return CardStatus::OutGame;
        }
        let counts = self.marked.map(|marks| marks.iter().filter(|m| **m).count());
        let full = counts.iter().filter(|c| **c == NUMBERS_PER_LINE).count();
        let almost = counts.iter().any(|c| *c == NUMBERS_PER_LINE - 1);
        match (full, almost) {
            (0, false) => CardStatus::InGame,
            (0, true) => CardStatus::AlmostOneLine,
            (1, false) => CardStatus::OneLine,
            (1, true) => CardStatus::AlmostTwoLines,
            (2, false) => CardStatus::TwoLines,
            (2, true) => CardStatus::AlmostFull,
            _ => CardStatus::Full,
        }
    }
}

impl fmt::Display for GridCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};;", self.id)?;
        for line in &self.lines {
            for number in line {
                write!(f, "{number};")?;
            }
            write!(f, ";")?;
        }
        Ok(())
    }
}

impl FromStr for GridCard {
    type Err = CardError;

    /// Parses `"<id>;;n;n;n;n;n;;n;n;n;n;n;;n;n;n;n;n;;"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(';').collect();
        if fields.len() != CARD_FIELDS {
            return Err(CardError::FieldCount {
                expected: CARD_FIELDS,
                actual: fields.len(),
            });
        }

        let id = fields[0]
            .trim()
            .parse::<u32>()
            .map_err(|_| CardError::InvalidNumber(fields[0].to_string()))?;

        let mut card = Self { id, ..Default::default() };
        let mut seen = Vec::with_capacity(NUMBERS_PER_CARD);
        for (line_index, line) in card.lines.iter_mut().enumerate() {
            let separator = 1 + line_index * (NUMBERS_PER_LINE + 1);
            if !fields[separator].trim().is_empty() {
                return Err(CardError::MissingSeparator {
                    index: separator,
                    found: fields[separator].to_string(),
                });
            }
            for (offset, slot) in line.iter_mut().enumerate() {
                let field = fields[separator + 1 + offset].trim();
                let value = field
                    .parse::<u32>()
                    .map_err(|_| CardError::InvalidNumber(field.to_string()))?;
                let number = Number::try_from(value)
                    .ok()
                    .filter(|n| is_valid_number(*n))
                    .ok_or(CardError::OutOfRange(value))?;
                if seen.contains(&number) {
                    return Err(CardError::Duplicate(number));
                }
                seen.push(number);
                *slot = number;
            }
        }
        Ok(card)
    }
}

impl Serializable for GridCard {
    type Document = String;

    fn read<R: Read>(&mut self, reader: &mut R, _version: SaveVersion) -> Result<()> {
        let id: u32 = read_value(reader)?;
        let active: u8 = read_value(reader)?;
        let mut card = Self {
            id,
            active: active != 0,
            ..Default::default()
        };
        let mut seen = Vec::with_capacity(NUMBERS_PER_CARD);
        for line in &mut card.lines {
            for slot in line.iter_mut() {
                let number: u8 = read_value(reader)?;
                if !is_valid_number(number) {
                    return Err(SerializationError::InvalidFormat(format!(
                        "card {id} holds {number}"
                    )));
                }
                if seen.contains(&number) {
                    return Err(SerializationError::InvalidFormat(format!(
                        "card {id}: {}",
                        CardError::Duplicate(number)
                    )));
                }
                seen.push(number);
                *slot = number;
            }
        }
        *self = card;
        Ok(())
    }

    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_value(writer, &self.id)?;
        write_value(writer, &u8::from(self.active))?;
        for number in self.lines.iter().flatten() {
            write_value(writer, number)?;
        }
        Ok(())
    }

    fn to_document(&self) -> String {
        self.to_string()
    }

    fn apply_document(&mut self, document: String) -> Result<()> {
        *self = document
            .parse()
            .map_err(|error: CardError| SerializationError::InvalidFormat(error.to_string()))?;
        Ok(())
    }
}

/// A named set of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardPack {
    name: String,
    cards: Vec<GridCard>,
}

impl CardPack {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn cards(&self) -> &[GridCard] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [GridCard] {
        &mut self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push(&mut self, card: GridCard) {
        self.cards.push(card);
    }

    /// Appends `count` new cards, numbered after the existing ones. Uses a
    /// throwaway generator when none is given.
    pub fn generate(&mut self, count: u32, rng: Option<&mut RandomNumberGenerator>) {
        let mut own;
        let rng = match rng {
            Some(rng) => rng,
            None => {
                own = RandomNumberGenerator::new();
                &mut own
            }
        };
        for _ in 0..count {
            let id = u32::try_from(self.cards.len()).unwrap_or(u32::MAX);
            self.cards.push(GridCard::generate(id, rng));
        }
        debug!("card pack {:?} now holds {} cards", self.name, self.cards.len());
    }

    pub fn generate_from_config(&mut self, config: &LotoConfig) {
        let mut rng = RandomNumberGenerator::from_config(config);
        self.generate(config.card_pack_size, Some(&mut rng));
    }

    #[must_use]
    pub fn cards_by_status(&self, status: CardStatus) -> Vec<&GridCard> {
        self.cards.iter().filter(|card| card.status() == status).collect()
    }

    /// Marks a drawn number on every card.
    pub fn play_number(&mut self, number: Number) {
        for card in &mut self.cards {
            card.play_number(number);
        }
    }

    /// Clears the marks of every card.
    pub fn reset(&mut self) {
        for card in &mut self.cards {
            card.reset();
        }
    }

    /// Drops the name and every card.
    pub fn full_reset(&mut self) {
        self.name.clear();
        self.cards.clear();
    }
}

impl Serializable for CardPack {
    type Document = CardPackDocument;

    fn read<R: Read>(&mut self, reader: &mut R, version: SaveVersion) -> Result<()> {
        let name = read_string(reader)?;
        let count = read_count(reader)?;
        let mut cards = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let mut card = GridCard::default();
            card.read(reader, version)?;
            cards.push(card);
        }
        *self = Self { name, cards };
        Ok(())
    }

    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_string(writer, &self.name)?;
        write_count(writer, self.cards.len())?;
        for card in &self.cards {
            card.write(writer)?;
        }
        Ok(())
    }

    fn to_document(&self) -> CardPackDocument {
        CardPackDocument {
            name: self.name.clone(),
            cards: self.cards.iter().map(GridCard::to_document).collect(),
        }
    }

    fn apply_document(&mut self, document: CardPackDocument) -> Result<()> {
        let mut cards = Vec::with_capacity(document.cards.len());
        for text in document.cards {
            let mut card = GridCard::default();
            card.apply_document(text)?;
            cards.push(card);
        }
        *self = Self {
            name: document.name,
            cards,
        };
        Ok(())
    }
}
