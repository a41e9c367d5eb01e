use super::entities::Number;

/// Smallest number that can be drawn.
pub const MIN_NUMBER: Number = 1;

/// Largest number that can be drawn.
pub const MAX_NUMBER: Number = 90;

/// How many distinct numbers there are in the bag.
pub const NUMBER_COUNT: usize = MAX_NUMBER as usize;

/// Sentinel returned by the raw pick API once the bag is empty. It lies
/// outside of `MIN_NUMBER..=MAX_NUMBER` on purpose.
pub const NO_NUMBER: Number = 255;

pub const LINES_PER_CARD: usize = 3;
pub const NUMBERS_PER_LINE: usize = 5;
pub const NUMBERS_PER_CARD: usize = LINES_PER_CARD * NUMBERS_PER_LINE;

/// Winner recorded for sub-rounds read from saves that only stored a
/// "has a winner" flag.
pub const LEGACY_WINNER: &str = "inconnu";

#[must_use]
pub const fn is_valid_number(number: Number) -> bool {
    number >= MIN_NUMBER && number <= MAX_NUMBER
}
