use log::{debug, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    constants::{MAX_NUMBER, MIN_NUMBER, NO_NUMBER, NUMBER_COUNT, is_valid_number},
    entities::Number,
};
use crate::config::LotoConfig;

/// Seed used by [`RandomNumberGenerator::deterministic`].
const DETERMINISTIC_SEED: u64 = 1234;

/// Draws numbers from a bag of `MIN_NUMBER..=MAX_NUMBER` without
/// replacement.
///
/// The picked list keeps draw order so the last draw can be cancelled.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    picked: Vec<Number>,
    rng: StdRng,
}

impl RandomNumberGenerator {
    /// Generator seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            picked: Vec::with_capacity(NUMBER_COUNT),
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            picked: Vec::with_capacity(NUMBER_COUNT),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator that always yields the same sequence. Handy for demos and
    /// reproducible tests.
    #[must_use]
    pub fn deterministic() -> Self {
        Self::with_seed(DETERMINISTIC_SEED)
    }

    #[must_use]
    pub fn from_config(config: &LotoConfig) -> Self {
        match config.rng_seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    /// Draws a number not drawn before, uniformly among the remaining ones.
    /// Returns `None` once the bag is empty.
    pub fn pick(&mut self) -> Option<Number> {
        let remaining: Vec<Number> = (MIN_NUMBER..=MAX_NUMBER)
            .filter(|n| !self.picked.contains(n))
            .collect();
        if remaining.is_empty() {
            trace!("bag is empty, nothing to pick");
            return None;
        }
        let number = remaining[self.rng.random_range(0..remaining.len())];
        self.picked.push(number);
        debug!("picked {number} ({} drawn)", self.picked.len());
        Some(number)
    }

    /// Same as [`pick`](Self::pick) but returns [`NO_NUMBER`] when the bag is
    /// empty.
    pub fn pick_raw(&mut self) -> Number {
        self.pick().unwrap_or(NO_NUMBER)
    }

    /// Records a number drawn by hand. Returns `false` without touching the
    /// bag when the number was already drawn or is out of range.
    pub fn add_pick(&mut self, number: Number) -> bool {
        if !is_valid_number(number) || self.picked.contains(&number) {
            return false;
        }
        self.picked.push(number);
        true
    }

    /// Puts the most recent draw back in the bag.
    pub fn pop_num(&mut self) -> Option<Number> {
        self.picked.pop()
    }

    pub fn reset_pick(&mut self) {
        self.picked.clear();
    }

    #[must_use]
    pub fn picked(&self) -> &[Number] {
        &self.picked
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.picked.len() >= NUMBER_COUNT
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
