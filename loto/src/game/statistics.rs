use chrono::TimeDelta;

use super::{
    constants::NUMBER_COUNT,
    entities::Number,
    round::GameRound,
};

/// Aggregates computed over the rounds of an event.
///
/// Only finished rounds feed the round metrics, and only the leading
/// finished sub-rounds of each round feed the sub-round metrics. Every draw
/// of a folded round counts towards the number frequencies.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    pub less_pick_nb: u32,
    /// Numbers drawn the fewest times, ascending.
    pub less_pick_list: Vec<Number>,
    pub most_pick_nb: u32,
    /// Numbers drawn the most times, ascending.
    pub most_pick_list: Vec<Number>,

    pub round_less_nb: usize,
    pub round_most_nb: usize,
    pub round_average_nb: f64,

    pub sub_round_less_nb: usize,
    pub sub_round_most_nb: usize,
    pub sub_round_average_nb: f64,

    pub round_longest: TimeDelta,
    pub round_shortest: TimeDelta,
    pub round_average: TimeDelta,

    pub sub_round_longest: TimeDelta,
    pub sub_round_shortest: TimeDelta,
    pub sub_round_average: TimeDelta,

    rounds: usize,
    sub_rounds: usize,
    pick_counts: [u32; NUMBER_COUNT],
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            less_pick_nb: 0,
            less_pick_list: Vec::new(),
            most_pick_nb: 0,
            most_pick_list: Vec::new(),
            round_less_nb: 0,
            round_most_nb: 0,
            round_average_nb: 0.0,
            sub_round_less_nb: 0,
            sub_round_most_nb: 0,
            sub_round_average_nb: 0.0,
            round_longest: TimeDelta::zero(),
            round_shortest: TimeDelta::zero(),
            round_average: TimeDelta::zero(),
            sub_round_longest: TimeDelta::zero(),
            sub_round_shortest: TimeDelta::zero(),
            sub_round_average: TimeDelta::zero(),
            rounds: 0,
            sub_rounds: 0,
            pick_counts: [0; NUMBER_COUNT],
        }
    }
}

/// Running extremes and mean of one metric.
struct Sample<'a> {
    seen: usize,
    less: &'a mut usize,
    most: &'a mut usize,
    average: &'a mut f64,
    shortest: &'a mut TimeDelta,
    longest: &'a mut TimeDelta,
    mean_duration: &'a mut TimeDelta,
}

impl Sample<'_> {
    fn push(&mut self, draws: usize, duration: TimeDelta) {
        let n = self.seen;
        if n == 0 || draws < *self.less {
            *self.less = draws;
        }
        *self.most = (*self.most).max(draws);
        *self.average = (*self.average * n as f64 + draws as f64) / (n + 1) as f64;

        if n == 0 || duration < *self.shortest {
            *self.shortest = duration;
        }
        *self.longest = (*self.longest).max(duration);
        let weight = i32::try_from(n).unwrap_or(i32::MAX - 1);
        *self.mean_duration = (*self.mean_duration * weight + duration) / (weight + 1);
    }
}

impl Statistics {
    /// Folds one round in.
    pub fn push_round(&mut self, round: &GameRound) {
        if round.is_finished() {
            let mut sample = Sample {
                seen: self.rounds,
                less: &mut self.round_less_nb,
                most: &mut self.round_most_nb,
                average: &mut self.round_average_nb,
                shortest: &mut self.round_shortest,
                longest: &mut self.round_longest,
                mean_duration: &mut self.round_average,
            };
            sample.push(round.draws_count(), round.duration());
            self.rounds += 1;
        }

        for sub in round.sub_rounds().iter().take_while(|sub| sub.is_finished()) {
            let mut sample = Sample {
                seen: self.sub_rounds,
                less: &mut self.sub_round_less_nb,
                most: &mut self.sub_round_most_nb,
                average: &mut self.sub_round_average_nb,
                shortest: &mut self.sub_round_shortest,
                longest: &mut self.sub_round_longest,
                mean_duration: &mut self.sub_round_average,
            };
            sample.push(sub.draws().len(), sub.duration());
            self.sub_rounds += 1;
        }

        for number in round.all_draws() {
            if let Some(count) = self.pick_counts.get_mut(usize::from(number).wrapping_sub(1)) {
                *count += 1;
            }
        }
        self.refresh_picks();
    }

    fn refresh_picks(&mut self) {
        self.less_pick_nb = self.pick_counts.iter().copied().min().unwrap_or(0);
        self.most_pick_nb = self.pick_counts.iter().copied().max().unwrap_or(0);
        self.less_pick_list.clear();
        self.most_pick_list.clear();
        for (number, count) in (1..).zip(self.pick_counts) {
            if count == self.less_pick_nb {
                self.less_pick_list.push(number);
            }
            if count == self.most_pick_nb {
                self.most_pick_list.push(number);
            }
        }
    }

    /// Number of finished rounds folded in.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    #[must_use]
    pub fn sub_rounds(&self) -> usize {
        self.sub_rounds
    }

    /// How many times `number` was drawn.
    #[must_use]
    pub fn pick_count(&self, number: Number) -> u32 {
        usize::from(number)
            .checked_sub(1)
            .and_then(|index| self.pick_counts.get(index))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn less_pick_str(&self) -> String {
        join_numbers(&self.less_pick_list)
    }

    #[must_use]
    pub fn most_pick_str(&self) -> String {
        join_numbers(&self.most_pick_list)
    }
}

fn join_numbers(numbers: &[Number]) -> String {
    if numbers.is_empty() {
        return "--".to_string();
    }
    numbers
        .iter()
        .map(Number::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
