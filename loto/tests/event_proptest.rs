/// Property-based tests for draws, validation and persistence using proptest
///
/// These tests check the invariants of the number bag and of the event
/// across a wide range of generated inputs.
use loto::{
    Event, GameRound, RandomNumberGenerator, SaveVersion, Serializable,
    constants::{MAX_NUMBER, MIN_NUMBER, NO_NUMBER},
    entities::{EventStatus, RoundType},
};
use proptest::prelude::*;
use std::{collections::BTreeSet, io::Cursor};

// Strategy to generate any round type
fn round_type_strategy() -> impl Strategy<Value = RoundType> {
    prop::sample::select(RoundType::ALL.to_vec())
}

fn running_event(kind: RoundType) -> Event {
    let mut event = Event::new();
    event.set_organizer_name("Club");
    event.set_name("Gala");
    event.push_game_round(GameRound::new(kind));
    event.next_state();
    event.next_state();
    event
}

proptest! {
    /// Whatever the seed, the bag yields every number exactly once.
    #[test]
    fn test_bag_yields_each_number_once(seed in any::<u64>()) {
        let mut rng = RandomNumberGenerator::with_seed(seed);
        let mut seen = BTreeSet::new();
        while let Some(n) = rng.pick() {
            prop_assert!((MIN_NUMBER..=MAX_NUMBER).contains(&n));
            prop_assert!(seen.insert(n));
        }
        prop_assert_eq!(seen.len(), MAX_NUMBER as usize);
        prop_assert!(rng.is_exhausted());
        prop_assert_eq!(rng.pick_raw(), NO_NUMBER);
    }

    /// Manual picks are rejected when repeated or out of range and never
    /// drawn afterwards.
    #[test]
    fn test_manual_picks_are_excluded(manual in prop::collection::vec(any::<u8>(), 0..40)) {
        let mut rng = RandomNumberGenerator::with_seed(7);
        let mut accepted = BTreeSet::new();
        for n in &manual {
            let expected = (MIN_NUMBER..=MAX_NUMBER).contains(n) && !accepted.contains(n);
            prop_assert_eq!(rng.add_pick(*n), expected);
            if expected {
                accepted.insert(*n);
            }
        }
        while let Some(n) = rng.pick() {
            prop_assert!(!accepted.contains(&n));
        }
    }

    /// The event status only depends on names and round count while editable.
    #[test]
    fn test_validation_is_consistent(
        organizer in ".{0,12}",
        name in ".{0,12}",
        kinds in prop::collection::vec(round_type_strategy(), 0..5),
    ) {
        let mut event = Event::new();
        event.set_organizer_name(organizer.clone());
        event.set_name(name.clone());
        for kind in &kinds {
            event.push_game_round(GameRound::new(*kind));
        }

        let expected = if organizer.is_empty() || name.is_empty() {
            EventStatus::Invalid
        } else if kinds.is_empty() {
            EventStatus::MissingParties
        } else {
            EventStatus::Ready
        };
        prop_assert_eq!(event.status(), expected);
        prop_assert!(event.is_editable());
        prop_assert_eq!(event.rounds_len(), kinds.len());
    }

    /// Draws are accepted once per round and only within range.
    #[test]
    fn test_round_draws_are_unique(numbers in prop::collection::vec(0u8..=100, 1..60)) {
        let mut event = running_event(RoundType::FullCard);
        let mut accepted = BTreeSet::new();
        for n in numbers {
            let expected = (MIN_NUMBER..=MAX_NUMBER).contains(&n) && !accepted.contains(&n);
            prop_assert_eq!(event.add_picked_number(n), expected);
            if expected {
                accepted.insert(n);
            }
        }
        prop_assert_eq!(event.rounds()[0].draws_count(), accepted.len());
    }

    /// Free text survives the binary format unchanged.
    #[test]
    fn test_text_survives_binary_round_trip(
        name in "\\PC{1,40}",
        location in "\\PC{0,40}",
        rules in "[\\PC\n]{0,200}",
        prices in "[\\PC\n]{0,60}",
    ) {
        let mut event = Event::new();
        event.set_organizer_name("Club");
        event.set_name(name.clone());
        event.set_location(location.clone());
        event.set_rules(rules.clone());
        let mut round = GameRound::new(RoundType::OneQuine);
        if let Some(sub) = round.sub_round_mut(0) {
            sub.set_prices(prices.clone());
        }
        event.push_game_round(round);

        let mut buf = Vec::new();
        event.write(&mut buf).unwrap();
        let mut read = Event::new();
        read.read(&mut Cursor::new(buf), SaveVersion::current()).unwrap();

        prop_assert_eq!(read.name(), name.as_str());
        prop_assert_eq!(read.location(), location.as_str());
        prop_assert_eq!(read.rules(), rules.as_str());
        prop_assert_eq!(read.rounds()[0].sub_rounds()[0].prices(), prices.as_str());
        prop_assert_eq!(read.status(), EventStatus::Ready);
    }
}
