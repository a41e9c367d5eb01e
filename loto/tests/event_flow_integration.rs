/// Integration tests for event flow scenarios
///
/// These tests drive whole events the way an operator would: configure,
/// start, draw numbers, name winners and walk through the result screens.
use loto::{
    Event, GameRound, RandomNumberGenerator,
    entities::{EventStatus, RoundStatus, RoundType, SubRoundStatus},
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn configured_event(kinds: &[RoundType]) -> Event {
    let mut event = Event::new();
    event.set_organizer_name("Club");
    event.set_name("Gala");
    for kind in kinds {
        event.push_game_round(GameRound::new(*kind));
    }
    event
}

fn status_rank(status: EventStatus) -> u8 {
    match status {
        EventStatus::Invalid => 0,
        EventStatus::MissingParties => 1,
        EventStatus::Ready => 2,
        EventStatus::EventStarting => 3,
        EventStatus::GameRunning | EventStatus::DisplayRules => 4,
        EventStatus::EventEnding => 5,
        EventStatus::Finished => 6,
    }
}

#[test]
fn test_full_card_then_pause() {
    init_logger();
    let mut event = Event::new();
    event.set_organizer_name("Club");
    event.set_name("Gala");
    assert_eq!(event.status(), EventStatus::MissingParties);

    event.push_game_round(GameRound::new(RoundType::FullCard));
    assert_eq!(event.status(), EventStatus::Ready);
    event.push_game_round(GameRound::new(RoundType::Pause));

    event.next_state();
    assert_eq!(event.status(), EventStatus::EventStarting);

    event.next_state();
    assert_eq!(event.status(), EventStatus::GameRunning);
    assert_eq!(event.rounds()[0].status(), RoundStatus::Running);
    assert_eq!(event.rounds()[0].sub_rounds()[0].status(), SubRoundStatus::Running);

    assert!(event.add_winner_to_current_round("Alice"));
    assert_eq!(event.rounds()[0].sub_rounds()[0].status(), SubRoundStatus::Done);
    assert_eq!(event.rounds()[0].status(), RoundStatus::PostScreen);
    assert_eq!(event.status(), EventStatus::GameRunning);

    event.next_state();
    assert_eq!(event.rounds()[0].status(), RoundStatus::Done);
    assert_eq!(event.status(), EventStatus::GameRunning);

    event.next_state();
    assert_eq!(event.rounds()[1].status(), RoundStatus::Done);
    assert_eq!(event.status(), EventStatus::EventEnding);

    event.next_state();
    assert_eq!(event.status(), EventStatus::Finished);
    assert!(event.is_finished());

    event.next_state();
    assert_eq!(event.status(), EventStatus::Finished);
}

#[test]
fn test_round_completion_starts_next_round() {
    init_logger();
    let mut event = configured_event(&[RoundType::Enfant, RoundType::Enfant]);
    event.next_state();
    event.next_state();
    assert_eq!(event.current_round_index(), Some(0));

    for n in [3, 14, 15] {
        assert!(event.add_picked_number(n));
    }
    event.add_winner_to_current_round("Léa");
    assert_eq!(event.rounds()[0].status(), RoundStatus::PostScreen);
    assert!(!event.can_draw());

    event.next_state();
    assert_eq!(event.rounds()[0].status(), RoundStatus::Done);
    assert_eq!(event.current_round_index(), Some(1));
    assert_eq!(event.rounds()[1].status(), RoundStatus::Running);
    assert!(event.can_draw());
    assert!(event.end() >= event.start());

    event.add_picked_number(3);
    event.add_winner_to_current_round("Tom");
    assert_eq!(event.status(), EventStatus::EventEnding);
    assert_eq!(event.current_round_index(), None);
    assert_eq!(event.progression(), 1.0);
}

#[test]
fn test_regular_round_through_event() {
    init_logger();
    let mut event = configured_event(&[RoundType::OneTwoQuineFullCard]);
    event.next_state();
    event.next_state();

    let winners = ["Alice", "Bob", "Chloé"];
    for (index, winner) in winners.iter().enumerate() {
        let round = event.current_round().unwrap();
        assert_eq!(round.current_sub_round_index(), Some(index));
        if round.current_sub_round().unwrap().status() == SubRoundStatus::Ready {
            event.next_state();
        }
        assert!(event.can_draw());
        event.add_picked_number(10 + index as u8);
        assert!(event.add_winner_to_current_round(*winner));
    }

    // last round: the final winner closes the game phase in the same call
    let round = &event.rounds()[0];
    assert_eq!(round.status(), RoundStatus::Done);
    assert_eq!(
        round.winner_str(),
        "simple quine: Alice\ndouble quine: Bob\ncarton plein: Chloé\n"
    );
    assert_eq!(round.all_draws(), vec![10, 11, 12]);
    assert_eq!(event.status(), EventStatus::EventEnding);

    event.next_state();
    assert!(event.is_finished());
}

#[test]
fn test_prize_presentation_before_draws() {
    init_logger();
    let mut event = configured_event(&[RoundType::FullCard]);
    event
        .round_mut(0)
        .unwrap()
        .sub_round_mut(0)
        .unwrap()
        .set_prices("Un week-end à la mer");
    event.next_state();
    event.next_state();
    assert_eq!(event.rounds()[0].sub_rounds()[0].status(), SubRoundStatus::PreScreen);
    assert!(!event.can_draw());
    assert!(!event.add_winner_to_current_round("Alice"));

    event.next_state();
    assert!(event.can_draw());
}

#[test]
fn test_winner_ignored_outside_game() {
    let mut event = configured_event(&[RoundType::OneQuine]);
    assert!(!event.add_winner_to_current_round("Alice"));
    event.next_state();
    assert!(!event.add_winner_to_current_round("Alice"));
    event.next_state();
    event.display_rules();
    assert!(!event.add_winner_to_current_round("Alice"));
    event.display_rules();
    assert!(event.add_winner_to_current_round("Alice"));
}

#[test]
fn test_progression_is_forward_only() {
    init_logger();
    let mut event = configured_event(&[
        RoundType::OneQuine,
        RoundType::Pause,
        RoundType::OneTwoQuineFullCard,
        RoundType::Enfant,
        RoundType::Inverse,
    ]);
    let mut rng = RandomNumberGenerator::with_seed(11);
    let mut rank = status_rank(event.status());

    for _ in 0..200 {
        if event.is_finished() {
            break;
        }
        if event.can_draw() {
            let number = rng.pick().unwrap();
            assert!(event.add_picked_number(number));
            event.add_winner_to_current_round("Gagnant");
        } else {
            event.next_state();
        }
        let next = status_rank(event.status());
        assert!(next >= rank, "{} came after rank {rank}", event.status());
        rank = next;
    }

    assert!(event.is_finished());
    assert!(event.rounds().iter().all(GameRound::is_finished));
}

#[test]
fn test_statistics_over_event() {
    init_logger();
    let mut event = configured_event(&[
        RoundType::OneQuine,
        RoundType::Pause,
        RoundType::OneQuine,
        RoundType::OneQuine,
    ]);
    event.next_state();
    event.next_state();

    for count in [5u8, 8, 6] {
        if !event.can_draw() {
            event.next_state();
        }
        for n in 1..=count {
            assert!(event.add_picked_number(n));
        }
        event.add_winner_to_current_round("Alice");
        if event.status() == EventStatus::GameRunning {
            event.next_state();
        }
    }
    assert_eq!(event.status(), EventStatus::EventEnding);

    let stats = event.stats(false);
    assert_eq!(stats.rounds(), 3);
    assert_eq!(stats.round_less_nb, 5);
    assert_eq!(stats.round_most_nb, 8);
    assert!((stats.round_average_nb - 6.333_333).abs() < 1e-5);
    assert_eq!(stats.most_pick_list, vec![1, 2, 3, 4, 5]);
    assert_eq!(stats.most_pick_nb, 3);
    assert_eq!(stats.pick_count(8), 1);
}

#[test]
fn test_statistics_skip_children_and_unplayed() {
    let mut event = configured_event(&[RoundType::Enfant, RoundType::OneQuine, RoundType::OneQuine]);
    event.next_state();
    event.next_state();
    event.add_picked_number(1);
    event.add_winner_to_current_round("Léa");
    event.next_state();
    event.add_picked_number(2);
    event.add_picked_number(3);
    event.add_winner_to_current_round("Bob");
    event.next_state();

    assert_eq!(event.stats(false).rounds(), 2);
    let adults = event.stats(true);
    assert_eq!(adults.rounds(), 1);
    assert_eq!(adults.round_most_nb, 2);
    assert_eq!(adults.pick_count(1), 0);

    // The third round is running but not finished.
    assert_eq!(event.rounds()[2].status(), RoundStatus::Running);
    assert_eq!(event.stats(false).sub_rounds(), 2);
}

#[test]
fn test_cancel_last_draw() {
    let mut event = configured_event(&[RoundType::TwoQuines]);
    event.next_state();
    event.next_state();
    event.add_picked_number(44);
    event.add_picked_number(45);
    assert_eq!(event.current_round().unwrap().last_cancelable_draw(), Some(45));
    assert_eq!(event.remove_last_pick(), Some(45));
    assert_eq!(event.current_round().unwrap().all_draws(), vec![44]);
    assert_eq!(event.current_round().unwrap().draw_str(), "double quine: 44\n");
}
