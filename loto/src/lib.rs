//! # Loto
//!
//! Engine for running a loto (bingo) evening: an event is a sequence of game
//! rounds, each round a sequence of win-condition phases, all driven as
//! nested finite state machines.
//!
//! ## Architecture
//!
//! Three state machines are stacked, each owning the next:
//!
//! - **Event**: `Invalid`, `MissingParties` and `Ready` while being set up,
//!   then `EventStarting`, `GameRunning` (with the `DisplayRules` overlay),
//!   `EventEnding` and `Finished`
//! - **GameRound**: `Ready`, `Running`, `PostScreen`, `Done`
//! - **SubGameRound**: `Ready`, `PreScreen`, `Running`, `Done`
//!
//! The operator drives everything through [`Event::next_state`],
//! [`Event::add_picked_number`] and [`Event::add_winner_to_current_round`].
//! Illegal calls are ignored rather than reported so a UI can call them
//! freely.
//!
//! ## Core Modules
//!
//! - [`game`]: State machines, draw generator, cards and statistics
//! - [`io`]: Versioned binary saves and JSON/YAML exports
//! - [`config`]: Environment-driven settings
//!
//! ## Example
//!
//! ```
//! use loto::{Event, GameRound, entities::{EventStatus, RoundType}};
//!
//! let mut event = Event::new();
//! event.set_organizer_name("Club");
//! event.set_name("Gala");
//! event.push_game_round(GameRound::new(RoundType::FullCard));
//! assert_eq!(event.status(), EventStatus::Ready);
//!
//! event.next_state();
//! event.next_state();
//! assert!(event.add_picked_number(42));
//! event.add_winner_to_current_round("Alice");
//! ```

/// Environment-driven settings.
pub mod config;
pub use config::{ConfigError, LotoConfig};

/// Core game logic, entities, and state machines.
pub mod game;
pub use game::{
    CardError, CardPack, CardStatus, Diaporama, Event, GameRound, GridCard,
    RandomNumberGenerator, Statistics, SubGameRound,
    constants::{self, MAX_NUMBER, MIN_NUMBER, NO_NUMBER},
    entities::{self, Number},
};

/// Saving and loading.
pub mod io;
pub use io::{SaveVersion, Serializable, SerializationError};
