//! Loto game engine - event, round and sub-round state machines.
//!
//! This module provides:
//! - The three nested state machines (`Event` > `GameRound` > `SubGameRound`)
//! - The draw generator and player cards
//! - Statistics computed over a played event

pub mod card;
pub mod constants;
pub mod entities;
pub mod event;
pub mod rng;
pub mod round;
pub mod statistics;
pub mod sub_round;

pub use card::{CardError, CardPack, CardStatus, GridCard};
pub use event::Event;
pub use rng::RandomNumberGenerator;
pub use round::{Diaporama, GameRound};
pub use statistics::Statistics;
pub use sub_round::SubGameRound;
