//! Riftfall rules engine.
//!
//! A deterministic engine for a two-player, simultaneous-turn tactics game
//! on a 5x5 battlefield whose terrain is periodically reshuffled by chaos
//! rifts. Exposes the board representation, resolver, move generation, the
//! game controller, and self-play for use by hosts, integration tests, and
//! the `selfplay` binary.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod resolve;
pub mod selfplay;

pub use config::{ConfigError, GameConfig, RiftSchedule};
pub use error::GameError;
pub use game::{Game, TurnReport};
