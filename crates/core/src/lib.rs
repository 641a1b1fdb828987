//! UCT Core - Rules adapter trait and shared types
//!
//! This crate defines the capability set the search engine requires from any
//! two-player, perfect-information, alternating-turn game, plus the error
//! taxonomy shared across the workspace.
//!
//! # Types
//!
//! - [`GameRules`] - Trait a game implements to be searchable
//! - [`PlayerId`] - One of the two player identities
//! - [`UctError`] - Errors surfaced by the engine and by rules adapters

mod error;
mod game;
mod player;

pub use error::{Result, UctError};
pub use game::GameRules;
pub use player::PlayerId;
