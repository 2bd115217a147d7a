//! # Platformer
//!
//! Game objects and a debug level built on [`platformer_engine`]: a player
//! with run and double-jump controls, keys, locks and doors wired together
//! through zone messages.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod objects;
pub mod player;
pub mod scene;

pub use config::{GameConfig, GameError};
pub use player::{Player, PlayerInput};
pub use scene::TestingScene;
