//! pishti: two-player Pishti card game engine
//!
//! - A human plays against a computer opponent with three difficulty tiers
//! - Deterministic when seeded; every random choice goes through one RNG
//! - Safe to drive from several threads through [`engine::Engine`]
//!
//! ## Quick start
//! ```
//! use pishti::agents::Difficulty;
//! use pishti::engine::Engine;
//! use pishti::game::GameState;
//!
//! let engine = Engine::seeded(7);
//! engine.set_level(Difficulty::Beginner);
//! assert!(engine.start_game());
//!
//! let view = engine.view();
//! assert_eq!(view.state, GameState::PlayerTurn);
//! assert_eq!(view.table_len, 4);
//! assert_eq!(view.player_hand.len(), 4);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin pishti
//! ```

pub mod agents;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod game;
pub mod hand;
pub mod scoring;
pub mod sound;
pub mod tui;
pub mod undo;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
