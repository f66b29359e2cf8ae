//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has no dependencies on UI or I/O, making it:
//!
//! - **Deterministic**: Same seed and the same inputs produce identical games
//! - **Testable**: Gravity is driven by explicit elapsed time, not a wall clock
//! - **Portable**: Can run in any environment (terminal, headless)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 game board, merging and line removal
//! - [`collision`]: placement checks against walls, floor and locked cells
//! - [`pieces`]: tetromino shape matrices and clockwise rotation
//! - [`rng`]: seeded uniform piece generation
//! - [`scoring`]: line clear points
//! - [`timer`]: cancellable gravity timer
//! - [`game_state`]: complete game state and the lock/spawn state machine
//! - [`events`]: observer trait for game events
//! - [`snapshot`]: plain-data view for renderers
//!
//! # Game Rules
//!
//! - **Random pieces**: each piece is drawn uniformly from the seven kinds
//! - **Rotation**: 90° clockwise matrix rotation, rejected if it does not fit
//! - **Gravity**: one row per interval; a blocked piece locks immediately
//! - **Game over**: a lock that leaves blocks in the top two rows, or a spawn
//!   that does not fit
//! - **Scoring**: 100 / 300 / 500 / 800 for 1-4 lines at once
//!
//! # Example
//!
//! ```
//! use meowtris_core::{GameConfig, GameState};
//! use meowtris_types::GameAction;
//!
//! let mut game = GameState::new(GameConfig::with_seed(12345));
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.board().filled_count(), 4);
//! assert_eq!(game.score(), 0);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::advance`](game_state::GameState::advance) with the real
//! time elapsed since the last call; the gravity timer turns that into ticks.

pub mod board;
pub mod collision;
pub mod config;
pub mod events;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timer;

pub use meowtris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use collision::{drop_distance, fits, is_valid_move};
pub use config::GameConfig;
pub use events::{dispatch, EventSink};
pub use game_state::{GameState, Phase};
pub use pieces::{get_shape, rotate, ActivePiece, Piece, Shape};
pub use rng::{PieceGenerator, SimpleRng};
pub use scoring::{clear_lines, line_clear_score, LineClear};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use timer::{GravityTimer, TimerHandle};
