//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. It renders
//! into a simple framebuffer that is diffed and flushed to the terminal, and
//! provides the terminal bell as an event sink.
//!
//! Goals:
//! - Keep `core` deterministic and free of I/O
//! - Redraw only what changed between frames
//! - Control the aspect ratio (2 chars wide per board cell)

pub mod fb;
pub mod game_view;
pub mod notifier;
pub mod renderer;

pub use meowtris_core as core;
pub use meowtris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer};
pub use game_view::{piece_color, GameView, Viewport};
pub use notifier::BellNotifier;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
