//! Meowtris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, the
//! integration tests and the benches can write `meowtris::core::GameState`.

pub use meowtris_core as core;
pub use meowtris_input as input;
pub use meowtris_term as term;
pub use meowtris_types as types;
