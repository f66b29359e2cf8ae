//! Runtime game configuration.

use crate::types::GRAVITY_MS;

/// Settings fixed for the lifetime of a [`GameState`](crate::GameState).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for the piece generator
    pub seed: u32,
    /// Gravity interval in milliseconds
    pub gravity_ms: u32,
}

impl GameConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            gravity_ms: GRAVITY_MS,
        }
    }
}
