//! Terminal bell as the game's audio sink.

use std::io::{self, Write};

use tracing::warn;

use crate::core::EventSink;
use crate::types::GameEvent;

const BELL: &[u8] = b"\x07";

/// Rings the terminal bell on locks, once per cleared row, and on game over.
///
/// Write errors are logged and dropped; a broken bell never stops the game.
pub struct BellNotifier<W: Write = io::Stdout> {
    out: W,
    enabled: bool,
    rung: u32,
}

impl BellNotifier<io::Stdout> {
    pub fn stdout(enabled: bool) -> Self {
        Self::new(io::stdout(), enabled)
    }
}

impl<W: Write> BellNotifier<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self {
            out,
            enabled,
            rung: 0,
        }
    }

    /// How many times the bell was written successfully
    pub fn rung(&self) -> u32 {
        self.rung
    }

    fn ring(&mut self) {
        let result = self
            .out
            .write_all(BELL)
            .and_then(|()| self.out.flush());
        match result {
            Ok(()) => self.rung += 1,
            Err(err) => warn!(%err, "terminal bell failed"),
        }
    }
}

impl<W: Write> EventSink for BellNotifier<W> {
    fn on_event(&mut self, event: &GameEvent) {
        if !self.enabled {
            return;
        }
        match *event {
            GameEvent::PieceLocked { .. } | GameEvent::GameOver { .. } => self.ring(),
            GameEvent::LinesCleared { count, .. } => {
                for _ in 0..count {
                    self.ring();
                }
            }
            GameEvent::ScoreChanged { .. }
            | GameEvent::PauseToggled { .. }
            | GameEvent::GameReset => {}
        }
    }
}
