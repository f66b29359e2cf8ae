//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, collision,
//! scoring and the gravity timer. It owns the state machine
//! `Spawning → Falling → (Locking → LineClearing → Spawning) | GameOver` with an
//! orthogonal pause flag.
//!
//! Every operation runs to completion synchronously. Side effects for the
//! outside world (sound, score display) are queued as [`GameEvent`]s and taken
//! with [`GameState::drain_events`].

use tracing::{debug, trace};

use crate::collision::{drop_distance, fits};
use crate::config::GameConfig;
use crate::events::EventSink;
use crate::pieces::{ActivePiece, Piece};
use crate::scoring::line_clear_score;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::timer::{GravityTimer, TimerHandle};
use crate::types::{GameAction, GameEvent};
use crate::{Board, PieceGenerator};

/// Where the game is in its lock/spawn cycle.
///
/// `Locking` and `LineClearing` are only held while a lock is being processed;
/// between calls the state is `Idle`, `Falling` or `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created but not started
    Idle,
    Spawning,
    Falling,
    Locking,
    LineClearing,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<ActivePiece>,
    next: Option<Piece>,
    generator: PieceGenerator,
    timer: GravityTimer,
    phase: Phase,
    paused: bool,
    score: u32,
    lines: u32,
    /// Pending side effects, oldest first.
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game; nothing falls until [`start`](Self::start).
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            board: Board::new(),
            active: None,
            next: None,
            generator: PieceGenerator::new(config.seed),
            timer: GravityTimer::new(config.gravity_ms),
            phase: Phase::Idle,
            paused: false,
            score: 0,
            lines: 0,
            events: Vec::new(),
        }
    }

    /// Spawn the first piece and arm gravity. No-op once started.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        debug!(seed = self.config.seed, gravity_ms = self.config.gravity_ms, "game started");
        self.begin_session();
    }

    /// Throw the current session away and start a fresh one.
    ///
    /// The gravity timer is cancelled before anything else and re-armed under
    /// a new handle at the end, so the old schedule can never fire again.
    pub fn reset(&mut self) {
        self.timer.cancel();

        let had_score = self.score != 0;
        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.active = None;
        self.next = None;
        self.paused = false;

        debug!("game reset");
        self.events.push(GameEvent::GameReset);
        if had_score {
            self.events.push(GameEvent::ScoreChanged { score: 0 });
        }
        self.begin_session();
    }

    fn begin_session(&mut self) {
        if self.spawn_piece() {
            self.timer.schedule();
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Whether movement commands and ticks are currently honoured
    pub fn playable(&self) -> bool {
        self.phase == Phase::Falling && !self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next_piece(&self) -> Option<Piece> {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn timer(&self) -> &GravityTimer {
        &self.timer
    }

    /// Handle of the live gravity schedule
    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer.handle()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.next = self.next.map(|p| p.kind);
        out.score = self.score;
        out.lines = self.lines;
        out.paused = self.paused;
        out.game_over = self.game_over();
        out.phase = self.phase;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Hand all pending events to `sink`
    pub fn flush_events(&mut self, sink: &mut dyn EventSink) {
        for event in self.events.drain(..) {
            sink.on_event(&event);
        }
    }

    /// Promote the next piece to active and pre-generate a new next piece.
    ///
    /// Returns false (and ends the game) if the new piece does not fit at its
    /// spawn position.
    pub(crate) fn spawn_piece(&mut self) -> bool {
        self.phase = Phase::Spawning;

        let piece = match self.next.take() {
            Some(piece) => piece,
            None => self.generator.random_piece(),
        };
        self.next = Some(self.generator.random_piece());

        let active = ActivePiece::spawn(piece);
        self.active = Some(active);
        trace!(kind = ?piece.kind, x = active.x, y = active.y, "spawn");

        if !fits(&self.board, &active) {
            debug!(kind = ?piece.kind, "spawn blocked");
            self.end_game();
            return false;
        }

        self.phase = Phase::Falling;
        true
    }

    /// Try to move the active piece; state is untouched on failure.
    pub(crate) fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.translated(dx, dy);
        if fits(&self.board, &moved) {
            self.active = Some(moved);
            return true;
        }

        trace!(dx, dy, "move rejected");
        false
    }

    /// Try to rotate the active piece clockwise in place (no kicks).
    pub(crate) fn try_rotate(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let rotated = active.rotated();
        if fits(&self.board, &rotated) {
            self.active = Some(rotated);
            return true;
        }

        trace!(kind = ?active.piece.kind, "rotation rejected");
        false
    }

    /// One gravity step: move down, or lock if blocked.
    ///
    /// Returns true if the piece moved, false if it locked.
    pub(crate) fn step_down(&mut self) -> bool {
        if self.try_move(0, 1) {
            return true;
        }
        self.lock_piece();
        false
    }

    /// Drop the active piece as far as it goes, then lock it.
    ///
    /// Returns the number of rows travelled.
    pub(crate) fn hard_drop(&mut self) -> u32 {
        let Some(active) = self.active else {
            return 0;
        };
        let rows = drop_distance(&self.board, &active);
        // The landing row is on the board, so it fits back into i8.
        let y = (active.y as i16 + rows as i16) as i8;
        self.active = Some(ActivePiece { y, ..active });
        self.lock_piece();
        rows as u32
    }

    /// Merge the active piece, clear lines, then spawn or end the game.
    pub(crate) fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.phase = Phase::Locking;
        self.board.merge(&active);
        self.events.push(GameEvent::PieceLocked {
            kind: active.piece.kind,
        });
        debug!(kind = ?active.piece.kind, x = active.x, y = active.y, "piece locked");

        // Checked on the merged board, before rows are removed.
        let topped_out = self.board.top_rows_occupied();

        self.phase = Phase::LineClearing;
        let cleared = self.board.clear_full_rows();
        let count = cleared.len() as u32;
        if count > 0 {
            let delta = line_clear_score(count);
            self.score = self.score.saturating_add(delta);
            self.lines = self.lines.saturating_add(count);
            debug!(count, delta, score = self.score, rows = ?cleared.as_slice(), "lines cleared");
            self.events.push(GameEvent::LinesCleared {
                count,
                score_delta: delta,
            });
            self.events.push(GameEvent::ScoreChanged { score: self.score });
        }

        if topped_out {
            self.end_game();
            return;
        }

        self.spawn_piece();
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        self.timer.cancel();
        self.events.push(GameEvent::GameOver { score: self.score });
        debug!(score = self.score, lines = self.lines, "game over");
    }

    /// Gravity tick. Returns false when nothing was processed (paused, over,
    /// not started).
    pub fn tick(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        self.step_down();
        true
    }

    /// Feed real elapsed time into the gravity timer and run one tick per fire.
    ///
    /// Returns the number of timer fires.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        let fires = self.timer.advance(elapsed_ms);
        for _ in 0..fires {
            self.tick();
        }
        fires
    }

    /// Apply a game action
    ///
    /// While paused or over only `Pause` and `Restart` are honoured. Returns
    /// whether the state changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if !action.is_meta() && !self.playable() {
            trace!(action = action.as_str(), "action ignored");
            return false;
        }

        match action {
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::SoftDrop => {
                self.step_down();
                true
            }
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
            GameAction::Rotate => self.try_rotate(),
            GameAction::Pause => {
                self.paused = !self.paused;
                self.events.push(GameEvent::PauseToggled {
                    paused: self.paused,
                });
                true
            }
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }

    /// Apply a named command such as `"moveLeft"`; unknown names are ignored.
    pub fn apply_command(&mut self, name: &str) -> bool {
        match GameAction::from_str(name) {
            Some(action) => self.apply_action(action),
            None => {
                trace!(name, "unknown command ignored");
                false
            }
        }
    }

    /// Check if the active piece can move by (`dx`, `dy`)
    pub fn can_move(&self, dx: i8, dy: i8) -> bool {
        self.active
            .map(|a| fits(&self.board, &a.translated(dx, dy)))
            .unwrap_or(false)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::rotate;
    use crate::types::PieceKind;

    fn started(seed: u32) -> GameState {
        let mut state = GameState::new(GameConfig::with_seed(seed));
        state.start();
        state.drain_events().for_each(drop);
        state
    }

    fn force_active(state: &mut GameState, piece: Piece) {
        state.active = Some(ActivePiece::spawn(piece));
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(GameConfig::with_seed(12345));

        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.paused);
        assert_eq!(state.score, 0);
        assert!(state.active.is_none());
        assert!(state.next.is_none());
        assert!(!state.timer.is_armed());
    }

    #[test]
    fn test_start_spawns_and_arms_timer() {
        let state = started(12345);

        assert_eq!(state.phase, Phase::Falling);
        let active = state.active.unwrap();
        assert_eq!(active.y, -2);
        assert_eq!(active.x, active.piece.spawn_x());
        assert!(state.next.is_some());
        assert!(state.timer.is_armed());
    }

    #[test]
    fn test_spawn_promotes_next_piece() {
        let mut state = started(7);
        let next = state.next.unwrap();

        state.hard_drop();

        assert_eq!(state.active.unwrap().piece, next);
        assert!(state.next.is_some());
    }

    #[test]
    fn test_tick_moves_down_one_row() {
        let mut state = started(3);
        let y0 = state.active.unwrap().y;

        assert!(state.tick());
        assert_eq!(state.active.unwrap().y, y0 + 1);
    }

    #[test]
    fn test_advance_uses_timer_interval() {
        let mut state = started(3);
        let y0 = state.active.unwrap().y;

        assert_eq!(state.advance(999), 0);
        assert_eq!(state.active.unwrap().y, y0);
        assert_eq!(state.advance(1), 1);
        assert_eq!(state.active.unwrap().y, y0 + 1);
    }

    #[test]
    fn test_o_piece_hard_drop_locks_at_bottom() {
        let mut state = started(1);
        force_active(&mut state, Piece::new(PieceKind::O));
        assert_eq!((state.active.unwrap().x, state.active.unwrap().y), (4, -2));

        assert_eq!(state.hard_drop(), 20);

        for y in 18..20 {
            for x in 0..10 {
                let expected = if x == 4 || x == 5 { Some(PieceKind::O) } else { None };
                assert_eq!(state.board.get(x, y), Some(expected), "({}, {})", x, y);
            }
        }
        assert_eq!(state.board.filled_count(), 4);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, Phase::Falling);
        assert!(state
            .drain_events()
            .any(|e| e == GameEvent::PieceLocked { kind: PieceKind::O }));
    }

    #[test]
    fn test_gravity_lock_matches_hard_drop() {
        let mut state = started(1);
        force_active(&mut state, Piece::new(PieceKind::O));

        // 20 moves to reach y = 18, the 21st tick locks.
        for _ in 0..20 {
            assert!(state.step_down());
        }
        assert_eq!(state.active.unwrap().y, 18);
        assert!(!state.step_down());
        assert!(state.board.is_occupied(4, 19));
        assert!(state.board.is_occupied(5, 18));
    }

    #[test]
    fn test_vertical_i_completes_bottom_row() {
        let mut state = started(1);
        state.board.fill_row_except(19, PieceKind::J, &[5]);
        state.active = Some(ActivePiece {
            piece: rotate(&Piece::new(PieceKind::I)),
            x: 3,
            y: -2,
        });

        state.hard_drop();

        assert_eq!(state.score, 100);
        assert_eq!(state.lines, 1);
        // Remaining three I cells shifted down one row; the J row is gone.
        for y in 17..20 {
            assert_eq!(state.board.get(5, y), Some(Some(PieceKind::I)));
        }
        assert_eq!(state.board.filled_count(), 3);
        assert!(!state.board.is_row_occupied(0));

        let events: Vec<_> = state.drain_events().collect();
        assert!(events.contains(&GameEvent::LinesCleared {
            count: 1,
            score_delta: 100
        }));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 100 }));
    }

    #[test]
    fn test_reset_mid_game() {
        let mut state = started(9);
        state.hard_drop();
        state.score = 500;
        state.lines = 3;
        assert!(!state.board.is_empty());
        let old_handle = state.timer_handle().unwrap();
        state.advance(600);

        state.reset();

        assert!(state.board.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert!(state.active.is_some());
        assert!(state.next.is_some());
        assert!(!state.paused);
        assert!(!state.timer.is_active(old_handle));
        assert!(state.timer.is_active(state.timer_handle().unwrap()));

        // The old schedule's 600ms are gone: only a full interval moves the piece.
        let y0 = state.active.unwrap().y;
        assert_eq!(state.advance(400), 0);
        assert_eq!(state.active.unwrap().y, y0);
        assert_eq!(state.advance(600), 1);
        assert_eq!(state.active.unwrap().y, y0 + 1);

        let events: Vec<_> = state.drain_events().collect();
        assert!(events.contains(&GameEvent::GameReset));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 0 }));
    }

    #[test]
    fn test_top_rows_after_merge_end_game() {
        let mut state = started(1);
        // Columns 4 and 5 filled from row 2 down; no row is full.
        for y in 2..20 {
            state.board.set(4, y, Some(PieceKind::S));
            state.board.set(5, y, Some(PieceKind::S));
        }
        force_active(&mut state, Piece::new(PieceKind::O));

        state.hard_drop();

        assert_eq!(state.phase, Phase::GameOver);
        assert!(state.game_over());
        assert!(!state.timer.is_armed());
        assert!(state.active.is_none());
        let events: Vec<_> = state.drain_events().collect();
        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_top_rows_check_uses_merged_board_before_clear() {
        let mut state = started(1);
        // Row 1 full except columns 4 and 5; the O rests on the columns below
        // and fills them at rows 0-1.
        state.board.fill_row_except(1, PieceKind::T, &[4, 5]);
        for y in 2..20 {
            state.board.set(4, y, Some(PieceKind::S));
            state.board.set(5, y, Some(PieceKind::S));
        }
        force_active(&mut state, Piece::new(PieceKind::O));

        state.hard_drop();

        // Row 1 was cleared and scored, but the merged piece touched the top rows.
        assert_eq!(state.lines, 1);
        assert_eq!(state.score, 100);
        assert!(state.game_over());
    }

    #[test]
    fn test_spawn_validation_failure_ends_game() {
        let mut state = started(1);
        // A vertical I reaches row 1 from the spawn buffer.
        state.next = Some(rotate(&Piece::new(PieceKind::I)));
        state.board.set(5, 1, Some(PieceKind::Z));

        assert!(!state.spawn_piece());
        assert!(state.game_over());
        assert!(!state.timer.is_armed());
    }

    #[test]
    fn test_game_over_ignores_moves_and_ticks() {
        let mut state = started(1);
        for y in 2..20 {
            state.board.set(4, y, Some(PieceKind::S));
        }
        force_active(&mut state, Piece::new(PieceKind::O));
        state.hard_drop();
        assert!(state.game_over());

        let board = state.board.clone();
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.tick());
        assert_eq!(state.advance(5000), 0);
        assert_eq!(state.board, board);

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.phase, Phase::Falling);
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_pause_suspends_ticks_and_moves() {
        let mut state = started(4);
        let before = state.active;

        assert!(state.apply_action(GameAction::Pause));
        assert!(state.paused);
        assert!(!state.tick());
        assert!(state.advance(3000) > 0);
        assert!(!state.apply_action(GameAction::MoveRight));
        assert!(!state.apply_action(GameAction::Rotate));
        assert_eq!(state.active, before);

        assert!(state.apply_action(GameAction::Pause));
        assert!(!state.paused);
        assert!(state.tick());

        let events: Vec<_> = state.drain_events().collect();
        assert_eq!(
            &events[..2],
            &[
                GameEvent::PauseToggled { paused: true },
                GameEvent::PauseToggled { paused: false }
            ]
        );
    }

    #[test]
    fn test_restart_while_paused_unpauses() {
        let mut state = started(4);
        state.apply_action(GameAction::Pause);
        assert!(state.apply_action(GameAction::Restart));
        assert!(!state.paused);
        assert!(state.playable());
    }

    #[test]
    fn test_move_stops_at_wall() {
        let mut state = started(12345);
        force_active(&mut state, Piece::new(PieceKind::O));

        let mut moved = 0;
        for _ in 0..10 {
            if state.apply_action(GameAction::MoveLeft) {
                moved += 1;
            }
        }
        assert_eq!(moved, 4);
        assert_eq!(state.active.unwrap().x, 0);
        assert!(!state.can_move(-1, 0));
    }

    #[test]
    fn test_rotation_rejected_leaves_piece() {
        let mut state = started(1);
        // Vertical I hugging the right wall; rotating back to horizontal overflows.
        let vertical = ActivePiece {
            piece: rotate(&Piece::new(PieceKind::I)),
            x: 7,
            y: 5,
        };
        state.active = Some(vertical);

        assert!(!state.apply_action(GameAction::Rotate));
        assert_eq!(state.active, Some(vertical));
    }

    #[test]
    fn test_rotation_applies_in_place() {
        let mut state = started(1);
        force_active(&mut state, Piece::new(PieceKind::T));
        state.try_move(0, 5);
        let before = state.active.unwrap();

        assert!(state.apply_action(GameAction::Rotate));
        let after = state.active.unwrap();
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert_eq!(after.piece, rotate(&before.piece));
    }

    #[test]
    fn test_soft_drop_locks_when_blocked() {
        let mut state = started(1);
        force_active(&mut state, Piece::new(PieceKind::O));
        state.try_move(0, 20);
        assert_eq!(state.active.unwrap().y, 18);

        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.board.filled_count(), 4);
        assert_eq!(state.active.unwrap().y, -2);
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let mut state = started(2);
        let before = state.snapshot();

        assert!(!state.apply_command("jump"));
        assert!(!state.apply_command(""));
        assert_eq!(state.snapshot(), before);

        assert!(state.apply_command("hardDrop"));
        assert_ne!(state.snapshot(), before);
    }

    #[test]
    fn test_actions_ignored_before_start() {
        let mut state = GameState::new(GameConfig::default());
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.tick());
        assert!(state.apply_action(GameAction::Restart));
        assert!(state.playable());
    }

    #[test]
    fn test_flush_events_into_sink() {
        let mut state = started(1);
        state.hard_drop();
        let mut sink: Vec<GameEvent> = Vec::new();
        state.flush_events(&mut sink);
        assert!(!sink.is_empty());
        assert_eq!(state.drain_events().count(), 0);
    }
}
