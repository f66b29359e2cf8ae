//! Scoring module - line clear detection and points
//!
//! Points depend only on how many rows are cleared at once:
//! 1 → 100, 2 → 300, 3 → 500, 4 → 800. Larger counts cannot happen with
//! four-cell pieces on this board, but the table is still total: every row
//! past the fourth adds [`EXTRA_LINE_SCORE`].

use crate::board::{Board, ClearedRows};
use crate::types::{EXTRA_LINE_SCORE, LINE_SCORES};

/// Result of clearing full rows from a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// Board after removal and refill
    pub board: Board,
    /// Removed row indices, bottom to top (indices refer to the input board)
    pub rows: ClearedRows,
    pub lines_cleared: u32,
    pub score_delta: u32,
}

/// Points for clearing `lines` rows at once
pub fn line_clear_score(lines: u32) -> u32 {
    let last = LINE_SCORES.len() - 1;
    match LINE_SCORES.get(lines as usize) {
        Some(&points) => points,
        None => LINE_SCORES[last]
            .saturating_add(EXTRA_LINE_SCORE.saturating_mul(lines - last as u32)),
    }
}

/// Remove every full row from a copy of `board` and compute the score delta.
pub fn clear_lines(board: &Board) -> LineClear {
    let mut board = board.clone();
    let rows = board.clear_full_rows();
    let lines_cleared = rows.len() as u32;
    LineClear {
        board,
        rows,
        lines_cleared,
        score_delta: line_clear_score(lines_cleared),
    }
}
