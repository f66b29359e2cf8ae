//! Collision checks for placing a piece on the board.
//!
//! All functions here are pure and can be called speculatively (rotation
//! previews, hard-drop simulation).

use crate::board::Board;
use crate::pieces::{ActivePiece, Piece};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Check whether `piece` fits with its matrix origin at (`x`, `y`).
///
/// Every filled cell must land in a column within `[0, WIDTH)` and a row below
/// `HEIGHT`. Rows above the board (negative) are always allowed; rows on the
/// board must be empty. Unfilled matrix cells impose nothing.
pub fn is_valid_move(board: &Board, piece: &Piece, x: i8, y: i8) -> bool {
    fits_at(board, piece, x as i16, y as i16)
}

/// [`is_valid_move`] for an already-positioned piece
pub fn fits(board: &Board, active: &ActivePiece) -> bool {
    is_valid_move(board, &active.piece, active.x, active.y)
}

/// How many rows the piece can fall before it would collide
///
/// Never more than the distance from `y` to the floor.
pub fn drop_distance(board: &Board, active: &ActivePiece) -> u8 {
    let (x, y) = (active.x as i16, active.y as i16);
    let max = (BOARD_HEIGHT as i16 - y).max(0);
    (1..=max)
        .take_while(|&d| fits_at(board, &active.piece, x, y + d))
        .count() as u8
}

/// Coordinates are widened so cells far outside the board cannot overflow.
fn fits_at(board: &Board, piece: &Piece, x: i16, y: i16) -> bool {
    piece.shape.filled().all(|(dx, dy)| {
        let bx = x + dx as i16;
        let by = y + dy as i16;
        (0..BOARD_WIDTH as i16).contains(&bx)
            && by < BOARD_HEIGHT as i16
            && (by < 0 || board.is_empty_at(bx as i8, by as i8))
    })
}
