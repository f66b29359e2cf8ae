//! Board tests - storage, merging and row removal

use meowtris::core::{ActivePiece, Board, Piece};
use meowtris::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Fill row `y` with `kind` except the `holes` columns.
fn fill_row(board: &mut Board, y: i8, kind: PieceKind, holes: &[i8]) {
    for x in 0..BOARD_WIDTH as i8 {
        if !holes.contains(&x) {
            board.set(x, y, Some(kind));
        }
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert!(board.is_empty());

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_empty_at(x, y), "Cell ({}, {}) should be empty", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();

    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));
    assert!(board.is_occupied(5, 10));

    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));
}

#[test]
fn test_board_set_out_of_bounds() {
    let mut board = Board::new();

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, -1, Some(PieceKind::T)));
    assert!(!board.set(BOARD_WIDTH as i8, 0, Some(PieceKind::T)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, Some(PieceKind::T)));
    assert!(board.is_empty());
}

#[test]
fn test_merge_writes_piece_kind() {
    let mut board = Board::new();
    let active = ActivePiece {
        piece: Piece::new(PieceKind::O),
        x: 3,
        y: 5,
    };

    assert_eq!(board.merge(&active), 4);

    assert_eq!(board.get(3, 5), Some(Some(PieceKind::O)));
    assert_eq!(board.get(4, 5), Some(Some(PieceKind::O)));
    assert_eq!(board.get(3, 6), Some(Some(PieceKind::O)));
    assert_eq!(board.get(4, 6), Some(Some(PieceKind::O)));
    assert_eq!(board.filled_count(), 4);
}

#[test]
fn test_merge_partially_above_board() {
    let mut board = Board::new();
    // T at y = -1: top cell is off the board, bottom three land in row 0.
    let active = ActivePiece {
        piece: Piece::new(PieceKind::T),
        x: 0,
        y: -1,
    };

    assert_eq!(board.merge(&active), 3);
    assert!(board.is_row_occupied(0));
    assert!(board.top_rows_occupied());
}

#[test]
fn test_board_is_row_full() {
    let mut board = Board::new();
    assert!(!board.is_row_full(5));

    fill_row(&mut board, 5, PieceKind::T, &[]);
    assert!(board.is_row_full(5));

    fill_row(&mut board, 6, PieceKind::I, &[9]);
    assert!(!board.is_row_full(6));
    assert!(board.is_row_occupied(6));

    assert!(!board.is_row_full(BOARD_HEIGHT as usize));
}

#[test]
fn test_board_clear_full_rows() {
    let mut board = Board::new();
    fill_row(&mut board, 18, PieceKind::I, &[]);
    fill_row(&mut board, 19, PieceKind::O, &[]);
    board.set(0, 17, Some(PieceKind::T));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[19, 18]);

    // The T dropped by the two rows cleared beneath it.
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_board_clear_multiple_rows_order() {
    let mut board = Board::new();
    fill_row(&mut board, 5, PieceKind::T, &[]);
    fill_row(&mut board, 10, PieceKind::I, &[]);
    fill_row(&mut board, 15, PieceKind::O, &[]);

    board.set(0, 4, Some(PieceKind::J));
    board.set(0, 9, Some(PieceKind::L));
    board.set(0, 14, Some(PieceKind::S));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.len(), 3);

    // Each marker drops by the number of full rows below it.
    assert_eq!(board.get(0, 7), Some(Some(PieceKind::J)));
    assert_eq!(board.get(0, 11), Some(Some(PieceKind::L)));
    assert_eq!(board.get(0, 15), Some(Some(PieceKind::S)));
    assert_eq!(board.filled_count(), 3);
}

#[test]
fn test_adjacent_full_rows_with_partial_between() {
    let mut board = Board::new();
    fill_row(&mut board, 19, PieceKind::I, &[]);
    fill_row(&mut board, 18, PieceKind::L, &[]);
    fill_row(&mut board, 17, PieceKind::J, &[3]);
    fill_row(&mut board, 16, PieceKind::I, &[]);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[19, 18, 16]);

    // Only the partial row survives, at the bottom, with its hole intact.
    assert!(board.is_row_occupied(19));
    assert_eq!(board.get(3, 19), Some(None));
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::J)));
    assert_eq!(board.filled_count(), 9);
}

#[test]
fn test_board_clear() {
    let mut board = Board::new();
    fill_row(&mut board, 5, PieceKind::T, &[]);

    board.clear();
    assert!(board.is_empty());
}

#[test]
fn test_board_cells_reference() {
    let board = Board::new();
    assert_eq!(
        board.cells().len(),
        BOARD_HEIGHT as usize * BOARD_WIDTH as usize
    );
    assert_eq!(board.row(0).len(), BOARD_WIDTH as usize);
}
