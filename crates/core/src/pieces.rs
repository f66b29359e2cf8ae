//! Pieces module - tetromino shape matrices and rotation
//!
//! Each piece is a square boolean matrix of size 2, 3 or 4. Only the spawn
//! orientation is stored; every other orientation is computed by rotating the
//! matrix. There are no wall kicks: a rotation that does not fit is rejected by
//! the caller.

use crate::types::{PieceKind, BOARD_WIDTH, SPAWN_Y};

/// Largest matrix dimension used by any piece
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square shape matrix with an explicit size.
///
/// Cells outside `size x size` are always empty, so two shapes compare equal
/// only when their sizes and filled cells match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from rows of `0`/`1`.
    ///
    /// Panics if `rows` is not square or larger than [`MAX_SHAPE_SIZE`]; only
    /// used with the constant catalog below.
    const fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(N >= 1 && N <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < N {
            let mut c = 0;
            while c < N {
                cells[r][c] = rows[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self {
            size: N as u8,
            cells,
        }
    }

    /// Matrix dimension (2, 3 or 4)
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether the cell at (`col`, `row`) is filled. Out-of-range cells are empty.
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.size as usize && row < self.size as usize && self.cells[row][col]
    }

    /// Iterate filled cells as `(dx, dy)` offsets from the matrix origin.
    pub fn filled(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let n = self.size as usize;
        (0..n).flat_map(move |row| {
            (0..n).filter_map(move |col| self.cells[row][col].then_some((col as i8, row as i8)))
        })
    }

    /// Rotate 90° clockwise: `new[r][c] = old[size - 1 - c][r]`.
    pub fn rotated(&self) -> Self {
        let n = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in cells.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - c][r];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }
}

const I_SHAPE: Shape = Shape::from_rows([
    [0, 0, 0, 0],
    [1, 1, 1, 1],
    [0, 0, 0, 0],
    [0, 0, 0, 0],
]);
const J_SHAPE: Shape = Shape::from_rows([[1, 0, 0], [1, 1, 1], [0, 0, 0]]);
const L_SHAPE: Shape = Shape::from_rows([[0, 0, 1], [1, 1, 1], [0, 0, 0]]);
const O_SHAPE: Shape = Shape::from_rows([[1, 1], [1, 1]]);
const S_SHAPE: Shape = Shape::from_rows([[0, 1, 1], [1, 1, 0], [0, 0, 0]]);
const T_SHAPE: Shape = Shape::from_rows([[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
const Z_SHAPE: Shape = Shape::from_rows([[1, 1, 0], [0, 1, 1], [0, 0, 0]]);

/// Canonical (spawn orientation) shape for a piece kind
pub fn get_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::Z => Z_SHAPE,
    }
}

/// An immutable piece: its kind (colour identity) and current shape matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
}

impl Piece {
    /// Create a piece in its canonical orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: get_shape(kind),
        }
    }

    /// Spawn column: horizontally centred on the board
    pub fn spawn_x(&self) -> i8 {
        (BOARD_WIDTH / 2) as i8 - (self.shape.size() / 2) as i8
    }
}

/// Rotate a piece 90° clockwise, keeping its kind and matrix size.
pub fn rotate(piece: &Piece) -> Piece {
    Piece {
        kind: piece.kind,
        shape: piece.shape.rotated(),
    }
}

/// The falling piece and its board position.
///
/// `y` may be negative while the piece is still in the spawn buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// Place a piece at its spawn position
    pub fn spawn(piece: Piece) -> Self {
        Self {
            x: piece.spawn_x(),
            y: SPAWN_Y,
            piece,
        }
    }

    /// Same piece moved by (`dx`, `dy`), saturating at the `i8` range
    pub fn translated(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    /// Same position, piece rotated clockwise
    pub fn rotated(&self) -> Self {
        Self {
            piece: rotate(&self.piece),
            ..*self
        }
    }

    /// Absolute board coordinates of every filled cell, saturating at the
    /// `i8` range (saturated cells are never on the board)
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.piece
            .shape
            .filled()
            .map(move |(dx, dy)| (self.x.saturating_add(dx), self.y.saturating_add(dy)))
    }
}
