//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crossterm::style::Color;

use crate::core::{get_shape, GameSnapshot, Shape};
use crate::fb::{Cell, CellStyle, FrameBuffer};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Columns reserved to the right of the board for score, preview and help.
const PANEL_W: u16 = 18;
/// Gap between the board frame and the side panel.
const PANEL_GAP: u16 = 2;

const KEY_HELP: [&str; 7] = [
    "\u{2190} \u{2192}  move",
    "\u{2191}    rotate",
    "\u{2193}    soft drop",
    "SPC  hard drop",
    "P    pause",
    "R    restart",
    "Q    quit",
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Board origin and frame size for one render.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    frame_w: u16,
    frame_h: u16,
}

/// Draws the board, the falling piece, a side panel and overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let layout = self.layout(viewport);
        let board_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_h = (BOARD_HEIGHT as u16) * self.cell_h;

        fb.fill_rect(layout.x + 1, layout.y + 1, board_w, board_h, ' ', CellStyle::default());
        draw_border(fb, layout, CellStyle::fg(Color::Grey));

        for (y, row) in snap.board.iter().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                match PieceKind::from_id(id) {
                    Some(kind) => self.draw_block(fb, layout, x as u16, y as u16, kind),
                    None => self.fill_cell(
                        fb,
                        layout,
                        x as u16,
                        y as u16,
                        '\u{b7}',
                        CellStyle::fg(Color::DarkGrey).dim(),
                    ),
                }
            }
        }

        // Cells still in the spawn buffer (negative rows) are not drawn.
        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                if x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8 {
                    self.draw_block(fb, layout, x as u16, y as u16, active.kind);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);

        if snap.game_over {
            draw_overlay(fb, layout, "GAME OVER", "Press R to restart");
        } else if snap.paused {
            draw_overlay(fb, layout, "PAUSED", "Press P to resume");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = (BOARD_WIDTH as u16) * self.cell_w + 2;
        let frame_h = (BOARD_HEIGHT as u16) * self.cell_h + 2;

        // Centre board and panel together when there is room for both.
        let total_w = frame_w + PANEL_GAP + PANEL_W;
        let x = if viewport.width >= total_w {
            (viewport.width - total_w) / 2
        } else {
            viewport.width.saturating_sub(frame_w) / 2
        };

        Layout {
            x,
            y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, layout: Layout, x: u16, y: u16, kind: PieceKind) {
        self.fill_cell(fb, layout, x, y, '\u{2588}', CellStyle::fg(piece_color(kind)));
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = layout.x + 1 + cell_x * self.cell_w;
        let py = layout.y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        layout: Layout,
    ) {
        let panel_x = layout.x.saturating_add(layout.frame_w).saturating_add(PANEL_GAP);
        if panel_x.saturating_add(PANEL_W) > viewport.width {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::default();

        let mut y = layout.y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "LINES", label);
        fb.put_u32(panel_x, y + 1, snap.lines, value);
        y += 3;

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        match snap.next {
            Some(kind) => {
                let shape = get_shape(kind);
                self.draw_preview(fb, panel_x, y, &shape, kind);
            }
            None => {
                fb.put_char(panel_x, y, '-', value);
            }
        }
        // Tallest preview is the I matrix.
        y += 5;

        let help = CellStyle::fg(Color::DarkGrey);
        for line in KEY_HELP {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y += 1;
        }
    }

    /// Draw a shape matrix at a fixed position, one row per matrix row.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, shape: &Shape, kind: PieceKind) {
        let style = CellStyle::fg(piece_color(kind));
        for (dx, dy) in shape.filled() {
            let px = x + dx as u16 * self.cell_w;
            let py = y + dy as u16;
            fb.fill_rect(px, py, self.cell_w, 1, '\u{2588}', style);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, layout: Layout, style: CellStyle) {
    let Layout {
        x,
        y,
        frame_w: w,
        frame_h: h,
    } = layout;

    fb.put_char(x, y, '\u{250c}', style);
    fb.put_char(x + w - 1, y, '\u{2510}', style);
    fb.put_char(x, y + h - 1, '\u{2514}', style);
    fb.put_char(x + w - 1, y + h - 1, '\u{2518}', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '\u{2500}', style);
        fb.put_char(x + dx, y + h - 1, '\u{2500}', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '\u{2502}', style);
        fb.put_char(x + w - 1, y + dy, '\u{2502}', style);
    }
}

/// Centre a title and a hint line over the board.
fn draw_overlay(fb: &mut FrameBuffer, layout: Layout, title: &str, hint: &str) {
    let mid_y = layout.y.saturating_add(layout.frame_h / 2);
    let centred = |text: &str| {
        let text_w = text.chars().count() as u16;
        layout.x.saturating_add(layout.frame_w.saturating_sub(text_w) / 2)
    };

    fb.put_str(centred(title), mid_y, title, CellStyle::fg(Color::White).bold());
    fb.put_str(centred(hint), mid_y + 1, hint, CellStyle::default());
}

/// Plain terminal palette colour for each piece kind
pub fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::T => Color::Magenta,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
        PieceKind::J => Color::Blue,
        PieceKind::L => Color::DarkYellow,
    }
}
