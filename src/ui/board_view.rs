//! Board rendering for the Gomoku GUI
//!
//! All geometry lives in [`Geometry`]: the 15 lines span the largest square
//! that fits the panel, and the margin scales with the cell so the labels
//! never collide with the outer stones.

use crate::{Board, Pos, Stone, BOARD_SIZE};
use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use super::theme::*;

/// Lines on the board minus one
const SPAN: f32 = (BOARD_SIZE - 1) as f32;

/// Cell indices of the star points on each axis: 4th line from each edge
/// plus the centre line
const STAR_LINES: [u8; 3] = [3, (BOARD_SIZE / 2) as u8, (BOARD_SIZE - 4) as u8];

/// Screen placement of the grid
#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    /// Screen position of intersection (0, 0)
    origin: Pos2,
    /// Distance between neighbouring lines
    cell: f32,
}

impl Geometry {
    /// Fit the grid into `rect`, keeping a margin of `margin_cells` cells
    /// around it for labels.
    fn fit(rect: Rect, margin_cells: f32) -> Self {
        let side = rect.width().min(rect.height());
        let cell = side / (SPAN + 2.0 * margin_cells);
        Self {
            origin: rect.min + Vec2::splat(cell * margin_cells),
            cell,
        }
    }

    fn to_screen(self, pos: Pos) -> Pos2 {
        self.origin + Vec2::new(f32::from(pos.col), f32::from(pos.row)) * self.cell
    }

    /// Nearest intersection to a screen point, if it lies on the board
    fn to_board(self, point: Pos2) -> Option<Pos> {
        let rel = (point - self.origin) / self.cell;
        let (col, row) = (rel.x.round() as i32, rel.y.round() as i32);
        Pos::is_valid(row, col).then(|| Pos::new(row as u8, col as u8))
    }

    /// Grid rectangle through the outermost lines
    fn grid_rect(self) -> Rect {
        Rect::from_min_size(self.origin, Vec2::splat(SPAN * self.cell))
    }

    fn stone_radius(self) -> f32 {
        self.cell * STONE_RADIUS_RATIO
    }
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    geometry: Geometry,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            geometry: Geometry {
                origin: Pos2::ZERO,
                cell: 30.0,
            },
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked empty cell, if any.
    ///
    /// Clicks are ignored unless `interactive` is set.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        board: &Board,
        current_turn: Stone,
        last_move: Option<Pos>,
        winning_line: Option<&[Pos]>,
        interactive: bool,
    ) -> Option<Pos> {
        let available = ui.available_size();
        let side = available.x.min(available.y) - 20.0;
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::click());

        self.geometry = Geometry::fit(response.rect, BOARD_MARGIN_CELLS);
        painter.rect_filled(response.rect, CornerRadius::same(4), BOARD_BG);

        self.draw_grid(&painter);
        self.draw_labels(&painter);
        for (pos, stone) in board.stones() {
            self.draw_stone(&painter, pos, stone);
        }
        if let Some(pos) = last_move {
            painter.circle_filled(self.geometry.to_screen(pos), LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
        }
        if let Some(line) = winning_line {
            self.draw_winning_line(&painter, line);
        }

        if !interactive {
            return None;
        }
        let target = response
            .hover_pos()
            .and_then(|p| self.geometry.to_board(p))
            .filter(|&p| board.is_empty(p))?;

        painter.circle_filled(
            self.geometry.to_screen(target),
            self.geometry.stone_radius(),
            hover_stone(current_turn),
        );
        response.clicked().then_some(target)
    }

    /// Outer frame, inner lines and star points
    fn draw_grid(&self, painter: &Painter) {
        let g = self.geometry;
        let grid = g.grid_rect();

        for i in 0..BOARD_SIZE {
            // The outermost lines frame the board and are drawn heavier
            let width = if i == 0 || i == BOARD_SIZE - 1 {
                GRID_LINE_WIDTH * 2.0
            } else {
                GRID_LINE_WIDTH
            };
            let stroke = Stroke::new(width, GRID_LINE);
            let at = i as f32 * g.cell;
            let x = grid.min.x + at;
            let y = grid.min.y + at;
            painter.line_segment([Pos2::new(x, grid.min.y), Pos2::new(x, grid.max.y)], stroke);
            painter.line_segment([Pos2::new(grid.min.x, y), Pos2::new(grid.max.x, y)], stroke);
        }

        let mid = STAR_LINES[1];
        for row in STAR_LINES {
            for col in STAR_LINES {
                // Four corner points and the centre
                if (row == mid) == (col == mid) {
                    painter.circle_filled(g.to_screen(Pos::new(row, col)), STAR_POINT_RADIUS, STAR_POINT);
                }
            }
        }
    }

    /// Columns A-O along the top and bottom, rows 15-1 down both sides
    fn draw_labels(&self, painter: &Painter) {
        let g = self.geometry;
        let grid = g.grid_rect();
        let font = FontId::proportional((g.cell * 0.4).clamp(9.0, 14.0));
        let gap = g.cell * 0.75;

        for i in 0..BOARD_SIZE {
            let at = i as f32 * g.cell;

            let letter = char::from(b'A' + i as u8).to_string();
            let x = grid.min.x + at;
            for y in [grid.min.y - gap, grid.max.y + gap] {
                painter.text(Pos2::new(x, y), Align2::CENTER_CENTER, &letter, font.clone(), GRID_LINE);
            }

            let number = (BOARD_SIZE - i).to_string();
            let y = grid.min.y + at;
            for x in [grid.min.x - gap, grid.max.x + gap] {
                painter.text(Pos2::new(x, y), Align2::CENTER_CENTER, &number, font.clone(), GRID_LINE);
            }
        }
    }

    fn draw_stone(&self, painter: &Painter, pos: Pos, stone: Stone) {
        let (fill, shadow_alpha) = match stone {
            Stone::Black => (BLACK_STONE, 60),
            Stone::White => (WHITE_STONE, 40),
            Stone::Empty => return,
        };
        let center = self.geometry.to_screen(pos);
        let r = self.geometry.stone_radius();

        painter.circle_filled(
            center + Vec2::splat(r * 0.12),
            r,
            Color32::from_rgba_unmultiplied(0, 0, 0, shadow_alpha),
        );
        painter.circle_filled(center, r, fill);
        if stone == Stone::Black {
            painter.circle_filled(center - Vec2::splat(r * 0.3), r * 0.2, BLACK_STONE_HIGHLIGHT);
        } else {
            painter.circle_stroke(center, r * 0.85, Stroke::new(r * 0.1, WHITE_STONE_SHADOW));
        }
    }

    /// Connect the five (or more) and ring each stone
    fn draw_winning_line(&self, painter: &Painter, line: &[Pos]) {
        let stroke = Stroke::new(4.0, WIN_HIGHLIGHT);
        let points: Vec<Pos2> = line.iter().map(|&p| self.geometry.to_screen(p)).collect();

        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            painter.line_segment([first, last], stroke);
        }
        let ring = self.geometry.stone_radius() + 3.0;
        for point in points {
            painter.circle_stroke(point, ring, stroke);
        }
    }
}
