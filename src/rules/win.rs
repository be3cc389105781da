//! Five-in-a-row detection
//!
//! Standard Gomoku: five or more stones in a row win (overlines allowed).
//! Only the four axes through the just-played cell are scanned, so a check is
//! bounded by 4 directions x 8 cells no matter how full the board is.

use crate::board::{Board, Pos, Stone};

/// Direction vectors for line checking (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Stones needed in a row to win
pub const WIN_LENGTH: usize = 5;

/// Count contiguous `color` stones from `pos` (exclusive) along (dr, dc),
/// stopping after `max` steps, at the edge or at the first other cell.
#[inline]
pub fn run_length(board: &Board, pos: Pos, dr: i32, dc: i32, color: Stone, max: i32) -> i32 {
    let mut count = 0;
    for step in 1..=max {
        match pos.offset(dr, dc, step) {
            Some(p) if board.get(p) == color => count += 1,
            _ => break,
        }
    }
    count
}

/// Check whether the stone at `pos` completes five or more in a row.
///
/// The cell must already hold the candidate player's stone; an empty cell
/// never wins.
#[inline]
pub fn check_win(board: &Board, pos: Pos) -> bool {
    let color = board.get(pos);
    if color == Stone::Empty {
        return false;
    }
    let reach = WIN_LENGTH as i32 - 1;
    DIRECTIONS.iter().any(|&(dr, dc)| {
        let count = 1
            + run_length(board, pos, dr, dc, color, reach)
            + run_length(board, pos, -dr, -dc, color, reach);
        count >= WIN_LENGTH as i32
    })
}

/// Find the winning line through `pos`, if any.
///
/// Returns every contiguous stone on the first winning axis, ordered from
/// one end to the other. Used to highlight the line in the UI.
pub fn winning_line(board: &Board, pos: Pos) -> Option<Vec<Pos>> {
    let color = board.get(pos);
    if color == Stone::Empty {
        return None;
    }

    for &(dr, dc) in &DIRECTIONS {
        let back = run_length(board, pos, -dr, -dc, color, i32::MAX);
        let fwd = run_length(board, pos, dr, dc, color, i32::MAX);
        if (1 + back + fwd) as usize >= WIN_LENGTH {
            let line = (-back..=fwd)
                .filter_map(|step| pos.offset(dr, dc, step))
                .collect();
            return Some(line);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(stones: &[(u8, u8)], color: Stone) -> Board {
        let mut board = Board::new();
        for &(r, c) in stones {
            board.set(Pos::new(r, c), color);
        }
        board
    }

    #[test]
    fn test_four_in_row_not_win() {
        let board = board_with(&[(7, 3), (7, 4), (7, 5), (7, 6)], Stone::Black);
        for c in 3..7 {
            assert!(!check_win(&board, Pos::new(7, c)));
        }
    }

    #[test]
    fn test_five_in_row_every_axis() {
        let axes: [Vec<(u8, u8)>; 4] = [
            (0..5).map(|i| (7, 2 + i)).collect(),
            (0..5).map(|i| (2 + i, 7)).collect(),
            (0..5).map(|i| (2 + i, 2 + i)).collect(),
            (0..5).map(|i| (2 + i, 10 - i)).collect(),
        ];
        for line in axes {
            let board = board_with(&line, Stone::White);
            for &(r, c) in &line {
                assert!(check_win(&board, Pos::new(r, c)), "{:?} at ({r},{c})", line);
            }
        }
    }

    #[test]
    fn test_six_in_row_also_wins() {
        let stones: Vec<_> = (0..6).map(|i| (4, 4 + i)).collect();
        let board = board_with(&stones, Stone::Black);
        assert!(check_win(&board, Pos::new(4, 6)));
        assert_eq!(winning_line(&board, Pos::new(4, 6)).map(|l| l.len()), Some(6));
    }

    #[test]
    fn test_gap_breaks_line() {
        // B B _ B B B
        let board = board_with(&[(7, 0), (7, 1), (7, 3), (7, 4), (7, 5)], Stone::Black);
        assert!(!check_win(&board, Pos::new(7, 3)));
    }

    #[test]
    fn test_opponent_stone_breaks_line() {
        let mut board = board_with(&[(7, 0), (7, 1), (7, 3), (7, 4)], Stone::Black);
        board.set(Pos::new(7, 2), Stone::White);
        assert!(!check_win(&board, Pos::new(7, 2)));
        assert!(!check_win(&board, Pos::new(7, 1)));
    }

    #[test]
    fn test_five_at_board_edge_and_corner() {
        let bottom: Vec<_> = (0..5).map(|i| (14, i)).collect();
        let board = board_with(&bottom, Stone::Black);
        assert!(check_win(&board, Pos::new(14, 0)));

        let corner: Vec<_> = (0..5).map(|i| (10 + i, 10 + i)).collect();
        let board = board_with(&corner, Stone::White);
        assert!(check_win(&board, Pos::new(14, 14)));
    }

    #[test]
    fn test_empty_cell_never_wins() {
        let board = Board::new();
        assert!(!check_win(&board, Pos::center()));
        assert!(winning_line(&board, Pos::center()).is_none());
    }

    #[test]
    fn test_winning_line_ordered() {
        let stones: Vec<_> = (0..5).map(|i| (2 + i, 10 - i)).collect();
        let board = board_with(&stones, Stone::White);
        let line = winning_line(&board, Pos::new(4, 8)).unwrap();
        assert_eq!(line.len(), 5);
        assert_eq!(line.first(), Some(&Pos::new(2, 10)));
        assert_eq!(line.last(), Some(&Pos::new(6, 6)));
    }

    #[test]
    fn test_run_length_respects_max() {
        let stones: Vec<_> = (0..8).map(|i| (0, i)).collect();
        let board = board_with(&stones, Stone::Black);
        assert_eq!(run_length(&board, Pos::new(0, 0), 0, 1, Stone::Black, 4), 4);
        assert_eq!(run_length(&board, Pos::new(0, 0), 0, -1, Stone::Black, 4), 0);
    }
}
