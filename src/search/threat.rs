//! Immediate threats: winning cells and open runs that must be answered
//!
//! Two questions are answered here, both by scanning empty cells in row-major
//! order so ties always resolve to the first cell found:
//! - where does a colour complete five right now
//! - which empty cell cuts the most live attacker threes
//!
//! Fours are not scored as threats: a four always leaves a cell where the
//! attacker completes five, and the win scan finds it first.

use crate::board::{Board, Pos, Stone};
use crate::rules::{check_win, DIRECTIONS, WIN_LENGTH};

/// Attacker stones a five-cell window needs before it counts as a threat
const THREAT_STONES: usize = 3;

/// Score per threatening window a cell lies in
const THREAT_WEIGHT: i32 = 100;

/// Result of scanning for the best blocking cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatResult {
    pub pos: Pos,
    pub score: i32,
}

/// Threat scanner with node statistics
#[derive(Debug, Default)]
pub struct ThreatSearcher {
    nodes: u64,
}

impl ThreatSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// First empty cell (row-major) where `color` completes five.
    pub fn find_winning_cell(&mut self, board: &Board, color: Stone) -> Option<Pos> {
        let mut scratch = *board;
        for pos in board.empty_cells() {
            self.nodes += 1;
            scratch.set(pos, color);
            let wins = check_win(&scratch, pos);
            scratch.set(pos, Stone::Empty);
            if wins {
                return Some(pos);
            }
        }
        None
    }

    /// Best cell for suppressing `attacker`'s open runs, if any cell scores.
    pub fn best_block(&mut self, board: &Board, attacker: Stone) -> Option<ThreatResult> {
        let mut best: Option<ThreatResult> = None;
        for pos in board.empty_cells() {
            self.nodes += 1;
            let score = threat_score(board, pos, attacker);
            if score > 0 && best.map_or(true, |b| score > b.score) {
                best = Some(ThreatResult { pos, score });
            }
        }
        best
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn reset_nodes(&mut self) {
        self.nodes = 0;
    }
}

/// How much occupying the empty `pos` suppresses `attacker`.
///
/// Along each axis every five-cell window through `pos` is checked. A window
/// still open to the attacker (no other colour in it) that already holds three
/// or more attacker stones, gaps allowed, is a live threat, and each one adds
/// `THREAT_WEIGHT`. Runs boxed in so that no five fits score nothing.
pub fn threat_score(board: &Board, pos: Pos, attacker: Stone) -> i32 {
    if !board.is_empty(pos) {
        return 0;
    }
    let span = WIN_LENGTH as i32;
    let mut score = 0;
    for &(dr, dc) in &DIRECTIONS {
        for start in (1 - span)..=0 {
            if let Some(stones) = window_stones(board, pos, dr, dc, start, attacker) {
                if stones >= THREAT_STONES {
                    score += THREAT_WEIGHT;
                }
            }
        }
    }
    score
}

/// Attacker stones in the five cells starting `start` steps from `pos`, or
/// `None` when the window leaves the board or holds a defender stone.
fn window_stones(board: &Board, pos: Pos, dr: i32, dc: i32, start: i32, attacker: Stone) -> Option<usize> {
    let mut stones = 0;
    for step in start..start + WIN_LENGTH as i32 {
        let cell = board.get(pos.offset(dr, dc, step)?);
        if cell == attacker {
            stones += 1;
        } else if cell != Stone::Empty {
            return None;
        }
    }
    Some(stones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_board(setup: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(r, c, stone) in setup {
            board.set(Pos::new(r, c), stone);
        }
        board
    }

    #[test]
    fn test_find_winning_cell_row_major() {
        let board = setup_board(&[
            (4, 4, Stone::White),
            (4, 5, Stone::White),
            (4, 6, Stone::White),
            (4, 7, Stone::White),
        ]);
        let mut searcher = ThreatSearcher::new();
        assert_eq!(
            searcher.find_winning_cell(&board, Stone::White),
            Some(Pos::new(4, 3))
        );
        assert_eq!(searcher.find_winning_cell(&board, Stone::Black), None);
        assert!(searcher.nodes() > 0);
    }

    #[test]
    fn test_find_winning_cell_gap() {
        let board = setup_board(&[
            (2, 2, Stone::Black),
            (3, 3, Stone::Black),
            (5, 5, Stone::Black),
            (6, 6, Stone::Black),
        ]);
        let mut searcher = ThreatSearcher::new();
        assert_eq!(
            searcher.find_winning_cell(&board, Stone::Black),
            Some(Pos::new(4, 4))
        );
    }

    #[test]
    fn test_threat_score_open_three() {
        let board = setup_board(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
        ]);
        // End cells lie in two live windows holding the three
        assert_eq!(threat_score(&board, Pos::new(7, 5), Stone::Black), 200);
        assert_eq!(threat_score(&board, Pos::new(7, 9), Stone::Black), 200);
        // One further out still caps the window (7,4)..(7,8)
        assert_eq!(threat_score(&board, Pos::new(7, 4), Stone::Black), 100);
        // Two further out sees at most two stones per window
        assert_eq!(threat_score(&board, Pos::new(7, 3), Stone::Black), 0);
        // Occupied cells never score
        assert_eq!(threat_score(&board, Pos::new(7, 7), Stone::Black), 0);
    }

    #[test]
    fn test_threat_score_blocked_far_end() {
        let board = setup_board(&[
            (7, 5, Stone::White),
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
        ]);
        assert_eq!(threat_score(&board, Pos::new(7, 9), Stone::Black), 100);
    }

    #[test]
    fn test_threat_score_dead_three() {
        // W B B B _ W: no five can ever fit, so the gap is worth nothing
        let board = setup_board(&[
            (7, 0, Stone::White),
            (7, 1, Stone::Black),
            (7, 2, Stone::Black),
            (7, 3, Stone::Black),
            (7, 5, Stone::White),
        ]);
        assert_eq!(threat_score(&board, Pos::new(7, 4), Stone::Black), 0);
        let mut searcher = ThreatSearcher::new();
        assert_eq!(searcher.best_block(&board, Stone::Black), None);
    }

    #[test]
    fn test_threat_score_broken_three() {
        // B B _ B with room on both sides: the gap is the key cell
        let board = setup_board(&[
            (3, 3, Stone::Black),
            (3, 4, Stone::Black),
            (3, 6, Stone::Black),
        ]);
        let gap = threat_score(&board, Pos::new(3, 5), Stone::Black);
        assert_eq!(gap, 200);
        assert!(gap > threat_score(&board, Pos::new(3, 2), Stone::Black));
        assert!(gap > threat_score(&board, Pos::new(3, 7), Stone::Black));
    }

    #[test]
    fn test_best_block_first_on_tie() {
        let board = setup_board(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
        ]);
        let mut searcher = ThreatSearcher::new();
        let result = searcher.best_block(&board, Stone::Black);
        assert_eq!(
            result,
            Some(ThreatResult {
                pos: Pos::new(7, 5),
                score: 200
            })
        );
    }

    #[test]
    fn test_best_block_nothing_to_block() {
        let board = setup_board(&[(7, 7, Stone::Black), (7, 8, Stone::Black)]);
        let mut searcher = ThreatSearcher::new();
        assert_eq!(searcher.best_block(&board, Stone::Black), None);
    }
}
