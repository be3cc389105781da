//! Game rules for standard Gomoku
//!
//! Five or more in a row wins; there are no captures or forbidden moves.

pub mod win;

pub use win::{check_win, run_length, winning_line, DIRECTIONS, WIN_LENGTH};
