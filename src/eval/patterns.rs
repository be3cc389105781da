//! Pattern scores for Gomoku evaluation
//!
//! Weights for runs by length and number of open ends. Each step up is worth
//! roughly ten of the step below so one strong shape outweighs a pile of weak
//! ones.

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five in a row - immediate win
    pub const FIVE: i32 = 100_000;

    /// Open four: _OOOO_ (cannot be stopped)
    pub const OPEN_FOUR: i32 = 10_000;
    /// Closed four: XOOOO_ or _OOOOX (one way to extend)
    pub const CLOSED_FOUR: i32 = 1_000;

    /// Open three: _OOO_
    pub const OPEN_THREE: i32 = 1_000;
    /// Closed three: XOOO_ or _OOOX
    pub const CLOSED_THREE: i32 = 100;

    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 100;
    /// Closed two: XOO_ or _OOX
    pub const CLOSED_TWO: i32 = 10;

    /// Lone stone with both ends open
    pub const OPEN_ONE: i32 = 2;
}

/// Score a contiguous run by its length and open ends.
///
/// A run with no open end can never grow into five and scores nothing,
/// unless it already is five.
pub fn run_score(count: i32, open_ends: i32) -> i32 {
    match (count, open_ends) {
        (5.., _) => PatternScore::FIVE,
        (_, 0) => 0,
        (4, 2) => PatternScore::OPEN_FOUR,
        (4, _) => PatternScore::CLOSED_FOUR,
        (3, 2) => PatternScore::OPEN_THREE,
        (3, _) => PatternScore::CLOSED_THREE,
        (2, 2) => PatternScore::OPEN_TWO,
        (2, _) => PatternScore::CLOSED_TWO,
        (1, 2) => PatternScore::OPEN_ONE,
        _ => 0,
    }
}
