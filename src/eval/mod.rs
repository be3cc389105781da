//! Evaluation module for Gomoku AI
//!
//! Contains the heuristic evaluation function and pattern scoring.

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, position_bonus};
pub use patterns::{run_score, PatternScore};
