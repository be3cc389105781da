//! Search module for Gomoku AI
//!
//! Contains:
//! - Immediate win and threat scanning
//! - Shallow min/max look-ahead for positional play

pub mod lookahead;
pub mod threat;

pub use lookahead::{local_candidates, Lookahead, REPLY_CAP};
pub use threat::{threat_score, ThreatResult, ThreatSearcher};
