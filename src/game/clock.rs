//! Per-player thinking time

use std::time::{Duration, Instant};

use crate::board::Stone;

/// Accumulated time per player plus the start of the running turn
#[derive(Debug, Clone)]
pub struct PlayerClock {
    black: Duration,
    white: Duration,
    turn_started: Instant,
}

impl Default for PlayerClock {
    fn default() -> Self {
        Self {
            black: Duration::ZERO,
            white: Duration::ZERO,
            turn_started: Instant::now(),
        }
    }
}

impl PlayerClock {
    /// Restart the running turn without charging anyone
    pub fn restart(&mut self) {
        self.turn_started = Instant::now();
    }

    /// Charge the time since the last move to `player` and restart
    pub fn charge(&mut self, player: Stone) -> Duration {
        let elapsed = self.turn_started.elapsed();
        if let Some(total) = self.slot_mut(player) {
            *total += elapsed;
        }
        self.turn_started = Instant::now();
        elapsed
    }

    /// Accumulated time, excluding the running turn
    pub fn total(&self, player: Stone) -> Duration {
        match player {
            Stone::Black => self.black,
            Stone::White => self.white,
            Stone::Empty => Duration::ZERO,
        }
    }

    /// Time on the running turn
    pub fn running(&self) -> Duration {
        self.turn_started.elapsed()
    }

    pub fn set_totals(&mut self, black: Duration, white: Duration) {
        self.black = black;
        self.white = white;
        self.restart();
    }

    fn slot_mut(&mut self, player: Stone) -> Option<&mut Duration> {
        match player {
            Stone::Black => Some(&mut self.black),
            Stone::White => Some(&mut self.white),
            Stone::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_accumulates_for_player() {
        let mut clock = PlayerClock::default();
        std::thread::sleep(Duration::from_millis(5));
        let charged = clock.charge(Stone::Black);
        assert!(charged >= Duration::from_millis(5));
        assert_eq!(clock.total(Stone::Black), charged);
        assert_eq!(clock.total(Stone::White), Duration::ZERO);
    }

    #[test]
    fn test_set_totals() {
        let mut clock = PlayerClock::default();
        clock.set_totals(Duration::from_secs(3), Duration::from_secs(4));
        assert_eq!(clock.total(Stone::Black), Duration::from_secs(3));
        assert_eq!(clock.total(Stone::White), Duration::from_secs(4));
        assert_eq!(clock.total(Stone::Empty), Duration::ZERO);
    }
}
