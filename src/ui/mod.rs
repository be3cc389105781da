//! GUI module for the Gomoku game
//!
//! This module provides a native Rust GUI using egui/eframe.

mod app;
mod board_view;
mod theme;

pub use app::GomokuApp;

/// How the app starts: local play, or a network game as host or guest
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Launch {
    #[default]
    Local,
    Host { port: u16 },
    Join { addr: String },
}
