//! Gomoku GUI
//!
//! Play hotseat, against the AI, or against another player over the network.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gomoku::config::AppConfig;
use gomoku::ui::{GomokuApp, Launch};
use gomoku::{Difficulty, Stone};

/// Colour choice on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ColorArg {
    Black,
    White,
}

impl From<ColorArg> for Stone {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Black => Stone::Black,
            ColorArg::White => Stone::White,
        }
    }
}

/// Gomoku on a 15x15 board
#[derive(Parser, Debug)]
#[command(name = "gomoku", about = "Gomoku (five in a row) with AI and network play")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "gomoku.toml")]
    config: PathBuf,

    /// AI strength
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Start in hotseat mode without the AI
    #[arg(long)]
    no_ai: bool,

    /// Colour the AI plays
    #[arg(long, value_enum)]
    ai_color: Option<ColorArg>,

    /// Host a network game on this port
    #[arg(long, conflicts_with = "join")]
    host: Option<u16>,

    /// Join a network game at host:port
    #[arg(long)]
    join: Option<String>,

    /// Where Save/Load read and write the game
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(difficulty) = self.difficulty {
            config.ai.difficulty = difficulty;
        }
        if let Some(color) = self.ai_color {
            config.ai.color = color.into();
        }
        if self.no_ai || self.host.is_some() || self.join.is_some() {
            config.ai.enabled = false;
        }
        if let Some(path) = &self.save_path {
            config.save_path = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }

    fn launch(&self) -> Launch {
        match (&self.host, &self.join) {
            (Some(port), _) => Launch::Host { port: *port },
            (None, Some(addr)) => Launch::Join { addr: addr.clone() },
            (None, None) => Launch::Local,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);
    config.validate().context("invalid settings")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let launch = cli.launch();
    info!(?launch, ai = config.ai.enabled, difficulty = %config.ai.difficulty, "starting gomoku");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Gomoku"),
        ..Default::default()
    };

    eframe::run_native(
        "Gomoku",
        options,
        Box::new(move |cc| Ok(Box::new(GomokuApp::new(cc, config, launch)))),
    )
    .map_err(|e| anyhow!("GUI failed: {e}"))
}
