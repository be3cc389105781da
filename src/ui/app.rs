//! Main application for the Gomoku GUI

use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};
use tracing::{error, info, warn};

use super::board_view::BoardView;
use super::theme::*;
use super::Launch;
use crate::config::AppConfig;
use crate::engine::SearchType;
use crate::error::NetworkError;
use crate::game::{GameState, GameStatus, SharedGame};
use crate::network::{self, NetworkSession, SessionStatus};
use crate::persist::{load_game, save_game};
use crate::rules::winning_line;
use crate::{Pos, Stone, BOARD_SIZE};

/// How often the UI wakes up to show clocks and remote moves
const REFRESH: Duration = Duration::from_millis(100);

/// A connection being set up, polled once per frame. Dropping it cancels.
struct PendingConnection {
    label: String,
    started: Instant,
    kind: PendingKind,
}

enum PendingKind {
    /// Non-blocking listener; dropping it frees the port
    Hosting(TcpListener),
    /// Connect running on a worker thread; the session is built on the UI
    /// thread once the stream arrives
    Joining(Receiver<Result<TcpStream, NetworkError>>),
}

/// Main Gomoku application
pub struct GomokuApp {
    game: SharedGame,
    session: Option<NetworkSession>,
    pending: Option<PendingConnection>,
    board_view: BoardView,
    config: AppConfig,
    join_addr: String,
    message: Option<String>,
    show_debug: bool,
}

impl GomokuApp {
    /// Create the app and start any network connection requested on the
    /// command line
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, launch: Launch) -> Self {
        let state = if config.ai.enabled {
            GameState::with_ai(config.ai.color, config.ai.difficulty)
        } else {
            let mut state = GameState::new();
            state.set_ai_color(config.ai.color);
            state.set_difficulty(config.ai.difficulty);
            state
        };

        let mut app = Self {
            game: SharedGame::new(state),
            session: None,
            pending: None,
            board_view: BoardView::default(),
            join_addr: format!("127.0.0.1:{}", config.network.port),
            config,
            message: None,
            show_debug: false,
        };

        match launch {
            Launch::Local => {}
            Launch::Host { port } => app.start_hosting(port),
            Launch::Join { addr } => {
                app.join_addr = addr.clone();
                app.start_joining(addr);
            }
        }
        app
    }

    fn is_networked(&self) -> bool {
        self.session.is_some() || self.pending.is_some()
    }

    // ------------------------------------------------------------------
    // Session control
    // ------------------------------------------------------------------

    fn new_game(&mut self) {
        self.game.reset();
        self.message = None;
    }

    fn undo(&mut self) {
        if self.is_networked() {
            self.message = Some("Undo is disabled in network games".into());
        } else if !self.game.undo() {
            self.message = Some("Nothing to undo".into());
        }
    }

    fn save(&mut self) {
        let record = self.game.with(|s| s.record());
        self.message = Some(match save_game(&self.config.save_path, &record) {
            Ok(()) => format!("Saved to {}", self.config.save_path.display()),
            Err(err) => {
                error!(%err, "save failed");
                err.to_string()
            }
        });
    }

    fn load(&mut self) {
        if self.is_networked() {
            self.message = Some("Loading is disabled in network games".into());
            return;
        }
        self.message = Some(match load_game(&self.config.save_path) {
            Ok(record) if record.is_consistent() => {
                self.game.with_mut(|s| {
                    s.restore(record);
                    // Let the AI answer if the save stopped on its turn
                    let vs_ai = s.vs_ai();
                    s.set_vs_ai(vs_ai);
                });
                format!("Loaded {}", self.config.save_path.display())
            }
            Ok(_) => {
                warn!("saved game failed consistency check");
                "Saved game is corrupt".into()
            }
            Err(err) => {
                error!(%err, "load failed");
                err.to_string()
            }
        });
    }

    fn start_hosting(&mut self, port: u16) {
        let listener = NetworkSession::listen(port).and_then(|listener| {
            listener.set_nonblocking(true)?;
            Ok(listener)
        });
        let listener = match listener {
            Ok(listener) => listener,
            Err(err) => {
                error!(%err, port, "could not listen");
                self.message = Some(format!("Cannot host on port {port}: {err}"));
                return;
            }
        };
        self.game.with_mut(|s| {
            s.set_vs_ai(false);
            s.reset();
        });
        self.pending = Some(PendingConnection {
            label: format!("Hosting on port {port}, waiting for guest"),
            started: Instant::now(),
            kind: PendingKind::Hosting(listener),
        });
    }

    fn start_joining(&mut self, addr: String) {
        self.game.with_mut(|s| s.set_vs_ai(false));
        let timeout = self.config.network.connect_timeout();
        let (tx, rx) = mpsc::channel();
        let label = format!("Connecting to {addr}");
        thread::spawn(move || {
            // A cancelled join drops the receiver; the stream is then dropped here
            let _ = tx.send(network::connect(&addr, timeout));
        });
        self.pending = Some(PendingConnection {
            label,
            started: Instant::now(),
            kind: PendingKind::Joining(rx),
        });
    }

    fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
        self.pending = None;
        self.message = Some("Disconnected".into());
    }

    /// Poll the pending connection and the live session once per frame
    fn poll_network(&mut self) {
        let polled = match self.pending.as_ref().map(|p| &p.kind) {
            Some(PendingKind::Hosting(listener)) => {
                NetworkSession::try_host(listener, self.game.clone()).transpose()
            }
            Some(PendingKind::Joining(rx)) => match rx.try_recv() {
                Ok(Ok(stream)) => Some(NetworkSession::guest(stream, self.game.clone())),
                Ok(Err(err)) => Some(Err(err)),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(NetworkError::Disconnected)),
            },
            None => None,
        };
        if let Some(result) = polled {
            self.pending = None;
            match result {
                Ok(session) => {
                    info!(role = ?session.role(), "network game started");
                    let color = session.role().local_color();
                    self.message = Some(format!("Connected, you play {}", color.name()));
                    self.session = Some(session);
                }
                Err(err) => {
                    error!(%err, "connection failed");
                    self.message = Some(format!("Connection failed: {err}"));
                }
            }
        }

        let dropped = self
            .session
            .as_ref()
            .is_some_and(|s| s.status() == SessionStatus::Disconnected);
        if dropped {
            if let Some(mut session) = self.session.take() {
                session.close();
            }
            self.message = Some("Opponent disconnected".into());
        }
    }

    fn handle_click(&mut self, pos: Pos) {
        let (row, col) = (pos.row as usize, pos.col as usize);
        let accepted = match &self.session {
            Some(session) => session.play_local(row, col),
            None => self.game.place_piece(row, col),
        };
        if accepted {
            self.message = None;
        } else if self.session.is_some() {
            self.message = Some("Wait for your opponent".into());
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                let networked = self.is_networked();
                ui.menu_button("Game", |ui| {
                    if ui.add_enabled(!networked, egui::Button::new("New Game (N)")).clicked() {
                        self.new_game();
                        ui.close_menu();
                    }
                    if ui.add_enabled(!networked, egui::Button::new("Undo (U)")).clicked() {
                        self.undo();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save (S)").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    if ui.add_enabled(!networked, egui::Button::new("Load (L)")).clicked() {
                        self.load();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "AI Debug (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (vs_ai, ai_color, difficulty) =
                        self.game.with(|s| (s.vs_ai(), s.ai_color(), s.difficulty()));
                    let mode_text = match (&self.session, vs_ai) {
                        (Some(session), _) => {
                            format!("Network - You: {}", session.role().local_color().name())
                        }
                        (None, true) => format!("vs AI ({difficulty}) - AI: {}", ai_color.name()),
                        (None, false) => "Hotseat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info and controls
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.label(RichText::new("GOMOKU").size(22.0).strong().color(TEXT_PRIMARY));
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);
                self.render_timer_card(ui);
                ui.add_space(10.0);
                self.render_actions_card(ui);
                ui.add_space(10.0);
                self.render_network_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                let status = self.game.with(|s| s.status());
                if status.is_over() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui, status);
                }

                if let Some(msg) = &self.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn button(ui: &mut egui::Ui, enabled: bool, text: &str) -> bool {
        ui.add_enabled(
            enabled,
            egui::Button::new(RichText::new(text).size(12.0).color(TEXT_PRIMARY)).fill(BUTTON_BG),
        )
        .clicked()
    }

    /// Render turn indicator card
    fn render_turn_card(&self, ui: &mut egui::Ui) {
        let (turn, over, moves) = self.game.with(|s| (s.current_player(), s.game_over(), s.move_count()));
        let local = self.session.as_ref().map(|s| s.role().local_color());

        Self::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(40.0, 40.0), egui::Sense::hover());
                let fill = if turn == Stone::Black { BLACK_STONE } else { WHITE_STONE };
                ui.painter().circle_filled(rect.center(), 18.0, fill);

                ui.add_space(12.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(turn.name().to_uppercase()).size(18.0).strong().color(TEXT_PRIMARY));
                    let (text, color) = if over {
                        ("Game over", WIN_HIGHLIGHT)
                    } else if self.pending.is_some() {
                        ("Waiting for connection", STATUS_WAIT)
                    } else if local.is_some_and(|c| c != turn) {
                        ("Opponent's turn", STATUS_WAIT)
                    } else {
                        ("Your turn", STATUS_OK)
                    };
                    ui.label(RichText::new(text).size(12.0).color(color));
                });
            });
            ui.add_space(6.0);
            ui.label(RichText::new(format!("Move #{moves}")).size(11.0).color(TEXT_SECONDARY));
        });
    }

    /// Per-player thinking time
    fn render_timer_card(&self, ui: &mut egui::Ui) {
        let (black, white) = self.game.with(|s| {
            (s.live_player_time(Stone::Black), s.live_player_time(Stone::White))
        });

        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIME").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            for (name, elapsed) in [("Black", black), ("White", white)] {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(name).size(13.0).color(TEXT_SECONDARY));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{:.1}s", elapsed.as_secs_f32()))
                                .size(16.0)
                                .color(TEXT_PRIMARY),
                        );
                    });
                });
            }
        });
    }

    /// Undo, new game, AI mode, difficulty, save and load
    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        let networked = self.is_networked();
        let (vs_ai, ai_color, difficulty) =
            self.game.with(|s| (s.vs_ai(), s.ai_color(), s.difficulty()));

        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if Self::button(ui, !networked, "Undo") {
                    self.undo();
                }
                if Self::button(ui, !networked, "New Game") {
                    self.new_game();
                }
            });

            ui.horizontal(|ui| {
                let label = if vs_ai { "vs AI: ON" } else { "vs AI: OFF" };
                if Self::button(ui, !networked, label) {
                    self.game.with_mut(|s| s.set_vs_ai(!vs_ai));
                }
                if Self::button(ui, !networked, &format!("AI: {}", ai_color.name())) {
                    self.game.with_mut(|s| s.set_ai_color(ai_color.opponent()));
                }
            });

            ui.horizontal(|ui| {
                if Self::button(ui, !networked, &format!("Difficulty: {difficulty}")) {
                    self.game.with_mut(|s| s.set_difficulty(difficulty.next()));
                }
            });

            ui.horizontal(|ui| {
                if Self::button(ui, true, "Save") {
                    self.save();
                }
                if Self::button(ui, !networked, "Load") {
                    self.load();
                }
            });
        });
    }

    fn render_network_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("NETWORK").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            if let Some(pending) = &self.pending {
                ui.label(RichText::new(&pending.label).size(11.0).color(STATUS_WAIT));
                ui.label(
                    RichText::new(format!("{:.0}s", pending.started.elapsed().as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_MUTED),
                );
                if Self::button(ui, true, "Cancel") {
                    self.pending = None;
                }
                return;
            }

            if let Some(session) = &self.session {
                let text = format!("Connected as {}", session.role().local_color().name());
                ui.label(RichText::new(text).size(11.0).color(STATUS_OK));
                if Self::button(ui, true, "Disconnect") {
                    self.disconnect();
                }
                return;
            }

            let port = self.config.network.port;
            if Self::button(ui, true, &format!("Host (port {port})")) {
                self.start_hosting(port);
            }
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut self.join_addr).desired_width(130.0));
                if Self::button(ui, !self.join_addr.trim().is_empty(), "Join") {
                    let addr = self.join_addr.trim().to_string();
                    self.start_joining(addr);
                }
            });
        });
    }

    /// Render the last AI search
    fn render_debug_card(&self, ui: &mut egui::Ui) {
        let last = self.game.with(|s| s.last_ai_result().cloned());

        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let Some(result) = last else {
                ui.label(RichText::new("No AI move yet").size(10.0).color(TEXT_MUTED));
                return;
            };

            let tier = match result.search_type {
                SearchType::ImmediateWin => "Immediate win",
                SearchType::Block => "Block five",
                SearchType::ThreatBlock => "Block threat",
                SearchType::Positional => "Positional",
            };
            ui.label(RichText::new(tier).size(11.0).strong().color(STATUS_OK));
            ui.label(
                RichText::new(format!(
                    "Score: {}  {}ms  {} nodes",
                    result.score, result.time_ms, result.nodes
                ))
                .size(10.0)
                .color(TEXT_SECONDARY),
            );
            if let Some(pos) = result.best_move {
                let col = (b'A' + pos.col) as char;
                let row = BOARD_SIZE - pos.row as usize;
                ui.label(RichText::new(format!("-> {col}{row}")).size(12.0).strong().color(WIN_HIGHLIGHT));
            }
        });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, status: GameStatus) {
        let headline = match status.winner() {
            Some(winner) => format!("{} WINS!", winner.name().to_uppercase()),
            None => "DRAW".to_string(),
        };
        let networked = self.is_networked();

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(TEXT_SECONDARY));
                    ui.add_space(6.0);
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.add_space(10.0);
                    if Self::button(ui, !networked, "New Game") {
                        self.new_game();
                    }
                });
            });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        let (board, turn, last_move, status) = self
            .game
            .with(|s| (*s.board(), s.current_player(), s.last_move(), s.status()));
        let line = match (status, last_move) {
            (GameStatus::Won(_), Some(pos)) => winning_line(&board, pos),
            _ => None,
        };
        let interactive = !status.is_over() && self.pending.is_none();

        let clicked = CentralPanel::default()
            .frame(Frame::new().fill(egui::Color32::from_rgb(40, 42, 46)))
            .show(ctx, |ui| {
                self.board_view
                    .show(ui, &board, turn, last_move, line.as_deref(), interactive)
            })
            .inner;

        if let Some(pos) = clicked {
            self.handle_click(pos);
        }
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        // Keys are ignored while typing an address
        if ctx.wants_keyboard_input() {
            return;
        }
        let (debug, undo, new, save, load) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::U),
                i.key_pressed(egui::Key::N),
                i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::L),
            )
        });

        if debug {
            self.show_debug = !self.show_debug;
        }
        if undo {
            self.undo();
        }
        if new && !self.is_networked() {
            self.new_game();
        }
        if save {
            self.save();
        }
        if load {
            self.load();
        }
    }
}

impl eframe::App for GomokuApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.poll_network();

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        ctx.request_repaint_after(REFRESH);
    }
}
