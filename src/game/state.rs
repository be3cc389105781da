//! The game aggregate and its placement state machine

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{
    GameRecord, GameStatus, Move, MoveHistory, NetworkRole, PlayerClock, PlayerTimes, Snapshot,
};
use crate::board::{Board, Pos, Stone};
use crate::engine::{AiPlayer, Difficulty, MoveResult};
use crate::error::MoveError;
use crate::rules::check_win;

/// Main game state
///
/// Invariants kept by every transition:
/// - `status` is exactly one of in progress, won by a player, or drawn
/// - `current_player` alternates while the game is in progress
/// - stones on the board == entries in `history`
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_player: Stone,
    status: GameStatus,
    last_move: Option<Pos>,
    history: MoveHistory,
    clock: PlayerClock,

    // Mode flags
    vs_ai: bool,
    ai_color: Stone,
    difficulty: Difficulty,
    network_role: Option<NetworkRole>,

    last_ai_result: Option<MoveResult>,
    rng: StdRng,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Hotseat game, Black to move
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Stone::Black,
            status: GameStatus::InProgress,
            last_move: None,
            history: MoveHistory::new(),
            clock: PlayerClock::default(),
            vs_ai: false,
            ai_color: Stone::White,
            difficulty: Difficulty::default(),
            network_role: None,
            last_ai_result: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Game against the AI. If the AI plays Black it opens immediately.
    pub fn with_ai(ai_color: Stone, difficulty: Difficulty) -> Self {
        let mut state = Self::new();
        state.ai_color = ai_color;
        state.difficulty = difficulty;
        state.vs_ai = true;
        state.run_post_move_hook();
        state
    }

    /// Make the AI's random perturbation reproducible
    pub fn seed_ai(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ------------------------------------------------------------------
    // Query surface
    // ------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Stone {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn game_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn winner(&self) -> Option<Stone> {
        self.status.winner()
    }

    pub fn last_move(&self) -> Option<Pos> {
        self.last_move
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Accumulated time, excluding the running turn
    pub fn player_time(&self, player: Stone) -> Duration {
        self.clock.total(player)
    }

    /// Accumulated time including the running turn, for display
    pub fn live_player_time(&self, player: Stone) -> Duration {
        let total = self.clock.total(player);
        if !self.game_over() && player == self.current_player {
            total + self.clock.running()
        } else {
            total
        }
    }

    pub fn vs_ai(&self) -> bool {
        self.vs_ai
    }

    pub fn ai_color(&self) -> Stone {
        self.ai_color
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn network_role(&self) -> Option<NetworkRole> {
        self.network_role
    }

    pub fn last_ai_result(&self) -> Option<&MoveResult> {
        self.last_ai_result.as_ref()
    }

    /// Check if it's the AI's turn
    pub fn is_ai_turn(&self) -> bool {
        self.vs_ai && !self.game_over() && self.current_player == self.ai_color
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Single entry point for placing a stone for the player to move.
    ///
    /// Returns `false` without touching the state when the game is over,
    /// the coordinates are off the board or the cell is occupied. In AI mode
    /// an accepted move may be followed by the AI's reply before returning.
    #[instrument(skip(self), fields(player = ?self.current_player))]
    pub fn place_piece(&mut self, row: usize, col: usize) -> bool {
        match self.try_place(row, col) {
            Ok(_) => true,
            Err(err) => {
                debug!(%err, "placement rejected");
                false
            }
        }
    }

    /// Like `place_piece`, but reports why a move was rejected
    pub fn try_place(&mut self, row: usize, col: usize) -> Result<Move, MoveError> {
        let mv = self.apply_move(row, col)?;
        self.run_post_move_hook();
        Ok(mv)
    }

    /// The one guarded transition shared by human, AI and remote moves.
    fn apply_move(&mut self, row: usize, col: usize) -> Result<Move, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        let pos = Pos::try_new(row, col)?;
        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied { row, col });
        }

        let player = self.current_player;
        self.clock.charge(player);
        self.history.record(self.snapshot());

        self.board.set(pos, player);
        self.last_move = Some(pos);

        if check_win(&self.board, pos) {
            self.status = GameStatus::Won(player);
            info!(winner = player.name(), moves = self.history.len(), "game won");
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
            info!("game drawn, board full");
        } else {
            self.current_player = player.opponent();
        }

        Ok(Move::new(pos, player))
    }

    /// After-move hook: lets the AI answer when it is now its turn.
    fn run_post_move_hook(&mut self) {
        if !self.is_ai_turn() {
            return;
        }

        let ai = AiPlayer::new(self.difficulty);
        let result = ai.select_move(&self.board, self.ai_color, &mut self.rng);

        if let Some(pos) = result.best_move {
            match self.apply_move(pos.row as usize, pos.col as usize) {
                Ok(mv) => debug!(row = mv.row, col = mv.col, tier = ?result.search_type, "ai replied"),
                Err(err) => warn!(%err, "ai produced an illegal move"),
            }
        }
        self.last_ai_result = Some(result);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            current_player: self.current_player,
            status: self.status,
            last_move: self.last_move,
        }
    }

    /// Undo the last move, or the last human+AI pair in AI mode.
    ///
    /// The game comes back exactly as it stood before the earliest undone
    /// move, so the stone count always equals the history length.
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(mut restored) = self.history.pop() else {
            debug!("undo requested with empty history");
            return false;
        };

        // The AI auto-responded: take back the human move it answered too.
        if self.vs_ai
            && restored.mover() == self.ai_color
            && self
                .history
                .peek()
                .is_some_and(|prev| prev.mover() != self.ai_color)
        {
            if let Some(prev) = self.history.pop() {
                restored = prev;
            }
        }

        if self.history.is_empty() {
            self.reset();
            return true;
        }

        self.board = restored.board;
        self.current_player = restored.current_player;
        self.status = restored.status;
        self.last_move = restored.last_move;
        self.clock.restart();
        debug!(moves = self.history.len(), "undo");
        true
    }

    /// Back to the empty board with Black to move. Mode flags are kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Stone::Black;
        self.status = GameStatus::InProgress;
        self.last_move = None;
        self.history.clear();
        self.clock = PlayerClock::default();
        self.last_ai_result = None;
        info!("new game");

        self.run_post_move_hook();
    }

    pub fn set_vs_ai(&mut self, enabled: bool) {
        self.vs_ai = enabled;
        if enabled {
            self.network_role = None;
            self.run_post_move_hook();
        }
    }

    pub fn set_ai_color(&mut self, color: Stone) {
        if color == Stone::Empty {
            warn!("ignoring empty ai color");
            return;
        }
        self.ai_color = color;
        self.run_post_move_hook();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Enter or leave network play. A network game never has an AI.
    pub fn set_network_role(&mut self, role: Option<NetworkRole>) {
        if role.is_some() {
            self.vs_ai = false;
        }
        self.network_role = role;
    }

    // ------------------------------------------------------------------
    // Persistence boundary
    // ------------------------------------------------------------------

    pub fn record(&self) -> GameRecord {
        GameRecord {
            board: self.board,
            current_player: self.current_player,
            status: self.status,
            last_move: self.last_move,
            history: self.history.clone(),
            vs_ai: self.vs_ai,
            ai_color: self.ai_color,
            difficulty: self.difficulty,
            player_times: PlayerTimes::from_durations(
                self.clock.total(Stone::Black),
                self.clock.total(Stone::White),
            ),
        }
    }

    /// Replace the game with a saved or resynchronised record.
    ///
    /// The network role is left untouched so a guest stays a guest after a
    /// resync.
    pub fn restore(&mut self, record: GameRecord) {
        self.board = record.board;
        self.current_player = record.current_player;
        self.status = record.status;
        self.last_move = record.last_move;
        self.history = record.history;
        self.ai_color = record.ai_color;
        self.difficulty = record.difficulty;
        self.vs_ai = record.vs_ai && self.network_role.is_none();
        self.clock
            .set_totals(record.player_times.black(), record.player_times.white());
        self.last_ai_result = None;
        info!(moves = self.history.len(), "game restored");
    }
}
