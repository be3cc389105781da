//! Two-player play over TCP
//!
//! One message per line, JSON encoded. The host listens and plays Black, the
//! guest connects and plays White. Right after connecting the guest asks for
//! the host's full game and adopts it, which is also how a guest recovers
//! after reconnecting.
//!
//! Inbound messages are handled on a dedicated receiver thread. Every
//! outbound message is written while the game lock is held, so the order on
//! the wire always matches the order of state changes.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::board::Stone;
use crate::error::NetworkError;
use crate::game::{GameRecord, GameState, Move, NetworkRole, SharedGame};

/// Default port the host listens on
pub const DEFAULT_PORT: u16 = 5555;

/// Everything that travels over the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// `seq` is the move count before the move
    Move {
        seq: usize,
        row: usize,
        col: usize,
        player: Stone,
    },
    SyncRequest,
    Sync { record: GameRecord },
}

impl WireMessage {
    fn encode(&self) -> Result<String, NetworkError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Connected,
    Disconnected,
}

/// Write half of the connection plus its liveness flag
#[derive(Debug)]
struct Link {
    writer: Mutex<TcpStream>,
    connected: AtomicBool,
}

impl Link {
    fn send(&self, msg: &WireMessage) -> Result<(), NetworkError> {
        if !self.is_connected() {
            return Err(NetworkError::Disconnected);
        }
        let line = msg.encode()?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let result = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush());
        if let Err(err) = result {
            error!(%err, "send failed");
            self.mark_disconnected();
            return Err(err.into());
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn mark_disconnected(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            info!("peer disconnected");
        }
    }

    fn shutdown(&self) {
        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writer.shutdown(Shutdown::Both) {
            debug!(%err, "socket already closed");
        }
        drop(writer);
        self.mark_disconnected();
    }
}

/// A connected pairing with one remote player.
pub struct NetworkSession {
    role: NetworkRole,
    game: SharedGame,
    link: Arc<Link>,
    receiver: Option<JoinHandle<()>>,
}

impl NetworkSession {
    /// Bind the host's listening socket on every interface.
    pub fn listen(port: u16) -> Result<TcpListener, NetworkError> {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        info!(port, "waiting for a guest");
        Ok(listener)
    }

    /// Block until a guest connects, then start the session as host (Black).
    pub fn host(listener: &TcpListener, game: SharedGame) -> Result<Self, NetworkError> {
        let (stream, peer) = listener.accept()?;
        info!(%peer, "guest connected");
        Self::from_stream(stream, NetworkRole::host(), game)
    }

    /// Poll a non-blocking listener once. `Ok(None)` means no guest yet; the
    /// game is left untouched until one arrives.
    pub fn try_host(listener: &TcpListener, game: SharedGame) -> Result<Option<Self>, NetworkError> {
        match listener.accept() {
            Ok((stream, peer)) => {
                stream.set_nonblocking(false)?;
                info!(%peer, "guest connected");
                Self::from_stream(stream, NetworkRole::host(), game).map(Some)
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Connect to a host as guest (White) and request its game.
    pub fn join(addr: &str, timeout: Duration, game: SharedGame) -> Result<Self, NetworkError> {
        let stream = connect(addr, timeout)?;
        info!(%addr, "connected to host");
        Self::guest(stream, game)
    }

    /// Start the guest side over a stream from [`connect`].
    pub fn guest(stream: TcpStream, game: SharedGame) -> Result<Self, NetworkError> {
        let session = Self::from_stream(stream, NetworkRole::guest(), game)?;
        session.request_sync()?;
        Ok(session)
    }

    /// Start a session over an already connected stream.
    pub fn from_stream(
        stream: TcpStream,
        role: NetworkRole,
        game: SharedGame,
    ) -> Result<Self, NetworkError> {
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        let link = Arc::new(Link {
            writer: Mutex::new(stream),
            connected: AtomicBool::new(true),
        });

        game.with_mut(|state| state.set_network_role(Some(role)));

        let receiver = {
            let game = game.clone();
            let link = Arc::clone(&link);
            thread::Builder::new()
                .name("gomoku-net".into())
                .spawn(move || receive_loop(reader, role, game, link))?
        };

        Ok(Self {
            role,
            game,
            link,
            receiver: Some(receiver),
        })
    }

    pub fn role(&self) -> NetworkRole {
        self.role
    }

    pub fn status(&self) -> SessionStatus {
        if self.link.is_connected() {
            SessionStatus::Connected
        } else {
            SessionStatus::Disconnected
        }
    }

    /// Place a local stone and relay it to the peer.
    ///
    /// Refused while disconnected or while it is the peer's turn. A send
    /// failure only disconnects the session; the move stays on the board.
    pub fn play_local(&self, row: usize, col: usize) -> bool {
        match self.try_play_local(row, col) {
            Ok(_) => true,
            Err(err) => {
                debug!(%err, row, col, "local move refused");
                false
            }
        }
    }

    fn try_play_local(&self, row: usize, col: usize) -> Result<Move, NetworkError> {
        if !self.link.is_connected() {
            return Err(NetworkError::Disconnected);
        }
        let local = self.role.local_color();
        self.game.with_mut(|state| {
            if state.current_player() != local || state.game_over() {
                return Err(NetworkError::NotYourTurn);
            }
            let seq = state.move_count();
            let mv = state
                .try_place(row, col)
                .map_err(|source| NetworkError::Rejected { row, col, source })?;
            if let Err(err) = self.send_move(seq, &mv) {
                warn!(%err, "move placed locally but not delivered");
            }
            Ok(mv)
        })
    }

    /// Relay an accepted move. Fire-and-forget: a failure marks the session
    /// disconnected.
    pub fn send_move(&self, seq: usize, mv: &Move) -> Result<(), NetworkError> {
        self.link.send(&WireMessage::Move {
            seq,
            row: mv.row,
            col: mv.col,
            player: mv.player,
        })
    }

    /// Ask the host for its full game.
    pub fn request_sync(&self) -> Result<(), NetworkError> {
        self.link.send(&WireMessage::SyncRequest)
    }

    /// Shut the socket down and join the receiver thread. Idempotent.
    pub fn close(&mut self) {
        self.link.shutdown();
        if let Some(handle) = self.receiver.take() {
            if handle.join().is_err() {
                error!("network receiver panicked");
            }
            self.game.with_mut(|state| state.set_network_role(None));
            info!("session closed");
        }
    }
}

impl Drop for NetworkSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolve `addr` and connect to the first address that answers.
pub fn connect(addr: &str, timeout: Duration) -> Result<TcpStream, NetworkError> {
    let addrs: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "address resolved to nothing");
    for candidate in addrs {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                debug!(%candidate, %err, "connect attempt failed");
                last_err = err;
            }
        }
    }
    Err(last_err.into())
}

/// Check a remote move against the local game without applying it.
pub fn validate_remote_move(
    state: &GameState,
    remote: Stone,
    seq: usize,
    player: Stone,
) -> Result<(), NetworkError> {
    if player != remote {
        return Err(NetworkError::WrongPlayer {
            expected: remote,
            got: player,
        });
    }
    if seq != state.move_count() {
        return Err(NetworkError::StaleSequence {
            expected: state.move_count(),
            got: seq,
        });
    }
    if state.current_player() != player {
        return Err(NetworkError::WrongPlayer {
            expected: state.current_player(),
            got: player,
        });
    }
    Ok(())
}

/// Marks the link dead however the receiver exits, including by panic.
struct DisconnectOnExit<'a>(&'a Link);

impl Drop for DisconnectOnExit<'_> {
    fn drop(&mut self) {
        self.0.mark_disconnected();
    }
}

fn receive_loop(reader: BufReader<TcpStream>, role: NetworkRole, game: SharedGame, link: Arc<Link>) {
    let _exit = DisconnectOnExit(link.as_ref());
    for line in reader.lines() {
        match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(&line, role, &game, &link),
            Err(err) => {
                if link.is_connected() {
                    error!(%err, "receive failed");
                }
                break;
            }
        }
    }
}

fn handle_line(line: &str, role: NetworkRole, game: &SharedGame, link: &Link) {
    let msg: WireMessage = match serde_json::from_str(line) {
        Ok(msg) => msg,
        Err(err) => {
            warn!(%err, "discarding malformed message");
            return;
        }
    };

    match msg {
        WireMessage::Move {
            seq,
            row,
            col,
            player,
        } => {
            let result = game.with_mut(|state| {
                validate_remote_move(state, role.remote_color(), seq, player)?;
                state
                    .try_place(row, col)
                    .map_err(|source| NetworkError::Rejected { row, col, source })
            });
            match result {
                Ok(mv) => debug!(row = mv.row, col = mv.col, seq, "remote move applied"),
                Err(err) => warn!(%err, "discarding remote move"),
            }
        }
        WireMessage::SyncRequest if role.is_host() => {
            game.with(|state| {
                let record = state.record();
                if let Err(err) = link.send(&WireMessage::Sync { record }) {
                    warn!(%err, "could not answer sync request");
                }
            });
        }
        WireMessage::Sync { record } if !role.is_host() => {
            if !record.is_consistent() {
                warn!("discarding inconsistent sync record");
                return;
            }
            game.with_mut(|state| state.restore(record));
            info!("synchronised with host");
        }
        other => warn!(?other, "discarding message not meant for this side"),
    }
}
