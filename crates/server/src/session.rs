//! Per-connection session controller.
//!
//! One websocket connection owns one `Game`. Three event sources converge
//! on it: the gravity ticker, the command reader and restart requests.
//! All mutations happen under the game's mutex, and every outbound frame
//! goes through a single writer task so writes never interleave.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use blockfall::{Command, Direction, Game, GameMode, TetrixField};

use crate::config::ServerConfig;
use crate::routes::AppState;

/// Tick period of the decoration field, independent of any game.
const TETRIX_PERIOD: Duration = Duration::from_millis(150);

/// Drives one game session until the client disconnects or a transport
/// error occurs. Gameplay commands are ignored after game over; restart
/// is accepted at any time.
pub async fn run(socket: WebSocket, mode: GameMode, state: AppState) {
    let config = Arc::clone(&state.config);
    log::info!("session started in mode {}", mode.name);

    let game = Arc::new(Mutex::new(new_game(mode.clone(), &state)));

    let (ws_tx, mut ws_rx) = socket.split();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();
    let (restart_tx, mut restart_rx) = mpsc::unbounded_channel::<GameMode>();

    let writer = tokio::spawn(write_frames(ws_tx, out_rx));

    // Queued before the reader exists, so the initial snapshot always
    // reaches the client ahead of any command-triggered frame.
    if let Some(text) = encode(&game.lock().snapshot()) {
        let _ = out_tx.send(text);
    }

    // Command reader: decodes frames, mutates the game under its lock and
    // emits a snapshot for every command that changed state. A malformed
    // frame ends the session like a disconnect would.
    let reader = {
        let game = Arc::clone(&game);
        let out_tx = out_tx.clone();
        let default_mode = mode.clone();
        tokio::spawn(async move {
            while let Some(Ok(message)) = ws_rx.next().await {
                let text = match message {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };
                let command = match Command::decode(&text) {
                    Ok(command) => command,
                    Err(err) => {
                        log::warn!("closing session: {}", err);
                        break;
                    }
                };
                if let Command::Restart { mode } = command {
                    let mode = mode
                        .as_deref()
                        .map(GameMode::from_name)
                        .unwrap_or_else(|| default_mode.clone());
                    if restart_tx.send(mode).is_err() {
                        break;
                    }
                    continue;
                }
                let snapshot = {
                    let mut game = game.lock();
                    let changed = apply_command(&mut game, &command);
                    changed.then(|| game.snapshot())
                };
                if let Some(snapshot) = snapshot {
                    let Some(text) = encode(&snapshot) else { break };
                    if out_tx.send(text).is_err() {
                        break;
                    }
                }
            }
        })
    };

    let mut ticker = gravity_ticker(config.base_period, mode.fall_speed);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = {
                    let mut game = game.lock();
                    game.step();
                    game.snapshot()
                };
                let Some(text) = encode(&snapshot) else { break };
                if out_tx.send(text).is_err() {
                    break;
                }
            }
            restart = restart_rx.recv() => {
                // the channel closes when the reader stops
                let Some(mode) = restart else { break };
                log::info!("restarting in mode {}", mode.name);
                let fall_speed = mode.fall_speed;
                let snapshot = {
                    let mut game = game.lock();
                    *game = new_game(mode, &state);
                    game.snapshot()
                };
                // recreated before the next select pass, so the old
                // period never fires against the new game
                ticker = gravity_ticker(config.base_period, fall_speed);
                let Some(text) = encode(&snapshot) else { break };
                if out_tx.send(text).is_err() {
                    break;
                }
            }
        }
    }

    reader.abort();
    writer.abort();
    log::info!("session closed");
}

/// Streams the decoration field to a client. Inbound frames are ignored
/// apart from close.
pub async fn run_tetrix(socket: WebSocket, state: AppState) {
    let mut field = TetrixField::new(session_rng(&state.config));
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut ticker = tokio::time::interval(TETRIX_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                field.step();
                let Some(text) = encode(&field.snapshot()) else { break };
                if ws_tx.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }
}

/// Forwards queued frames to the socket; all writes funnel through here.
async fn write_frames(
    mut sink: SplitSink<WebSocket, Message>,
    mut frames: mpsc::UnboundedReceiver<String>,
) {
    while let Some(text) = frames.recv().await {
        if sink.send(Message::Text(text)).await.is_err() {
            break;
        }
    }
}

fn apply_command(game: &mut Game, command: &Command) -> bool {
    match command {
        Command::Move {
            dir: Direction::Left,
        } => game.move_left(),
        Command::Move {
            dir: Direction::Right,
        } => game.move_right(),
        Command::Move {
            dir: Direction::Down,
        } => game.move_down(),
        Command::Rotate => game.rotate(),
        Command::Drop => game.hard_drop(),
        Command::PauseResume => game.toggle_pause(),
        // restarts replace the game; the session loop handles them
        Command::Restart { .. } => false,
    }
}

fn new_game(mode: GameMode, state: &AppState) -> Game {
    let mut game = Game::new(mode, session_rng(&state.config));
    game.high_score = state.highscores.lock().top_score();
    game
}

fn session_rng(config: &ServerConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn gravity_period(base: Duration, fall_speed: u32) -> Duration {
    base / fall_speed.max(1)
}

fn gravity_ticker(base: Duration, fall_speed: u32) -> Interval {
    let period = gravity_period(base, fall_speed);
    // first fire one full period from now, like a fresh ticker
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

fn encode<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(text) => Some(text),
        Err(err) => {
            log::error!("snapshot encode failed: {}", err);
            None
        }
    }
}
