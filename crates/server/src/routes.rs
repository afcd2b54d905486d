//! HTTP surface: websocket endpoints, the leaderboard API and static
//! frontend assets.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use tower_http::services::ServeDir;

use blockfall::GameMode;

use crate::config::ServerConfig;
use crate::highscore::{HighscoreEntry, HighscoreStore};
use crate::session;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub highscores: Arc<Mutex<HighscoreStore>>,
}

pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/ws", get(game_ws))
        .route("/tetrix", get(tetrix_ws))
        .route("/highscores", get(list_highscores).post(submit_highscore))
        .route("/getGameMode", get(get_game_mode))
        .fallback_service(assets)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ModeQuery {
    mode: Option<String>,
}

impl ModeQuery {
    fn resolve(&self) -> GameMode {
        GameMode::from_name(self.mode.as_deref().unwrap_or(""))
    }
}

async fn game_ws(
    State(state): State<AppState>,
    Query(query): Query<ModeQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let mode = query.resolve();
    ws.on_upgrade(move |socket| session::run(socket, mode, state))
}

async fn tetrix_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| session::run_tetrix(socket, state))
}

async fn get_game_mode(Query(query): Query<ModeQuery>) -> Json<GameMode> {
    Json(query.resolve())
}

async fn list_highscores(State(state): State<AppState>) -> Json<Vec<HighscoreEntry>> {
    Json(state.highscores.lock().entries().to_vec())
}

#[derive(Debug, Deserialize)]
struct SubmitScore {
    name: String,
    score: u64,
}

async fn submit_highscore(
    State(state): State<AppState>,
    Json(request): Json<SubmitScore>,
) -> Response {
    // the store writes to disk synchronously, so keep it off the workers
    let highscores = Arc::clone(&state.highscores);
    let result =
        tokio::task::spawn_blocking(move || highscores.lock().submit(&request.name, request.score))
            .await;
    match result {
        Ok(Ok(())) => Json(serde_json::json!({ "ok": true })).into_response(),
        Ok(Err(err)) => {
            log::error!("failed to persist high scores: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            log::error!("high score writer panicked: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_state(tag: &str) -> (AppState, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "blockfall-routes-{}-{}.json",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let state = AppState {
            config: Arc::new(ServerConfig::default()),
            highscores: Arc::new(Mutex::new(HighscoreStore::load(path.clone()))),
        };
        (state, path)
    }

    #[tokio::test]
    async fn submitting_a_score_persists_and_reports_ok() {
        let (state, path) = scratch_state("submit");
        let response = submit_highscore(
            State(state.clone()),
            Json(SubmitScore {
                name: String::from("alice"),
                score: 700,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.highscores.lock().top_score(), 700);
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn listing_reflects_submitted_entries() {
        let (state, path) = scratch_state("list");
        submit_highscore(
            State(state.clone()),
            Json(SubmitScore {
                name: String::from("bob"),
                score: 300,
            }),
        )
        .await;
        let Json(entries) = list_highscores(State(state)).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "bob");
        assert_eq!(entries[0].score, 300);
        let _ = std::fs::remove_file(&path);
    }
}
