pub mod health;
pub mod home;
pub mod next_move;
pub mod play;
pub mod select_endgame;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

use crate::clients::tablebase::TablebaseClient;
use crate::session::SessionStore;

/// Every route of the trainer with its shared state attached.
pub fn router(pool: SqlitePool, tablebase: TablebaseClient, sessions: SessionStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(home::home).post(home::submit_abilities))
        .route(
            "/select-endgame",
            get(select_endgame::select_endgame).post(select_endgame::select_endgame),
        )
        .route("/play", get(play::free_play))
        .route("/play/{endgame_name}", get(play::play_endgame))
        .route("/api/nextMove", post(next_move::next_move))
        .layer(Extension(pool))
        .layer(Extension(tablebase))
        .layer(Extension(sessions))
        .layer(cors)
}
