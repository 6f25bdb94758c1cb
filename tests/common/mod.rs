//! Shared harness: the trainer and a stand-in tablebase, both on ephemeral
//! local ports, backed by an in-memory SQLite database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use endgame_server::clients::tablebase::TablebaseClient;
use endgame_server::db::endgames::{self, Ability, NewEndgame};
use endgame_server::db::pool;
use endgame_server::routes;
use endgame_server::session::SessionStore;
use reqwest::Client;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tokio::net::TcpListener;

pub const QUEEN_MATE_FEN: &str = "8/8/8/4k3/8/8/8/KQ6 w - - 0 1";
pub const QUEEN_MATE_DEFENDER_FEN: &str = "8/8/8/4k3/8/8/8/KQ6 b - - 0 1";
pub const CHECKMATED_FEN: &str = "k7/1Q6/1K6/8/8/8/8/8 b - - 0 1";
pub const STALEMATE_FEN: &str = "k7/8/1QK5/8/8/8/8/8 b - - 0 1";
pub const DEAD_DRAW_FEN: &str = "8/8/8/4k3/8/8/8/K1n5 w - - 0 1";
pub const UPSTREAM_FAILS_FEN: &str = "8/8/8/4k3/8/8/8/K7 w - - 0 1";

/// Stored endgames: ids 1..=12 in this order.
pub const ENDGAMES: [(&str, &str, Ability); 12] = [
    ("King and Queen vs King", QUEEN_MATE_FEN, Ability::Beginner),
    ("King and Rook vs King", "8/8/8/4k3/8/8/8/KR6 w - - 0 1", Ability::Beginner),
    ("Two Rooks vs King", "8/8/8/4k3/8/8/8/RR2K3 w - - 0 1", Ability::Beginner),
    ("King and Pawn vs King", "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1", Ability::Beginner),
    ("Two Bishops vs King", "8/8/8/4k3/8/8/8/2B1KB2 w - - 0 1", Ability::Intermediate),
    ("Queen vs Rook", "8/8/8/3rk3/8/8/8/3QK3 w - - 0 1", Ability::Intermediate),
    ("Lucena Position", "1K1k4/1P6/8/8/8/8/r7/2R5 w - - 0 1", Ability::Intermediate),
    ("Queen vs Pawn", "8/8/8/8/8/8/1kp5/4K2Q w - - 0 1", Ability::Intermediate),
    ("Bishop and Knight vs King", "8/8/8/4k3/8/8/8/2B1KN2 w - - 0 1", Ability::Advanced),
    ("Rook and Bishop vs Rook", "8/8/8/3rk3/8/8/8/2B1K2R w - - 0 1", Ability::Advanced),
    ("Queen vs Rook and Pawn", "8/8/8/3rk3/4p3/8/8/3QK3 w - - 0 1", Ability::Advanced),
    ("Philidor Position", "4k3/8/8/4PK2/8/8/r7/7R b - - 0 1", Ability::Advanced),
];

/// Canned answers keyed by the underscore FEN the client sends.
fn canned_answer(fen: &str) -> (StatusCode, Value) {
    let fen = fen.replace('_', " ");
    match fen.as_str() {
        QUEEN_MATE_FEN => (
            StatusCode::OK,
            json!({
                "category": "win",
                "dtm": 19,
                "moves": [
                    { "uci": "b1b5", "category": "loss", "dtm": -18 },
                    { "uci": "b1b4", "category": "loss", "dtm": -20 }
                ]
            }),
        ),
        QUEEN_MATE_DEFENDER_FEN => (
            StatusCode::OK,
            json!({
                "category": "loss",
                "dtm": -20,
                "moves": [{ "uci": "e5d4", "category": "win", "dtm": 17 }]
            }),
        ),
        CHECKMATED_FEN => (
            StatusCode::OK,
            json!({ "category": "loss", "dtm": 0, "checkmate": true, "moves": [] }),
        ),
        STALEMATE_FEN => (
            StatusCode::OK,
            json!({ "category": "draw", "dtm": null, "stalemate": true, "moves": [] }),
        ),
        DEAD_DRAW_FEN => (
            StatusCode::OK,
            json!({
                "category": "draw",
                "dtm": null,
                "moves": [{ "uci": "a1b2", "category": "draw", "dtm": null }]
            }),
        ),
        UPSTREAM_FAILS_FEN => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": "overloaded" }),
        ),
        _ => (
            StatusCode::OK,
            json!({
                "category": "win",
                "dtm": 7,
                "moves": [{ "uci": "a1a2", "category": "loss", "dtm": -6 }]
            }),
        ),
    }
}

async fn fake_standard(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let fen = params.get("fen").cloned().unwrap_or_default();
    let (status, body) = canned_answer(&fen);
    (status, Json(body))
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub struct TestApp {
    pub base_url: String,
    pub pool: SqlitePool,
    pub sessions: SessionStore,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Start a fake tablebase plus a trainer seeded with [`ENDGAMES`].
pub async fn spawn_app() -> TestApp {
    spawn_app_with_session_ttl(Duration::from_secs(3600)).await
}

pub async fn spawn_app_with_session_ttl(session_ttl: Duration) -> TestApp {
    let tablebase_url = serve(Router::new().route("/standard", get(fake_standard))).await;

    let pool = pool::create_memory_pool().await.unwrap();
    pool::run_migrations(&pool).await.unwrap();
    for (name, fen, ability) in ENDGAMES {
        endgames::insert(
            &pool,
            &NewEndgame {
                name: name.to_string(),
                fen: fen.to_string(),
                ability,
                moves: None,
            },
        )
        .await
        .unwrap();
    }

    let tablebase = TablebaseClient::new(&tablebase_url, Duration::from_secs(5)).unwrap();
    let sessions = SessionStore::new(session_ttl);
    let app = routes::router(pool.clone(), tablebase, sessions.clone());
    let base_url = serve(app).await;

    TestApp {
        base_url,
        pool,
        sessions,
    }
}

/// Client that leaves redirects for the test to inspect.
pub fn client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// `name=value` of the session cookie set on a response, if any.
pub fn session_cookie(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .find(|v| v.starts_with("endgame_session="))
}

pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
