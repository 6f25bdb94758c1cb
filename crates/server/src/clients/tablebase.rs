//! Client for the Lichess tablebase (`/standard?fen=...`).

use std::time::Duration;

use chess_core::Fen;
use reqwest::Client;
use serde::{Deserialize, Serialize, Serializer};

/// What the board client receives when the side to move is stalemated.
pub const STALEMATE_SENTINEL: &str = "Thispositionisstalemate!!";
/// Appended to a move that keeps a dead-drawn position drawn.
pub const DRAW_SUFFIX: &str = "draw";
/// Sent in place of a move when there is nothing to play.
pub const NO_MOVE_SENTINEL: i32 = -1;

#[derive(Debug, thiserror::Error)]
pub enum TablebaseError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Best reply for the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestMove {
    Move(String),
    /// The position is a dead draw, but there is still a move to play.
    DrawingMove(String),
    Stalemate,
    /// No legal move and not drawn: the side to move has been mated.
    NoMove,
}

impl Serialize for BestMove {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BestMove::Move(uci) => serializer.serialize_str(uci),
            BestMove::DrawingMove(uci) => serializer.serialize_str(&format!("{uci}{DRAW_SUFFIX}")),
            BestMove::Stalemate => serializer.serialize_str(STALEMATE_SENTINEL),
            BestMove::NoMove => serializer.serialize_i32(NO_MOVE_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablebaseResult {
    pub best_move: BestMove,
    /// Distance to mate in plies, as reported upstream. 0 when unknown.
    pub dtm: i32,
}

#[derive(Debug, Deserialize)]
struct TablebaseResponse {
    category: String,
    #[serde(default)]
    dtm: Option<i32>,
    #[serde(default)]
    moves: Vec<TablebaseMove>,
}

#[derive(Debug, Deserialize)]
struct TablebaseMove {
    uci: String,
    #[serde(default)]
    dtm: Option<i32>,
}

/// Reduce a tablebase answer to the best move and a DTM.
///
/// `starting` picks the DTM of the queried position itself; otherwise the DTM
/// after the best move is reported.
fn classify(response: TablebaseResponse, starting: bool) -> TablebaseResult {
    let best = response.moves.first();

    let best_move = match (response.category.as_str(), best) {
        ("draw", None) => BestMove::Stalemate,
        ("draw", Some(m)) => BestMove::DrawingMove(m.uci.clone()),
        (_, None) => BestMove::NoMove,
        (_, Some(m)) => BestMove::Move(m.uci.clone()),
    };

    let dtm = if starting {
        response.dtm
    } else {
        best.and_then(|m| m.dtm)
    };

    TablebaseResult {
        best_move,
        dtm: dtm.unwrap_or(0),
    }
}

#[derive(Clone)]
pub struct TablebaseClient {
    client: Client,
    base_url: String,
}

impl TablebaseClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TablebaseError> {
        let client = Client::builder()
            .user_agent("EndgameTrainer/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up `fen` once. No retries.
    pub async fn query_position(
        &self,
        fen: &Fen,
        starting: bool,
    ) -> Result<TablebaseResult, TablebaseError> {
        let url = format!("{}/standard", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("fen", fen.to_query())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TablebaseError::Status(resp.status()));
        }

        let body = resp.bytes().await?;
        let parsed: TablebaseResponse = serde_json::from_slice(&body)?;

        let result = classify(parsed, starting);
        tracing::debug!(fen = %fen, best_move = ?result.best_move, dtm = result.dtm, "Tablebase lookup");
        Ok(result)
    }
}
