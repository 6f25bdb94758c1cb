use axum::{Extension, Json};
use chess_core::{dtm, Fen};
use serde::{Deserialize, Serialize};

use crate::clients::tablebase::{BestMove, TablebaseClient};
use crate::error::AppError;

#[derive(Deserialize)]
pub struct NextMoveRequest {
    pub fen: String,
}

/// Field names are what the board client reads.
#[derive(Serialize)]
pub struct NextMoveResponse {
    /// Best move, or a draw/stalemate/no-move sentinel.
    pub a: BestMove,
    /// Full moves to mate after the best move.
    pub b: i32,
}

/// POST /api/nextMove
pub async fn next_move(
    Extension(tablebase): Extension<TablebaseClient>,
    Json(body): Json<NextMoveRequest>,
) -> Result<Json<NextMoveResponse>, AppError> {
    let fen = Fen::parse(&body.fen)?;
    let result = tablebase.query_position(&fen, false).await?;

    Ok(Json(NextMoveResponse {
        a: result.best_move,
        b: dtm::plies_to_moves(result.dtm),
    }))
}
