use axum::{
    extract::Path,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use chess_core::{dtm, Fen};
use rand::seq::SliceRandom;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::clients::tablebase::{BestMove, TablebaseClient};
use crate::db::endgames::{self, Ability, AbilitySet, Endgame};
use crate::error::AppError;
use crate::session::Session;

/// Path segment that asks for a random endgame instead of a named one.
pub const RANDOM_ENDGAME: &str = "random";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayPage {
    pub page: &'static str,
    pub fen: String,
    pub side_to_move: &'static str,
    pub playing_endgame: Option<Endgame>,
    /// Full moves to mate for the side to move.
    pub move_count: Option<i32>,
    pub best_move: Option<BestMove>,
}

/// GET /play
/// Free play from the initial position; nothing to look up.
pub async fn free_play() -> Json<PlayPage> {
    let fen = Fen::starting();
    Json(PlayPage {
        page: "play",
        side_to_move: fen.side_to_move(),
        fen: fen.to_string(),
        playing_endgame: None,
        move_count: None,
        best_move: None,
    })
}

fn pick_random(ids: &[i64]) -> Option<i64> {
    ids.choose(&mut rand::thread_rng()).copied()
}

/// GET /play/{endgame_name}
pub async fn play_endgame(
    Extension(pool): Extension<SqlitePool>,
    Extension(tablebase): Extension<TablebaseClient>,
    session: Session,
    Path(endgame_name): Path<String>,
) -> Result<Response, AppError> {
    let (name, abilities) = if endgame_name == RANDOM_ENDGAME {
        let ids = endgames::list_ids(&pool).await?;
        let id = pick_random(&ids)
            .ok_or_else(|| AppError::NotFound("No endgames available".to_string()))?;
        let name = endgames::get_name_by_id(&pool, id).await?;
        (name, Ability::ALL.into_iter().collect::<AbilitySet>())
    } else {
        match session.abilities() {
            Some(abilities) => (endgame_name, abilities),
            None => return Ok((session.cookie(), Redirect::to("/")).into_response()),
        }
    };

    let stored_fen = endgames::get_fen_by_name(&pool, &name).await?;
    let fen = Fen::parse(&stored_fen)
        .map_err(|e| AppError::Internal(format!("Stored FEN for '{name}' is invalid: {e}")))?;

    let evaluation = tablebase.query_position(&fen, true).await?;
    let move_count = dtm::plies_to_moves(evaluation.dtm);

    let playing_endgame = endgames::fetch_by_abilities(&pool, &abilities)
        .await?
        .into_iter()
        .find(|e| e.name == name);

    tracing::info!(
        endgame = %name,
        side = fen.side_to_move(),
        move_count,
        "Starting endgame"
    );

    let page = PlayPage {
        page: "play",
        fen: fen.to_string(),
        side_to_move: fen.side_to_move(),
        playing_endgame,
        move_count: Some(move_count),
        best_move: Some(evaluation.best_move),
    };
    Ok((session.cookie(), Json(page)).into_response())
}

#[cfg(test)]
mod tests {
    use super::pick_random;

    #[test]
    fn random_pick_stays_in_range() {
        let ids: Vec<i64> = (1..=12).collect();
        for _ in 0..200 {
            let id = pick_random(&ids).unwrap();
            assert!((1..=12).contains(&id));
        }
        assert_eq!(pick_random(&[]), None);
    }

    #[test]
    fn random_pick_reaches_every_id() {
        let ids: Vec<i64> = (1..=12).collect();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(pick_random(&ids).unwrap());
        }
        assert_eq!(seen.len(), 12);
    }
}
