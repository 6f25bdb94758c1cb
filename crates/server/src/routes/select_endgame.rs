use axum::{
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::endgames::{self, AbilitySet, Endgame};
use crate::error::AppError;
use crate::session::Session;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPage {
    pub page: &'static str,
    pub abilities: AbilitySet,
    pub endgames: Vec<Endgame>,
}

/// GET|POST /select-endgame
/// Lists endgames for the abilities picked on the home page.
pub async fn select_endgame(
    Extension(pool): Extension<SqlitePool>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(abilities) = session.abilities() else {
        return Ok((session.cookie(), Redirect::to("/")).into_response());
    };

    let endgames = endgames::fetch_by_abilities(&pool, &abilities).await?;

    let page = SelectionPage {
        page: "select-endgame",
        abilities,
        endgames,
    };
    Ok((session.cookie(), Json(page)).into_response())
}
