use axum::{
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::endgames::{Ability, AbilitySet};
use crate::session::Session;

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one ability level!";

#[derive(Deserialize)]
pub struct AbilityForm {
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub page: &'static str,
    pub ability_options: [Ability; 3],
    pub flashes: Vec<String>,
}

impl HomePage {
    fn new(flashes: Vec<String>) -> Self {
        Self {
            page: "home",
            ability_options: Ability::ALL,
            flashes,
        }
    }
}

/// GET /
/// Visiting home always starts the flow over.
pub async fn home(session: Session) -> Response {
    session.clear();
    (session.cookie(), Json(HomePage::new(Vec::new()))).into_response()
}

/// POST /
pub async fn submit_abilities(session: Session, Json(form): Json<AbilityForm>) -> Response {
    session.clear();

    let abilities: AbilitySet = form.abilities.into_iter().collect();
    if abilities.is_empty() {
        tracing::debug!("Rejected empty ability selection");
        let page = HomePage::new(vec![EMPTY_SELECTION_MESSAGE.to_string()]);
        return (session.cookie(), Json(page)).into_response();
    }

    session.select(abilities);
    (session.cookie(), Redirect::to("/select-endgame")).into_response()
}
