use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::AppError;

/// Difficulty label an endgame is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    Beginner,
    Intermediate,
    Advanced,
}

impl Ability {
    pub const ALL: [Ability; 3] = [Ability::Beginner, Ability::Intermediate, Ability::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Ability::Beginner => "Beginner",
            Ability::Intermediate => "Intermediate",
            Ability::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ability::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Unknown ability level: {s}"))
    }
}

pub type AbilitySet = BTreeSet<Ability>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endgame {
    pub id: i64,
    pub name: String,
    pub fen: String,
    pub ability: Ability,
    pub move_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEndgame {
    pub name: String,
    pub fen: String,
    pub ability: Ability,
    #[serde(default)]
    pub moves: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct EndgameRow {
    endgame_id: i64,
    name: String,
    fen: String,
    ability: String,
    moves: Option<i64>,
}

impl TryFrom<EndgameRow> for Endgame {
    type Error = AppError;

    fn try_from(row: EndgameRow) -> Result<Self, Self::Error> {
        let ability = row.ability.parse::<Ability>().map_err(|e| {
            AppError::Internal(format!("Endgame {} has bad ability: {e}", row.endgame_id))
        })?;
        Ok(Endgame {
            id: row.endgame_id,
            name: row.name,
            fen: row.fen,
            ability,
            move_count: row.moves,
        })
    }
}

/// All endgames filed under any of `abilities`, in table order.
pub async fn fetch_by_abilities(
    pool: &SqlitePool,
    abilities: &AbilitySet,
) -> Result<Vec<Endgame>, AppError> {
    if abilities.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT endgame_id, name, fen, ability, moves FROM endgames WHERE ability IN (",
    );
    let mut labels = query.separated(", ");
    for ability in abilities {
        labels.push_bind(ability.as_str());
    }
    labels.push_unseparated(")");

    let rows = query
        .build_query_as::<EndgameRow>()
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Endgame::try_from).collect()
}

pub async fn get_fen_by_name(pool: &SqlitePool, name: &str) -> Result<String, AppError> {
    sqlx::query_scalar::<_, String>("SELECT fen FROM endgames WHERE name = ?1 LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Endgame '{name}' not found")))
}

pub async fn get_name_by_id(pool: &SqlitePool, id: i64) -> Result<String, AppError> {
    sqlx::query_scalar::<_, String>("SELECT name FROM endgames WHERE endgame_id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Endgame #{id} not found")))
}

/// Ids of every stored endgame, used for random play.
pub async fn list_ids(pool: &SqlitePool) -> Result<Vec<i64>, AppError> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT endgame_id FROM endgames")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

pub async fn insert(pool: &SqlitePool, endgame: &NewEndgame) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO endgames (name, fen, ability, moves) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&endgame.name)
    .bind(&endgame.fen)
    .bind(endgame.ability.as_str())
    .bind(endgame.moves)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}
