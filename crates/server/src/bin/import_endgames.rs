//! Create the endgames table and load positions from a JSON file.
//!
//! Usage: cargo run --bin import-endgames -- endgames.json
//!
//! The file holds an array of `{"name", "fen", "ability", "moves"?}` objects.
//! Uses DATABASE_URL (default `sqlite:database.db`).

use std::collections::HashSet;
use std::fs;

use anyhow::{bail, Context, Result};
use chess_core::Fen;
use endgame_server::config::Config;
use endgame_server::db::{self, endgames::NewEndgame};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: import-endgames <endgames.json>");
    };

    let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let endgames: Vec<NewEndgame> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {path}"))?;

    let mut names = HashSet::new();
    for endgame in &endgames {
        Fen::parse(&endgame.fen)
            .with_context(|| format!("Endgame '{}' has an invalid FEN", endgame.name))?;
        if !names.insert(endgame.name.as_str()) {
            bail!("Endgame name '{}' appears twice", endgame.name);
        }
    }

    let config = Config::from_env();
    tracing::info!("Opening database {}...", config.database_url);
    let pool = db::pool::create_pool(&config.database_url).await?;
    db::pool::run_migrations(&pool).await?;

    let existing = db::endgames::fetch_by_abilities(
        &pool,
        &db::endgames::Ability::ALL.into_iter().collect(),
    )
    .await?;
    let existing: HashSet<String> = existing.into_iter().map(|e| e.name).collect();

    let mut inserted = 0;
    for endgame in &endgames {
        if existing.contains(&endgame.name) {
            tracing::info!("Skipping '{}', already stored", endgame.name);
            continue;
        }
        let id = db::endgames::insert(&pool, endgame).await?;
        tracing::debug!("Inserted '{}' as #{id}", endgame.name);
        inserted += 1;
    }

    tracing::info!(
        "Import complete: {inserted} inserted, {} skipped",
        endgames.len() - inserted
    );
    Ok(())
}
