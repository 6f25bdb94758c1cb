use endgame_server::clients::tablebase::TablebaseClient;
use endgame_server::config;
use endgame_server::db;
use endgame_server::routes;
use endgame_server::session::SessionStore;

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    tracing::info!("Opening database {}...", config.database_url);
    let pool = db::pool::create_pool(&config.database_url)
        .await
        .context("Failed to open database")?;

    db::pool::run_migrations(&pool)
        .await
        .context("Failed to create endgames table")?;

    let endgame_count = db::endgames::list_ids(&pool).await?.len();
    if endgame_count == 0 {
        tracing::warn!("No endgames stored yet; load some with `import-endgames <file.json>`");
    } else {
        tracing::info!("{endgame_count} endgames available");
    }

    let tablebase = TablebaseClient::new(
        &config.tablebase_url,
        Duration::from_secs(config.tablebase_timeout_secs),
    )
    .context("Failed to build tablebase client")?;
    tracing::info!("Using tablebase at {}", config.tablebase_url);

    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));
    let app = routes::router(pool, tablebase, sessions);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
