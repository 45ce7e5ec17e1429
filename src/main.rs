use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

mod app;
mod auth;
mod config;
mod error;
mod events;
mod state;
mod store;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "eventhub=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // A missing signing secret is fatal here, before any route is served.
    let config = AppConfig::from_env().context("load configuration")?;
    let (host, port) = (config.host.clone(), config.port);

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;

    let state = AppState::init(config, db)?;
    let app = app::build_app(state);
    app::serve(app, &host, port).await
}
