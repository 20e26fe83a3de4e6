use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use ticketserver::api_router::build_app;
use ticketserver::config::AppConfig;
use ticketserver::shared::db::{run_migrations, Database};
use ticketserver::shared::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let config = AppConfig::from_env()?;
    let db = Database::connect(&config.database);

    // The store may come up after this service does; the schema is applied
    // in the background once a connection succeeds.
    tokio::spawn(run_migrations(db.clone()));

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
    });

    info!(
        "Starting HTTP server on {}:{}",
        config.server.host, config.server.port
    );
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}
