use anyhow::Context;
use clap::Parser;
use trivia_api::config::{load_dotenv, Settings};
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let settings = Settings::parse();
    init_tracing(&settings.log_level, settings.include_span_events)?;
    let pool = establish_connection(&settings.db_path)
        .await
        .with_context(|| format!("Cannot open database {}", settings.db_path))?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    let (host, port) = settings.listen_addr();
    run_server(pool, host, port).await
}
