use std::sync::Arc;

use anyhow::Context;
use common_auth::TokenCodec;
use pos_service::config::load_app_config;
use pos_service::metrics::PosMetrics;
use pos_service::telemetry::init_tracing;
use pos_service::{build_router, route_policy, AppState, MIGRATOR};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("reading .env");
        }
    }

    let config = load_app_config().context("loading configuration")?;
    let _log_guard = init_tracing(config.log_dir.as_deref())?;

    let codec = Arc::new(TokenCodec::new(config.jwt.clone()).context("building token codec")?);
    let metrics = Arc::new(PosMetrics::new()?);

    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connecting to Postgres")?;
    MIGRATOR.run(&db).await.context("running migrations")?;

    let state = AppState::with_postgres(db, codec, metrics);
    let app = build_router(state, &route_policy())?;

    let addr = config.listen_addr();
    info!(%addr, issuer = %config.jwt.issuer, "starting pos-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
