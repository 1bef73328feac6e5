//! Spin of Fate API server binary.
//!
//! Everything except the listener address, database and pool size comes from
//! the environment (see `ApiConfig::from_env`). A `.env` file is honoured.

use clap::Parser;
use tracing::info;

use spinfate_api::config::ApiConfig;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "spinfate_api_server", about = "Spin of Fate API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8788")]
    bind: String,

    /// SQLite connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://spinfate.db")]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spinfate_api=debug,spinfate_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, bind = %args.bind, "starting spinfate_api_server");

    let pool = spinfate_core::db::open_pool(&args.database_url, args.max_connections).await?;

    info!("running database migrations");
    spinfate_api::migrate(&pool).await?;

    let config = ApiConfig {
        bind_addr: args.bind,
        database_url: args.database_url,
        ..ApiConfig::from_env()
    };

    if config.session_secret.is_none() {
        info!("SESSION_SECRET not set; every caller is treated as a guest");
    }
    if config.discord_credentials().is_none() {
        info!("Discord OAuth not configured; login is disabled");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = spinfate_api::router(spinfate_api::AppState::new(pool, config));

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
