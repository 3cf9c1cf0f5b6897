//! Texmage API server binary.
//!
//! Reads configuration from flags or the environment (a `.env` file is
//! honoured), connects to PostgreSQL, runs migrations and serves the API.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use texmage_api::config::ApiConfig;
use texmage_core::auth::password::BCRYPT_COST;
use texmage_core::generation::clipdrop::{CLIPDROP_API_URL, ClipdropProvider};
use texmage_core::store::PgCredentialStore;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "texmage_server", about = "Texmage API server", version)]
struct Args {
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Secret used to sign session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// ClipDrop API key.
    #[arg(long, env = "CLIPDROP_API_KEY", hide_env_values = true)]
    clipdrop_api_key: String,

    /// Text-to-image provider endpoint.
    #[arg(long, env = "PROVIDER_URL", default_value = CLIPDROP_API_URL)]
    provider_url: String,

    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind_addr: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// bcrypt cost factor for new password hashes.
    #[arg(long, env = "BCRYPT_COST", default_value_t = BCRYPT_COST)]
    bcrypt_cost: u32,
}

impl Args {
    fn api_config(&self) -> ApiConfig {
        ApiConfig {
            bind_addr: self.bind_addr.clone(),
            jwt_secret: self.jwt_secret.clone(),
            bcrypt_cost: self.bcrypt_cost,
            provider_url: self.provider_url.clone(),
            provider_api_key: self.clipdrop_api_key.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,texmage_api=debug,texmage_core=debug")
            }),
        )
        .init();

    let args = Args::parse();
    let config = args.api_config();
    config.validate()?;

    info!(?config, max_connections = args.max_connections, "starting texmage_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;
    info!("database connection successful");

    info!("running database migrations");
    texmage_core::migrate::migrate(&pool).await?;

    let provider = ClipdropProvider::with_endpoint(
        config.provider_url.clone(),
        config.provider_api_key.clone(),
    );

    let state = texmage_api::AppState {
        store: Arc::new(PgCredentialStore::new(pool)),
        provider: Arc::new(provider),
        config: config.clone(),
    };

    let app = texmage_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
