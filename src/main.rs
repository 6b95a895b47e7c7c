//! Job Board - HTTP backend for a job portal.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_board::{
    config::{Config, Environment},
    server::{auth::TokenAuth, create_router, RouterConfig},
    store::{create_mongo_client, DocumentStore, MemoryStore, MongoStore},
    JobBoard,
};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be populated
    dotenvy::dotenv().ok();

    let config = Config::parse();
    run_serve(config).await
}

// =============================================================================
// Serve
// =============================================================================

async fn run_serve(config: Config) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Job board v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Environment: {:?}", config.environment);
    info!("  Database: {}", config.database_display());
    info!("  Token TTL: {}s", config.token_ttl);
    info!("  CORS origins: {}", config.cors_origins().join(", "));
    if config.environment == Environment::Development {
        warn!("  Session cookies are SameSite=Strict and not Secure (development)");
    }

    let auth = TokenAuth::new(config.token_secret_or_empty())
        .with_ttl(config.token_ttl())
        .with_cookie_policy(config.environment.cookie_policy());

    let router_config = RouterConfig::default()
        .with_cors_origins(config.cors_origins())
        .with_tracing(!config.no_tracing);

    if config.in_memory {
        warn!("Using the in-memory store; all data is lost on shutdown");
        return serve(&config, MemoryStore::new(), auth, router_config).await;
    }

    let Some(uri) = config.mongodb_uri() else {
        error!("No database connection string could be derived");
        return ExitCode::FAILURE;
    };

    info!("Connecting to MongoDB...");
    let client = match create_mongo_client(&uri).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create MongoDB client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = MongoStore::new(client, &config.db_name);
    if let Err(e) = store.ping().await {
        error!("Failed to reach MongoDB: {}", e);
        error!("  Please check the credentials, cluster host and network access list");
        return ExitCode::FAILURE;
    }
    info!("  Connected to database '{}'", store.database_name());

    serve(&config, store, auth, router_config).await
}

/// Bind the listener and run the server until a shutdown signal arrives.
async fn serve<S>(config: &Config, store: S, auth: TokenAuth, router_config: RouterConfig) -> ExitCode
where
    S: DocumentStore + 'static,
{
    let router = create_router(JobBoard::new(store), auth, router_config);
    let addr = config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "job_board=debug,tower_http=debug"
    } else {
        "job_board=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
