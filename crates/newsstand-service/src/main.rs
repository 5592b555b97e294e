use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use newsstand_service::{
    AppState, DefaultAppState,
    provider::{NewsClient, NewsClientConfig},
    routes::create_router,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("newsstand_service=debug".parse().unwrap()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL environment variable must be set");

    let mut connection = SqliteConnection::establish(&database_url).unwrap_or_else(|err| {
        error!(database_url = %database_url, error = %err, "Failed to connect to database");
        std::process::exit(1);
    });

    if let Err(err) = connection.run_pending_migrations(MIGRATIONS) {
        error!(error = %err, "Failed to run database migrations");
        std::process::exit(1);
    }

    info!(database_url = %database_url, "Connected to database");

    let api_key = std::env::var("NEWS_API_KEY").ok().filter(|k| !k.is_empty());
    if api_key.is_none() {
        warn!("NEWS_API_KEY is not set, provider client will serve sample data");
    }
    let base_url = std::env::var("NEWS_API_URL")
        .unwrap_or_else(|_| "https://newsapi.org/v2".to_string());

    let provider = NewsClient::new(NewsClientConfig { api_key, base_url });
    let app_state = DefaultAppState::new(Arc::new(Mutex::new(connection)), provider);

    // Optional background refresh, independent of user requests
    if let Ok(value) = std::env::var("REFRESH_INTERVAL_SECS") {
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => {
                let refresh_state = app_state.clone();
                tokio::spawn(async move {
                    let mut interval = tokio::time::interval(Duration::from_secs(secs));
                    interval.tick().await; // first tick fires immediately
                    loop {
                        interval.tick().await;
                        info!("running scheduled cache refresh");
                        refresh_state.news().refresh_all().await;
                    }
                });
                info!(interval_secs = secs, "scheduled refresh enabled");
            }
            _ => warn!(value = %value, "invalid REFRESH_INTERVAL_SECS, scheduled refresh disabled"),
        }
    }

    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // generous: a synchronous refresh fans out to every category
                .layer(TimeoutLayer::new(Duration::from_secs(60))),
        )
        .with_state(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|err| {
            error!(bind_address = %bind_addr, error = %err, "Failed to bind to address");
            std::process::exit(1);
        });

    info!(bind_address = %bind_addr, "Server running");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
