use book_lending_tracker::{
    adapters::{
        local::LocalCoverStore,
        postgres::{PostgresLoanStore, PostgresTitleStore, PostgresUnitOfWork},
    },
    api::{AppState, create_router},
    application::ServiceDependencies,
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_lending_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize adapters
    let service_deps = ServiceDependencies {
        title_store: Arc::new(PostgresTitleStore::new(pool.clone())),
        loan_store: Arc::new(PostgresLoanStore::new(pool.clone())),
        unit_of_work: Arc::new(PostgresUnitOfWork::new(pool)),
        cover_store: Arc::new(LocalCoverStore::new(config.cover_storage_dir.clone())),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;
    Ok(())
}
