use std::sync::Arc;

use auth::Authenticator;
use gestock_server::config::Config;
use gestock_server::config::DatabaseBackend;
use gestock_server::domain::user::ports::UserServicePort;
use gestock_server::domain::user::service::UserService;
use gestock_server::inbound::http::router::create_router;
use gestock_server::outbound::repositories::InMemoryUserRepository;
use gestock_server::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gestock_server=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "gestock-server",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_backend = ?config.database.backend,
        http_port = config.server.http_port,
        regulated_mode = config.auth.regulated_mode,
        bcrypt_cost = config.auth.bcrypt_cost,
        "Configuration loaded"
    );

    let authenticator = Authenticator::from_config(
        &config.auth.jwt_secret,
        config.auth.hashing_policy(),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Refusing to start: set AUTH__JWT_SECRET");
        e
    })?;
    let authenticator = Arc::new(authenticator);

    let user_service: Arc<dyn UserServicePort> = match config.database.backend {
        DatabaseBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
            Arc::new(UserService::new(user_repository, Arc::clone(&authenticator)))
        }
        DatabaseBackend::Memory => {
            tracing::warn!(database = "memory", "Accounts will not survive a restart");

            let user_repository = Arc::new(InMemoryUserRepository::new());
            Arc::new(UserService::new(user_repository, Arc::clone(&authenticator)))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        authenticator,
        config.server.client_url.as_deref(),
    );

    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
