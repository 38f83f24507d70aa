use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tabs::config::Config;
use tabs::middleware::{AdminAuth, ErrorHandler, RequestId};
use tabs::tabs::repositories::{MySqlCatalogStore, MySqlTabStore};
use tabs::tabs::services::{EventDispatcher, LoggingListener};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    // Initialize tracing
    let json = config.app.log_format == "json";
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tabs={},actix_web=info", config.app.log_level).into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Tabs administration service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config.database.create_pool().await?;
    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    if config.database.run_migrations {
        config.database.migrate(&db_pool).await?;
        tracing::info!("Tab table migrations applied");
    }

    let state = tabs::tabs_state(
        Arc::new(MySqlTabStore::new(db_pool.clone())),
        Arc::new(MySqlCatalogStore::new(db_pool.clone())),
        EventDispatcher::new().with_listener(Arc::new(LoggingListener)),
        &config.app,
    )?;
    let pool = web::Data::new(db_pool);
    let security = config.security.clone();

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(pool.clone())
            .wrap(AdminAuth::new(
                security.admin_api_key_hash.clone(),
                security.admin_access.clone(),
            ))
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(tabs::configure)
            .default_service(web::to(tabs::not_found))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
