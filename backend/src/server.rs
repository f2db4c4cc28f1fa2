use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::routes::create_router;
use crate::service::TodoService;
use crate::store;

/// Builds the storage client from `config` and serves the todo API until Ctrl-C.
#[tracing::instrument(skip(config))]
pub async fn start(config: Config) -> anyhow::Result<()> {
    let service = TodoService::new(store::from_config(&config));

    // An unreachable store is not fatal: requests fail until it comes back.
    match service.ping().await {
        Ok(()) => tracing::info!("Connected to the document store"),
        Err(err) => tracing::error!("Error connecting to the document store: {}", err),
    }

    let app = create_router(service).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let server_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Server running on http://{}", server_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
