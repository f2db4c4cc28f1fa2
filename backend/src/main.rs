use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = todo_backend::config::Config::from_env()?;
    tracing::info!(
        db_uri_set = config.db_uri.is_some(),
        namespace = %config.db_namespace,
        store = ?config.store_backend,
        "Configuration loaded"
    );

    todo_backend::server::start(config).await
}
