//! Service entry point.

use tracing_subscriber::EnvFilter;

use blue_tasks::api;
use blue_tasks::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blue_tasks=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = %config.backend_url,
        model = %config.extraction_model,
        "starting blue-tasks"
    );

    api::serve(config).await
}
