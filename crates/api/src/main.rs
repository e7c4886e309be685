use std::sync::Arc;

use quotedesk_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quotedesk_observability::init();

    let config = AppConfig::from_env()?;
    let services = quotedesk_api::app::services::build_services(&config).await?;
    tracing::info!(
        write_mode = services.writes.mode().as_str(),
        persistent = config.database_url.is_some(),
        "starting quotedesk api"
    );

    let app = quotedesk_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
