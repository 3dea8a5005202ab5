use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use strikelab::api;
use strikelab::config::Config;
use strikelab::datasource::YahooDataSource;
use strikelab::MarketDataSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let port = config.port;

    let datasource: Arc<dyn MarketDataSource> = Arc::new(YahooDataSource::new(
        config.data_api_url.clone(),
        Duration::from_secs(config.cache_ttl_secs),
    ));

    let app = api::create_router(api::AppState::new(config, datasource));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
