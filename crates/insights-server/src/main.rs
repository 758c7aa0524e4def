mod api;
mod middleware;

use std::sync::Arc;

use insights_service::{CacheLayer, Ingestor, OpenAiSummaryGenerator, PageService};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, PaginationDefaults};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = insights_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting insights server");

    let pool_config = insights_db::PoolConfig::from_app_config(&config);
    let pool = insights_db::connect_pool(&config.database_url, pool_config).await?;
    insights_db::run_migrations(&pool).await?;

    let extractor = insights_scraper::build_extractor(&config)?;
    let ingestor = Arc::new(Ingestor::new(
        pool.clone(),
        extractor,
        config.max_posts,
        config.max_employees,
    ));
    let cache = CacheLayer::from_config(&config);
    let summarizer = Arc::new(OpenAiSummaryGenerator::from_config(&config)?);
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; summaries will carry a placeholder");
    }

    let service = PageService::new(pool.clone(), ingestor, cache.clone(), summarizer);
    let app = build_app(AppState {
        service,
        pagination: PaginationDefaults::from_config(&config),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache.close().await;
    pool.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
