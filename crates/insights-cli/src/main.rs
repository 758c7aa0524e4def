use std::sync::Arc;

use clap::{Parser, Subcommand};
use insights_core::AppConfig;
use insights_service::{CacheLayer, Ingestor, OpenAiSummaryGenerator, PageService};
use serde::Serialize;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "insights-cli")]
#[command(about = "Company page insights operator commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a page, ingesting it first if it is not stored yet
    Ingest { page_id: String },
    /// Re-ingest a page unconditionally
    Refresh { page_id: String },
    /// Print the generated summary and counts for a stored page
    Summary { page_id: String },
    /// Apply pending database migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = insights_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = insights_db::PoolConfig::from_app_config(&config);
    let pool = insights_db::connect_pool(&config.database_url, pool_config).await?;

    let result = run(cli.command, &config, &pool).await;
    pool.close().await;
    result
}

async fn run(command: Commands, config: &AppConfig, pool: &PgPool) -> anyhow::Result<()> {
    match command {
        Commands::Migrate => {
            insights_db::run_migrations(pool).await?;
            println!("migrations applied");
        }
        Commands::Ping => {
            insights_db::health_check(pool).await?;
            println!("database ok");
        }
        Commands::Ingest { page_id } => {
            let page = build_service(config, pool)?.get_page(&page_id).await?;
            print_json(&page)?;
        }
        Commands::Refresh { page_id } => {
            let page = build_service(config, pool)?.refresh_page(&page_id).await?;
            print_json(&page)?;
        }
        Commands::Summary { page_id } => {
            let summary = build_service(config, pool)?.page_summary(&page_id).await?;
            print_json(&summary)?;
        }
    }
    Ok(())
}

/// The server's service stack minus the cache, which a one-shot process
/// would never read back.
fn build_service(config: &AppConfig, pool: &PgPool) -> anyhow::Result<PageService> {
    let extractor = insights_scraper::build_extractor(config)?;
    let ingestor = Arc::new(Ingestor::new(
        pool.clone(),
        extractor,
        config.max_posts,
        config.max_employees,
    ));
    let summarizer = Arc::new(OpenAiSummaryGenerator::from_config(config)?);
    Ok(PageService::new(
        pool.clone(),
        ingestor,
        CacheLayer::disabled(),
        summarizer,
    ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
