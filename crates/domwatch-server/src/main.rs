use clap::Parser;
use domwatch_core::store::ensure_schema;
use domwatch_core::{Checker, DbDomainStore, HttpProber};
use domwatch_server::{create_router, metrics, AppConfig, AppState};
use sea_orm::Database;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;

    // RUST_LOG 优先于配置文件中的级别
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting domwatch with config: {}", args.config);

    if config.metrics.enabled {
        metrics::init_metrics(config.metrics_addr()?)?;
    }

    let db = Database::connect(config.database.url.as_str()).await?;
    if config.database.auto_migrate {
        ensure_schema(&db).await?;
    }

    let prober = HttpProber::new(config.probe.clone())?;
    let checker = Checker::new(
        Arc::new(DbDomainStore::new(db)),
        Arc::new(prober),
        config.check_options(),
    );

    if config.auth.api_token.is_none() {
        tracing::warn!("auth.api_token is not set; /api/check will reject every request");
    }

    let state = Arc::new(AppState {
        checker: Arc::new(checker),
        api_token: config.auth.api_token.clone(),
    });

    let addr = config.listen_addr()?;
    tracing::info!("Listening on http://{}", addr);

    axum::Server::bind(&addr)
        .serve(create_router(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
