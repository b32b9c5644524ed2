use mimalloc::MiMalloc;
use pictura::api::InferenceApiCaptioner;
use pictura::config::Config;
use pictura::db::{self, HistoryStore};
use pictura::router::{PicturaState, pictura_router};
use pictura::service::{CaptionModel, CaptionService, FixedCaptioner};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database.url,
        caption_endpoint = %cfg.caption.endpoint,
        loglevel = %cfg.basic.loglevel,
        "starting up"
    );

    let pool = db::connect(&cfg.database).await?;
    let store = HistoryStore::new(pool);
    if cfg.database.init_schema {
        store.init_schema().await?;
        info!("database schema initialized");
    }

    let model: Arc<dyn CaptionModel> = match cfg.caption.fixed_text.as_ref() {
        Some(text) => {
            info!(caption = %text, "using fixed captioner");
            Arc::new(FixedCaptioner::new(text.clone()))
        }
        None => Arc::new(InferenceApiCaptioner::new(&cfg.caption)?),
    };
    let captioner = CaptionService::new(model);

    let state = PicturaState::new(captioner, store.clone());
    let app = pictura_router(state, cfg.basic.max_upload_bytes);

    let listener = TcpListener::bind(&cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.pool().close().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received, shutting down"),
        _ = terminate => info!("terminate signal received, shutting down"),
    }
}
