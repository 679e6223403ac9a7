use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocrgate::api::{create_router, AppState};
use ocrgate::config::Config;
use ocrgate::ocr::{FallbackOrchestrator, RecognitionEngine, RegionEngine, TesseractEngine};

#[derive(Parser)]
#[command(name = "ocrgate")]
#[command(about = "Self-hostable OCR gateway with PaddleOCR and Tesseract fallback")]
struct Args {
    /// Bind address (overrides OCRGATE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides OCRGATE_PORT)
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ocrgate=info,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Initializing PaddleOCR...");
    let region: Arc<dyn RecognitionEngine> = Arc::new(RegionEngine::from_config(&config.ocr));
    tracing::info!("Initializing Tesseract...");
    let tesseract: Arc<dyn RecognitionEngine> = Arc::new(TesseractEngine::new(&config.ocr));

    let region_status = region.status();
    let tesseract_status = tesseract.status();
    tracing::info!(
        paddle_available = region_status.available,
        paddle_initialized = region_status.initialized,
        tesseract_available = tesseract_status.available,
        "OCR engines ready"
    );
    if !region_status.is_ready() && !tesseract_status.available {
        tracing::warn!("No OCR engine available - every /ocr request will fail");
    }

    let state = AppState::new(config.clone(), FallbackOrchestrator::new(region, tesseract));
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("ocrgate starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  OCR endpoint: http://{}/ocr", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
