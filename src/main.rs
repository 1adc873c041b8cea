use anyhow::{Context, Result};
use clap::Parser;
use screen_recorder::{create_router, AppState, Config, ControllerEvent, Platform, RecorderController};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "screen-recorder", about = "Screen recorder with a small HTTP UI")]
struct Args {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/screen-recorder")]
    config: String,

    /// Override the HTTP port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("Screen Recorder v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Recording profile: {}", cfg.recorder.mime_type);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let platform = Platform::synthetic(&cfg.platform);
    let controller = RecorderController::new(cfg, platform);

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ControllerEvent::Alert { message }) => warn!("ALERT: {}", message),
                Ok(ControllerEvent::StateChanged { state, .. }) => info!("State: {:?}", state),
                Ok(ControllerEvent::RecordingAdded { entry }) => {
                    info!("New recording: {} ({} bytes)", entry.label, entry.size_bytes)
                }
                Err(RecvError::Lagged(skipped)) => warn!("Event log skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = create_router(AppState::new(controller));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP UI listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
