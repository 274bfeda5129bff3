//! Study Focus - a study companion server
//!
//! This is the main entry point for the study-focus application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use study_focus::{
    api::create_router,
    config::Config,
    services::{GeminiClient, TextGenerator, UnconfiguredGenerator},
    state::AppState,
    tasks::session_sweeper_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // RUST_LOG wins over the verbose flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("study_focus={},tower_http=info", config.log_level()))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting study-focus server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, env={:?}, reflection_count={}",
        config.host, config.port, config.environment, config.reflection_count
    );

    let generator: Arc<dyn TextGenerator> = match config.api_key() {
        Some(key) => Arc::new(GeminiClient::new(
            config.generator_url(),
            &config.model,
            key,
            config.request_timeout(),
        )?),
        None => {
            warn!("GEMINI_API_KEY is not set; AI helpers are disabled and reflection uses fallback questions");
            Arc::new(UnconfiguredGenerator)
        }
    };

    // Create application state
    let state = Arc::new(
        AppState::builder(generator)
            .reflection(usize::from(config.reflection_count), config.reflection_timeout())
            .bind(&config.host, config.port)
            .environment(config.environment)
            .build(),
    );

    // Close focus views whose clients went away without a DELETE
    tokio::spawn(session_sweeper_task(
        Arc::clone(&state),
        config.sweep_interval(),
        config.session_idle_timeout(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /api/focus                 - Open a focus session");
    info!("  POST /api/focus/:id/start       - Start or resume the countdown");
    info!("  POST /api/reflection-questions  - Generate reflection questions");
    info!("  POST /api/summarize             - Summarize study material");
    info!("  GET  /api/focus/:id/next        - Wait for the next session snapshot");
    info!("  POST /api/study-plan            - Build a study plan");
    info!("  POST /api/feedback              - Review an assignment");
    info!("  GET  /status                    - Check current status");
    info!("  GET  /health                    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
