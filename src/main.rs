use dotenvy::dotenv;
use vision_qa_service::config::VisionQaConfig;
use vision_qa_service::observability::init_tracing;
use vision_qa_service::services::init_metrics;
use vision_qa_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics();

    // Initialize tracing
    init_tracing("info");

    let config = VisionQaConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    tracing::info!("Starting vision-qa-service on port {}", app.port());

    app.run_until_stopped().await?;

    Ok(())
}
