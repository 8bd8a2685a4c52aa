use anyhow::Context;
use doc_portal::config::get_configuration;
use doc_portal::startup::Application;
use dotenvy::dotenv;
use portal_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().context("Failed to read configuration")?;

    init_tracing(
        "doc-portal",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    let application = Application::build(configuration)
        .await
        .context("Failed to build application")?;

    application.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
