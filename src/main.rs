use anyhow::Context;
use pratki_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Pratki settings")?;
    pratki_telemetry::init(&settings.telemetry).with_context(|| "failed to initialize telemetry")?;

    let report = pratki_app::bootstrap::run(&settings).await?;

    tracing::info!(created = report.created(), "pratki-app bootstrap complete");
    println!("{}", pratki_db::COMPLETION_MESSAGE);
    Ok(())
}
