use anyhow::Context;
use pratki_db::{FailurePolicy, InitReport, MongoBackend, SchemaInitializer, SchemaStatus};
use pratki_kernel::settings::Settings;

use crate::modules;

/// Connect to the configured database and ensure the declared schema.
pub async fn run(settings: &Settings) -> anyhow::Result<InitReport> {
    run_with_policy(settings, FailurePolicy::from_settings(&settings.schema)).await
}

pub async fn run_with_policy(
    settings: &Settings,
    policy: FailurePolicy,
) -> anyhow::Result<InitReport> {
    let schemas = modules::declared_schemas().with_context(|| "invalid module registry")?;

    tracing::info!(
        env = ?settings.environment,
        database = %settings.database.name,
        collections = schemas.len(),
        "schema provisioning starting"
    );

    let database = pratki_db::connect(&settings.database)
        .await
        .with_context(|| format!("failed to connect to database '{}'", settings.database.name))?;
    let backend = MongoBackend::new(database);

    let report = SchemaInitializer::new(&backend)
        .with_policy(policy)
        .apply(&schemas)
        .await
        .with_context(|| format!("failed to provision database '{}'", settings.database.name))?;

    Ok(report)
}

/// Connect and compare the live database with the declared schema.
pub async fn status(settings: &Settings) -> anyhow::Result<SchemaStatus> {
    let schemas = modules::declared_schemas().with_context(|| "invalid module registry")?;
    let database = pratki_db::connect(&settings.database)
        .await
        .with_context(|| format!("failed to connect to database '{}'", settings.database.name))?;

    pratki_db::inspect(&MongoBackend::new(database), &schemas)
        .await
        .with_context(|| format!("failed to inspect database '{}'", settings.database.name))
}
