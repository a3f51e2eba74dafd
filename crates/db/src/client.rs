use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use pratki_kernel::settings::DatabaseSettings;
use tracing::instrument;

use crate::error::DbError;

/// Open a client, select the configured database and verify the server
/// answers `ping`.
#[instrument(skip(settings), fields(database = %settings.name))]
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, DbError> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .map_err(DbError::Connect)?;
    options.app_name = Some(settings.app_name.clone());
    options.server_selection_timeout =
        Some(Duration::from_millis(settings.server_selection_timeout_ms));

    let client = Client::with_options(options).map_err(DbError::Connect)?;
    let database = client.database(&settings.name);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(DbError::Connect)?;

    tracing::info!(database = %settings.name, "connected to MongoDB");
    Ok(database)
}
