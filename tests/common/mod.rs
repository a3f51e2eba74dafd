use mongodb::Database;
use pratki_kernel::settings::{DatabaseSettings, Settings};

const URI_ENV: &str = "PRATKI_TEST_MONGODB_URI";

/// Check if a test MongoDB deployment is configured.
#[allow(dead_code)]
pub fn mongo_available() -> bool {
    std::env::var(URI_ENV).is_ok()
}

/// Skip test with message if no MongoDB is configured.
#[macro_export]
macro_rules! require_mongo {
    () => {
        if !crate::common::mongo_available() {
            eprintln!("Skipping: PRATKI_TEST_MONGODB_URI not set");
            return;
        }
    };
}

/// Settings pointing at a fresh, uniquely named database.
#[allow(dead_code)]
pub fn test_settings() -> Settings {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    Settings {
        database: DatabaseSettings {
            uri: std::env::var(URI_ENV).unwrap(),
            name: format!("pratki_test_{}", nanos),
            ..DatabaseSettings::default()
        },
        ..Settings::default()
    }
}

/// Raw handle on the test database, for assertions and cleanup.
#[allow(dead_code)]
pub async fn test_db(settings: &Settings) -> Database {
    pratki_db::connect(&settings.database)
        .await
        .expect("Failed to connect to test MongoDB")
}
