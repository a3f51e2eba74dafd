use pratki_kernel::{CollectionSchema, IndexSpec, Module};

/// Players, keyed by their Telegram account
pub struct UsersModule;

impl UsersModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    fn schema(&self) -> CollectionSchema {
        // Leaderboards sort by level and experience, highest first.
        CollectionSchema::new("users")
            .unique_key("telegram_id")
            .index(IndexSpec::ascending("username"))
            .index(IndexSpec::descending("level"))
            .index(IndexSpec::descending("experience"))
    }
}

pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(UsersModule::new())
}
