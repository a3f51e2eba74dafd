use pratki_kernel::{CollectionSchema, IndexSpec, Module};

pub struct AchievementsModule;

impl AchievementsModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Module for AchievementsModule {
    fn name(&self) -> &'static str {
        "achievements"
    }

    fn schema(&self) -> CollectionSchema {
        CollectionSchema::new("achievements")
            .unique_key("achievement_id")
            .index(IndexSpec::ascending("category"))
    }
}

pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AchievementsModule::new())
}
