use pratki_kernel::{CollectionSchema, IndexSpec, Module};

/// Seasonal events
pub struct EventsModule;

impl EventsModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Module for EventsModule {
    fn name(&self) -> &'static str {
        "events"
    }

    fn schema(&self) -> CollectionSchema {
        CollectionSchema::new("events")
            .unique_key("event_id")
            .index(IndexSpec::ascending("is_active"))
            .index(IndexSpec::ascending("start_date"))
    }
}

pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(EventsModule::new())
}
