use pratki_kernel::{CollectionSchema, IndexSpec, Module};

/// Collectible card catalogue
pub struct CardsModule;

impl CardsModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Module for CardsModule {
    fn name(&self) -> &'static str {
        "cards"
    }

    fn schema(&self) -> CollectionSchema {
        CollectionSchema::new("cards")
            .unique_key("card_id")
            .index(IndexSpec::ascending("rarity"))
            .index(IndexSpec::ascending("name"))
    }
}

pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CardsModule::new())
}
