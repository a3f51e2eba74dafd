pub mod achievements;
pub mod cards;
pub mod events;
pub mod users;

use pratki_kernel::{CollectionSchema, ModuleRegistry, RegistryError};

/// Register all data-model modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) -> Result<(), RegistryError> {
    registry.register(users::create_module())?;
    registry.register(cards::create_module())?;
    registry.register(achievements::create_module())?;
    registry.register(events::create_module())?;
    Ok(())
}

/// Registry holding every module of the Pratki data model
pub fn registry() -> Result<ModuleRegistry, RegistryError> {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

/// The schemas of all four collections, in provisioning order
pub fn declared_schemas() -> Result<Vec<CollectionSchema>, RegistryError> {
    Ok(registry()?.schemas())
}
