use std::sync::Arc;

use crate::module::Module;
use crate::schema::CollectionSchema;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("module '{0}' is already registered")]
    DuplicateModule(&'static str),

    #[error("collection '{collection}' is already owned by module '{owner}'")]
    DuplicateCollection {
        collection: &'static str,
        owner: &'static str,
    },
}

/// Ordered set of modules making up the data model
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module; names and collections must be unique
    pub fn register(&mut self, module: Arc<dyn Module>) -> Result<(), RegistryError> {
        if self.get_module(module.name()).is_some() {
            return Err(RegistryError::DuplicateModule(module.name()));
        }

        let collection = module.schema().name;
        if let Some(owner) = self
            .modules
            .iter()
            .find(|existing| existing.schema().name == collection)
        {
            return Err(RegistryError::DuplicateCollection {
                collection,
                owner: owner.name(),
            });
        }

        tracing::debug!(module = module.name(), collection, "module registered");
        self.modules.push(module);
        Ok(())
    }

    /// Get all registered modules in registration order
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Collect every module's collection schema, in registration order
    pub fn schemas(&self) -> Vec<CollectionSchema> {
        self.modules.iter().map(|module| module.schema()).collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
