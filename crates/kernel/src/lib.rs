pub mod module;
pub mod registry;
pub mod schema;
pub mod settings;

pub use module::Module;
pub use registry::{ModuleRegistry, RegistryError};
pub use schema::{CollectionSchema, IndexSpec, SortOrder};
