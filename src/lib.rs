//! Pratki bot database schema
//!
//! Declares the collections of the Pratki data model and provisions them
//! on a MongoDB database.

pub mod bootstrap;
pub mod modules;

pub use modules::{declared_schemas, register_all, registry};
