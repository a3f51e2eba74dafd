//! MongoDB client factory and schema provisioning for Pratki.

pub mod backend;
pub mod client;
pub mod error;
pub mod initializer;
pub mod inspect;

#[cfg(test)]
mod memory;

pub use backend::{LiveIndex, MongoBackend, Outcome, SchemaBackend};
pub use client::connect;
pub use error::{DbError, StepFailure};
pub use initializer::{
    CollectionReport, FailurePolicy, IndexReport, InitReport, SchemaInitializer,
    COMPLETION_MESSAGE,
};
pub use inspect::{inspect, CollectionStatus, SchemaStatus};
