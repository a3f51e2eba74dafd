//! Compares the live database with the declared schemas.

use pratki_kernel::CollectionSchema;
use serde::Serialize;

use crate::backend::SchemaBackend;
use crate::error::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStatus {
    pub name: String,
    pub exists: bool,
    pub documents: u64,
    pub present: Vec<String>,
    pub missing: Vec<String>,
    /// Present under the declared name but with other keys or uniqueness.
    pub mismatched: Vec<String>,
}

impl CollectionStatus {
    pub fn is_satisfied(&self) -> bool {
        self.exists && self.missing.is_empty() && self.mismatched.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaStatus {
    pub collections: Vec<CollectionStatus>,
}

impl SchemaStatus {
    pub fn is_satisfied(&self) -> bool {
        self.collections.iter().all(CollectionStatus::is_satisfied)
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionStatus> {
        self.collections.iter().find(|collection| collection.name == name)
    }
}

pub async fn inspect<B: SchemaBackend + ?Sized>(
    backend: &B,
    schemas: &[CollectionSchema],
) -> Result<SchemaStatus, DbError> {
    let existing = backend.collection_names().await?;
    let mut status = SchemaStatus::default();

    for schema in schemas {
        if !existing.iter().any(|name| name == schema.name) {
            status.collections.push(CollectionStatus {
                name: schema.name.to_string(),
                exists: false,
                documents: 0,
                present: Vec::new(),
                missing: schema.index_names(),
                mismatched: Vec::new(),
            });
            continue;
        }

        let live = backend.describe_indexes(schema.name).await?;
        let documents = backend.document_count(schema.name).await?;
        let mut collection = CollectionStatus {
            name: schema.name.to_string(),
            exists: true,
            documents,
            present: Vec::new(),
            missing: Vec::new(),
            mismatched: Vec::new(),
        };

        for index in &schema.indexes {
            let name = index.name();
            match live.iter().find(|candidate| candidate.name == name) {
                Some(found) if found.matches(index) => collection.present.push(name),
                Some(_) => collection.mismatched.push(name),
                None => collection.missing.push(name),
            }
        }

        tracing::debug!(
            collection = schema.name,
            present = collection.present.len(),
            missing = collection.missing.len(),
            mismatched = collection.mismatched.len(),
            "collection inspected"
        );
        status.collections.push(collection);
    }

    Ok(status)
}
