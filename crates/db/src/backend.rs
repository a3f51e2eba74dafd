//! The administrative surface of the database that provisioning needs.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use pratki_kernel::{IndexSpec, SortOrder};

use crate::error::{server_code, DbError, NAMESPACE_EXISTS};

/// An index as it currently exists on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveIndex {
    pub name: String,
    pub keys: Vec<(String, i32)>,
    pub unique: bool,
}

impl LiveIndex {
    /// True when this index has exactly the single key and uniqueness of `spec`.
    pub fn matches(&self, spec: &IndexSpec) -> bool {
        self.unique == spec.unique
            && self.keys.len() == 1
            && self.keys[0].0 == spec.field
            && SortOrder::from_i32(self.keys[0].1) == Some(spec.order)
    }
}

/// Whether an ensure step found the target present or had to create it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    AlreadyPresent,
}

#[async_trait]
pub trait SchemaBackend: Send + Sync {
    async fn collection_names(&self) -> Result<Vec<String>, DbError>;

    /// Create a collection. Must report `AlreadyPresent` rather than fail
    /// when the collection appeared concurrently.
    async fn create_collection(&self, name: &str) -> Result<Outcome, DbError>;

    /// Create an index and return its server-side name.
    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String, DbError>;

    async fn describe_indexes(&self, collection: &str) -> Result<Vec<LiveIndex>, DbError>;

    async fn document_count(&self, collection: &str) -> Result<u64, DbError>;
}

/// [`SchemaBackend`] over a live MongoDB database handle.
#[derive(Debug, Clone)]
pub struct MongoBackend {
    database: Database,
}

impl MongoBackend {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

pub(crate) fn index_model(index: &IndexSpec) -> IndexModel {
    let mut keys = Document::new();
    keys.insert(index.field, index.order.as_i32());

    let mut options = IndexOptions::builder().name(index.name()).build();
    if index.unique {
        options.unique = Some(true);
    }

    IndexModel::builder().keys(keys).options(options).build()
}

fn live_index(model: IndexModel) -> LiveIndex {
    let keys = model
        .keys
        .iter()
        .map(|(field, direction)| (field.clone(), key_direction(direction)))
        .collect();
    let options = model.options.unwrap_or_default();

    LiveIndex {
        name: options.name.unwrap_or_default(),
        keys,
        unique: options.unique.unwrap_or(false),
    }
}

// Key documents may carry the direction as int32, int64 or double.
fn key_direction(value: &Bson) -> i32 {
    match value {
        Bson::Int32(v) => *v,
        Bson::Int64(v) => *v as i32,
        Bson::Double(v) => *v as i32,
        _ => 0,
    }
}

#[async_trait]
impl SchemaBackend for MongoBackend {
    async fn collection_names(&self) -> Result<Vec<String>, DbError> {
        self.database
            .list_collection_names()
            .await
            .map_err(|source| DbError::Driver {
                operation: "listCollections",
                target: self.database.name().to_string(),
                source,
            })
    }

    async fn create_collection(&self, name: &str) -> Result<Outcome, DbError> {
        match self.database.create_collection(name).await {
            Ok(()) => Ok(Outcome::Created),
            Err(err) if server_code(&err) == Some(NAMESPACE_EXISTS) => Ok(Outcome::AlreadyPresent),
            Err(source) => Err(DbError::Driver {
                operation: "create",
                target: name.to_string(),
                source,
            }),
        }
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String, DbError> {
        let name = index.name();
        let result = self
            .collection(collection)
            .create_index(index_model(index))
            .await
            .map_err(|err| DbError::from_index_error(err, collection, &name))?;
        Ok(result.index_name)
    }

    async fn describe_indexes(&self, collection: &str) -> Result<Vec<LiveIndex>, DbError> {
        let to_driver_error = |source: mongodb::error::Error| DbError::Driver {
            operation: "listIndexes",
            target: collection.to_string(),
            source,
        };

        let models: Vec<IndexModel> = self
            .collection(collection)
            .list_indexes()
            .await
            .map_err(to_driver_error)?
            .try_collect()
            .await
            .map_err(to_driver_error)?;

        Ok(models.into_iter().map(live_index).collect())
    }

    async fn document_count(&self, collection: &str) -> Result<u64, DbError> {
        self.collection(collection)
            .estimated_document_count()
            .await
            .map_err(|source| DbError::Driver {
                operation: "count",
                target: collection.to_string(),
                source,
            })
    }
}
