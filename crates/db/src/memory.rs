//! In-memory [`SchemaBackend`] used by unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use pratki_kernel::IndexSpec;

use crate::backend::{LiveIndex, Outcome, SchemaBackend};
use crate::error::DbError;

#[derive(Default)]
struct State {
    collections: BTreeMap<String, Vec<LiveIndex>>,
    documents: BTreeMap<String, u64>,
    broken_collections: BTreeSet<String>,
    broken_listings: BTreeSet<String>,
    duplicate_data: BTreeSet<(String, String)>,
    calls: Vec<String>,
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creating or inspecting `collection` fails with a connection error.
    pub(crate) fn break_collection(&self, collection: &str) {
        self.state
            .lock()
            .unwrap()
            .broken_collections
            .insert(collection.to_string());
    }

    /// Listing the indexes of `collection` fails; creating it still works.
    pub(crate) fn break_index_listing(&self, collection: &str) {
        self.state
            .lock()
            .unwrap()
            .broken_listings
            .insert(collection.to_string());
    }

    /// Building a unique index named `index` fails as if the data held duplicates.
    pub(crate) fn seed_duplicates(&self, collection: &str, index: &str) {
        self.state
            .lock()
            .unwrap()
            .duplicate_data
            .insert((collection.to_string(), index.to_string()));
    }

    pub(crate) fn seed_documents(&self, collection: &str, count: u64) {
        self.state
            .lock()
            .unwrap()
            .documents
            .insert(collection.to_string(), count);
    }

    /// Put an index in place directly, bypassing `create_index`.
    pub(crate) fn seed_index(&self, collection: &str, index: LiveIndex) {
        let mut state = self.state.lock().unwrap();
        state
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| vec![id_index()])
            .push(index);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn index_names_of(&self, collection: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .map(|indexes| indexes.iter().map(|index| index.name.clone()).collect())
            .unwrap_or_default()
    }
}

fn id_index() -> LiveIndex {
    LiveIndex {
        name: "_id_".to_string(),
        keys: vec![("_id".to_string(), 1)],
        unique: false,
    }
}

fn unreachable_error(target: &str) -> DbError {
    DbError::Driver {
        operation: "create",
        target: target.to_string(),
        source: mongodb::error::Error::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )),
    }
}

#[async_trait]
impl SchemaBackend for MemoryBackend {
    async fn collection_names(&self) -> Result<Vec<String>, DbError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("listCollections".to_string());
        Ok(state.collections.keys().cloned().collect())
    }

    async fn create_collection(&self, name: &str) -> Result<Outcome, DbError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create {}", name));
        if state.broken_collections.contains(name) {
            return Err(unreachable_error(name));
        }
        if state.collections.contains_key(name) {
            return Ok(Outcome::AlreadyPresent);
        }
        state.collections.insert(name.to_string(), vec![id_index()]);
        Ok(Outcome::Created)
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String, DbError> {
        let mut state = self.state.lock().unwrap();
        let name = index.name();
        state.calls.push(format!("createIndex {}.{}", collection, name));

        if index.unique
            && state
                .duplicate_data
                .contains(&(collection.to_string(), name.clone()))
        {
            return Err(DbError::UniqueConflict {
                collection: collection.to_string(),
                index: name,
                message: "E11000 duplicate key error".to_string(),
            });
        }

        let indexes = state
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| vec![id_index()]);
        if let Some(existing) = indexes.iter().find(|existing| existing.name == name) {
            if existing.matches(index) {
                return Ok(name);
            }
            return Err(DbError::IndexConflict {
                collection: collection.to_string(),
                index: name,
                message: "index options differ".to_string(),
            });
        }
        indexes.push(LiveIndex {
            name: name.clone(),
            keys: vec![(index.field.to_string(), index.order.as_i32())],
            unique: index.unique,
        });
        Ok(name)
    }

    async fn describe_indexes(&self, collection: &str) -> Result<Vec<LiveIndex>, DbError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("listIndexes {}", collection));
        if state.broken_collections.contains(collection)
            || state.broken_listings.contains(collection)
        {
            return Err(unreachable_error(collection));
        }
        Ok(state.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn document_count(&self, collection: &str) -> Result<u64, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.documents.get(collection).copied().unwrap_or(0))
    }
}
