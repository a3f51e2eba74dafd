//! Ensures declared collections and indexes exist.
//!
//! Every step is "create if absent", so applying the same schemas twice
//! leaves the database unchanged the second time. An index that exists
//! under a declared name with other keys or uniqueness is a conflict.

use pratki_kernel::settings::SchemaSettings;
use pratki_kernel::CollectionSchema;
use serde::Serialize;
use tracing::instrument;

use crate::backend::{Outcome, SchemaBackend};
use crate::error::{DbError, StepFailure};

/// Printed and logged once provisioning succeeds.
pub const COMPLETION_MESSAGE: &str = "Pratki database initialized successfully!";

/// What to do after a statement fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Attempt every remaining statement, then report all failures.
    #[default]
    Continue,
    /// Return the first failure without attempting anything else.
    FailFast,
}

impl FailurePolicy {
    pub fn from_settings(settings: &SchemaSettings) -> Self {
        if settings.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub name: String,
    pub outcome: Outcome,
    pub indexes: Vec<IndexReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub collections: Vec<CollectionReport>,
}

impl InitReport {
    /// Number of collections and indexes created by this run.
    pub fn created(&self) -> usize {
        self.collections
            .iter()
            .map(|collection| {
                let own = usize::from(collection.outcome == Outcome::Created);
                own + collection
                    .indexes
                    .iter()
                    .filter(|index| index.outcome == Outcome::Created)
                    .count()
            })
            .sum()
    }

    /// True when the database already matched every declaration.
    pub fn is_noop(&self) -> bool {
        self.created() == 0
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionReport> {
        self.collections.iter().find(|collection| collection.name == name)
    }
}

pub struct SchemaInitializer<'a, B: SchemaBackend + ?Sized> {
    backend: &'a B,
    policy: FailurePolicy,
}

impl<'a, B: SchemaBackend + ?Sized> SchemaInitializer<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ensure every schema's collection, then every schema's indexes, in
    /// declaration order.
    #[instrument(skip_all, fields(collections = schemas.len(), policy = ?self.policy))]
    pub async fn apply(&self, schemas: &[CollectionSchema]) -> Result<InitReport, DbError> {
        let mut existing = self.backend.collection_names().await?;
        let mut report = InitReport::default();
        let mut failures = Vec::new();
        let mut attempted = 0;

        let mut ensured = Vec::with_capacity(schemas.len());
        for schema in schemas {
            attempted += 1;
            match self.ensure_collection(schema.name, &existing).await {
                Ok(outcome) => {
                    if outcome == Outcome::Created {
                        existing.push(schema.name.to_string());
                    }
                    ensured.push((schema, outcome));
                }
                Err(error) => self.record(schema.name, None, error, &mut failures)?,
            }
        }

        for (schema, outcome) in ensured {
            attempted += schema.indexes.len();
            let live = match self.backend.describe_indexes(schema.name).await {
                Ok(live) => live,
                Err(error) => {
                    self.record(schema.name, None, error, &mut failures)?;
                    continue;
                }
            };

            let mut indexes = Vec::with_capacity(schema.indexes.len());
            for index in &schema.indexes {
                let name = index.name();
                if let Some(found) = live.iter().find(|candidate| candidate.name == name) {
                    if found.matches(index) {
                        tracing::debug!(collection = schema.name, index = %name, "index already present");
                        indexes.push(IndexReport {
                            name,
                            outcome: Outcome::AlreadyPresent,
                        });
                    } else {
                        let error = DbError::IndexConflict {
                            collection: schema.name.to_string(),
                            index: name.clone(),
                            message: format!(
                                "declared {:?} unique={}, found keys {:?} unique={}",
                                index.order, index.unique, found.keys, found.unique
                            ),
                        };
                        self.record(schema.name, Some(name), error, &mut failures)?;
                    }
                    continue;
                }

                match self.backend.create_index(schema.name, index).await {
                    Ok(server_name) => {
                        tracing::info!(
                            collection = schema.name,
                            index = %server_name,
                            unique = index.unique,
                            "index created"
                        );
                        indexes.push(IndexReport {
                            name: server_name,
                            outcome: Outcome::Created,
                        });
                    }
                    Err(error) => self.record(schema.name, Some(name), error, &mut failures)?,
                }
            }

            report.collections.push(CollectionReport {
                name: schema.name.to_string(),
                outcome,
                indexes,
            });
        }

        if !failures.is_empty() {
            return Err(DbError::Incomplete {
                attempted,
                failures,
            });
        }

        tracing::info!(created = report.created(), "{}", COMPLETION_MESSAGE);
        Ok(report)
    }

    async fn ensure_collection(&self, name: &str, existing: &[String]) -> Result<Outcome, DbError> {
        if existing.iter().any(|present| present == name) {
            tracing::debug!(collection = name, "collection already present");
            return Ok(Outcome::AlreadyPresent);
        }

        let outcome = self.backend.create_collection(name).await?;
        tracing::info!(collection = name, outcome = ?outcome, "collection ensured");
        Ok(outcome)
    }

    fn record(
        &self,
        collection: &str,
        index: Option<String>,
        error: DbError,
        failures: &mut Vec<StepFailure>,
    ) -> Result<(), DbError> {
        tracing::error!(
            collection,
            index = index.as_deref().unwrap_or("-"),
            error = %error,
            "schema statement failed"
        );

        match self.policy {
            FailurePolicy::FailFast => Err(error),
            FailurePolicy::Continue => {
                failures.push(StepFailure {
                    collection: collection.to_string(),
                    index,
                    error,
                });
                Ok(())
            }
        }
    }
}
