//! Error types for schema provisioning.

use thiserror::Error;

/// Server code for a duplicate key, also raised while building a unique
/// index over data that already contains duplicates.
pub const DUPLICATE_KEY: i32 = 11000;
/// Server code returned when creating a collection that already exists.
pub const NAMESPACE_EXISTS: i32 = 48;
/// An index with this name exists with different options.
pub const INDEX_OPTIONS_CONFLICT: i32 = 85;
/// An index with this name exists with different keys.
pub const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to MongoDB: {0}")]
    Connect(#[source] mongodb::error::Error),

    #[error("cannot build unique index '{index}' on '{collection}': existing documents hold duplicate values ({message})")]
    UniqueConflict {
        collection: String,
        index: String,
        message: String,
    },

    #[error("index '{index}' on '{collection}' already exists with a different definition ({message})")]
    IndexConflict {
        collection: String,
        index: String,
        message: String,
    },

    #[error("{operation} failed for '{target}': {source}")]
    Driver {
        operation: &'static str,
        target: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("schema provisioning incomplete: {} of {attempted} statements failed", .failures.len())]
    Incomplete {
        attempted: usize,
        failures: Vec<StepFailure>,
    },
}

impl DbError {
    /// Wrap a driver error raised while running `createIndexes`.
    pub fn from_index_error(
        err: mongodb::error::Error,
        collection: &str,
        index: &str,
    ) -> Self {
        match classify_index_failure(server_code(&err)) {
            IndexFailure::UniqueConflict => DbError::UniqueConflict {
                collection: collection.to_string(),
                index: index.to_string(),
                message: err.to_string(),
            },
            IndexFailure::DefinitionConflict => DbError::IndexConflict {
                collection: collection.to_string(),
                index: index.to_string(),
                message: err.to_string(),
            },
            IndexFailure::Other => DbError::Driver {
                operation: "createIndexes",
                target: format!("{}.{}", collection, index),
                source: err,
            },
        }
    }

    /// True for failures that re-running cannot fix without operator action.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DbError::UniqueConflict { .. } | DbError::IndexConflict { .. }
        )
    }
}

/// One statement that did not complete.
#[derive(Debug)]
pub struct StepFailure {
    pub collection: String,
    /// `None` when the collection itself could not be ensured.
    pub index: Option<String>,
    pub error: DbError,
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.index {
            Some(index) => write!(f, "{}.{}: {}", self.collection, index, self.error),
            None => write!(f, "{}: {}", self.collection, self.error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexFailure {
    UniqueConflict,
    DefinitionConflict,
    Other,
}

pub(crate) fn classify_index_failure(code: Option<i32>) -> IndexFailure {
    match code {
        Some(DUPLICATE_KEY) => IndexFailure::UniqueConflict,
        Some(INDEX_OPTIONS_CONFLICT) | Some(INDEX_KEY_SPECS_CONFLICT) => {
            IndexFailure::DefinitionConflict
        }
        _ => IndexFailure::Other,
    }
}

/// Extract the server error code from command and write failures.
pub(crate) fn server_code(err: &mongodb::error::Error) -> Option<i32> {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(concern)) => Some(concern.code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_is_a_unique_conflict() {
        assert_eq!(
            classify_index_failure(Some(DUPLICATE_KEY)),
            IndexFailure::UniqueConflict
        );
    }

    #[test]
    fn option_and_key_mismatches_are_definition_conflicts() {
        assert_eq!(
            classify_index_failure(Some(INDEX_OPTIONS_CONFLICT)),
            IndexFailure::DefinitionConflict
        );
        assert_eq!(
            classify_index_failure(Some(INDEX_KEY_SPECS_CONFLICT)),
            IndexFailure::DefinitionConflict
        );
    }

    #[test]
    fn other_codes_stay_driver_errors() {
        assert_eq!(classify_index_failure(Some(13)), IndexFailure::Other);
        assert_eq!(classify_index_failure(None), IndexFailure::Other);
    }

    #[test]
    fn incomplete_error_counts_failures() {
        let err = DbError::Incomplete {
            attempted: 16,
            failures: vec![StepFailure {
                collection: "users".to_string(),
                index: Some("telegram_id_1".to_string()),
                error: DbError::UniqueConflict {
                    collection: "users".to_string(),
                    index: "telegram_id_1".to_string(),
                    message: "E11000".to_string(),
                },
            }],
        };
        assert_eq!(
            err.to_string(),
            "schema provisioning incomplete: 1 of 16 statements failed"
        );
    }

    #[test]
    fn conflicts_are_configuration_errors() {
        let err = DbError::IndexConflict {
            collection: "cards".to_string(),
            index: "name_1".to_string(),
            message: "options differ".to_string(),
        };
        assert!(err.is_configuration_error());
    }
}
