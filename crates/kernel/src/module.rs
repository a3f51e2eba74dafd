use crate::schema::CollectionSchema;

/// A unit of the data model that owns exactly one collection.
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Collection and indexes contributed by this module
    fn schema(&self) -> CollectionSchema;
}
