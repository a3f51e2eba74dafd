//! Declarative description of the collections and indexes a module owns.

use serde::Serialize;

/// Key direction of a single-field index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Numeric direction as used in MongoDB key documents.
    pub const fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(SortOrder::Ascending),
            -1 => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// A single-field index declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub field: &'static str,
    pub order: SortOrder,
    pub unique: bool,
}

impl IndexSpec {
    /// Ascending index that rejects duplicate values.
    pub const fn unique(field: &'static str) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
            unique: true,
        }
    }

    pub const fn ascending(field: &'static str) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
            unique: false,
        }
    }

    pub const fn descending(field: &'static str) -> Self {
        Self {
            field,
            order: SortOrder::Descending,
            unique: false,
        }
    }

    /// Server-side default name, e.g. `telegram_id_1` or `level_-1`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.field, self.order.as_i32())
    }
}

/// The shape of one collection: its name and the indexes it must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSchema {
    pub name: &'static str,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            indexes: Vec::new(),
        }
    }

    /// Declare a unique ascending key on `field`.
    pub fn unique_key(self, field: &'static str) -> Self {
        self.index(IndexSpec::unique(field))
    }

    /// Declare an index. A repeated field+order pair is ignored.
    pub fn index(mut self, spec: IndexSpec) -> Self {
        let name = spec.name();
        if !self.indexes.iter().any(|existing| existing.name() == name) {
            self.indexes.push(spec);
        }
        self
    }

    pub fn unique_keys(&self) -> impl Iterator<Item = &IndexSpec> {
        self.indexes.iter().filter(|index| index.unique)
    }

    pub fn index_names(&self) -> Vec<String> {
        self.indexes.iter().map(IndexSpec::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_names_follow_server_defaults() {
        assert_eq!(IndexSpec::unique("telegram_id").name(), "telegram_id_1");
        assert_eq!(IndexSpec::descending("level").name(), "level_-1");
        assert_eq!(IndexSpec::ascending("start_date").name(), "start_date_1");
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let schema = CollectionSchema::new("cards")
            .unique_key("card_id")
            .index(IndexSpec::ascending("rarity"))
            .index(IndexSpec::ascending("name"));

        assert_eq!(schema.index_names(), vec!["card_id_1", "rarity_1", "name_1"]);
        let unique: Vec<_> = schema.unique_keys().map(|index| index.field).collect();
        assert_eq!(unique, vec!["card_id"]);
    }

    #[test]
    fn repeated_declaration_is_ignored() {
        let schema = CollectionSchema::new("users")
            .unique_key("telegram_id")
            .index(IndexSpec::ascending("telegram_id"))
            .index(IndexSpec::descending("telegram_id"));

        assert_eq!(schema.indexes.len(), 2);
        assert!(schema.indexes[0].unique);
    }

    #[test]
    fn sort_order_round_trips_through_direction() {
        assert_eq!(SortOrder::from_i32(-1), Some(SortOrder::Descending));
        assert_eq!(SortOrder::from_i32(1), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::from_i32(0), None);
    }

    #[test]
    fn schema_serializes_to_json() {
        let schema = CollectionSchema::new("events").unique_key("event_id");
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["name"], "events");
        assert_eq!(value["indexes"][0]["field"], "event_id");
        assert_eq!(value["indexes"][0]["order"], "ascending");
        assert_eq!(value["indexes"][0]["unique"], true);
    }
}
