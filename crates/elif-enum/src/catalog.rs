//! Enum catalog model and the connection-scoped catalog cache
//!
//! The catalog maps every enum type name to its values in the database's own
//! sort order. It is keyed by a `BTreeMap`, so iteration follows type name.
//!
//! The cache belongs to a single connection. Mutations issued through that
//! connection's manager update or clear it; DDL run by any other session is
//! not observed until the cache is cleared.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::statement::{EnumStatement, ValuePosition};

/// Introspection query returning one row per enum type with its ordered labels
pub const ENUM_CATALOG_QUERY: &str = "\
SELECT t.typname::text AS name, \
COALESCE(array_agg(e.enumlabel::text ORDER BY e.enumsortorder) FILTER (WHERE e.enumlabel IS NOT NULL), '{}') AS labels \
FROM pg_type t \
LEFT JOIN pg_enum e ON e.enumtypid = t.oid \
WHERE t.typtype = 'e' \
GROUP BY t.oid, t.typname \
ORDER BY t.typname";

/// Longest type name PostgreSQL stores; longer names are truncated (NAMEDATALEN - 1)
pub const MAX_IDENTIFIER_BYTES: usize = 63;

/// One row of the catalog introspection query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRow {
    pub name: String,
    pub labels: Vec<String>,
}

/// Snapshot of every enum type and its ordered values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumCatalog {
    types: BTreeMap<String, Vec<String>>,
}

impl EnumCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from introspection rows.
    ///
    /// Rows are keyed by bare type name. Enum types sharing a name across
    /// schemas collapse into one entry, and the last row wins.
    pub fn from_rows(rows: impl IntoIterator<Item = EnumRow>) -> Self {
        rows.into_iter()
            .map(|row| (row.name, row.labels))
            .collect()
    }

    /// Values of one enum type, in sort order
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.types.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Enum type names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// `(name, values)` pairs ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.types
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Insert or replace a type's values
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.types.insert(name.into(), values);
    }

    /// Apply a successfully executed statement to this snapshot.
    ///
    /// Returns `false` when the snapshot cannot represent the statement's
    /// effect (a missing type or anchor value, or a new type name the
    /// server would truncate), in which case it must be discarded.
    pub fn apply(&mut self, statement: &EnumStatement) -> bool {
        match statement {
            EnumStatement::Create { name, values } => {
                if name.len() > MAX_IDENTIFIER_BYTES || self.types.contains_key(name) {
                    return false;
                }
                self.types.insert(name.clone(), values.clone());
                true
            }
            EnumStatement::Rename { from, to } => match self.types.remove(from) {
                Some(values) if to.len() <= MAX_IDENTIFIER_BYTES && !self.types.contains_key(to) => {
                    self.types.insert(to.clone(), values);
                    true
                }
                _ => false,
            },
            EnumStatement::Drop { name } => self.types.remove(name).is_some(),
            EnumStatement::AddValue { name, value, position } => {
                let Some(values) = self.types.get_mut(name) else {
                    return false;
                };
                if values.contains(value) {
                    return false;
                }
                let index = match position {
                    ValuePosition::End => Some(values.len()),
                    ValuePosition::Before(anchor) => values.iter().position(|v| v == anchor),
                    ValuePosition::After(anchor) => {
                        values.iter().position(|v| v == anchor).map(|i| i + 1)
                    }
                };
                match index {
                    Some(index) => {
                        values.insert(index, value.clone());
                        true
                    }
                    None => false,
                }
            }
            EnumStatement::RenameValue { name, from, to } => {
                let Some(values) = self.types.get_mut(name) else {
                    return false;
                };
                if values.contains(to) {
                    return false;
                }
                match values.iter_mut().find(|v| v.as_str() == from.as_str()) {
                    Some(slot) => {
                        *slot = to.clone();
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Consume the catalog into its underlying map
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.types
    }
}

impl FromIterator<(String, Vec<String>)> for EnumCatalog {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

/// Lazily populated cache of the enum catalog for one connection
#[derive(Debug, Default)]
pub struct CatalogCache {
    catalog: Option<EnumCatalog>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached catalog, if populated
    pub fn get(&self) -> Option<&EnumCatalog> {
        self.catalog.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.catalog.is_some()
    }

    /// Replace the cached catalog with a fresh snapshot
    pub fn populate(&mut self, catalog: EnumCatalog) -> &EnumCatalog {
        self.catalog.insert(catalog)
    }

    /// Take the cached catalog out, leaving the cache unpopulated
    pub fn take(&mut self) -> Option<EnumCatalog> {
        self.catalog.take()
    }

    /// Fold a successful statement into the cache.
    ///
    /// An unpopulated cache stays unpopulated. If the statement cannot be
    /// applied the whole cache is cleared so the next read re-queries.
    /// Returns whether the cache still holds a snapshot.
    pub fn apply(&mut self, statement: &EnumStatement) -> bool {
        let Some(catalog) = self.catalog.as_mut() else {
            return false;
        };

        if catalog.apply(statement) {
            true
        } else {
            tracing::warn!(
                "Enum cache could not apply `{}`, clearing cached catalog",
                statement
            );
            self.catalog = None;
            false
        }
    }

    /// Drop every cached entry
    pub fn clear(&mut self) {
        self.catalog = None;
    }
}
