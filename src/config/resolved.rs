//! Resolved storage names: manifest keys qualified by storage prefix and namespace.

use crate::case::normalize_key;
use crate::config::CustomTableSpec;
use indexmap::IndexMap;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTable {
    /// Manifest key, hyphenated (e.g. "order-log").
    pub key: String,
    /// Logical object type used for metadata routing (e.g. "order_log").
    pub object_type: String,
    /// `<storage_prefix><namespace>_<object_type>`.
    pub table_name: String,
    /// `<table_name>meta`, present only when the table declares metadata.
    pub meta_table_name: Option<String>,
}

/// Derived table names for one namespace. Order follows the manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameMapping {
    tables: IndexMap<String, ResolvedTable>,
}

impl NameMapping {
    pub fn table(&self, key: &str) -> Option<&ResolvedTable> {
        self.tables.get(key)
    }

    pub fn tables(&self) -> impl Iterator<Item = &ResolvedTable> {
        self.tables.values()
    }

    /// Tables that carry a metadata table, with that table's name.
    pub fn meta_tables(&self) -> impl Iterator<Item = (&ResolvedTable, &str)> {
        self.tables
            .values()
            .filter_map(|t| t.meta_table_name.as_deref().map(|m| (t, m)))
    }

    /// Every table and metadata table name this mapping owns.
    pub fn managed_table_names(&self) -> BTreeSet<String> {
        self.tables
            .values()
            .flat_map(|t| std::iter::once(t.table_name.clone()).chain(t.meta_table_name.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Derive table names for every custom table. Pure; call on a validated manifest.
pub fn resolve(
    namespace: &str,
    storage_prefix: &str,
    custom_tables: &IndexMap<String, CustomTableSpec>,
) -> NameMapping {
    let tables = custom_tables
        .iter()
        .map(|(key, spec)| {
            let object_type = normalize_key(key);
            let table_name = format!("{}{}_{}", storage_prefix, namespace, object_type);
            let meta_table_name = spec.has_meta.then(|| format!("{}meta", table_name));
            (
                key.clone(),
                ResolvedTable {
                    key: key.clone(),
                    object_type,
                    table_name,
                    meta_table_name,
                },
            )
        })
        .collect();
    NameMapping { tables }
}
