//! Raw config types matching the schema directory JSON files.

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Per-table options from `config.json`. An empty or null entry means no metadata table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomTableSpec {
    #[serde(default, rename = "meta")]
    pub has_meta: bool,
}

/// Object types a taxonomy attaches to: a single type name or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectTypes {
    One(String),
    Many(Vec<String>),
}

impl ObjectTypes {
    /// Ordered, de-duplicated list of object types.
    pub fn into_list(self) -> Vec<String> {
        let raw = match self {
            ObjectTypes::One(s) => vec![s],
            ObjectTypes::Many(v) => v,
        };
        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for t in raw {
            if !out.contains(&t) {
                out.push(t);
            }
        }
        out
    }
}

/// `config.json` as written on disk. Every section is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    #[serde(default, deserialize_with = "unique_keys")]
    pub custom: IndexMap<String, Option<CustomTableSpec>>,
    #[serde(default)]
    pub post_type: Vec<String>,
    #[serde(default, deserialize_with = "unique_keys")]
    pub taxonomy: IndexMap<String, Option<ObjectTypes>>,
}

/// Deserialize a JSON object into an insertion-ordered map, rejecting repeated keys.
fn unique_keys<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object with unique keys")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&key) {
                    return Err(serde::de::Error::custom(format!("duplicate key '{}'", key)));
                }
                map.insert(key, value);
            }
            Ok(map)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(IndexMap::new())
        }
    }

    deserializer.deserialize_any(UniqueKeys(PhantomData))
}

/// `custom/<key>.json` and `custom-meta/custom-meta.json`: a CREATE TABLE template with one `%s`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub sql: String,
}

/// A boolean switch that may carry a slug instead (e.g. `has_archive: "shop"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagOrSlug {
    Flag(bool),
    Slug(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_front: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewriteConfig {
    Enabled(bool),
    Rules(RewriteRules),
}

/// `post_type/<key>.json`: options forwarded to the host's type registration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentTypeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_from_search: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publicly_queryable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_ui: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_menu: Option<FlagOrSlug>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_rest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_archive: Option<FlagOrSlug>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_var: Option<FlagOrSlug>,
}

/// `taxonomy/<key>.json`: options forwarded to the host's taxonomy registration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_ui: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_menu: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_rest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tagcloud: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_admin_column: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_var: Option<FlagOrSlug>,
}

/// Parsed and validated manifest. Map order follows `config.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub custom_tables: IndexMap<String, CustomTableSpec>,
    pub content_types: Vec<String>,
    /// Object types per taxonomy; empty when the manifest gives none.
    pub taxonomies: IndexMap<String, Vec<String>>,
}

impl From<ManifestFile> for Manifest {
    fn from(file: ManifestFile) -> Self {
        Manifest {
            custom_tables: file
                .custom
                .into_iter()
                .map(|(k, spec)| (k, spec.unwrap_or_default()))
                .collect(),
            content_types: file.post_type,
            taxonomies: file
                .taxonomy
                .into_iter()
                .map(|(k, types)| (k, types.map(ObjectTypes::into_list).unwrap_or_default()))
                .collect(),
        }
    }
}
