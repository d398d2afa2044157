//! Manifest validation: key shape, uniqueness, and derived-name collisions.

use crate::case::normalize_key;
use crate::config::Manifest;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("static pattern"))
}

/// Content-type and taxonomy keys never become storage names, so host-style underscores are allowed.
fn registration_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9]+([_-][a-z0-9]+)*$").expect("static pattern"))
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]*$").expect("static pattern"))
}

fn check_key(pattern: &Regex, kind: &'static str, key: &str) -> Result<(), ConfigError> {
    if pattern.is_match(key) {
        Ok(())
    } else {
        Err(ConfigError::InvalidKey {
            kind,
            key: key.to_string(),
        })
    }
}

/// Namespace and storage prefix end up verbatim in table names.
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<(), ConfigError> {
    if identifier_pattern().is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        })
    }
}

pub fn validate_manifest(manifest: &Manifest) -> Result<(), ConfigError> {
    for key in manifest.custom_tables.keys() {
        check_key(key_pattern(), "custom table", key)?;
    }

    let mut seen = HashSet::new();
    for key in &manifest.content_types {
        check_key(registration_key_pattern(), "content type", key)?;
        if !seen.insert(key.as_str()) {
            return Err(ConfigError::DuplicateKey {
                kind: "content type",
                key: key.clone(),
            });
        }
    }

    for key in manifest.taxonomies.keys() {
        check_key(registration_key_pattern(), "taxonomy", key)?;
    }

    // Every name shares the same prefix and namespace, so comparing normalized keys is enough.
    let table_keys: HashMap<String, &str> = manifest
        .custom_tables
        .keys()
        .map(|k| (normalize_key(k), k.as_str()))
        .collect();
    for (key, spec) in &manifest.custom_tables {
        if !spec.has_meta {
            continue;
        }
        let meta = format!("{}meta", normalize_key(key));
        if let Some(other) = table_keys.get(&meta) {
            return Err(ConfigError::NameCollision {
                meta_key: key.clone(),
                table_key: (*other).to_string(),
            });
        }
    }

    Ok(())
}
