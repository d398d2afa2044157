//! Forward content types and taxonomies from the manifest to the host's registration primitives.

use crate::config::{Manifest, SchemaDir};
use crate::error::ArchitectureError;
use crate::host::{TaxonomyRegistrar, TypeRegistrar};

/// Register every content type in manifest order. Stops at the first missing definition.
pub fn register_types(
    schema: &SchemaDir,
    manifest: &Manifest,
    registrar: &dyn TypeRegistrar,
) -> Result<usize, ArchitectureError> {
    for key in &manifest.content_types {
        let options = schema.load_type_definition(key)?;
        registrar.register_type(key, &options)?;
        tracing::debug!(content_type = %key, "registered");
    }
    Ok(manifest.content_types.len())
}

/// Register every taxonomy with its object types (empty when the manifest lists none).
pub fn register_taxonomies(
    schema: &SchemaDir,
    manifest: &Manifest,
    registrar: &dyn TaxonomyRegistrar,
) -> Result<usize, ArchitectureError> {
    for (key, object_types) in &manifest.taxonomies {
        let options = schema.load_taxonomy_definition(key)?;
        registrar.register_taxonomy(key, object_types, &options)?;
        tracing::debug!(taxonomy = %key, object_types = ?object_types, "registered");
    }
    Ok(manifest.taxonomies.len())
}
