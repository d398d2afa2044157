//! Bind metadata tables into the host's active storage context.

use crate::config::NameMapping;
use crate::host::MetaRouter;

/// Tell the router where each object type's metadata lives. Bindings are context-local, so call
/// again after every context switch. Returns the number of bindings made.
pub fn bind_meta_tables(names: &NameMapping, router: &dyn MetaRouter) -> usize {
    let mut bound = 0;
    for (table, meta_name) in names.meta_tables() {
        router.bind_meta_table(&table.object_type, meta_name);
        bound += 1;
    }
    tracing::debug!(bound, "meta tables bound");
    bound
}
