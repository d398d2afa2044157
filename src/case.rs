//! Key normalization: hyphen-separated manifest keys -> underscore storage identifiers.

/// Convert a manifest key to its storage form.
/// e.g. "order-log" -> "order_log", "product" -> "product"
pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}
