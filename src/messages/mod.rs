//! Message lookup
//!
//! Routers and adapters only need [`MessageSource`]: a string by key with a
//! fallback. [`MessageCatalog`] is the file-backed implementation.

pub mod catalog;
pub mod defaults;

use std::collections::HashMap;

pub use catalog::MessageCatalog;

/// Source of user-facing message templates
pub trait MessageSource: Send + Sync {
    /// Message for `key`, or `fallback` when the key is missing
    fn message(&self, key: &str, fallback: &str) -> String;
}

impl MessageSource for HashMap<String, String> {
    fn message(&self, key: &str, fallback: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| fallback.to_string())
    }
}

/// Replace every `{name}` placeholder with its value
pub fn apply_placeholders(template: &str, placeholders: &[(&str, &str)]) -> String {
    placeholders
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}
