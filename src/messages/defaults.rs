//! Built-in message keys and fallback texts.
//!
//! Every fallback literal used by routers and adapters lives here.

use super::MessageSource;

pub const NO_PERMISSION_KEY: &str = "messages.no-permission";
pub const UNKNOWN_SUBCOMMAND_KEY: &str = "messages.unknown-subcommand";
pub const INTERNAL_ERROR_KEY: &str = "messages.internal-error";

pub const NO_PERMISSION: &str = "&cYou don't have permission!";
pub const UNKNOWN_SUBCOMMAND: &str = "&cUnknown subcommand.";
pub const INTERNAL_ERROR: &str = "&cAn internal error occurred while executing this command.";

/// Look `key` up in `source`, or return `fallback` when no source is attached
pub fn resolve(source: Option<&dyn MessageSource>, key: &str, fallback: &str) -> String {
    match source {
        Some(source) => source.message(key, fallback),
        None => fallback.to_string(),
    }
}

pub fn no_permission(source: Option<&dyn MessageSource>) -> String {
    resolve(source, NO_PERMISSION_KEY, NO_PERMISSION)
}

pub fn unknown_subcommand(source: Option<&dyn MessageSource>) -> String {
    resolve(source, UNKNOWN_SUBCOMMAND_KEY, UNKNOWN_SUBCOMMAND)
}

pub fn internal_error(source: Option<&dyn MessageSource>) -> String {
    resolve(source, INTERNAL_ERROR_KEY, INTERNAL_ERROR)
}
