//! Command contract trait

use super::context::InvocationContext;
use super::router::SubcommandRouter;
use crate::error::{DispatchError, Result};

/// What every dispatchable command exposes
///
/// Implementations are created once at plugin startup and shared between
/// host threads, so they must be `Send + Sync` and must not mutate state
/// during `execute`.
pub trait CommandContract: Send + Sync {
    /// Primary command name, unique per host
    fn name(&self) -> &str;

    fn aliases(&self) -> &[String] {
        &[]
    }

    /// Permission required to run the command at all; `None` means anyone
    fn permission(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> &str {
        ""
    }

    /// Run the command. `Ok(true)` means the invocation was handled.
    fn execute(&self, ctx: &InvocationContext) -> anyhow::Result<bool>;

    /// Router view, used by adapters for completion and router messages
    fn as_router(&self) -> Option<&SubcommandRouter> {
        None
    }
}

/// Reject empty or whitespace-containing names and aliases
pub fn validate(command: &dyn CommandContract) -> Result<()> {
    check_label(command.name(), "name")?;
    for alias in command.aliases() {
        check_label(alias, "alias")?;
    }
    Ok(())
}

fn check_label(label: &str, what: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(DispatchError::InvalidCommand(format!("command {} must not be empty", what)));
    }
    if label.chars().any(char::is_whitespace) {
        return Err(DispatchError::InvalidCommand(format!(
            "command {} '{}' must not contain whitespace",
            what, label
        )));
    }
    Ok(())
}

/// Lower-cased name followed by aliases, without duplicates
pub fn labels(command: &dyn CommandContract) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in std::iter::once(command.name()).chain(command.aliases().iter().map(String::as_str)) {
        let label = label.to_lowercase();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
