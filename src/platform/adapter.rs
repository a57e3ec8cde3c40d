//! Host adapter trait and the behavior both adapters share

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::host::{HostKind, PluginDescriptor};
use crate::command::{CommandContract, InvocationContext};
use crate::error::{DispatchError, Result};
use crate::messages::defaults;

/// Host adapter trait - implement for each supported host
pub trait HostAdapter: Send + Sync {
    /// Get the host identifier
    fn host(&self) -> HostKind;

    /// Register a command in the host's native command table
    fn register(&self, plugin: &PluginDescriptor, command: Arc<dyn CommandContract>) -> Result<()>;
}

/// Run `execute`, absorbing errors and panics.
///
/// A fault is logged and the sender gets the internal-error message; the
/// invocation then counts as handled.
pub fn execute_guarded(command: &dyn CommandContract, ctx: &InvocationContext) -> bool {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| command.execute(ctx)));
    let message = match outcome {
        Ok(Ok(handled)) => return handled,
        Ok(Err(err)) => format!("{:#}", err),
        Err(payload) => panic_message(payload.as_ref()),
    };

    let fault = DispatchError::Execution {
        command: command.name().to_string(),
        message,
    };
    tracing::error!(
        host = %ctx.host(),
        sender = %ctx.sender().name(),
        label = ctx.label(),
        args = ?ctx.args(),
        "{}",
        fault
    );
    ctx.send_message(&internal_error_message(command));
    true
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", text)
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panicked: {}", text)
    } else {
        "panicked".to_string()
    }
}

/// The router's own message when the command is a router
pub fn no_permission_message(command: &dyn CommandContract) -> String {
    match command.as_router() {
        Some(router) => router.no_permission_message(),
        None => defaults::NO_PERMISSION.to_string(),
    }
}

pub fn internal_error_message(command: &dyn CommandContract) -> String {
    match command.as_router() {
        Some(router) => router.internal_error_message(),
        None => defaults::INTERNAL_ERROR.to_string(),
    }
}

/// Tab completion for a command.
///
/// Routers complete their first argument: visible subcommand names starting
/// with the typed prefix, case-insensitively. Past the first argument, and
/// for plain commands, nothing is suggested so the host's free-text
/// completion stays available.
pub fn complete(command: &dyn CommandContract, ctx: &InvocationContext) -> Vec<String> {
    let Some(router) = command.as_router() else {
        return Vec::new();
    };
    if ctx.arg_count() > 1 {
        return Vec::new();
    }

    let prefix = ctx.arg(0).unwrap_or("").to_lowercase();
    let mut names: Vec<String> = router
        .visible_subcommands(ctx)
        .into_iter()
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .collect();
    names.sort();
    names
}
