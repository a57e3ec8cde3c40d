//! Proxy host adapter
//!
//! The proxy asks a command whether the source may use it (`has_permission`)
//! before `execute` is ever attempted, so the root permission gate lives in
//! that hook rather than inside `execute`.

use std::sync::Arc;

use super::adapter::{self, HostAdapter};
use super::host::{HostKind, PluginDescriptor};
use crate::command::{CommandContract, InvocationContext, Sender};
use crate::error::Result;
use crate::text::Component;

/// A command source as the proxy sees it (player, console, ...)
pub trait ProxySource: Send + Sync {
    fn name(&self) -> String;

    fn has_permission(&self, permission: &str) -> bool;

    /// Deliver rich text natively
    fn send_message(&self, message: &Component);

    fn is_player(&self) -> bool;
}

/// One native proxy invocation
#[derive(Clone)]
pub struct Invocation {
    source: Arc<dyn ProxySource>,
    alias: String,
    arguments: Vec<String>,
}

impl Invocation {
    pub fn new(source: Arc<dyn ProxySource>, alias: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            source,
            alias: alias.into(),
            arguments,
        }
    }

    pub fn source(&self) -> &Arc<dyn ProxySource> {
        &self.source
    }

    /// Label the source typed
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// Command shape the proxy's command manager accepts
pub trait SimpleCommand: Send + Sync {
    fn execute(&self, invocation: &Invocation);

    fn suggest(&self, invocation: &Invocation) -> Vec<String> {
        let _ = invocation;
        Vec::new()
    }

    fn has_permission(&self, invocation: &Invocation) -> bool {
        let _ = invocation;
        true
    }
}

/// Registration metadata: primary label plus aliases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMeta {
    name: String,
    aliases: Vec<String>,
}

impl CommandMeta {
    pub fn builder(name: impl Into<String>) -> CommandMetaBuilder {
        CommandMetaBuilder {
            meta: CommandMeta {
                name: name.into(),
                aliases: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Lower-cased name followed by aliases
    pub fn labels(&self) -> Vec<String> {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|label| label.to_lowercase())
            .collect()
    }
}

pub struct CommandMetaBuilder {
    meta: CommandMeta,
}

impl CommandMetaBuilder {
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> CommandMeta {
        self.meta
    }
}

/// Capability the proxy environment provides for adding commands
pub trait ProxyCommandManager: Send + Sync {
    fn register(&self, meta: CommandMeta, command: Arc<dyn SimpleCommand>) -> Result<()>;
}

/// [`SimpleCommand`] bridging to a [`CommandContract`]
pub struct ProxyCommand {
    command: Arc<dyn CommandContract>,
}

impl ProxyCommand {
    pub fn new(command: Arc<dyn CommandContract>) -> Self {
        Self { command }
    }

    fn context(&self, invocation: &Invocation) -> InvocationContext {
        InvocationContext::new(
            Sender::proxy(Arc::clone(invocation.source())),
            invocation.arguments().iter().cloned(),
            invocation.alias(),
        )
    }
}

impl SimpleCommand for ProxyCommand {
    fn execute(&self, invocation: &Invocation) {
        let ctx = self.context(invocation);
        adapter::execute_guarded(self.command.as_ref(), &ctx);
    }

    fn suggest(&self, invocation: &Invocation) -> Vec<String> {
        adapter::complete(self.command.as_ref(), &self.context(invocation))
    }

    fn has_permission(&self, invocation: &Invocation) -> bool {
        match self.command.permission() {
            Some(permission) if !permission.is_empty() => invocation.source().has_permission(permission),
            _ => true,
        }
    }
}

/// Proxy adapter - registers through a [`ProxyCommandManager`]
pub struct ProxyAdapter {
    manager: Arc<dyn ProxyCommandManager>,
}

impl ProxyAdapter {
    pub fn new(manager: Arc<dyn ProxyCommandManager>) -> Self {
        Self { manager }
    }
}

impl HostAdapter for ProxyAdapter {
    fn host(&self) -> HostKind {
        HostKind::Proxy
    }

    fn register(&self, plugin: &PluginDescriptor, command: Arc<dyn CommandContract>) -> Result<()> {
        let meta = CommandMeta::builder(command.name())
            .aliases(command.aliases().iter().cloned())
            .build();
        let name = meta.name().to_string();

        self.manager.register(meta, Arc::new(ProxyCommand::new(command)))?;
        tracing::info!(plugin = plugin.name(), "Registered proxy command: {}", name);
        Ok(())
    }
}
