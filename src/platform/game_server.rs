//! Game server host adapter
//!
//! The game server keeps one global command table. The adapter never touches
//! it directly: the host environment supplies a [`NativeCommandRegistrar`]
//! and the adapter hands it a [`NativeCommand`] wrapping the plugin command.
//! The permission gate for the root command lives inside the native
//! command's `execute`, because this host calls `execute` unconditionally.

use std::sync::Arc;

use super::adapter::{self, HostAdapter};
use super::host::{HostKind, PluginDescriptor};
use crate::command::{CommandContract, InvocationContext, Sender};
use crate::error::Result;

/// A command sender as the game server sees it (player, console, ...)
pub trait GameServerSender: Send + Sync {
    fn name(&self) -> String;

    fn has_permission(&self, permission: &str) -> bool;

    /// Deliver an already-serialized `§`-coded string
    fn send_message(&self, message: &str);

    fn is_player(&self) -> bool;
}

/// The command object the game server stores in its command table
pub trait NativeCommand: Send + Sync {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[String];

    fn description(&self) -> &str;

    /// Usage text the host prints when `execute` returns false
    fn usage(&self) -> &str;

    fn execute(&self, sender: Arc<dyn GameServerSender>, label: &str, args: &[String]) -> bool;

    fn tab_complete(&self, sender: Arc<dyn GameServerSender>, alias: &str, args: &[String]) -> Vec<String>;
}

/// Capability the game server environment provides for adding commands
pub trait NativeCommandRegistrar: Send + Sync {
    /// Add `command` to the command table under `namespace`
    fn register(&self, namespace: &str, command: Arc<dyn NativeCommand>) -> Result<()>;

    /// Whether the running server understands `§x` RGB sequences
    fn supports_hex_colors(&self) -> bool {
        true
    }
}

/// [`NativeCommand`] bridging to a [`CommandContract`]
pub struct GameServerCommand {
    command: Arc<dyn CommandContract>,
    hex_colors: bool,
}

impl GameServerCommand {
    pub fn new(command: Arc<dyn CommandContract>, hex_colors: bool) -> Self {
        Self { command, hex_colors }
    }

    fn context(&self, sender: Arc<dyn GameServerSender>, label: &str, args: &[String]) -> InvocationContext {
        InvocationContext::new(
            Sender::game_server(sender, self.hex_colors),
            args.iter().cloned(),
            label,
        )
    }
}

impl NativeCommand for GameServerCommand {
    fn name(&self) -> &str {
        self.command.name()
    }

    fn aliases(&self) -> &[String] {
        self.command.aliases()
    }

    fn description(&self) -> &str {
        self.command.description()
    }

    // Empty so the host never prints its own usage text
    fn usage(&self) -> &str {
        ""
    }

    fn execute(&self, sender: Arc<dyn GameServerSender>, label: &str, args: &[String]) -> bool {
        let ctx = self.context(sender, label, args);

        if let Some(permission) = self.command.permission() {
            if !ctx.has_permission(permission) {
                ctx.send_message(&adapter::no_permission_message(self.command.as_ref()));
                return true;
            }
        }

        adapter::execute_guarded(self.command.as_ref(), &ctx);
        true
    }

    fn tab_complete(&self, sender: Arc<dyn GameServerSender>, alias: &str, args: &[String]) -> Vec<String> {
        let ctx = self.context(sender, alias, args);
        adapter::complete(self.command.as_ref(), &ctx)
    }
}

/// Game server adapter - registers through a [`NativeCommandRegistrar`]
pub struct GameServerAdapter {
    registrar: Arc<dyn NativeCommandRegistrar>,
}

impl GameServerAdapter {
    pub fn new(registrar: Arc<dyn NativeCommandRegistrar>) -> Self {
        Self { registrar }
    }
}

impl HostAdapter for GameServerAdapter {
    fn host(&self) -> HostKind {
        HostKind::GameServer
    }

    fn register(&self, plugin: &PluginDescriptor, command: Arc<dyn CommandContract>) -> Result<()> {
        let name = command.name().to_string();
        let native = GameServerCommand::new(command, self.registrar.supports_hex_colors());
        self.registrar.register(&plugin.namespace(), Arc::new(native))?;
        tracing::info!("Registered game server command: {}", name);
        Ok(())
    }
}
