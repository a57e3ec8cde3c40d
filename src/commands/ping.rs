//! `ping` sample command: a plain command without subcommands

use std::sync::Arc;

use crate::command::{CommandContract, InvocationContext};
use crate::messages::MessageCatalog;

pub struct PingCommand {
    messages: Arc<MessageCatalog>,
    aliases: Vec<String>,
}

impl PingCommand {
    pub fn new(messages: Arc<MessageCatalog>) -> Self {
        Self {
            messages,
            aliases: vec!["pong".to_string()],
        }
    }
}

impl CommandContract for PingCommand {
    fn name(&self) -> &str {
        "ping"
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn description(&self) -> &str {
        "Check that the plugin answers"
    }

    fn execute(&self, ctx: &InvocationContext) -> anyhow::Result<bool> {
        let host = ctx.host().to_string();
        let message = match ctx.actor() {
            Some(player) => self.messages.message_with(
                "ping.player",
                "&aPong, {player}!",
                &[("player", player.name().as_str()), ("host", host.as_str())],
            ),
            None => self
                .messages
                .message_with("ping.console", "&aPong!", &[("host", host.as_str())]),
        };
        ctx.send_message(&message);
        Ok(true)
    }
}
