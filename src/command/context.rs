//! Invocation context
//!
//! A host-agnostic snapshot of one command invocation. Contexts are never
//! mutated: routing to a subcommand produces a new, narrower context.

use std::fmt;
use std::sync::Arc;

use crate::platform::game_server::GameServerSender;
use crate::platform::proxy::ProxySource;
use crate::platform::HostKind;
use crate::text::{self, legacy};

/// The entity that issued a command, tagged by host
#[derive(Clone)]
pub enum Sender {
    /// Game server sender; `hex_colors` selects the legacy serialization
    GameServer {
        native: Arc<dyn GameServerSender>,
        hex_colors: bool,
    },
    Proxy(Arc<dyn ProxySource>),
}

impl Sender {
    pub fn game_server(native: Arc<dyn GameServerSender>, hex_colors: bool) -> Self {
        Sender::GameServer { native, hex_colors }
    }

    pub fn proxy(native: Arc<dyn ProxySource>) -> Self {
        Sender::Proxy(native)
    }

    pub fn host(&self) -> HostKind {
        match self {
            Sender::GameServer { .. } => HostKind::GameServer,
            Sender::Proxy(_) => HostKind::Proxy,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Sender::GameServer { native, .. } => native.name(),
            Sender::Proxy(native) => native.name(),
        }
    }

    /// Host permission check; an empty permission is always granted
    pub fn has_permission(&self, permission: &str) -> bool {
        if permission.is_empty() {
            return true;
        }
        match self {
            Sender::GameServer { native, .. } => native.has_permission(permission),
            Sender::Proxy(native) => native.has_permission(permission),
        }
    }

    pub fn is_player(&self) -> bool {
        match self {
            Sender::GameServer { native, .. } => native.is_player(),
            Sender::Proxy(native) => native.is_player(),
        }
    }

    /// Render markup and deliver it in the host's native form
    pub fn send_message(&self, markup: &str) {
        let component = text::parse(markup);
        match self {
            Sender::GameServer { native, hex_colors } => {
                native.send_message(&legacy::serialize(&component, *hex_colors));
            }
            Sender::Proxy(native) => native.send_message(&component),
        }
    }
}

impl fmt::Debug for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("host", &self.host())
            .field("name", &self.name())
            .field("player", &self.is_player())
            .finish()
    }
}

/// One command invocation as seen by a [`CommandContract`](super::CommandContract)
#[derive(Debug, Clone)]
pub struct InvocationContext {
    sender: Sender,
    args: Vec<String>,
    label: String,
}

impl InvocationContext {
    pub fn new<I, S>(sender: Sender, args: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sender,
            args: args.into_iter().map(Into::into).collect(),
            label: label.into(),
        }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Argument at `index`, `None` when out of range
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Command path typed so far, e.g. `guard ban`
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn host(&self) -> HostKind {
        self.sender.host()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.sender.has_permission(permission)
    }

    pub fn send_message(&self, markup: &str) {
        self.sender.send_message(markup);
    }

    pub fn send_messages<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.send_message(line.as_ref());
        }
    }

    pub fn is_actor_player(&self) -> bool {
        self.sender.is_player()
    }

    /// The sender when it is an in-game player
    pub fn actor(&self) -> Option<&Sender> {
        self.is_actor_player().then_some(&self.sender)
    }

    /// Context for a routed subcommand: leading argument dropped, `name`
    /// appended to the label
    pub fn narrow(&self, name: &str) -> InvocationContext {
        InvocationContext {
            sender: self.sender.clone(),
            args: self.args.iter().skip(1).cloned().collect(),
            label: format!("{} {}", self.label, name),
        }
    }
}
