//! In-process implementations of both host seams.
//!
//! They keep command tables in memory and behave like the real hosts where
//! it matters to this crate: the game server calls `execute` for any known
//! label, the proxy consults `has_permission` first and hides commands the
//! source may not use. The CLI and the tests drive commands through them.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::game_server::{GameServerSender, NativeCommand, NativeCommandRegistrar};
use super::proxy::{CommandMeta, Invocation, ProxyCommandManager, ProxySource, SimpleCommand};
use crate::error::{DispatchError, Result};
use crate::text::{legacy, Component};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Result of feeding one command line to a loopback host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran and reported handled
    Handled,
    /// The command ran and reported not handled (host would print usage)
    NotHandled,
    /// The proxy refused the source before execution
    Denied,
    /// No command is registered under the label
    UnknownCommand,
}

/// A delivered message in the form the host received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Legacy(String),
    Rich(Component),
}

impl Delivered {
    pub fn plain_text(&self) -> String {
        match self {
            Delivered::Legacy(text) => legacy::strip(text),
            Delivered::Rich(component) => component.plain_text(),
        }
    }
}

/// Sender usable on both hosts that records everything it is sent
#[derive(Debug)]
pub struct RecordingSender {
    name: String,
    player: bool,
    operator: bool,
    permissions: HashSet<String>,
    inbox: Mutex<Vec<Delivered>>,
}

impl RecordingSender {
    /// A player without permissions
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player: true,
            operator: false,
            permissions: HashSet::new(),
            inbox: Mutex::new(Vec::new()),
        }
    }

    /// The server console: not a player, holds every permission
    pub fn console() -> Self {
        Self {
            name: "CONSOLE".to_string(),
            player: false,
            operator: true,
            permissions: HashSet::new(),
            inbox: Mutex::new(Vec::new()),
        }
    }

    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn messages(&self) -> Vec<Delivered> {
        lock(&self.inbox).clone()
    }

    /// Game server messages exactly as delivered, `§` codes included
    pub fn raw_messages(&self) -> Vec<String> {
        lock(&self.inbox)
            .iter()
            .filter_map(|message| match message {
                Delivered::Legacy(text) => Some(text.clone()),
                Delivered::Rich(_) => None,
            })
            .collect()
    }

    /// Every message reduced to its text content
    pub fn plain_messages(&self) -> Vec<String> {
        lock(&self.inbox).iter().map(Delivered::plain_text).collect()
    }

    pub fn clear(&self) {
        lock(&self.inbox).clear();
    }

    fn permitted(&self, permission: &str) -> bool {
        self.operator || self.permissions.contains(permission)
    }
}

impl GameServerSender for RecordingSender {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permitted(permission)
    }

    fn send_message(&self, message: &str) {
        lock(&self.inbox).push(Delivered::Legacy(message.to_string()));
    }

    fn is_player(&self) -> bool {
        self.player
    }
}

impl ProxySource for RecordingSender {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permitted(permission)
    }

    fn send_message(&self, message: &Component) {
        lock(&self.inbox).push(Delivered::Rich(message.clone()));
    }

    fn is_player(&self) -> bool {
        self.player
    }
}

/// Split a typed line into label and arguments.
///
/// A trailing space yields an empty last argument, which is how hosts ask
/// for completion of the next word.
fn split_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim_start().trim_start_matches('/');
    let mut parts = line.split(' ').filter(|part| !part.is_empty());
    let label = parts.next()?.to_string();
    let mut args: Vec<String> = parts.map(str::to_string).collect();
    if line.ends_with(' ') && !line.trim().is_empty() {
        args.push(String::new());
    }
    Some((label, args))
}

/// In-memory game server command table
pub struct LoopbackGameServer {
    hex_colors: bool,
    commands: Mutex<BTreeMap<String, Arc<dyn NativeCommand>>>,
}

impl LoopbackGameServer {
    pub fn new(hex_colors: bool) -> Self {
        Self {
            hex_colors,
            commands: Mutex::new(BTreeMap::new()),
        }
    }

    /// Every label in the table, including `namespace:name` forms
    pub fn labels(&self) -> Vec<String> {
        lock(&self.commands).keys().cloned().collect()
    }

    fn lookup(&self, label: &str) -> Option<Arc<dyn NativeCommand>> {
        lock(&self.commands).get(&label.to_lowercase()).cloned()
    }

    pub fn dispatch(&self, sender: Arc<dyn GameServerSender>, line: &str) -> Outcome {
        let Some((label, args)) = split_line(line) else {
            return Outcome::UnknownCommand;
        };
        let Some(command) = self.lookup(&label) else {
            return Outcome::UnknownCommand;
        };
        if command.execute(sender, &label, &args) {
            Outcome::Handled
        } else {
            Outcome::NotHandled
        }
    }

    pub fn complete(&self, sender: Arc<dyn GameServerSender>, line: &str) -> Vec<String> {
        match split_line(line) {
            Some((label, args)) => match self.lookup(&label) {
                Some(command) => command.tab_complete(sender, &label, &args),
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }
}

impl NativeCommandRegistrar for LoopbackGameServer {
    fn register(&self, namespace: &str, command: Arc<dyn NativeCommand>) -> Result<()> {
        let mut commands = lock(&self.commands);
        let name = command.name().to_lowercase();
        if commands.contains_key(&name) {
            return Err(DispatchError::Registration {
                command: name,
                reason: "label already taken".into(),
            });
        }

        commands.insert(format!("{}:{}", namespace, name), Arc::clone(&command));
        for alias in command.aliases() {
            let alias = alias.to_lowercase();
            commands.entry(format!("{}:{}", namespace, alias)).or_insert_with(|| Arc::clone(&command));
            commands.entry(alias).or_insert_with(|| Arc::clone(&command));
        }
        commands.insert(name, command);
        Ok(())
    }

    fn supports_hex_colors(&self) -> bool {
        self.hex_colors
    }
}

/// In-memory proxy command manager
pub struct LoopbackProxy {
    commands: Mutex<BTreeMap<String, Arc<dyn SimpleCommand>>>,
}

impl LoopbackProxy {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        lock(&self.commands).keys().cloned().collect()
    }

    fn invocation(source: Arc<dyn ProxySource>, line: &str) -> Option<(Invocation, String)> {
        let (label, args) = split_line(line)?;
        let key = label.to_lowercase();
        Some((Invocation::new(source, label, args), key))
    }

    pub fn dispatch(&self, source: Arc<dyn ProxySource>, line: &str) -> Outcome {
        let Some((invocation, key)) = Self::invocation(source, line) else {
            return Outcome::UnknownCommand;
        };
        let Some(command) = lock(&self.commands).get(&key).cloned() else {
            return Outcome::UnknownCommand;
        };
        if !command.has_permission(&invocation) {
            return Outcome::Denied;
        }
        command.execute(&invocation);
        Outcome::Handled
    }

    pub fn complete(&self, source: Arc<dyn ProxySource>, line: &str) -> Vec<String> {
        let Some((invocation, key)) = Self::invocation(source, line) else {
            return Vec::new();
        };
        let command = lock(&self.commands).get(&key).cloned();
        match command {
            Some(command) if command.has_permission(&invocation) => command.suggest(&invocation),
            _ => Vec::new(),
        }
    }
}

impl Default for LoopbackProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyCommandManager for LoopbackProxy {
    fn register(&self, meta: CommandMeta, command: Arc<dyn SimpleCommand>) -> Result<()> {
        let mut commands = lock(&self.commands);
        let labels = meta.labels();
        if let Some(taken) = labels.iter().find(|label| commands.contains_key(*label)) {
            return Err(DispatchError::Registration {
                command: meta.name().to_string(),
                reason: format!("label '{}' already taken", taken),
            });
        }
        for label in labels {
            commands.insert(label, Arc::clone(&command));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line("/guard ban Alex"),
            Some(("guard".to_string(), vec!["ban".to_string(), "Alex".to_string()]))
        );
        assert_eq!(
            split_line("guard "),
            Some(("guard".to_string(), vec![String::new()]))
        );
        assert_eq!(split_line("guard"), Some(("guard".to_string(), vec![])));
        assert_eq!(split_line("   "), None);
    }

    #[test]
    fn test_console_holds_every_permission() {
        let console = RecordingSender::console();
        assert!(console.permitted("anything.at.all"));
        let player = RecordingSender::player("Steve").grant("a");
        assert!(player.permitted("a"));
        assert!(!player.permitted("b"));
    }

    #[test]
    fn test_unknown_label() {
        let server = LoopbackGameServer::new(true);
        let sender = Arc::new(RecordingSender::console());
        assert_eq!(server.dispatch(sender, "nothing"), Outcome::UnknownCommand);
    }
}
