//! Host kinds and plugin descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported host runtimes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKind {
    /// In-process game server
    GameServer,
    /// Network proxy in front of game servers
    Proxy,
}

impl HostKind {
    pub fn all() -> &'static [HostKind] {
        &[HostKind::GameServer, HostKind::Proxy]
    }

    /// Get the human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            HostKind::GameServer => "game server",
            HostKind::Proxy => "proxy",
        }
    }

    /// Parse host name from string
    pub fn from_name(name: &str) -> Option<HostKind> {
        match name.to_lowercase().as_str() {
            "game-server" | "gameserver" | "server" | "paper" | "bukkit" => Some(HostKind::GameServer),
            "proxy" | "velocity" => Some(HostKind::Proxy),
            _ => None,
        }
    }

    /// Guess the host from a plugin's type name.
    ///
    /// Markers are matched against whole path segments (`org.bukkit.Foo`,
    /// `io.papermc.Bar`), never substrings, and proxy markers are checked
    /// first.
    pub fn detect(type_name: &str) -> Option<HostKind> {
        const PROXY_MARKERS: &[&str] = &["velocitypowered", "velocity", "proxyserver"];
        const GAME_SERVER_MARKERS: &[&str] = &["bukkit", "papermc", "paper", "spigotmc", "javaplugin"];

        let lowered = type_name.to_lowercase();
        let segments: Vec<&str> = lowered
            .split(|c: char| matches!(c, '.' | ':' | '/' | '$'))
            .filter(|segment| !segment.is_empty())
            .collect();
        let has = |markers: &[&str]| segments.iter().any(|segment| markers.contains(segment));

        if has(PROXY_MARKERS) {
            Some(HostKind::Proxy)
        } else if has(GAME_SERVER_MARKERS) {
            Some(HostKind::GameServer)
        } else {
            None
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HostKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostKind::from_name(s).ok_or_else(|| format!("Unknown host: {} (expected game-server or proxy)", s))
    }
}

/// What the plugin bootstrap knows about the plugin doing the registering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    name: String,
    type_name: String,
    host: Option<HostKind>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: String::new(),
            host: None,
        }
    }

    /// Host the bootstrap was loaded by; takes precedence over detection
    pub fn on_host(mut self, host: HostKind) -> Self {
        self.host = Some(host);
        self
    }

    /// Concrete plugin type name, used when no host is given
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> Option<HostKind> {
        self.host
    }

    /// Explicit host, else a guess from the type name
    pub fn resolved_host(&self) -> Option<HostKind> {
        self.host.or_else(|| HostKind::detect(&self.type_name))
    }

    /// Command-table namespace: the lower-cased plugin name
    pub fn namespace(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_from_name() {
        assert_eq!(HostKind::from_name("Game-Server"), Some(HostKind::GameServer));
        assert_eq!("velocity".parse::<HostKind>(), Ok(HostKind::Proxy));
        assert!("bungee".parse::<HostKind>().is_err());
    }

    #[test]
    fn test_detect_from_type_name() {
        assert_eq!(
            HostKind::detect("org.bukkit.plugin.java.JavaPlugin"),
            Some(HostKind::GameServer)
        );
        assert_eq!(
            HostKind::detect("com.velocitypowered.GuardPlugin"),
            Some(HostKind::Proxy)
        );
        assert_eq!(HostKind::detect("guard::Plugin"), None);
    }

    #[test]
    fn test_detect_matches_whole_segments() {
        assert_eq!(
            HostKind::detect("com.velocitypowered.NewspaperPlugin"),
            Some(HostKind::Proxy)
        );
        assert_eq!(HostKind::detect("io.papermc.paper.GuardPlugin"), Some(HostKind::GameServer));
        assert_eq!(HostKind::detect("net.example.NewspaperPlugin"), None);
        assert_eq!(HostKind::detect("net.example.bukkitless.Guard"), None);
    }

    #[test]
    fn test_explicit_host_wins() {
        let plugin = PluginDescriptor::new("Guard")
            .type_name("VelocityBridge")
            .on_host(HostKind::GameServer);
        assert_eq!(plugin.resolved_host(), Some(HostKind::GameServer));
        assert_eq!(plugin.namespace(), "guard");
    }
}
