//! Platform dispatch
//!
//! Wires a [`CommandContract`] into whichever host loaded the plugin.
//!
//! ## Overview
//!
//! The plugin bootstrap knows which host it runs on and hands the dispatch a
//! [`HostBinding`] carrying that host's command table. The binding is turned
//! into the matching [`HostAdapter`], so nothing here needs the other host's
//! API to exist.
//!
//! ## Supported Hosts
//!
//! - Game server (in-process, global command table)
//! - Proxy (command manager with a pre-execution permission hook)

pub mod adapter;
pub mod game_server;
pub mod host;
pub mod loopback;
pub mod proxy;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

pub use adapter::HostAdapter;
pub use game_server::{GameServerAdapter, GameServerSender, NativeCommand, NativeCommandRegistrar};
pub use host::{HostKind, PluginDescriptor};
pub use proxy::{ProxyAdapter, ProxyCommandManager, ProxySource, SimpleCommand};

use crate::command::{contract, CommandContract};
use crate::error::{DispatchError, Result};

/// The host environment the bootstrap hands over
#[derive(Clone)]
pub enum HostBinding {
    GameServer(Arc<dyn NativeCommandRegistrar>),
    Proxy(Arc<dyn ProxyCommandManager>),
}

impl HostBinding {
    pub fn kind(&self) -> HostKind {
        match self {
            HostBinding::GameServer(_) => HostKind::GameServer,
            HostBinding::Proxy(_) => HostKind::Proxy,
        }
    }

    /// Build the adapter for this host
    pub fn into_adapter(self) -> Box<dyn HostAdapter> {
        match self {
            HostBinding::GameServer(registrar) => Box::new(GameServerAdapter::new(registrar)),
            HostBinding::Proxy(manager) => Box::new(ProxyAdapter::new(manager)),
        }
    }
}

/// Main registration entry point - selects the host and delegates to its adapter
pub struct PlatformDispatch {
    adapters: HashMap<HostKind, Box<dyn HostAdapter>>,
    claimed: Mutex<HashMap<HostKind, HashSet<String>>>,
}

impl PlatformDispatch {
    /// Dispatch without adapters; add them with [`with_binding`](Self::with_binding)
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            claimed: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatch for the single host the plugin was loaded by
    pub fn for_host(binding: HostBinding) -> Self {
        Self::new().with_binding(binding)
    }

    pub fn with_binding(self, binding: HostBinding) -> Self {
        tracing::debug!("Installing {} adapter", binding.kind());
        self.with_adapter(binding.into_adapter())
    }

    pub fn with_adapter(mut self, adapter: Box<dyn HostAdapter>) -> Self {
        self.adapters.insert(adapter.host(), adapter);
        self
    }

    /// Hosts with an installed adapter
    pub fn hosts(&self) -> Vec<HostKind> {
        HostKind::all()
            .iter()
            .copied()
            .filter(|host| self.adapters.contains_key(host))
            .collect()
    }

    /// Decide which host a plugin's commands go to.
    ///
    /// Explicit host first, then the plugin type name, then the only
    /// installed adapter if there is exactly one.
    pub fn select_host(&self, plugin: &PluginDescriptor) -> Result<HostKind> {
        if let Some(host) = plugin.resolved_host() {
            return Ok(host);
        }
        match self.hosts().as_slice() {
            [only] => Ok(*only),
            _ => Err(DispatchError::UnsupportedPlatform(format!(
                "cannot determine host for plugin '{}'",
                plugin.name()
            ))),
        }
    }

    /// Register one command, returning the failure instead of logging it
    pub fn try_register(&self, plugin: &PluginDescriptor, command: Arc<dyn CommandContract>) -> Result<()> {
        contract::validate(command.as_ref())?;

        let host = self.select_host(plugin)?;
        let adapter = self.adapters.get(&host).ok_or_else(|| {
            DispatchError::UnsupportedPlatform(format!("no adapter installed for the {} host", host))
        })?;

        let labels = contract::labels(command.as_ref());
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        let taken = claimed.entry(host).or_default();
        if let Some(label) = labels.iter().find(|label| taken.contains(*label)) {
            return Err(DispatchError::LabelConflict {
                host,
                label: label.clone(),
            });
        }

        tracing::debug!("Registering command {} on {}", command.name(), host);
        adapter.register(plugin, command)?;
        taken.extend(labels);
        Ok(())
    }

    /// Register one command; failures are logged, never returned
    pub fn register(&self, plugin: &PluginDescriptor, command: Arc<dyn CommandContract>) {
        let name = command.name().to_string();
        if let Err(err) = self.try_register(plugin, command) {
            tracing::error!("Failed to register command {}: {}", name, err);
        }
    }

    /// Register several commands; one failure does not stop the rest
    pub fn register_all<I>(&self, plugin: &PluginDescriptor, commands: I)
    where
        I: IntoIterator<Item = Arc<dyn CommandContract>>,
    {
        let mut registered = 0usize;
        let mut failed = 0usize;
        for command in commands {
            let name = command.name().to_string();
            match self.try_register(plugin, command) {
                Ok(()) => registered += 1,
                Err(err) => {
                    failed += 1;
                    tracing::error!("Failed to register command {}: {}", name, err);
                }
            }
        }
        tracing::info!(
            plugin = plugin.name(),
            registered,
            failed,
            "Command registration finished"
        );
    }

    /// Labels claimed so far on `host`
    pub fn claimed_labels(&self, host: HostKind) -> Vec<String> {
        let claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        let mut labels: Vec<String> = claimed
            .get(&host)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        labels.sort();
        labels
    }
}

impl Default for PlatformDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SubcommandRouter;
    use loopback::{LoopbackGameServer, LoopbackProxy};

    fn router(name: &str, aliases: &[&str]) -> Arc<dyn CommandContract> {
        Arc::new(
            SubcommandRouter::builder(name)
                .aliases(aliases.iter().copied())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_dispatch_creation() {
        let dispatch = PlatformDispatch::for_host(HostBinding::Proxy(Arc::new(LoopbackProxy::new())));
        assert_eq!(dispatch.hosts(), vec![HostKind::Proxy]);
    }

    #[test]
    fn test_binding_kind_matches_adapter() {
        let bindings = [
            HostBinding::GameServer(Arc::new(LoopbackGameServer::new(true))),
            HostBinding::Proxy(Arc::new(LoopbackProxy::new())),
        ];
        for binding in bindings {
            let kind = binding.kind();
            assert_eq!(binding.into_adapter().host(), kind);
        }
    }

    #[test]
    fn test_single_adapter_selected_without_hint() {
        let dispatch = PlatformDispatch::for_host(HostBinding::Proxy(Arc::new(LoopbackProxy::new())));
        let plugin = PluginDescriptor::new("Guard");
        assert_eq!(dispatch.select_host(&plugin).unwrap(), HostKind::Proxy);
    }

    #[test]
    fn test_unsupported_platform_when_ambiguous() {
        let dispatch = PlatformDispatch::new()
            .with_binding(HostBinding::GameServer(Arc::new(LoopbackGameServer::new(true))))
            .with_binding(HostBinding::Proxy(Arc::new(LoopbackProxy::new())));
        let plugin = PluginDescriptor::new("Guard");

        assert!(matches!(
            dispatch.select_host(&plugin),
            Err(DispatchError::UnsupportedPlatform(_))
        ));
        assert_eq!(
            dispatch.select_host(&plugin.clone().type_name("com.velocitypowered.Guard")).unwrap(),
            HostKind::Proxy
        );
    }

    #[test]
    fn test_missing_adapter_is_unsupported() {
        let dispatch = PlatformDispatch::for_host(HostBinding::Proxy(Arc::new(LoopbackProxy::new())));
        let plugin = PluginDescriptor::new("Guard").on_host(HostKind::GameServer);

        let result = dispatch.try_register(&plugin, router("guard", &[]));
        assert!(matches!(result, Err(DispatchError::UnsupportedPlatform(_))));
    }

    #[test]
    fn test_label_conflict_rejected() {
        let dispatch = PlatformDispatch::for_host(HostBinding::Proxy(Arc::new(LoopbackProxy::new())));
        let plugin = PluginDescriptor::new("Guard");

        dispatch.try_register(&plugin, router("guard", &["g"])).unwrap();
        let result = dispatch.try_register(&plugin, router("gate", &["G"]));
        assert!(matches!(
            result,
            Err(DispatchError::LabelConflict { host: HostKind::Proxy, ref label }) if label == "g"
        ));
        assert_eq!(dispatch.claimed_labels(HostKind::Proxy), vec!["g", "guard"]);
    }
}
