//! Subcommand router
//!
//! Dispatches the first argument of an invocation to a named subcommand.
//! Unknown names and missing permissions are answered with a message and
//! reported as handled, so the host never adds its own usage text on top.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::context::InvocationContext;
use super::contract::CommandContract;
use crate::error::{DispatchError, Result};
use crate::messages::{defaults, MessageSource};

/// Subcommand handler
pub type Executor = Box<dyn Fn(&InvocationContext) -> anyhow::Result<bool> + Send + Sync>;

/// Hook run when a router is invoked without arguments; it sees the router
/// so usage text can be built from the registered subcommands
pub type NoArgsHook = Box<dyn Fn(&SubcommandRouter, &InvocationContext) -> anyhow::Result<bool> + Send + Sync>;

/// A named child handler of a [`SubcommandRouter`]
pub struct SubCommand {
    executor: Executor,
    permission: Option<String>,
    description: String,
    aliases: Vec<String>,
}

impl SubCommand {
    /// Subcommand without permission or description
    pub fn simple<F>(executor: F) -> Self
    where
        F: Fn(&InvocationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            executor: Box::new(executor),
            permission: None,
            description: String::new(),
            aliases: Vec::new(),
        }
    }

    pub fn with_permission<F>(permission: impl Into<String>, executor: F) -> Self
    where
        F: Fn(&InvocationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::simple(executor).permission(permission)
    }

    pub fn with_details<F>(
        permission: impl Into<String>,
        description: impl Into<String>,
        executor: F,
    ) -> Self
    where
        F: Fn(&InvocationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::simple(executor)
            .permission(permission)
            .description(description)
    }

    /// Mount another router; its permission, description and aliases carry
    /// over. The aliases become extra names in the parent router.
    pub fn nested(router: SubcommandRouter) -> Self {
        let permission = router.permission.clone();
        let description = router.description.clone();
        let aliases = router.aliases.clone();
        Self {
            executor: Box::new(move |ctx: &InvocationContext| router.execute(ctx)),
            permission,
            description,
            aliases,
        }
    }

    /// Extra names this subcommand answers to
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        let permission = permission.into();
        self.permission = (!permission.is_empty()).then_some(permission);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required_permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn summary(&self) -> &str {
        &self.description
    }

    pub fn execute(&self, ctx: &InvocationContext) -> anyhow::Result<bool> {
        (self.executor)(ctx)
    }

    fn visible_to(&self, ctx: &InvocationContext) -> bool {
        self.permission
            .as_deref()
            .map_or(true, |permission| ctx.has_permission(permission))
    }
}

impl fmt::Debug for SubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubCommand")
            .field("permission", &self.permission)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// A [`CommandContract`] that routes on its first argument
pub struct SubcommandRouter {
    name: String,
    aliases: Vec<String>,
    permission: Option<String>,
    description: String,
    subcommands: BTreeMap<String, SubCommand>,
    /// Lower-cased alias -> registered subcommand name
    subcommand_aliases: HashMap<String, String>,
    messages: Option<Arc<dyn MessageSource>>,
    on_no_args: Option<NoArgsHook>,
}

impl SubcommandRouter {
    pub fn builder(name: impl Into<String>) -> RouterBuilder {
        RouterBuilder::new(name)
    }

    /// Look up a subcommand by name or alias, case-insensitively
    pub fn subcommand(&self, name: &str) -> Option<&SubCommand> {
        let name = name.to_lowercase();
        self.subcommands.get(&name).or_else(|| {
            self.subcommand_aliases
                .get(&name)
                .and_then(|target| self.subcommands.get(target))
        })
    }

    /// All registered names, sorted, regardless of permission
    pub fn subcommand_names(&self) -> impl Iterator<Item = &str> {
        self.subcommands.keys().map(String::as_str)
    }

    /// Names whose permission the sender satisfies
    pub fn visible_subcommands(&self, ctx: &InvocationContext) -> Vec<String> {
        self.subcommands
            .iter()
            .filter(|(_, sub)| sub.visible_to(ctx))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// `(name, description)` pairs of the visible subcommands
    pub fn subcommand_help(&self, ctx: &InvocationContext) -> Vec<(String, String)> {
        self.subcommands
            .iter()
            .filter(|(_, sub)| sub.visible_to(ctx))
            .map(|(name, sub)| (name.clone(), sub.description.clone()))
            .collect()
    }

    pub fn messages(&self) -> Option<&dyn MessageSource> {
        self.messages.as_deref()
    }

    pub fn no_permission_message(&self) -> String {
        defaults::no_permission(self.messages())
    }

    pub fn unknown_subcommand_message(&self) -> String {
        defaults::unknown_subcommand(self.messages())
    }

    pub fn internal_error_message(&self) -> String {
        defaults::internal_error(self.messages())
    }

    fn no_args(&self, ctx: &InvocationContext) -> anyhow::Result<bool> {
        match &self.on_no_args {
            Some(hook) => hook(self, ctx),
            None => {
                let names = self.visible_subcommands(ctx);
                ctx.send_message(&format!("&eUsage: /{} <{}>", ctx.label(), names.join("|")));
                Ok(true)
            }
        }
    }
}

impl CommandContract for SubcommandRouter {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&self, ctx: &InvocationContext) -> anyhow::Result<bool> {
        let Some(first) = ctx.arg(0) else {
            return self.no_args(ctx);
        };

        let name = first.to_lowercase();
        let Some(sub) = self.subcommand(&name) else {
            tracing::debug!(label = ctx.label(), subcommand = %name, "Unknown subcommand");
            ctx.send_message(&self.unknown_subcommand_message());
            return Ok(true);
        };

        if let Some(permission) = sub.required_permission() {
            if !ctx.has_permission(permission) {
                tracing::debug!(label = ctx.label(), subcommand = %name, permission, "Permission denied");
                ctx.send_message(&self.no_permission_message());
                return Ok(true);
            }
        }

        sub.execute(&ctx.narrow(&name))
    }

    fn as_router(&self) -> Option<&SubcommandRouter> {
        Some(self)
    }
}

impl fmt::Debug for SubcommandRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubcommandRouter")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("permission", &self.permission)
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

/// Startup-time builder; the router is read-only once built
pub struct RouterBuilder {
    name: String,
    aliases: Vec<String>,
    permission: Option<String>,
    description: String,
    subcommands: Vec<(String, SubCommand)>,
    messages: Option<Arc<dyn MessageSource>>,
    on_no_args: Option<NoArgsHook>,
}

impl RouterBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            permission: None,
            description: String::new(),
            subcommands: Vec::new(),
            messages: None,
            on_no_args: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        let permission = permission.into();
        self.permission = (!permission.is_empty()).then_some(permission);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn messages(mut self, messages: Arc<dyn MessageSource>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Hook run when the command is invoked without arguments
    pub fn on_no_args<F>(mut self, hook: F) -> Self
    where
        F: Fn(&SubcommandRouter, &InvocationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.on_no_args = Some(Box::new(hook));
        self
    }

    /// Register a subcommand; names are case-insensitive and the last
    /// registration for a name wins
    pub fn subcommand(mut self, name: impl Into<String>, sub: SubCommand) -> Self {
        self.subcommands.push((name.into(), sub));
        self
    }

    pub fn build(self) -> Result<SubcommandRouter> {
        if self.name.trim().is_empty() {
            return Err(DispatchError::InvalidCommand("command name must not be empty".into()));
        }

        let mut subcommands = BTreeMap::new();
        let mut subcommand_aliases = HashMap::new();
        for (name, sub) in self.subcommands {
            for label in std::iter::once(&name).chain(sub.aliases.iter()) {
                if label.is_empty() || label.chars().any(char::is_whitespace) {
                    return Err(DispatchError::InvalidCommand(format!(
                        "invalid subcommand name '{}' in '{}'",
                        label, self.name
                    )));
                }
            }
            let key = name.to_lowercase();
            for alias in &sub.aliases {
                subcommand_aliases.insert(alias.to_lowercase(), key.clone());
            }
            subcommands.insert(key, sub);
        }
        // Registered names always win over aliases
        subcommand_aliases.retain(|alias, _| !subcommands.contains_key(alias));

        Ok(SubcommandRouter {
            name: self.name,
            aliases: self.aliases,
            permission: self.permission,
            description: self.description,
            subcommands,
            subcommand_aliases,
            messages: self.messages,
            on_no_args: self.on_no_args,
        })
    }
}
