#![forbid(unsafe_code)]

//! # crosshost
//!
//! Write a plugin command once and dispatch it on whichever host loaded the
//! plugin: the in-process game server or the network proxy.
//!
//! ## Features
//!
//! - **Host-agnostic context**: one [`InvocationContext`] for both hosts
//! - **Subcommand routing**: case-insensitive [`SubcommandRouter`] with
//!   per-subcommand permissions and tab completion
//! - **Explicit host selection**: [`PlatformDispatch`] wires commands through
//!   the adapter for the host the bootstrap names
//! - **Markup**: legacy `&c` codes and `<red>` tags rendered per host
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crosshost::platform::loopback::LoopbackGameServer;
//! use crosshost::{HostBinding, PlatformDispatch, PluginDescriptor, SubCommand, SubcommandRouter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let server = Arc::new(LoopbackGameServer::new(true));
//!     let dispatch = PlatformDispatch::for_host(HostBinding::GameServer(server));
//!
//!     let guard = SubcommandRouter::builder("guard")
//!         .subcommand("reload", SubCommand::simple(|ctx| {
//!             ctx.send_message("&aReloaded.");
//!             Ok(true)
//!         }))
//!         .build()?;
//!
//!     dispatch.register(&PluginDescriptor::new("Guard"), Arc::new(guard));
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod platform;
pub mod text;

// Re-exports
pub use command::{CommandContract, InvocationContext, Sender, SubCommand, SubcommandRouter};
pub use config::Config;
pub use error::{DispatchError, Result};
pub use messages::{MessageCatalog, MessageSource};
pub use platform::{HostAdapter, HostBinding, HostKind, PlatformDispatch, PluginDescriptor};
pub use text::Component;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
