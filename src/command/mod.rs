//! Host-agnostic command model
//!
//! - [`InvocationContext`]: one invocation (sender, args, label, host)
//! - [`CommandContract`]: what a command exposes to the dispatch layer
//! - [`SubcommandRouter`]: a command that routes on its first argument

pub mod context;
pub mod contract;
pub mod router;

pub use context::{InvocationContext, Sender};
pub use contract::CommandContract;
pub use router::{Executor, NoArgsHook, RouterBuilder, SubCommand, SubcommandRouter};
