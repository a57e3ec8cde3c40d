//! Sample commands shipped with the CLI
//!
//! Each command is in its own submodule. They double as examples of the
//! two command shapes: a router (`guard`) and a plain command (`ping`).

pub mod guard;
pub mod ping;

use std::sync::Arc;

pub use ping::PingCommand;

use crate::command::CommandContract;
use crate::error::Result;
use crate::messages::MessageCatalog;

/// All sample commands, ready for registration
pub fn bundled(messages: Arc<MessageCatalog>) -> Result<Vec<Arc<dyn CommandContract>>> {
    Ok(vec![
        Arc::new(guard::build(Arc::clone(&messages))?),
        Arc::new(PingCommand::new(messages)),
    ])
}
