#![forbid(unsafe_code)]
//! crosshost Command Line Interface
//!
//! Runs the bundled sample commands on an in-process game server or proxy,
//! so a command line can be tried against either host without a server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use console::style;

use crosshost::platform::loopback::{LoopbackGameServer, LoopbackProxy, Outcome, RecordingSender};
use crosshost::{commands, logging};
use crosshost::{Config, HostBinding, HostKind, MessageCatalog, PlatformDispatch, PluginDescriptor};

const PLUGIN_NAME: &str = "Guard";

#[derive(Parser)]
#[command(name = "crosshost")]
#[command(about = "Dispatch plugin commands on a loopback game server or proxy")]
#[command(version)]
struct Cli {
    /// Host to run the command on (game-server, proxy)
    #[arg(long, default_value = "game-server", value_parser = parse_host)]
    host: HostKind,

    /// Config file path
    #[arg(short, long, default_value = ".crosshost.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Run as this player instead of the console
    #[arg(long, env = "CROSSHOST_PLAYER")]
    player: Option<String>,

    /// Permissions granted to the player (can specify multiple)
    #[arg(long)]
    grant: Vec<String>,

    /// Game server without HEX color support
    #[arg(long)]
    no_hex: bool,

    /// Print completions for the line instead of running it
    #[arg(long)]
    complete: bool,

    /// Command line, e.g. `guard ban Steve griefing`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    line: Vec<String>,
}

fn parse_host(value: &str) -> Result<HostKind, String> {
    value.parse()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    logging::init(&config.log_filter, cli.verbose);

    let messages = match &config.messages_dir {
        Some(dir) => MessageCatalog::open(dir, &config.language)
            .with_context(|| format!("failed to open messages in {}", dir.display()))?,
        None => MessageCatalog::bundled(&config.language)?,
    };
    let messages = Arc::new(messages);

    let sender = Arc::new(match &cli.player {
        Some(name) => cli
            .grant
            .iter()
            .fold(RecordingSender::player(name.as_str()), |sender, permission| sender.grant(permission.as_str())),
        None => RecordingSender::console(),
    });

    let plugin = PluginDescriptor::new(config.namespace.as_deref().unwrap_or(PLUGIN_NAME)).on_host(cli.host);
    let line = cli.line.join(" ");
    let hex_colors = config.use_hex_colors(cli.no_hex);

    let (outcome, completions) = match cli.host {
        HostKind::GameServer => {
            let server = Arc::new(LoopbackGameServer::new(hex_colors));
            let dispatch = PlatformDispatch::for_host(HostBinding::GameServer(server.clone()));
            dispatch.register_all(&plugin, commands::bundled(messages)?);
            if cli.complete {
                (None, server.complete(sender.clone(), &line))
            } else {
                (Some(server.dispatch(sender.clone(), &line)), Vec::new())
            }
        }
        HostKind::Proxy => {
            let proxy = Arc::new(LoopbackProxy::new());
            let dispatch = PlatformDispatch::for_host(HostBinding::Proxy(proxy.clone()));
            dispatch.register_all(&plugin, commands::bundled(messages)?);
            if cli.complete {
                (None, proxy.complete(sender.clone(), &line))
            } else {
                (Some(proxy.dispatch(sender.clone(), &line)), Vec::new())
            }
        }
    };

    let Some(outcome) = outcome else {
        if completions.is_empty() {
            println!("{}", style("(no suggestions)").dim());
        }
        for suggestion in completions {
            println!("{}", suggestion);
        }
        return Ok(());
    };

    for message in sender.plain_messages() {
        println!("{} {}", style("»").cyan(), message);
    }

    match outcome {
        Outcome::Handled => {
            if cli.verbose {
                eprintln!("{} handled on the {} host", style("✓").green(), cli.host);
            }
        }
        Outcome::NotHandled => {
            eprintln!("{} command reported not handled", style("⚠").yellow());
        }
        Outcome::Denied => {
            eprintln!("{} the {} host refused the command: no permission", style("✗").red(), cli.host);
            std::process::exit(1);
        }
        Outcome::UnknownCommand => {
            eprintln!("{} Unknown command: {}", style("✗").red(), line);
            std::process::exit(1);
        }
    }

    Ok(())
}
