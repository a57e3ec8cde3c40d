//! End-to-end dispatch tests
//!
//! Commands are registered through `PlatformDispatch` and driven through the
//! loopback hosts, the same path a real host takes.

use std::sync::{Arc, Mutex};

use crosshost::platform::loopback::{LoopbackGameServer, LoopbackProxy, Outcome, RecordingSender};
use crosshost::{
    CommandContract, HostBinding, HostKind, InvocationContext, MessageCatalog, PlatformDispatch,
    PluginDescriptor, SubCommand, SubcommandRouter,
};

type Calls = Arc<Mutex<Vec<Vec<String>>>>;

/// `guard` with a `reload` subcommand that records the args it receives
fn recording_guard(calls: &Calls) -> Arc<dyn CommandContract> {
    let calls = Arc::clone(calls);
    Arc::new(
        SubcommandRouter::builder("guard")
            .alias("g")
            .subcommand(
                "reload",
                SubCommand::simple(move |ctx| {
                    calls.lock().unwrap().push(ctx.args().to_vec());
                    ctx.send_message("&aReloaded.");
                    Ok(true)
                }),
            )
            .build()
            .unwrap(),
    )
}

fn plugin(host: HostKind) -> PluginDescriptor {
    PluginDescriptor::new("Guard").on_host(host)
}

fn game_server(commands: Vec<Arc<dyn CommandContract>>) -> (Arc<LoopbackGameServer>, PlatformDispatch) {
    let server = Arc::new(LoopbackGameServer::new(true));
    let dispatch = PlatformDispatch::for_host(HostBinding::GameServer(server.clone()));
    dispatch.register_all(&plugin(HostKind::GameServer), commands);
    (server, dispatch)
}

fn proxy(commands: Vec<Arc<dyn CommandContract>>) -> (Arc<LoopbackProxy>, PlatformDispatch) {
    let proxy = Arc::new(LoopbackProxy::new());
    let dispatch = PlatformDispatch::for_host(HostBinding::Proxy(proxy.clone()));
    dispatch.register_all(&plugin(HostKind::Proxy), commands);
    (proxy, dispatch)
}

// =============================================================================
// Routing through both hosts
// =============================================================================

mod routing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_guard_reload_on_game_server() {
        let calls = Calls::default();
        let (server, _dispatch) = game_server(vec![recording_guard(&calls)]);
        let sender = Arc::new(RecordingSender::console());

        assert_eq!(server.dispatch(sender.clone(), "guard"), Outcome::Handled);
        assert_eq!(sender.plain_messages(), vec!["Usage: /guard <reload>".to_string()]);
        assert!(calls.lock().unwrap().is_empty());
        sender.clear();

        assert_eq!(server.dispatch(sender.clone(), "guard reload"), Outcome::Handled);
        assert_eq!(server.dispatch(sender.clone(), "guard RELOAD"), Outcome::Handled);
        assert_eq!(*calls.lock().unwrap(), vec![Vec::<String>::new(), Vec::new()]);
        sender.clear();

        assert_eq!(server.dispatch(sender.clone(), "guard bogus"), Outcome::Handled);
        assert_eq!(sender.raw_messages(), vec!["§cUnknown subcommand.".to_string()]);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_guard_reload_on_proxy() {
        let calls = Calls::default();
        let (proxy, _dispatch) = proxy(vec![recording_guard(&calls)]);
        let sender = Arc::new(RecordingSender::player("Steve"));

        assert_eq!(proxy.dispatch(sender.clone(), "guard"), Outcome::Handled);
        assert_eq!(sender.plain_messages(), vec!["Usage: /guard <reload>".to_string()]);
        sender.clear();

        assert_eq!(proxy.dispatch(sender.clone(), "g reload"), Outcome::Handled);
        assert_eq!(proxy.dispatch(sender.clone(), "guard RELOAD"), Outcome::Handled);
        assert_eq!(*calls.lock().unwrap(), vec![Vec::<String>::new(), Vec::new()]);
        sender.clear();

        assert_eq!(proxy.dispatch(sender.clone(), "guard bogus"), Outcome::Handled);
        assert_eq!(sender.plain_messages(), vec!["Unknown subcommand.".to_string()]);
    }

    #[test]
    fn test_alias_label_reaches_usage() {
        let calls = Calls::default();
        let (proxy, _dispatch) = proxy(vec![recording_guard(&calls)]);
        let sender = Arc::new(RecordingSender::console());

        proxy.dispatch(sender.clone(), "G");
        assert_eq!(sender.plain_messages(), vec!["Usage: /G <reload>".to_string()]);
    }

    #[test]
    fn test_game_server_namespaced_labels() {
        let calls = Calls::default();
        let (server, _dispatch) = game_server(vec![recording_guard(&calls)]);
        assert_eq!(server.labels(), vec!["g", "guard", "guard:g", "guard:guard"]);

        let sender = Arc::new(RecordingSender::console());
        assert_eq!(server.dispatch(sender, "guard:guard reload"), Outcome::Handled);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unregistered_label() {
        let (server, _dispatch) = game_server(Vec::new());
        let sender = Arc::new(RecordingSender::console());
        assert_eq!(server.dispatch(sender, "guard"), Outcome::UnknownCommand);
    }
}

// =============================================================================
// Permission handling differs per host
// =============================================================================

mod permission_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn staff_only() -> Arc<dyn CommandContract> {
        Arc::new(
            SubcommandRouter::builder("staff")
                .permission("staff.use")
                .subcommand("list", SubCommand::simple(|ctx| {
                    ctx.send_message("&7Nobody online");
                    Ok(true)
                }))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_proxy_refuses_before_execute() {
        let (proxy, _dispatch) = proxy(vec![staff_only()]);
        let sender = Arc::new(RecordingSender::player("Steve"));

        assert_eq!(proxy.dispatch(sender.clone(), "staff list"), Outcome::Denied);
        assert!(sender.messages().is_empty());
        assert!(proxy.complete(sender, "staff ").is_empty());
    }

    #[test]
    fn test_game_server_sends_no_permission() {
        let (server, _dispatch) = game_server(vec![staff_only()]);
        let sender = Arc::new(RecordingSender::player("Steve"));

        assert_eq!(server.dispatch(sender.clone(), "staff list"), Outcome::Handled);
        assert_eq!(sender.plain_messages(), vec!["You don't have permission!".to_string()]);
    }

    #[test]
    fn test_granted_player_runs_command() {
        let (proxy, _dispatch) = proxy(vec![staff_only()]);
        let sender = Arc::new(RecordingSender::player("Alex").grant("staff.use"));

        assert_eq!(proxy.dispatch(sender.clone(), "staff list"), Outcome::Handled);
        assert_eq!(sender.plain_messages(), vec!["Nobody online".to_string()]);
    }

    struct OpenToAll;

    impl CommandContract for OpenToAll {
        fn name(&self) -> &str {
            "spawn"
        }

        fn permission(&self) -> Option<&str> {
            Some("")
        }

        fn execute(&self, ctx: &InvocationContext) -> anyhow::Result<bool> {
            ctx.send_message("ran");
            Ok(true)
        }
    }

    #[test]
    fn test_empty_root_permission_allows_everyone_on_both_hosts() {
        let (server, _a) = game_server(vec![Arc::new(OpenToAll) as Arc<dyn CommandContract>]);
        let (proxy, _b) = proxy(vec![Arc::new(OpenToAll) as Arc<dyn CommandContract>]);
        let on_server = Arc::new(RecordingSender::player("Steve"));
        let on_proxy = Arc::new(RecordingSender::player("Steve"));

        assert_eq!(server.dispatch(on_server.clone(), "spawn"), Outcome::Handled);
        assert_eq!(proxy.dispatch(on_proxy.clone(), "spawn"), Outcome::Handled);
        assert_eq!(on_server.plain_messages(), vec!["ran".to_string()]);
        assert_eq!(on_proxy.plain_messages(), vec!["ran".to_string()]);
    }

    #[test]
    fn test_subcommand_permission_same_on_both_hosts() {
        let build = || -> Arc<dyn CommandContract> {
            Arc::new(
                SubcommandRouter::builder("guard")
                    .subcommand("ban", SubCommand::with_permission("guard.ban", |_| Ok(true)))
                    .build()
                    .unwrap(),
            )
        };
        let (server, _a) = game_server(vec![build()]);
        let (proxy, _b) = proxy(vec![build()]);
        let on_server = Arc::new(RecordingSender::player("Steve"));
        let on_proxy = Arc::new(RecordingSender::player("Steve"));

        assert_eq!(server.dispatch(on_server.clone(), "guard ban Alex"), Outcome::Handled);
        assert_eq!(proxy.dispatch(on_proxy.clone(), "guard ban Alex"), Outcome::Handled);
        assert_eq!(on_server.plain_messages(), on_proxy.plain_messages());
        assert_eq!(on_proxy.plain_messages(), vec!["You don't have permission!".to_string()]);
    }
}

// =============================================================================
// Tab completion
// =============================================================================

mod completion_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn moderation() -> Arc<dyn CommandContract> {
        Arc::new(
            SubcommandRouter::builder("mod")
                .subcommand("ban", SubCommand::with_permission("mod.ban", |_| Ok(true)))
                .subcommand("kick", SubCommand::simple(|_| Ok(true)))
                .subcommand("Kill", SubCommand::simple(|_| Ok(true)))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_hidden_subcommands_not_suggested() {
        let (server, _a) = game_server(vec![moderation()]);
        let (proxy, _b) = proxy(vec![moderation()]);
        let sender = Arc::new(RecordingSender::player("Steve"));

        assert_eq!(server.complete(sender.clone(), "mod "), vec!["kick", "kill"]);
        assert_eq!(proxy.complete(sender.clone(), "mod k"), vec!["kick", "kill"]);
        assert_eq!(proxy.complete(sender, "mod KI"), vec!["kick", "kill"]);
    }

    #[test]
    fn test_permitted_sender_sees_everything() {
        let (proxy, _dispatch) = proxy(vec![moderation()]);
        let sender = Arc::new(RecordingSender::player("Alex").grant("mod.ban"));
        assert_eq!(proxy.complete(sender, "mod "), vec!["ban", "kick", "kill"]);
    }

    #[test]
    fn test_no_suggestions_past_first_argument() {
        let (server, _dispatch) = game_server(vec![moderation()]);
        let sender = Arc::new(RecordingSender::console());
        assert!(server.complete(sender, "mod kick ").is_empty());
    }
}

// =============================================================================
// Registration
// =============================================================================

mod registration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Named(&'static str);

    impl CommandContract for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn execute(&self, _ctx: &InvocationContext) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_register_all_continues_past_failures() {
        let commands: Vec<Arc<dyn CommandContract>> = vec![
            Arc::new(Named("alpha")),
            Arc::new(Named("   ")),
            Arc::new(Named("ALPHA")),
            Arc::new(Named("beta")),
        ];
        let (proxy, dispatch) = proxy(commands);

        assert_eq!(proxy.labels(), vec!["alpha", "beta"]);
        assert_eq!(dispatch.claimed_labels(HostKind::Proxy), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_register_without_host_uses_only_adapter() {
        let server = Arc::new(LoopbackGameServer::new(false));
        let dispatch = PlatformDispatch::for_host(HostBinding::GameServer(server.clone()));

        dispatch.register(&PluginDescriptor::new("Guard"), Arc::new(Named("ping")));
        assert!(server.labels().contains(&"ping".to_string()));
    }

    #[test]
    fn test_type_name_detection_picks_host() {
        let server = Arc::new(LoopbackGameServer::new(true));
        let proxy = Arc::new(LoopbackProxy::new());
        let dispatch = PlatformDispatch::new()
            .with_binding(HostBinding::GameServer(server.clone()))
            .with_binding(HostBinding::Proxy(proxy.clone()));

        let plugin = PluginDescriptor::new("Guard").type_name("com.velocitypowered.api.GuardPlugin");
        dispatch.try_register(&plugin, Arc::new(Named("ping"))).unwrap();

        assert_eq!(proxy.labels(), vec!["ping"]);
        assert!(server.labels().is_empty());
    }
}

// =============================================================================
// Faults inside command bodies
// =============================================================================

mod fault_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn faulty() -> Arc<dyn CommandContract> {
        Arc::new(
            SubcommandRouter::builder("faulty")
                .subcommand("error", SubCommand::simple(|_| anyhow::bail!("storage offline")))
                .subcommand("panic", SubCommand::simple(|_| panic!("unexpected state")))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_error_becomes_internal_error_message() {
        let (server, _a) = game_server(vec![faulty()]);
        let (proxy, _b) = proxy(vec![faulty()]);
        let expected = vec!["An internal error occurred while executing this command.".to_string()];

        for line in ["faulty error", "faulty panic"] {
            let on_server = Arc::new(RecordingSender::console());
            assert_eq!(server.dispatch(on_server.clone(), line), Outcome::Handled);
            assert_eq!(on_server.plain_messages(), expected);

            let on_proxy = Arc::new(RecordingSender::console());
            assert_eq!(proxy.dispatch(on_proxy.clone(), line), Outcome::Handled);
            assert_eq!(on_proxy.plain_messages(), expected);
        }
    }
}

// =============================================================================
// Bundled sample commands with a message catalog on disk
// =============================================================================

mod bundled_command_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_catalog_overrides_router_messages() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("messages_en.yml"),
            "messages:\n  unknown-subcommand: \"&cNo such action.\"\n",
        )
        .unwrap();
        let messages = Arc::new(MessageCatalog::open(temp.path(), "en").unwrap());
        let (proxy, _dispatch) = proxy(crosshost::commands::bundled(messages).unwrap());
        let sender = Arc::new(RecordingSender::console());

        proxy.dispatch(sender.clone(), "guard explode");
        assert_eq!(sender.plain_messages(), vec!["No such action.".to_string()]);
        sender.clear();

        // Keys missing from the file fall back to the bundled text
        proxy.dispatch(sender.clone(), "guard kick Steve");
        assert_eq!(sender.plain_messages(), vec!["Steve has been kicked.".to_string()]);
    }

    #[test]
    fn test_ping_on_both_hosts() {
        let messages = Arc::new(MessageCatalog::bundled("en").unwrap());
        let (server, _a) = game_server(crosshost::commands::bundled(Arc::clone(&messages)).unwrap());
        let (proxy, _b) = proxy(crosshost::commands::bundled(messages).unwrap());

        let player = Arc::new(RecordingSender::player("Steve"));
        server.dispatch(player.clone(), "ping");
        proxy.dispatch(player.clone(), "pong");
        assert_eq!(
            player.plain_messages(),
            vec![
                "Pong, Steve! (game server)".to_string(),
                "Pong, Steve! (proxy)".to_string(),
            ]
        );
    }
}
