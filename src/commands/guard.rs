//! `guard` sample command
//!
//! A router with plain, permission-gated and nested subcommands:
//!
//! - `guard reload`
//! - `guard ban <player> [reason]` (`guard.ban`)
//! - `guard kick <player>`
//! - `guard zone list` / `guard zone add <name>` (`guard.zone.edit`)

use std::sync::Arc;

use crate::command::{InvocationContext, SubCommand, SubcommandRouter};
use crate::error::Result;
use crate::messages::{MessageCatalog, MessageSource};

pub const BAN_PERMISSION: &str = "guard.ban";
pub const ZONE_EDIT_PERMISSION: &str = "guard.zone.edit";

const DEFAULT_ZONES: &[&str] = &["spawn", "market"];

/// Build the `guard` router
pub fn build(messages: Arc<MessageCatalog>) -> Result<SubcommandRouter> {
    let zone = build_zone(Arc::clone(&messages))?;

    let usage = Arc::clone(&messages);
    let reload = Arc::clone(&messages);
    let ban = Arc::clone(&messages);
    let kick = Arc::clone(&messages);

    SubcommandRouter::builder("guard")
        .alias("g")
        .description("Zone and player protection")
        .messages(messages)
        .on_no_args(move |router, ctx| {
            let available = router.visible_subcommands(ctx).join(", ");
            let mut lines = usage.message_list_with(
                "guard.usage",
                &["&e/{label} <subcommand>"],
                &[("label", ctx.label()), ("subcommands", available.as_str())],
            );
            for (name, description) in router.subcommand_help(ctx) {
                lines.push(usage.message_with(
                    "guard.usage-entry",
                    "&7/{label} {subcommand} - {description}",
                    &[
                        ("label", ctx.label()),
                        ("subcommand", name.as_str()),
                        ("description", description.as_str()),
                    ],
                ));
            }
            ctx.send_messages(lines);
            Ok(true)
        })
        .subcommand(
            "reload",
            SubCommand::simple(move |ctx| {
                ctx.send_message(&reload.message("guard.reload", "&aReloaded."));
                Ok(true)
            })
            .description("Reload guard settings"),
        )
        .subcommand(
            "ban",
            SubCommand::with_details(BAN_PERMISSION, "Ban a player", move |ctx| {
                execute_ban(&ban, ctx)
            }),
        )
        .subcommand(
            "kick",
            SubCommand::simple(move |ctx| execute_kick(&kick, ctx)).description("Kick a player"),
        )
        .subcommand("zone", SubCommand::nested(zone))
        .build()
}

fn build_zone(messages: Arc<MessageCatalog>) -> Result<SubcommandRouter> {
    let list = Arc::clone(&messages);
    let add = Arc::clone(&messages);

    SubcommandRouter::builder("zone")
        .description("Manage protected zones")
        .messages(messages)
        .subcommand(
            "list",
            SubCommand::simple(move |ctx| {
                let zones = DEFAULT_ZONES.join(", ");
                ctx.send_message(&list.message_with("guard.zone-list", "&7Zones: {zones}", &[("zones", zones.as_str())]));
                Ok(true)
            })
            .description("List zones"),
        )
        .subcommand(
            "add",
            SubCommand::with_details(ZONE_EDIT_PERMISSION, "Create a zone", move |ctx| {
                let Some(zone) = ctx.arg(0) else {
                    ctx.send_message(&add.message_with("guard.zone-usage", "&cUsage: /{label} <name>", &[("label", ctx.label())]));
                    return Ok(true);
                };
                ctx.send_message(&add.message_with("guard.zone-added", "&aZone {zone} created.", &[("zone", zone)]));
                Ok(true)
            }),
        )
        .build()
}

fn execute_ban(messages: &MessageCatalog, ctx: &InvocationContext) -> anyhow::Result<bool> {
    let Some(player) = ctx.arg(0) else {
        ctx.send_message(&messages.message_with(
            "guard.ban-usage",
            "&cUsage: /{label} <player> [reason]",
            &[("label", ctx.label())],
        ));
        return Ok(true);
    };

    let reason = if ctx.arg_count() > 1 {
        ctx.args()[1..].join(" ")
    } else {
        "No reason given".to_string()
    };
    tracing::info!(staff = %ctx.sender().name(), player, reason = %reason, "Player banned");
    ctx.send_message(&messages.message_with(
        "guard.banned",
        "&a{player} has been banned: {reason}",
        &[("player", player), ("reason", reason.as_str())],
    ));
    Ok(true)
}

fn execute_kick(messages: &MessageCatalog, ctx: &InvocationContext) -> anyhow::Result<bool> {
    match ctx.arg(0) {
        Some(player) => ctx.send_message(&messages.message_with(
            "guard.kicked",
            "&e{player} has been kicked.",
            &[("player", player)],
        )),
        None => ctx.send_message(&messages.message_with(
            "guard.kick-usage",
            "&cUsage: /{label} <player>",
            &[("label", ctx.label())],
        )),
    }
    Ok(true)
}
