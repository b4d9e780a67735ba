//! module Render System
//!
//! This module contains the `ViewItem` renderers for client messages,
//! such as help, session status, and the summary upon quitting.

use colored::Colorize as _;
use textwrap::{fill, termwidth};

use crate::{
    style::{GameStyle as _, normal_block},
    view::{View, ViewItem, icons::ICON_ENGINE},
};

/// Used for generic messages from the client.
pub(super) fn engine_message(view: &View) {
    let engine_msgs = view.items.iter().filter(|i| i.view_item.is_engine_message());
    let mut shown = false;
    for msg in engine_msgs {
        println!(
            "{}",
            fill(
                format!("{ICON_ENGINE:<4}{}", msg.view_item.clone().unwrap_engine_message()).as_str(),
                normal_block()
            )
        );
        shown = true;
    }
    if shown {
        println!();
    }
}

/// Displays the command guide.
pub(super) fn show_help(view: &View) {
    if let Some(entry) = view.items.iter().find(|item| item.view_item.is_help())
        && let ViewItem::Help(commands) = &entry.view_item
    {
        println!("{}", "Commands:".bold().yellow());
        println!();
        for command in commands {
            let formatted_line = format!("{} - {}", command.command.bold().green(), command.description.italic());
            println!("{}", fill(&formatted_line, normal_block()));
        }
        println!();
    }
}

/// Where the player is, what is in flight, and what the server currently permits.
pub(super) fn status_report(view: &View) {
    if let Some(entry) = view.items.iter().find(|i| i.view_item.is_status_report())
        && let ViewItem::StatusReport {
            location,
            moving,
            panel,
            panel_loading,
            permitted,
        } = &entry.view_item
    {
        println!(
            "{:12} {}",
            "Location:",
            location.as_deref().unwrap_or("(not yet known)").location_style()
        );
        let movement = moving.map_or_else(|| "idle".to_string(), |dir| format!("moving {dir}"));
        println!("{:12} {movement}", "Movement:");
        println!(
            "{:12} {}{}",
            "Panel:",
            panel.label(),
            if *panel_loading { " (loading)" } else { "" }
        );
        if permitted.is_empty() {
            println!("{:12} {}", "Permitted:", "nothing".denied_style());
        } else {
            println!("{:12} {}", "Permitted:", permitted.join(", ").enabled_style());
        }
        println!();
    }
}

/// Displays the session summary when the player quits.
pub(super) fn quit_summary(view: &View) {
    if let Some(entry) = view.items.iter().find(|entry| entry.view_item.is_quit_summary())
        && let ViewItem::QuitSummary {
            farewell,
            moves,
            actions,
            locations_seen,
        } = &entry.view_item
    {
        println!("{:^width$}", farewell.as_str().black().on_yellow(), width = termwidth());
        println!("{:10} {}", "Moves:", moves);
        println!("{:10} {}", "Actions:", actions);
        println!("{:10} {}", "Places:", locations_seen);
    }
}
