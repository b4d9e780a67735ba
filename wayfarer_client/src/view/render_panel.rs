//! module Render Panel
//!
//! This module contains the `ViewItem` renderers for the collection panel and
//! for the direct results of panel actions.

use colored::Colorize as _;
use textwrap::fill;

use crate::{
    panel::PanelPreset,
    style::{GameStyle as _, indented_block, normal_block},
    view::{
        View, ViewItem, image_size_label,
        icons::{ICON_ENEMY, ICON_ERROR, ICON_FAILURE, ICON_SUCCESS},
    },
};

/// The active collection, one entry per line with its action hint.
pub(super) fn panel_entries(view: &View) {
    if let Some(entry) = view.items.iter().rev().find(|i| i.view_item.is_panel_entries())
        && let ViewItem::PanelEntries {
            preset,
            action_label,
            actions_enabled,
            entries,
            empty_note,
        } = &entry.view_item
    {
        let action_hint = if *actions_enabled {
            format!("[{}]", action_label.to_lowercase()).enabled_style()
        } else {
            format!("[{}]", action_label.to_lowercase()).disabled_style()
        };
        println!("{} {}", preset.label().subheading_style(), action_hint);
        if entries.is_empty() {
            println!("    {}", empty_note.italic().dimmed());
        }
        for line in entries {
            let name = if *preset == PanelPreset::Combat {
                format!("{ICON_ENEMY} {}", line.name.enemy_style())
            } else {
                line.name.entry_style().to_string()
            };
            let kind = if line.item_type.is_empty() {
                String::new()
            } else {
                format!(" ({})", line.item_type)
            };
            println!(
                "  • {name}{}  {}",
                kind.dimmed(),
                image_size_label(line.image_bytes).dimmed()
            );
        }
        println!();
    }
}

pub(super) fn entry_detail(view: &View) {
    if let Some(ViewItem::EntryDetail {
        name,
        description,
        item_type,
        image_bytes,
    }) = view.items.iter().find_map(|i| match i.view_item {
        ViewItem::EntryDetail { .. } => Some(&i.view_item),
        _ => None,
    }) {
        println!("{}", name.entry_style().underline());
        if !item_type.is_empty() {
            println!("    {}", item_type.italic());
        }
        if description.is_empty() {
            println!("    {}", "No description.".italic().dimmed());
        } else {
            println!("{}", fill(description, indented_block()).description_style());
        }
        println!("    {}", image_size_label(*image_bytes).dimmed());
        println!();
    }
}

pub(super) fn action_success(view: &View) {
    for msg in view.items.iter().filter_map(|i| match &i.view_item {
        ViewItem::ActionSuccess(msg) => Some(msg),
        _ => None,
    }) {
        println!(
            "{}",
            fill(format!("{:<4}{}", ICON_SUCCESS.green(), msg).as_str(), normal_block())
        );
        println!();
    }
}

pub(super) fn action_failure(view: &View) {
    for msg in view.items.iter().filter_map(|i| match &i.view_item {
        ViewItem::ActionFailure(msg) => Some(msg),
        _ => None,
    }) {
        println!(
            "{}",
            fill(format!("{:<4}{}", ICON_FAILURE, msg.denied_style()).as_str(), normal_block())
        );
        println!();
    }
}

pub(super) fn errors(view: &View) {
    for msg in view.items.iter().filter_map(|i| match &i.view_item {
        ViewItem::Error(msg) => Some(msg),
        _ => None,
    }) {
        println!(
            "{}",
            fill(format!("{:<4}{}", ICON_ERROR.error_style(), msg.error_style()).as_str(), normal_block())
        );
        println!();
    }
}
