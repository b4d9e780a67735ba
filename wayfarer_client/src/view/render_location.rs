//! module Render Location
//!
//! Renderers for the scene: backstory, the current location and the control bar.

use colored::Colorize as _;
use textwrap::fill;

use crate::{
    style::{GameStyle as _, indented_block, normal_block},
    view::{
        View, ViewItem, image_size_label,
        icons::{ICON_IMAGE, ICON_TRAVEL},
    },
};

/// Movement and loading lines, shown ahead of every section.
pub(super) fn transitions(view: &View) {
    let mut shown = false;
    for msg in view.items.iter().filter_map(|i| match &i.view_item {
        ViewItem::TransitionMessage(msg) => Some(msg),
        _ => None,
    }) {
        println!(
            "{}",
            fill(format!("{ICON_TRAVEL:<4}{msg}").as_str(), normal_block()).transition_style()
        );
        shown = true;
    }
    if shown {
        println!();
    }
}

pub(super) fn backstory(view: &View) {
    if let Some(entry) = view.items.iter().find(|i| i.view_item.is_backstory())
        && let ViewItem::Backstory(text) = &entry.view_item
    {
        println!("{:^width$}", "THE STORY SO FAR".bright_yellow().underline(), width = view.width);
        println!();
        for paragraph in text.split("\n\n") {
            println!("{}", fill(paragraph.trim(), normal_block()).description_style());
            println!();
        }
    }
}

/// Title bar, description and image summary for the current location.
pub(super) fn location_description(view: &View) {
    if let Some(ViewItem::LocationDescription {
        name,
        description,
        image_bytes,
        first_visit,
    }) = view.items.iter().rev().find_map(|i| match i.view_item {
        ViewItem::LocationDescription { .. } => Some(&i.view_item),
        _ => None,
    }) {
        println!("{:^width$}", name.location_titlebar_style(), width = view.width);
        if *first_visit {
            println!("{:^width$}", "(new place)".italic().dimmed(), width = view.width);
        }
        println!("{}", fill(description, normal_block()).description_style());
        println!(
            "{}",
            format!("{ICON_IMAGE} {}", image_size_label(*image_bytes)).dimmed()
        );
        println!();
    }
}

/// Directions and panel tabs, each shown enabled or struck through.
pub(super) fn control_bar(view: &View) {
    if let Some(entry) = view.items.iter().rev().find(|i| i.view_item.is_control_bar())
        && let ViewItem::ControlBar {
            directions,
            tabs,
            moving,
        } = &entry.view_item
    {
        let dirs = directions
            .iter()
            .map(|line| {
                let label = line.direction.name();
                if line.enabled {
                    label.enabled_style().to_string()
                } else {
                    label.disabled_style().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("{} {dirs}", "Go:".subheading_style());

        let tabs = tabs
            .iter()
            .map(|tab| {
                let label = if tab.active {
                    format!("*{}*", tab.preset.label())
                } else {
                    tab.preset.label().to_string()
                };
                if tab.enabled {
                    label.enabled_style().to_string()
                } else {
                    label.disabled_style().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("{} {tabs}", "Panels:".subheading_style());

        if let Some(direction) = moving {
            println!("{}", format!("(moving {direction}...)").italic().dimmed());
        }
        println!();
    }
}

/// Server's prose summary of the neighbouring places.
pub(super) fn exits_text(view: &View) {
    if let Some(entry) = view.items.iter().find(|i| i.view_item.is_exits_text())
        && let ViewItem::ExitsText(text) = &entry.view_item
    {
        println!("{}:", "Nearby".subheading_style());
        println!("{}", fill(text, indented_block()).description_style());
        println!();
    }
}
