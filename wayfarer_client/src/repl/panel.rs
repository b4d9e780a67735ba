//! `repl::panel` module
//!
//! Handlers for switching, refreshing and acting on the collection panel.

use log::info;

use crate::dispatch::Request;
use crate::panel::PanelPreset;
use crate::repl::look::panel_item;
use crate::session::Session;
use crate::spinners::Spinners;
use crate::view::{View, ViewItem};

/// The command that opens `preset`, for hints.
fn command_word(preset: PanelPreset) -> &'static str {
    match preset {
        PanelPreset::Combat => "combat",
        PanelPreset::LocalItems => "items",
        PanelPreset::Inventory => "inventory",
    }
}

/// Switch the panel, if the gate allows that tab. Reselecting the open panel just shows it again.
pub fn select_panel_handler(
    session: &mut Session,
    view: &mut View,
    spinners: &Spinners,
    preset: PanelPreset,
) -> Option<Request> {
    if !session.controls().panel(preset) {
        info!("panel {preset:?} refused locally: not permitted by the gate");
        view.push(ViewItem::ActionFailure(format!(
            "{} isn't available right now.",
            preset.label()
        )));
        return None;
    }
    match session.select_panel(preset) {
        Some(request) => {
            view.push(ViewItem::TransitionMessage(format!("Opening {}...", preset.label())));
            Some(request)
        },
        None => {
            view.push(panel_item(session, spinners));
            None
        },
    }
}

pub fn reload_handler(session: &mut Session, view: &mut View) -> Request {
    let label = session.panel().selection().preset.label();
    view.push(ViewItem::TransitionMessage(format!("Refreshing {label}...")));
    session.reload_panel()
}

/// Apply the active panel's action to a named entry.
///
/// `wanted` is the panel the typed verb belongs to; a verb for another panel is refused
/// with a hint rather than silently retargeted.
pub fn act_handler(
    session: &mut Session,
    view: &mut View,
    wanted: Option<PanelPreset>,
    target: &str,
) -> Option<Request> {
    let selection = session.panel().selection();
    if let Some(wanted) = wanted
        && wanted != selection.preset
    {
        let verb = wanted.selection().verb();
        view.push(ViewItem::ActionFailure(format!(
            "You can only {verb} from the {} panel; type `{}` first.",
            wanted.label(),
            command_word(wanted)
        )));
        return None;
    }
    if !session.controls().entry_actions() {
        info!("{} refused locally: not permitted by the gate", selection.verb());
        view.push(ViewItem::ActionFailure(format!(
            "You can't {} anything right now.",
            selection.verb()
        )));
        return None;
    }
    match session.request_action(target) {
        Ok(request) => {
            view.push(ViewItem::TransitionMessage(format!("{}...", selection.action_label)));
            Some(request)
        },
        Err(err) => {
            view.push(ViewItem::ActionFailure(err.to_string()));
            None
        },
    }
}

/// Show the full record for a displayed entry, or for the current location.
pub fn examine_handler(session: &Session, view: &mut View, target: &str) {
    if let Some(entry) = session.panel().find(target) {
        view.push(ViewItem::EntryDetail {
            name: entry.name.clone(),
            description: entry.description.clone(),
            item_type: entry.item_type.clone(),
            image_bytes: entry.image.approx_decoded_len(),
        });
        return;
    }
    if let Some(location) = session.location().entry()
        && location.name.to_lowercase().contains(&target.to_lowercase())
    {
        view.push(ViewItem::LocationDescription {
            name: location.name.clone(),
            description: location.description.clone(),
            image_bytes: location.image.approx_decoded_len(),
            first_visit: false,
        });
        return;
    }
    view.push(ViewItem::ActionFailure(format!(
        "You don't see any '{target}' in {}.",
        session.panel().selection().preset.label()
    )));
}
