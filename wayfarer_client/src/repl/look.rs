//! `repl::look` module
//!
//! Handlers that (re)display the scene, plus the builders every other handler
//! uses to turn session state into view items.

use crate::dispatch::Request;
use crate::location::Direction;
use crate::panel::PanelPreset;
use crate::session::Session;
use crate::spinners::{SpinnerType, Spinners};
use crate::view::{DirectionLine, EntryLine, TabLine, View, ViewItem};

/// Show the current location, controls and panel again.
///
/// With no location on record yet (say the first fetch failed) this fetches it instead.
pub fn look_handler(session: &mut Session, view: &mut View, spinners: &Spinners) -> Option<Request> {
    if session.location().entry().is_none() {
        view.push(ViewItem::TransitionMessage("Getting your bearings...".into()));
        return Some(session.refresh_location());
    }
    push_scene(session, view);
    view.push(panel_item(session, spinners));
    None
}

pub fn exits_handler(session: &mut Session, view: &mut View) -> Request {
    view.push(ViewItem::TransitionMessage("You look around for ways onward...".into()));
    session.request_exits()
}

/// Location description (if known) and the control bar.
pub fn push_scene(session: &Session, view: &mut View) {
    let location = session.location();
    if let Some(entry) = location.entry() {
        view.push(ViewItem::LocationDescription {
            name: entry.name.clone(),
            description: entry.description.clone(),
            image_bytes: entry.image.approx_decoded_len(),
            first_visit: location.is_first_visit(),
        });
    }
    view.push(control_bar_item(session));
}

pub fn control_bar_item(session: &Session) -> ViewItem {
    let controls = session.controls();
    let active = session.location().preset();
    ViewItem::ControlBar {
        directions: Direction::ALL
            .into_iter()
            .map(|direction| DirectionLine {
                direction,
                enabled: controls.direction(direction),
            })
            .collect(),
        tabs: PanelPreset::ALL
            .into_iter()
            .map(|preset| TabLine {
                preset,
                enabled: controls.panel(preset),
                active: preset == active,
            })
            .collect(),
        moving: session.location().pending_direction(),
    }
}

/// The panel's current list, stale or not.
pub fn panel_item(session: &Session, spinners: &Spinners) -> ViewItem {
    let panel = session.panel();
    let selection = panel.selection();
    ViewItem::PanelEntries {
        preset: selection.preset,
        action_label: selection.action_label,
        actions_enabled: session.controls().entry_actions(),
        entries: panel
            .entries()
            .map(|entry| EntryLine {
                name: entry.name.clone(),
                item_type: entry.item_type.clone(),
                image_bytes: entry.image.approx_decoded_len(),
            })
            .collect(),
        empty_note: spinners.spin(SpinnerType::EmptyPanel, "Nothing here."),
    }
}
