//! `repl::movement` module
//!
//! Contains repl loop handlers for commands that change player location

use log::info;

use crate::dispatch::Request;
use crate::location::Direction;
use crate::session::Session;
use crate::view::{View, ViewItem};

/// Ask the server to move the player, if that direction is currently enabled.
///
/// Disabled directions never reach the session: the refusal is reported locally.
pub fn move_handler(session: &mut Session, view: &mut View, direction: Direction) -> Option<Request> {
    if let Some(pending) = session.location().pending_direction() {
        view.push(ViewItem::ActionFailure(format!(
            "Hold on, you're still heading {pending}."
        )));
        return None;
    }
    if !session.controls().direction(direction) {
        info!("move {direction} refused locally: not permitted by the gate");
        view.push(ViewItem::ActionFailure(format!("You can't go {direction} from here.")));
        return None;
    }
    match session.request_move(direction) {
        Ok(request) => {
            view.push(ViewItem::TransitionMessage(format!("Heading {direction}...")));
            Some(request)
        },
        Err(err) => {
            view.push(ViewItem::ActionFailure(err.to_string()));
            None
        },
    }
}
