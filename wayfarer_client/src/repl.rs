//! REPL and command handling utilities.
//!
//! The client runs an event loop that waits on two things at once: the next line
//! from the player and the next settled network request. This module owns that loop;
//! its submodules implement the individual command handlers.

mod input;
pub mod look;
pub mod movement;
pub mod panel;
pub mod system;

pub use look::*;
pub use movement::*;
pub use panel::*;
pub use system::*;

use anyhow::Result;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use log::info;

use crate::api::GameApi;
use crate::bootstrap::{self, Backstory, Readiness};
use crate::command::{Command, parse_command};
use crate::config::ClientConfig;
use crate::dispatch::{Request, perform};
use crate::session::{Session, SessionEvent};
use crate::spinners::{SpinnerType, Spinners};
use crate::style::GameStyle;
use crate::view::{View, ViewItem};

use input::{InputChannel, InputEvent};

/// Control flow signal used by handlers to exit the REPL.
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the intro screen and then the main loop until the player quits.
///
/// # Errors
/// - if the input thread cannot be started
pub async fn run_repl<A: GameApi>(api: A, config: &ClientConfig) -> Result<()> {
    let mut view = View::new();
    let spinners = Spinners::new();
    let mut session = Session::new();
    let mut input = InputChannel::spawn(config.history)?;

    if !config.skip_intro {
        match bootstrap::fetch_backstory(&api).await {
            Backstory::Text(text) => view.push(ViewItem::Backstory(text)),
            Backstory::Unavailable(err) => view.push(ViewItem::Error(format!("No backstory today ({err})."))),
        }
        view.flush();
        input
            .prompt("Press Enter when you are ready (or type quit) ".prompt_style().to_string())
            .await;
        match input.recv().await {
            Some(InputEvent::Line(line)) if bootstrap::readiness(&line) == Readiness::Ready => {},
            _ => return Ok(()),
        }
    }

    let mut in_flight = FuturesUnordered::new();
    for request in session.start() {
        in_flight.push(perform(api.clone(), request));
    }
    view.push(ViewItem::TransitionMessage("Finding out where you are...".into()));
    view.flush();
    input.prompt(prompt(&session)).await;

    loop {
        tokio::select! {
            Some(settlement) = in_flight.next(), if !in_flight.is_empty() => {
                let settled = session.settle(settlement);
                report_events(&session, &mut view, &spinners, &settled.events);
                for followup in settled.followups {
                    in_flight.push(perform(api.clone(), followup));
                }
                view.flush();
            }
            event = input.recv() => {
                let line = match event {
                    Some(InputEvent::Line(line)) => line,
                    Some(InputEvent::Interrupted) => {
                        view.push(ViewItem::EngineMessage("Command canceled.".to_string()));
                        view.flush();
                        input.prompt(prompt(&session)).await;
                        continue;
                    },
                    Some(InputEvent::Eof) | None => "quit".to_string(),
                };
                let mut requests = Vec::new();
                let control = handle_command(parse_command(&line), &mut session, &mut view, &spinners, &mut requests);
                for request in requests {
                    in_flight.push(perform(api.clone(), request));
                }
                view.flush();
                if let ReplControl::Quit = control {
                    break;
                }
                input.prompt(prompt(&session)).await;
            }
        }
    }
    info!("leaving the REPL with {} request(s) still in flight", in_flight.len());
    Ok(())
}

fn prompt(session: &Session) -> String {
    let place = session
        .location()
        .entry()
        .map_or_else(|| "...".to_string(), |entry| entry.name.clone());
    format!("\n[{place}|{}]>> ", session.location().preset().label())
        .prompt_style()
        .to_string()
}

/// Route one parsed command to its handler, collecting any requests it dispatches.
pub fn handle_command(
    command: Command,
    session: &mut Session,
    view: &mut View,
    spinners: &Spinners,
    requests: &mut Vec<Request>,
) -> ReplControl {
    match command {
        Command::Move(direction) => requests.extend(move_handler(session, view, direction)),
        Command::SelectPanel(preset) => requests.extend(select_panel_handler(session, view, spinners, preset)),
        Command::Act { panel, target } => requests.extend(act_handler(session, view, panel, &target)),
        Command::Examine(target) => examine_handler(session, view, &target),
        Command::Reload => requests.push(reload_handler(session, view)),
        Command::Look => requests.extend(look_handler(session, view, spinners)),
        Command::Exits => requests.push(exits_handler(session, view)),
        Command::Status => status_handler(session, view),
        Command::Help => help_handler(view),
        Command::Quit => return quit_handler(session, view, spinners),
        Command::Unknown => view.push(ViewItem::Error(
            spinners.spin(SpinnerType::UnrecognizedCommand, "Didn't quite catch that?"),
        )),
    }
    ReplControl::Continue
}

/// Turn settlement events into view items.
pub fn report_events(session: &Session, view: &mut View, spinners: &Spinners, events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::LocationUpdated => push_scene(session, view),
            SessionEvent::LocationFailed(err) => {
                view.push(ViewItem::Error(format!("Couldn't find out where you are: {err}")));
                view.push(control_bar_item(session));
            },
            SessionEvent::Moved(_) => {
                view.push(ViewItem::TransitionMessage(
                    spinners.spin(SpinnerType::Movement, "You head that way..."),
                ));
            },
            SessionEvent::MoveRejected { direction, result } => {
                let said = result.as_deref().unwrap_or("nothing");
                view.push(ViewItem::ActionFailure(format!(
                    "{} (going {direction}; the server said \"{said}\")",
                    spinners.spin(SpinnerType::MoveRefused, "You stay put.")
                )));
                view.push(control_bar_item(session));
            },
            SessionEvent::MoveFailed { direction, error } => {
                view.push(ViewItem::Error(format!("Moving {direction} failed: {error}")));
                view.push(control_bar_item(session));
            },
            SessionEvent::PanelLoaded { .. } => view.push(panel_item(session, spinners)),
            SessionEvent::PanelFailed { selection, error } => {
                view.push(ViewItem::Error(format!(
                    "Couldn't load {}: {error}",
                    selection.preset.label()
                )));
            },
            SessionEvent::ActionApplied { selection, entry_name } => {
                view.push(ViewItem::ActionSuccess(format!("{} {entry_name}: done.", selection.action_label)));
            },
            SessionEvent::ActionFailed { entry_name, error } => {
                view.push(ViewItem::ActionFailure(format!("Nothing happened to {entry_name}: {error}")));
            },
            SessionEvent::GateUpdated => view.push(control_bar_item(session)),
            SessionEvent::Exits(text) => view.push(ViewItem::ExitsText(text.clone())),
            SessionEvent::ExitsFailed(err) => {
                view.push(ViewItem::Error(format!("Couldn't see the way onward: {err}")));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::location::Direction;
    use crate::panel::PanelPreset;
    use crate::view::Section;

    #[test]
    fn unknown_command_dispatches_nothing() {
        let mut session = Session::new();
        let mut view = View::new();
        let mut requests = Vec::new();
        let control = handle_command(Command::Unknown, &mut session, &mut view, &Spinners::new(), &mut requests);
        assert!(matches!(control, ReplControl::Continue));
        assert!(requests.is_empty());
        assert!(view.items[0].view_item.is_error());
    }

    #[test]
    fn reload_and_exits_always_dispatch() {
        let mut session = Session::new();
        let mut view = View::new();
        let mut requests = Vec::new();
        let spinners = Spinners::new();
        handle_command(Command::Reload, &mut session, &mut view, &spinners, &mut requests);
        handle_command(Command::Exits, &mut session, &mut view, &spinners, &mut requests);
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn gated_move_from_a_fresh_session_is_refused() {
        let mut session = Session::new();
        let mut view = View::new();
        let mut requests = Vec::new();
        handle_command(
            Command::Move(Direction::North),
            &mut session,
            &mut view,
            &Spinners::new(),
            &mut requests,
        );
        assert!(requests.is_empty());
    }

    #[test]
    fn failed_panel_load_reports_an_error_only() {
        let session = Session::new();
        let mut view = View::new();
        let events = [SessionEvent::PanelFailed {
            selection: PanelPreset::Combat.selection(),
            error: ApiError::HttpStatus {
                status: 500,
                path: "/enemies".into(),
            },
        }];
        report_events(&session, &mut view, &Spinners::new(), &events);
        let results: Vec<_> = view.section_items(Section::Results).collect();
        assert_eq!(results.len(), 1);
        let ViewItem::Error(msg) = results[0] else {
            panic!("expected an error");
        };
        assert!(msg.contains("Combat") && msg.contains("500"));
    }
}
