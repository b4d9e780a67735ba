//! `repl::system` module
//!
//! Handlers for commands about the client itself rather than the game world.

use log::info;

use crate::repl::ReplControl;
use crate::session::Session;
use crate::spinners::{SpinnerType, Spinners};
use crate::view::{HelpLine, View, ViewItem};

const HELP: &[HelpLine] = &[
    HelpLine {
        command: "n / s / e / w",
        description: "move (also `go north`, `move west`)",
    },
    HelpLine {
        command: "items | inventory | combat",
        description: "switch the panel to local items, your inventory, or enemies",
    },
    HelpLine {
        command: "take / drop / attack <name>",
        description: "act on an entry in the matching panel",
    },
    HelpLine {
        command: "use <name>",
        description: "apply whatever the open panel offers",
    },
    HelpLine {
        command: "examine <name>",
        description: "show an entry's full description",
    },
    HelpLine {
        command: "reload",
        description: "fetch the open panel again",
    },
    HelpLine {
        command: "look",
        description: "show where you are again",
    },
    HelpLine {
        command: "exits",
        description: "ask what lies nearby",
    },
    HelpLine {
        command: "status",
        description: "show what the server currently permits",
    },
    HelpLine {
        command: "quit",
        description: "leave the game",
    },
];

pub fn help_handler(view: &mut View) {
    view.push(ViewItem::Help(HELP.to_vec()));
}

pub fn status_handler(session: &Session, view: &mut View) {
    view.push(ViewItem::StatusReport {
        location: session.location().entry().map(|entry| entry.name.clone()),
        moving: session.location().pending_direction(),
        panel: session.location().preset(),
        panel_loading: session.panel().is_loading(),
        permitted: session.gate().permitted().map(str::to_string).collect(),
    });
}

pub fn quit_handler(session: &Session, view: &mut View, spinners: &Spinners) -> ReplControl {
    let stats = session.stats();
    info!(
        "quitting after {} moves, {} actions, {} places",
        stats.moves, stats.actions, stats.locations_seen
    );
    view.push(ViewItem::QuitSummary {
        farewell: spinners.spin(SpinnerType::QuitMsg, "Farewell."),
        moves: stats.moves,
        actions: stats.actions,
        locations_seen: stats.locations_seen,
    });
    ReplControl::Quit
}
