//! ViewItem module
//!
//! A `ViewItem` is an enum variant sent to the `View`, which aggregates them, styles them,
//! organizes them, and displays them once the pending work has settled. Variants contain
//! different payloads, depending on the type of information that needs to be displayed.

use variantly::Variantly;

use crate::location::Direction;
use crate::panel::PanelPreset;
use crate::view::{DirectionLine, EntryLine, HelpLine, Section, TabLine};

/// `ViewItems` are each of the various types of information / messages that may be displayed to the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum ViewItem {
    ActionFailure(String),
    ActionSuccess(String),
    Backstory(String),
    ControlBar {
        directions: Vec<DirectionLine>,
        tabs: Vec<TabLine>,
        moving: Option<Direction>,
    },
    EngineMessage(String),
    EntryDetail {
        name: String,
        description: String,
        item_type: String,
        image_bytes: usize,
    },
    Error(String),
    ExitsText(String),
    Help(Vec<HelpLine>),
    LocationDescription {
        name: String,
        description: String,
        image_bytes: usize,
        first_visit: bool,
    },
    PanelEntries {
        preset: PanelPreset,
        action_label: &'static str,
        actions_enabled: bool,
        entries: Vec<EntryLine>,
        empty_note: String,
    },
    QuitSummary {
        farewell: String,
        moves: usize,
        actions: usize,
        locations_seen: usize,
    },
    StatusReport {
        location: Option<String>,
        moving: Option<Direction>,
        panel: PanelPreset,
        panel_loading: bool,
        permitted: Vec<String>,
    },
    TransitionMessage(String),
}

impl ViewItem {
    /// Classify a view item into a top-level output section.
    pub fn section(&self) -> Section {
        match self {
            ViewItem::TransitionMessage(_) => Section::Transition,
            ViewItem::Backstory(_) | ViewItem::LocationDescription { .. } | ViewItem::ControlBar { .. } => {
                Section::Scene
            },
            ViewItem::PanelEntries { .. }
            | ViewItem::EntryDetail { .. }
            | ViewItem::ExitsText(_)
            | ViewItem::ActionSuccess(_)
            | ViewItem::ActionFailure(_)
            | ViewItem::Error(_) => Section::Results,
            ViewItem::Help(_)
            | ViewItem::StatusReport { .. }
            | ViewItem::EngineMessage(_)
            | ViewItem::QuitSummary { .. } => Section::Game,
        }
    }
}
