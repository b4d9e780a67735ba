//! View module.
//! This contains the view of the session: the current location, the collection panel, and messages.
//! Rather than printing to the console from each handler, we aggregate what needs showing
//! as requests settle and display it in one organised pass.

mod icons;
mod render_location;
mod render_panel;
mod render_system;
mod view_item;

use textwrap::termwidth;

use crate::location::Direction;
use crate::panel::PanelPreset;
use crate::style::GameStyle;

pub use view_item::ViewItem;

/// View aggregates information to be displayed on each pass through the REPL and then organizes
/// and displays the result.
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub items: Vec<ViewEntry>,
    pub sequence: usize,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            width: termwidth(),
            items: Vec::new(),
            sequence: 0,
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(ViewEntry {
            section: item.section(),
            view_item: item,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries for one section, in the order they were pushed.
    pub fn section_items(&self, section: Section) -> impl Iterator<Item = &ViewItem> {
        self.items
            .iter()
            .filter(move |entry| entry.section == section)
            .map(|entry| &entry.view_item)
    }

    /// Compose and display everything collected since the last flush.
    pub fn flush(&mut self) {
        if self.items.is_empty() {
            return;
        }
        // re-check terminal width in case it's been resized
        self.width = termwidth();

        // Section Zero: travel / loading messages
        render_location::transitions(self);

        if self.has_section(Section::Scene) {
            println!("{:.>width$}\n", "scene".section_style(), width = self.width);
            render_location::backstory(self);
            render_location::location_description(self);
            render_location::control_bar(self);
        }
        if self.has_section(Section::Results) {
            println!("{:.>width$}\n", "results".section_style(), width = self.width);
            render_panel::panel_entries(self);
            render_panel::entry_detail(self);
            render_location::exits_text(self);
            render_panel::action_success(self);
            render_panel::action_failure(self);
            render_panel::errors(self);
        }
        if self.has_section(Section::Game) {
            println!("{:.>width$}\n", "game".section_style(), width = self.width);
            render_system::show_help(self);
            render_system::status_report(self);
            render_system::engine_message(self);
            render_system::quit_summary(self);
        }

        // clear the buffer for the next pass
        self.items.clear();
        println!();
    }

    fn has_section(&self, section: Section) -> bool {
        self.items.iter().any(|entry| entry.section == section)
    }
}

/// Subsections of the output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    /// Movement and loading lines shown before anything else.
    Transition,
    /// Backstory, location description and the control bar.
    Scene,
    /// Panel contents and direct results of the player's command.
    Results,
    /// Help, status, and other client feedback.
    Game,
}

/// Wrapper for a `ViewItem` recording its section and arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    pub section: Section,
    pub view_item: ViewItem,
    pub sequence: usize,
}

/// One direction button in the control bar.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DirectionLine {
    pub direction: Direction,
    pub enabled: bool,
}

/// One panel tab in the control bar.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TabLine {
    pub preset: PanelPreset,
    pub enabled: bool,
    pub active: bool,
}

/// One displayed collection entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine {
    pub name: String,
    pub item_type: String,
    pub image_bytes: usize,
}

/// A command and its one-line description for the help screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HelpLine {
    pub command: &'static str,
    pub description: &'static str,
}

/// "12.3 KB"-style size for an image summary.
#[allow(clippy::cast_precision_loss)]
pub fn image_size_label(bytes: usize) -> String {
    match bytes {
        0 => "no image".to_string(),
        b if b < 1024 => format!("{b} B image"),
        b => format!("{:.1} KB image", b as f64 / 1024.0),
    }
}
