//! Collection panel controller.
//!
//! The secondary view: one remote collection (local items, inventory or enemies)
//! plus the single action each of its entries offers. Every load replaces the
//! whole list; responses for a load that has since been superseded are dropped.

use log::{debug, info, warn};
use wayfarer_data::{ActionResponse, CollectionEntry, GatePayload};

use crate::api::ApiError;
use crate::gate;

/// The fixed set of panel configurations.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum PanelPreset {
    Combat,
    #[default]
    LocalItems,
    Inventory,
}

impl PanelPreset {
    pub const ALL: [PanelPreset; 3] = [PanelPreset::Combat, PanelPreset::LocalItems, PanelPreset::Inventory];

    /// The endpoint/action triple for this preset. Presets are the only source of selections.
    pub fn selection(self) -> PanelSelection {
        match self {
            PanelPreset::Combat => PanelSelection {
                preset: self,
                list_endpoint: "/enemies",
                action_endpoint: "/attack",
                action_label: "Attack",
            },
            PanelPreset::LocalItems => PanelSelection {
                preset: self,
                list_endpoint: "/location/items",
                action_endpoint: "/take",
                action_label: "Take",
            },
            PanelPreset::Inventory => PanelSelection {
                preset: self,
                list_endpoint: "/inventory",
                action_endpoint: "/drop",
                action_label: "Drop",
            },
        }
    }

    /// Gate key that enables this panel's tab and its per-entry action.
    pub fn gate_key(self) -> &'static str {
        match self {
            PanelPreset::Combat => gate::COMBAT,
            PanelPreset::LocalItems => gate::LOCAL_ITEMS,
            PanelPreset::Inventory => gate::INVENTORY,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PanelPreset::Combat => "Combat",
            PanelPreset::LocalItems => "Local Items",
            PanelPreset::Inventory => "Inventory",
        }
    }
}

/// Which collection is shown and what its entries do.
///
/// Only constructed by [`PanelPreset::selection`], so the three endpoints always agree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PanelSelection {
    pub preset: PanelPreset,
    pub list_endpoint: &'static str,
    pub action_endpoint: &'static str,
    pub action_label: &'static str,
}

impl PanelSelection {
    /// Lowercase verb for the per-entry action ("take", "drop", "attack").
    pub fn verb(&self) -> String {
        self.action_label.to_lowercase()
    }
}

/// Tag for a list fetch: the load generation and selection at dispatch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub selection: PanelSelection,
}

/// Tag for an action post: the selection it was issued from and the entry it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActTicket {
    pub selection: PanelSelection,
    pub entry_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Failed(ApiError),
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActOutcome {
    /// The post succeeded. The parent applies `gate` (if any) and dispatches `reload`.
    Applied {
        entry_name: String,
        selection: PanelSelection,
        gate: Option<GatePayload>,
        reload: LoadTicket,
    },
    /// The post failed; nothing is reloaded or retried.
    Failed { entry_name: String, error: ApiError },
}

#[derive(Debug, Clone)]
pub struct CollectionPanel {
    selection: PanelSelection,
    entries: Vec<CollectionEntry>,
    generation: u64,
    loading: bool,
    error: Option<ApiError>,
    actions_applied: usize,
}

impl Default for CollectionPanel {
    fn default() -> Self {
        Self::new(PanelPreset::default().selection())
    }
}

impl CollectionPanel {
    pub fn new(selection: PanelSelection) -> Self {
        Self {
            selection,
            entries: Vec::new(),
            generation: 0,
            loading: false,
            error: None,
            actions_applied: 0,
        }
    }

    pub fn selection(&self) -> PanelSelection {
        self.selection
    }

    /// The displayed entries. Iterating again restarts from the first entry.
    pub fn entries(&self) -> std::slice::Iter<'_, CollectionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn actions_applied(&self) -> usize {
        self.actions_applied
    }

    /// Find a displayed entry whose name contains `pattern`, ignoring case. Exact matches win.
    pub fn find(&self, pattern: &str) -> Option<&CollectionEntry> {
        let lc_pattern = pattern.trim().to_lowercase();
        if lc_pattern.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.name.to_lowercase() == lc_pattern)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| entry.name.to_lowercase().contains(&lc_pattern))
            })
    }

    /// Point the panel at `selection` and start fetching it.
    ///
    /// A different collection starts out empty; its predecessor's entries are never shown under it.
    pub fn load(&mut self, selection: PanelSelection) -> LoadTicket {
        if selection != self.selection {
            self.entries.clear();
            self.error = None;
            self.selection = selection;
        }
        self.reload()
    }

    /// Fetch the current selection again. Any earlier load still in flight becomes stale.
    pub fn reload(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        debug!(
            "loading {} (generation {})",
            self.selection.list_endpoint, self.generation
        );
        LoadTicket {
            generation: self.generation,
            selection: self.selection,
        }
    }

    /// Apply a settled list fetch. On failure the previous list stays on display.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<CollectionEntry>, ApiError>) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                "discarding stale {} response (generation {}, current {})",
                ticket.selection.list_endpoint, ticket.generation, self.generation
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(entries) => {
                info!("{} returned {} entries", ticket.selection.list_endpoint, entries.len());
                self.entries = entries;
                self.error = None;
                LoadOutcome::Loaded {
                    count: self.entries.len(),
                }
            },
            Err(error) => {
                warn!("failed to load {}: {error}", ticket.selection.list_endpoint);
                self.error = Some(error.clone());
                LoadOutcome::Failed(error)
            },
        }
    }

    /// Ticket for posting `entry` to the current selection's action endpoint.
    pub fn act(&self, entry: &CollectionEntry) -> ActTicket {
        info!(
            "{} '{}' via {}",
            self.selection.verb(),
            entry.name,
            self.selection.action_endpoint
        );
        ActTicket {
            selection: self.selection,
            entry_name: entry.name.clone(),
        }
    }

    /// Apply a settled action post. Success always schedules a reload, with or without a gate payload.
    pub fn finish_act(&mut self, ticket: ActTicket, result: Result<ActionResponse, ApiError>) -> ActOutcome {
        match result {
            Ok(response) => {
                self.actions_applied += 1;
                ActOutcome::Applied {
                    entry_name: ticket.entry_name,
                    selection: ticket.selection,
                    gate: response.allowed_buttons,
                    reload: self.reload(),
                }
            },
            Err(error) => {
                warn!(
                    "{} '{}' failed: {error}",
                    ticket.selection.verb(),
                    ticket.entry_name
                );
                self.error = Some(error.clone());
                ActOutcome::Failed {
                    entry_name: ticket.entry_name,
                    error,
                }
            },
        }
    }
}
