//! The session: one owned home for the location controller, the collection panel
//! and the action gate.
//!
//! Front ends never mutate the controllers directly. They call a `Session` operation,
//! receive [`Request`]s to perform, and feed the resulting [`Settlement`]s back through
//! [`Session::settle`], which applies them and reports what changed.

use log::{debug, info};
use thiserror::Error;
use wayfarer_data::GatePayload;

use crate::api::ApiError;
use crate::dispatch::{Request, RequestKind, Settlement};
use crate::gate::ActionGate;
use crate::location::{Direction, FetchOutcome, LocationController, MoveError, MoveOutcome, MovementState};
use crate::panel::{ActOutcome, CollectionPanel, LoadOutcome, PanelPreset, PanelSelection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("still waiting to finish moving {0}")]
    MoveInFlight(Direction),
    #[error("there's no '{pattern}' in {panel}")]
    NoSuchEntry { pattern: String, panel: &'static str },
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::InFlight(direction) => SessionError::MoveInFlight(direction),
        }
    }
}

/// Something the front end may want to show after a settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LocationUpdated,
    LocationFailed(ApiError),
    /// The server accepted a move; the new location is being fetched.
    Moved(Direction),
    MoveRejected {
        direction: Direction,
        result: Option<String>,
    },
    MoveFailed {
        direction: Direction,
        error: ApiError,
    },
    PanelLoaded {
        selection: PanelSelection,
        count: usize,
    },
    PanelFailed {
        selection: PanelSelection,
        error: ApiError,
    },
    ActionApplied {
        selection: PanelSelection,
        entry_name: String,
    },
    ActionFailed {
        entry_name: String,
        error: ApiError,
    },
    GateUpdated,
    Exits(String),
    ExitsFailed(ApiError),
}

/// Result of applying one settlement.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settled {
    pub events: Vec<SessionEvent>,
    /// Requests the settlement made necessary (re-fetch after a move, reload after an action).
    pub followups: Vec<Request>,
}

/// Which controls are currently usable. Anything disabled here must not be dispatched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Controls {
    directions: [bool; 4],
    panels: [bool; 3],
    entry_actions: bool,
}

impl Controls {
    /// A direction is usable when the gate allows it and no move is in flight.
    pub fn direction(&self, direction: Direction) -> bool {
        self.directions[direction as usize]
    }

    pub fn panel(&self, preset: PanelPreset) -> bool {
        self.panels[preset as usize]
    }

    /// Whether the active panel's per-entry action may be used.
    pub fn entry_actions(&self) -> bool {
        self.entry_actions
    }

    pub fn enabled_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|dir| self.direction(*dir))
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub moves: usize,
    pub actions: usize,
    pub locations_seen: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    location: LocationController,
    panel: CollectionPanel,
    gate: ActionGate,
    next_dispatch: u64,
    gate_applied: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &LocationController {
        &self.location
    }

    pub fn panel(&self) -> &CollectionPanel {
        &self.panel
    }

    pub fn gate(&self) -> &ActionGate {
        &self.gate
    }

    pub fn controls(&self) -> Controls {
        let idle = self.location.movement() == MovementState::Idle;
        Controls {
            directions: Direction::ALL.map(|dir| idle && self.gate.permits(dir.token())),
            panels: PanelPreset::ALL.map(|preset| self.gate.permits(preset.gate_key())),
            entry_actions: self.gate.permits(self.location.preset().gate_key()),
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            moves: self.location.moves_completed(),
            actions: self.panel.actions_applied(),
            locations_seen: self.location.visited().count(),
        }
    }

    fn dispatch(&mut self, kind: RequestKind) -> Request {
        self.next_dispatch += 1;
        info!("request #{}: {}", self.next_dispatch, kind.describe());
        Request {
            id: self.next_dispatch,
            kind,
        }
    }

    /// First fetch of the location and of the default panel.
    ///
    /// The panel load is not gated; the gate is empty until the server says otherwise.
    pub fn start(&mut self) -> Vec<Request> {
        let location = self.location.refresh();
        let panel = self.panel.load(self.location.selection());
        vec![
            self.dispatch(RequestKind::FetchLocation(location)),
            self.dispatch(RequestKind::LoadPanel(panel)),
        ]
    }

    /// Fetch the current location again, superseding any fetch still in flight.
    pub fn refresh_location(&mut self) -> Request {
        let ticket = self.location.refresh();
        self.dispatch(RequestKind::FetchLocation(ticket))
    }

    /// Post a move. Callers are expected to have checked [`Controls::direction`].
    ///
    /// # Errors
    /// - `SessionError::MoveInFlight` if an earlier move has not settled.
    pub fn request_move(&mut self, direction: Direction) -> Result<Request, SessionError> {
        let ticket = self.location.begin_move(direction)?;
        Ok(self.dispatch(RequestKind::Move(ticket)))
    }

    /// Switch the panel to `preset`. Returns the reload request, or `None` if it was already showing.
    pub fn select_panel(&mut self, preset: PanelPreset) -> Option<Request> {
        let selection = self.location.select_panel(preset)?;
        let ticket = self.panel.load(selection);
        Some(self.dispatch(RequestKind::LoadPanel(ticket)))
    }

    pub fn reload_panel(&mut self) -> Request {
        let ticket = self.panel.reload();
        self.dispatch(RequestKind::LoadPanel(ticket))
    }

    /// Apply the active panel's action to the displayed entry matching `pattern`.
    ///
    /// # Errors
    /// - `SessionError::NoSuchEntry` if no displayed entry matches.
    pub fn request_action(&mut self, pattern: &str) -> Result<Request, SessionError> {
        let Some(entry) = self.panel.find(pattern) else {
            return Err(SessionError::NoSuchEntry {
                pattern: pattern.to_string(),
                panel: self.panel.selection().preset.label(),
            });
        };
        let ticket = self.panel.act(entry);
        Ok(self.dispatch(RequestKind::Act(ticket)))
    }

    pub fn request_exits(&mut self) -> Request {
        self.dispatch(RequestKind::Exits)
    }

    /// Apply a settled request and report what changed.
    pub fn settle(&mut self, settlement: Settlement) -> Settled {
        let mut settled = Settled::default();
        match settlement {
            Settlement::Location { id, ticket, result } => match self.location.finish_fetch(ticket, result) {
                FetchOutcome::Updated { gate } => {
                    settled.events.push(SessionEvent::LocationUpdated);
                    self.apply_gate(id, gate, &mut settled.events);
                },
                FetchOutcome::Failed(error) => settled.events.push(SessionEvent::LocationFailed(error)),
                FetchOutcome::Stale => {},
            },
            Settlement::Move { id, ticket, result } => match self.location.finish_move(ticket, result) {
                MoveOutcome::Arrived {
                    direction,
                    refetch,
                    gate,
                } => {
                    settled.events.push(SessionEvent::Moved(direction));
                    self.apply_gate(id, gate, &mut settled.events);
                    settled
                        .followups
                        .push(self.dispatch(RequestKind::FetchLocation(refetch)));
                    // the open collection belongs to the old location
                    let reload = self.panel.reload();
                    settled.followups.push(self.dispatch(RequestKind::LoadPanel(reload)));
                },
                MoveOutcome::Rejected {
                    direction,
                    result,
                    gate,
                } => {
                    settled.events.push(SessionEvent::MoveRejected { direction, result });
                    self.apply_gate(id, gate, &mut settled.events);
                },
                MoveOutcome::Failed { direction, error } => {
                    settled.events.push(SessionEvent::MoveFailed { direction, error });
                },
                MoveOutcome::Unpaired => {},
            },
            Settlement::Panel { ticket, result, .. } => {
                let selection = ticket.selection;
                match self.panel.finish_load(ticket, result) {
                    LoadOutcome::Loaded { count } => {
                        settled.events.push(SessionEvent::PanelLoaded { selection, count });
                    },
                    LoadOutcome::Failed(error) => {
                        settled.events.push(SessionEvent::PanelFailed { selection, error });
                    },
                    LoadOutcome::Stale => {},
                }
            },
            Settlement::Act { id, ticket, result } => match self.panel.finish_act(ticket, result) {
                ActOutcome::Applied {
                    entry_name,
                    selection,
                    gate,
                    reload,
                } => {
                    settled
                        .events
                        .push(SessionEvent::ActionApplied { selection, entry_name });
                    self.apply_gate(id, gate, &mut settled.events);
                    settled.followups.push(self.dispatch(RequestKind::LoadPanel(reload)));
                },
                ActOutcome::Failed { entry_name, error } => {
                    settled.events.push(SessionEvent::ActionFailed { entry_name, error });
                },
            },
            Settlement::Exits { result, .. } => settled.events.push(match result {
                Ok(text) => SessionEvent::Exits(text),
                Err(error) => SessionEvent::ExitsFailed(error),
            }),
        }
        settled
    }

    /// Merge a gate payload unless a later request's payload has already been applied.
    fn apply_gate(&mut self, id: u64, payload: Option<GatePayload>, events: &mut Vec<SessionEvent>) {
        let Some(payload) = payload else {
            return;
        };
        if id <= self.gate_applied {
            debug!(
                "ignoring gate update from request #{id}; #{} already applied",
                self.gate_applied
            );
            return;
        }
        self.gate_applied = id;
        self.gate.merge(payload);
        events.push(SessionEvent::GateUpdated);
    }
}
