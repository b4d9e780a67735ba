//! Location session controller.
//!
//! Owns the current [`LocationEntry`], the movement state machine, and the active
//! panel preset. Network work is split into `begin_*` (capture a ticket, flip state)
//! and `finish_*` (apply a settled response if its ticket is still current), so the
//! caller decides how requests are scheduled.

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, info, warn};
use wayfarer_data::{GatePayload, LocationEntry, LocationResponse, MoveResponse};

use crate::api::ApiError;
use crate::panel::{PanelPreset, PanelSelection};

/// The four compass moves the server understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    /// Wire token, also the gate key for this direction.
    pub fn token(self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::South => "s",
            Direction::East => "e",
            Direction::West => "w",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    /// Accepts the single-letter token or the full name, case-insensitively.
    pub fn parse(input: &str) -> Option<Direction> {
        match input.to_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "s" | "south" => Some(Direction::South),
            "e" | "east" => Some(Direction::East),
            "w" | "west" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MovementState {
    #[default]
    Idle,
    Moving,
}

/// Tag for a location fetch: the refresh token current at dispatch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LocationTicket {
    token: u64,
}

/// Tag for a move: which move this is and where it was headed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveTicket {
    seq: u64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A new entry replaced the old one. Carries any gate update the response held.
    Updated { gate: Option<GatePayload> },
    /// The fetch failed; the previous entry (if any) is still displayed.
    Failed(ApiError),
    /// A newer refresh superseded this fetch.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The server accepted the move; the location must be fetched again with `refetch`.
    Arrived {
        direction: Direction,
        refetch: LocationTicket,
        gate: Option<GatePayload>,
    },
    /// The server answered with something other than `"OK"`.
    Rejected {
        direction: Direction,
        result: Option<String>,
        gate: Option<GatePayload>,
    },
    Failed { direction: Direction, error: ApiError },
    /// No move with this ticket was pending.
    Unpaired,
}

/// Errors raised when a move cannot even be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("already moving {0}")]
    InFlight(Direction),
}

#[derive(Debug, Clone, Default)]
pub struct LocationController {
    entry: Option<LocationEntry>,
    movement: MovementState,
    refresh_token: u64,
    loading: bool,
    error: Option<ApiError>,
    selection: PanelPreset,
    move_seq: u64,
    pending_move: Option<MoveTicket>,
    visited: BTreeSet<String>,
    first_visit: bool,
    moves_completed: usize,
}

impl LocationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self) -> Option<&LocationEntry> {
        self.entry.as_ref()
    }

    pub fn movement(&self) -> MovementState {
        self.movement
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn preset(&self) -> PanelPreset {
        self.selection
    }

    pub fn selection(&self) -> PanelSelection {
        self.selection.selection()
    }

    /// Direction of the move currently awaiting the server, if any.
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_move.map(|ticket| ticket.direction)
    }

    /// Names of every location successfully fetched this session.
    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    /// Whether the entry on display was seen for the first time by the latest fetch.
    pub fn is_first_visit(&self) -> bool {
        self.first_visit
    }

    pub fn moves_completed(&self) -> usize {
        self.moves_completed
    }

    /// Start a fetch of `/location` tagged with the current refresh token.
    pub fn begin_fetch(&mut self) -> LocationTicket {
        self.loading = true;
        LocationTicket {
            token: self.refresh_token,
        }
    }

    /// Supersede any fetch already in flight and start a new one.
    pub fn refresh(&mut self) -> LocationTicket {
        self.refresh_token += 1;
        self.begin_fetch()
    }

    /// Apply a settled location fetch. Leaves movement state alone in every case.
    pub fn finish_fetch(&mut self, ticket: LocationTicket, result: Result<LocationResponse, ApiError>) -> FetchOutcome {
        if ticket.token != self.refresh_token {
            debug!(
                "discarding location response for refresh {} (current is {})",
                ticket.token, self.refresh_token
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(response) => {
                info!("arrived at location '{}'", response.entry.name);
                self.first_visit = self.visited.insert(response.entry.name.clone());
                self.entry = Some(response.entry);
                self.error = None;
                FetchOutcome::Updated {
                    gate: response.allowed_buttons,
                }
            },
            Err(error) => {
                warn!("location fetch failed: {error}");
                self.error = Some(error.clone());
                FetchOutcome::Failed(error)
            },
        }
    }

    /// Flip to `Moving` and hand back the ticket for the `/move` post.
    ///
    /// The gate is not consulted here; callers only reach this through enabled controls
    /// and the server has the final word on legality.
    ///
    /// # Errors
    /// - `MoveError::InFlight` if a previous move has not settled yet.
    pub fn begin_move(&mut self, direction: Direction) -> Result<MoveTicket, MoveError> {
        if let Some(pending) = self.pending_move {
            return Err(MoveError::InFlight(pending.direction));
        }
        self.move_seq += 1;
        let ticket = MoveTicket {
            seq: self.move_seq,
            direction,
        };
        self.pending_move = Some(ticket);
        self.movement = MovementState::Moving;
        info!("moving {direction} (move #{})", ticket.seq);
        Ok(ticket)
    }

    /// Settle a move. Movement returns to `Idle` whatever the outcome.
    pub fn finish_move(&mut self, ticket: MoveTicket, result: Result<MoveResponse, ApiError>) -> MoveOutcome {
        if self.pending_move != Some(ticket) {
            warn!("settlement for move #{} arrived with no matching move pending", ticket.seq);
            return MoveOutcome::Unpaired;
        }
        self.pending_move = None;
        self.movement = MovementState::Idle;

        let direction = ticket.direction;
        match result {
            Ok(response) if response.is_ok() => {
                self.moves_completed += 1;
                MoveOutcome::Arrived {
                    direction,
                    refetch: self.refresh(),
                    gate: response.allowed_buttons,
                }
            },
            Ok(response) => {
                warn!("move {direction} refused by server: {:?}", response.result);
                MoveOutcome::Rejected {
                    direction,
                    result: response.result,
                    gate: response.allowed_buttons,
                }
            },
            Err(error) => {
                warn!("error moving {direction}: {error}");
                MoveOutcome::Failed { direction, error }
            },
        }
    }

    /// Swap to another panel preset. Returns the new selection only if it changed.
    pub fn select_panel(&mut self, preset: PanelPreset) -> Option<PanelSelection> {
        if self.selection == preset {
            return None;
        }
        info!("panel selection: {:?} -> {preset:?}", self.selection);
        self.selection = preset;
        Some(preset.selection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_data::{ImageData, MoveResponse};

    fn crypt() -> LocationResponse {
        LocationResponse {
            entry: LocationEntry {
                name: "Dusty Crypt".into(),
                description: "Bones, mostly.".into(),
                image: ImageData::new("AAAA"),
            },
            allowed_buttons: None,
        }
    }

    fn move_result(result: &str) -> MoveResponse {
        MoveResponse {
            result: Some(result.into()),
            allowed_buttons: None,
        }
    }

    #[test]
    fn direction_parses_tokens_and_names() {
        assert_eq!(Direction::parse("n"), Some(Direction::North));
        assert_eq!(Direction::parse("West"), Some(Direction::West));
        assert_eq!(Direction::parse("up"), None);
        assert_eq!(Direction::South.token(), "s");
    }

    #[test]
    fn fresh_controller_is_idle_and_empty() {
        let controller = LocationController::new();
        assert_eq!(controller.movement(), MovementState::Idle);
        assert!(controller.entry().is_none());
        assert_eq!(controller.preset(), PanelPreset::LocalItems);
    }

    #[test]
    fn fetch_populates_entry() {
        let mut controller = LocationController::new();
        let ticket = controller.begin_fetch();
        assert!(controller.is_loading());
        let outcome = controller.finish_fetch(ticket, Ok(crypt()));
        assert_eq!(outcome, FetchOutcome::Updated { gate: None });
        assert_eq!(controller.entry().unwrap().name, "Dusty Crypt");
        assert!(!controller.is_loading());
        assert_eq!(controller.movement(), MovementState::Idle);
        assert!(controller.is_first_visit());

        let ticket = controller.refresh();
        controller.finish_fetch(ticket, Ok(crypt()));
        assert!(!controller.is_first_visit());
    }

    #[test]
    fn failed_fetch_keeps_previous_entry() {
        let mut controller = LocationController::new();
        let ticket = controller.begin_fetch();
        controller.finish_fetch(ticket, Ok(crypt()));

        let ticket = controller.begin_fetch();
        let outcome = controller.finish_fetch(ticket, Err(ApiError::Transport("refused".into())));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(controller.entry().unwrap().name, "Dusty Crypt");
        assert!(controller.error().is_some());
    }

    #[test]
    fn failed_fetch_does_not_touch_movement() {
        let mut controller = LocationController::new();
        let fetch = controller.begin_fetch();
        let _move = controller.begin_move(Direction::North).unwrap();
        controller.finish_fetch(fetch, Err(ApiError::Transport("down".into())));
        assert_eq!(controller.movement(), MovementState::Moving);
    }

    #[test]
    fn accepted_move_returns_to_idle_and_requests_refetch() {
        let mut controller = LocationController::new();
        let ticket = controller.begin_move(Direction::North).unwrap();
        assert_eq!(controller.movement(), MovementState::Moving);

        let outcome = controller.finish_move(ticket, Ok(move_result("OK")));
        assert_eq!(controller.movement(), MovementState::Idle);
        let MoveOutcome::Arrived { refetch, .. } = outcome else {
            panic!("expected arrival, got {outcome:?}");
        };
        assert_eq!(controller.moves_completed(), 1);

        let applied = controller.finish_fetch(refetch, Ok(crypt()));
        assert!(matches!(applied, FetchOutcome::Updated { .. }));
    }

    #[test]
    fn rejected_and_failed_moves_return_to_idle() {
        let mut controller = LocationController::new();
        let ticket = controller.begin_move(Direction::North).unwrap();
        let outcome = controller.finish_move(ticket, Ok(move_result("FAIL")));
        assert!(matches!(outcome, MoveOutcome::Rejected { ref result, .. } if result.as_deref() == Some("FAIL")));
        assert_eq!(controller.movement(), MovementState::Idle);

        let ticket = controller.begin_move(Direction::East).unwrap();
        let outcome = controller.finish_move(ticket, Err(ApiError::Transport("reset".into())));
        assert!(matches!(outcome, MoveOutcome::Failed { .. }));
        assert_eq!(controller.movement(), MovementState::Idle);
        assert_eq!(controller.moves_completed(), 0);
    }

    #[test]
    fn second_move_while_moving_is_refused() {
        let mut controller = LocationController::new();
        let first = controller.begin_move(Direction::North).unwrap();
        assert_eq!(controller.begin_move(Direction::South), Err(MoveError::InFlight(Direction::North)));
        controller.finish_move(first, Ok(move_result("OK")));
        assert!(controller.begin_move(Direction::South).is_ok());
    }

    #[test]
    fn fetch_dispatched_before_a_move_is_stale_after_it() {
        let mut controller = LocationController::new();
        let old_fetch = controller.begin_fetch();
        let mv = controller.begin_move(Direction::West).unwrap();
        let MoveOutcome::Arrived { refetch, .. } = controller.finish_move(mv, Ok(move_result("OK"))) else {
            panic!("move should arrive");
        };
        controller.finish_fetch(refetch, Ok(crypt()));

        let mut old = crypt();
        old.entry.name = "Previous Room".into();
        assert_eq!(controller.finish_fetch(old_fetch, Ok(old)), FetchOutcome::Stale);
        assert_eq!(controller.entry().unwrap().name, "Dusty Crypt");
    }

    #[test]
    fn refresh_supersedes_earlier_fetch() {
        let mut controller = LocationController::new();
        let first = controller.begin_fetch();
        let second = controller.refresh();
        assert_eq!(controller.finish_fetch(first, Ok(crypt())), FetchOutcome::Stale);
        assert!(controller.is_loading());
        assert!(matches!(controller.finish_fetch(second, Ok(crypt())), FetchOutcome::Updated { .. }));
    }

    #[test]
    fn duplicate_settlement_is_unpaired() {
        let mut controller = LocationController::new();
        let ticket = controller.begin_move(Direction::North).unwrap();
        controller.finish_move(ticket, Ok(move_result("FAIL")));
        assert_eq!(controller.finish_move(ticket, Ok(move_result("OK"))), MoveOutcome::Unpaired);
        assert_eq!(controller.movement(), MovementState::Idle);
    }

    #[test]
    fn selecting_the_same_preset_is_a_no_op() {
        let mut controller = LocationController::new();
        assert!(controller.select_panel(PanelPreset::LocalItems).is_none());
        let selection = controller.select_panel(PanelPreset::Inventory).unwrap();
        assert_eq!(selection.list_endpoint, "/inventory");
        assert_eq!(selection.action_endpoint, "/drop");
    }
}
