//! Request dispatch.
//!
//! Controllers hand out tickets; this module turns a ticketed [`Request`] into a
//! network call and pairs the result back up with its ticket as a [`Settlement`].
//! Nothing here touches session state; `Session::settle` does that.

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use log::debug;
use wayfarer_data::{ActionResponse, CollectionEntry, LocationResponse, MoveResponse};

use crate::api::{ApiError, GameApi};
use crate::location::{LocationTicket, MoveTicket};
use crate::panel::{ActTicket, LoadTicket};
use crate::session::{Session, SessionEvent};

/// One network operation waiting to be performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Monotonic per session; later dispatches always carry larger ids.
    pub id: u64,
    pub kind: RequestKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    FetchLocation(LocationTicket),
    Move(MoveTicket),
    LoadPanel(LoadTicket),
    Act(ActTicket),
    Exits,
}

impl RequestKind {
    /// Method and path, for logging.
    pub fn describe(&self) -> String {
        match self {
            RequestKind::FetchLocation(_) => format!("GET {}", crate::api::LOCATION_PATH),
            RequestKind::Move(ticket) => format!("POST {} ({})", crate::api::MOVE_PATH, ticket.direction.token()),
            RequestKind::LoadPanel(ticket) => format!("GET {}", ticket.selection.list_endpoint),
            RequestKind::Act(ticket) => {
                format!("POST {} ({})", ticket.selection.action_endpoint, ticket.entry_name)
            },
            RequestKind::Exits => format!("GET {}", crate::api::EXITS_PATH),
        }
    }
}

/// A performed request: the ticket it was dispatched with and what the server said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Location {
        id: u64,
        ticket: LocationTicket,
        result: Result<LocationResponse, ApiError>,
    },
    Move {
        id: u64,
        ticket: MoveTicket,
        result: Result<MoveResponse, ApiError>,
    },
    Panel {
        id: u64,
        ticket: LoadTicket,
        result: Result<Vec<CollectionEntry>, ApiError>,
    },
    Act {
        id: u64,
        ticket: ActTicket,
        result: Result<ActionResponse, ApiError>,
    },
    Exits {
        id: u64,
        result: Result<String, ApiError>,
    },
}

/// Perform one request against `api`.
///
/// Takes the handle by value so the returned future owns everything it needs.
pub async fn perform<A: GameApi>(api: A, request: Request) -> Settlement {
    debug!("dispatch #{}: {}", request.id, request.kind.describe());
    let id = request.id;
    match request.kind {
        RequestKind::FetchLocation(ticket) => Settlement::Location {
            id,
            ticket,
            result: api.location().await,
        },
        RequestKind::Move(ticket) => Settlement::Move {
            id,
            ticket,
            result: api.move_player(ticket.direction).await,
        },
        RequestKind::LoadPanel(ticket) => Settlement::Panel {
            id,
            ticket,
            result: api.list(ticket.selection.list_endpoint).await,
        },
        RequestKind::Act(ticket) => {
            let result = api.act(ticket.selection.action_endpoint, ticket.entry_name.clone()).await;
            Settlement::Act { id, ticket, result }
        },
        RequestKind::Exits => Settlement::Exits {
            id,
            result: api.exits().await,
        },
    }
}

/// Run `requests` concurrently on the current task until nothing is left in flight.
///
/// Settlements are applied in completion order and any follow-ups they produce are
/// dispatched into the same set. Returns every event raised along the way.
pub async fn drive<A: GameApi>(session: &mut Session, api: &A, requests: Vec<Request>) -> Vec<SessionEvent> {
    let mut in_flight = FuturesUnordered::new();
    for request in requests {
        in_flight.push(perform(api.clone(), request));
    }

    let mut events = Vec::new();
    while let Some(settlement) = in_flight.next().await {
        let settled = session.settle(settlement);
        events.extend(settled.events);
        for followup in settled.followups {
            in_flight.push(perform(api.clone(), followup));
        }
    }
    events
}
