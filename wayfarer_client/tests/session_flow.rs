//! End-to-end session behaviour against a scripted in-memory game server.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Notify;

use wayfarer_client::bootstrap::{Backstory, fetch_backstory};
use wayfarer_client::gate::{COMBAT, INVENTORY, LOCAL_ITEMS};
use wayfarer_client::{
    ApiError, Direction, GameApi, MovementState, PanelPreset, Session, SessionEvent, drive, perform,
};

enum Reply {
    Json(Value),
    Status(u16),
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<Reply>>,
    holds: HashMap<String, Arc<Notify>>,
    calls: Vec<String>,
}

impl Script {
    /// Queued replies are used in order; the last one keeps answering.
    fn next_reply(&mut self, path: &str) -> Option<Reply> {
        let queue = self.replies.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|reply| match reply {
                Reply::Json(value) => Reply::Json(value.clone()),
                Reply::Status(code) => Reply::Status(*code),
            })
        }
    }
}

/// A `GameApi` answering from a script and logging every call it receives.
#[derive(Clone, Default)]
struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    fn on(&self, path: &str, reply: Reply) -> &Self {
        self.script
            .lock()
            .unwrap()
            .replies
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    fn json(&self, path: &str, value: Value) -> &Self {
        self.on(path, Reply::Json(value))
    }

    /// The next call to `path` waits until the returned handle is notified.
    fn hold(&self, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.script
            .lock()
            .unwrap()
            .holds
            .insert(path.to_string(), Arc::clone(&notify));
        notify
    }

    fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    async fn respond<T: DeserializeOwned>(&self, call: String, path: &str) -> Result<T, ApiError> {
        let (reply, hold) = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(call);
            (script.next_reply(path), script.holds.remove(path))
        };
        if let Some(hold) = hold {
            hold.notified().await;
        }
        match reply {
            Some(Reply::Json(value)) => serde_json::from_value(value).map_err(|e| ApiError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            }),
            Some(Reply::Status(status)) => Err(ApiError::HttpStatus {
                status,
                path: path.to_string(),
            }),
            None => Err(ApiError::Transport(format!("nothing scripted for {path}"))),
        }
    }
}

impl GameApi for ScriptedApi {
    async fn backstory(&self) -> Result<String, ApiError> {
        self.respond("GET /".into(), "/").await
    }

    async fn location(&self) -> Result<wayfarer_data::LocationResponse, ApiError> {
        self.respond("GET /location".into(), "/location").await
    }

    async fn exits(&self) -> Result<String, ApiError> {
        self.respond("GET /location/exits".into(), "/location/exits").await
    }

    async fn move_player(&self, direction: Direction) -> Result<wayfarer_data::MoveResponse, ApiError> {
        self.respond(format!("POST /move {}", direction.token()), "/move").await
    }

    async fn list(&self, endpoint: &'static str) -> Result<Vec<wayfarer_data::CollectionEntry>, ApiError> {
        self.respond(format!("GET {endpoint}"), endpoint).await
    }

    async fn act(&self, endpoint: &'static str, entry_name: String) -> Result<wayfarer_data::ActionResponse, ApiError> {
        self.respond(format!("POST {endpoint} {entry_name}"), endpoint).await
    }
}

fn crypt() -> Value {
    json!({"name": "Dusty Crypt", "description": "Bones line the walls.", "image": "iVBORw0KGgo="})
}

fn item(name: &str) -> Value {
    json!({"name": name, "description": format!("A {name}."), "item_type": "tool", "image": null})
}

fn names(session: &Session) -> Vec<String> {
    session.panel().entries().map(|entry| entry.name.clone()).collect()
}

async fn started(api: &ScriptedApi) -> Session {
    let mut session = Session::new();
    let requests = session.start();
    drive(&mut session, api, requests).await;
    session
}

#[tokio::test]
async fn dusty_crypt_is_rendered_unchanged() {
    let api = ScriptedApi::default();
    api.json("/location", crypt()).json("/location/items", json!([]));

    let mut session = Session::new();
    assert_eq!(session.location().movement(), MovementState::Idle);
    let requests = session.start();
    let events = drive(&mut session, &api, requests).await;

    assert!(events.contains(&SessionEvent::LocationUpdated));
    let entry = session.location().entry().unwrap();
    assert_eq!(entry.name, "Dusty Crypt");
    assert_eq!(entry.description, "Bones line the walls.");
    assert_eq!(entry.image.as_str(), "iVBORw0KGgo=");
    assert_eq!(session.location().movement(), MovementState::Idle);
}

#[tokio::test]
async fn taking_an_item_replaces_the_gate_and_refetches_items() {
    let api = ScriptedApi::default();
    api.json("/location", crypt())
        .json("/location/items", json!([item("Rusty Sword")]))
        .json("/location/items", json!([]))
        .json("/take", json!({"allowed_buttons": {"n": false, "s": true, "combat": true}}));
    let mut session = started(&api).await;
    assert_eq!(names(&session), vec!["Rusty Sword"]);

    let request = session.request_action("Rusty Sword").unwrap();
    let events = drive(&mut session, &api, vec![request]).await;

    assert!(events.contains(&SessionEvent::GateUpdated));
    let gate = session.gate();
    assert_eq!(gate.permitted().collect::<Vec<_>>(), vec![COMBAT, "s"]);
    for forbidden in ["n", "e", "w", LOCAL_ITEMS, INVENTORY] {
        assert!(!gate.permits(forbidden), "{forbidden} should be forbidden");
    }

    let calls = api.calls();
    let take = calls.iter().position(|call| call == "POST /take Rusty Sword").unwrap();
    assert_eq!(calls[take + 1], "GET /location/items");
    assert!(names(&session).is_empty());
}

#[tokio::test]
async fn failed_move_does_not_refetch() {
    let api = ScriptedApi::default();
    api.json("/location", crypt())
        .json("/location/items", json!([]))
        .json("/move", json!({"result": "FAIL"}));
    let mut session = started(&api).await;

    let request = session.request_move(Direction::North).unwrap();
    assert_eq!(session.location().movement(), MovementState::Moving);
    let events = drive(&mut session, &api, vec![request]).await;

    assert_eq!(
        events,
        vec![SessionEvent::MoveRejected {
            direction: Direction::North,
            result: Some("FAIL".into())
        }]
    );
    let calls = api.calls();
    assert_eq!(calls.last().map(String::as_str), Some("POST /move n"));
    assert_eq!(calls.iter().filter(|call| *call == "GET /location").count(), 1);
    assert_eq!(session.location().movement(), MovementState::Idle);
}

#[tokio::test]
async fn accepted_move_fetches_the_new_location() {
    let api = ScriptedApi::default();
    api.json("/location", crypt())
        .json(
            "/location",
            json!({"name": "Narrow Stair", "description": "Up it goes.", "image": null,
                   "allowed_buttons": {"s": true}}),
        )
        .json("/location/items", json!([]))
        .json("/move", json!({"result": "OK"}));
    let mut session = started(&api).await;

    let request = session.request_move(Direction::North).unwrap();
    let events = drive(&mut session, &api, vec![request]).await;

    assert_eq!(events[0], SessionEvent::Moved(Direction::North));
    assert!(events.contains(&SessionEvent::LocationUpdated));
    assert_eq!(session.location().entry().unwrap().name, "Narrow Stair");
    assert!(session.controls().direction(Direction::South));
    assert!(!session.controls().direction(Direction::North));
    assert_eq!(session.location().movement(), MovementState::Idle);
}

#[tokio::test]
async fn accepted_move_reloads_the_open_panel() {
    let api = ScriptedApi::default();
    api.json("/location", crypt())
        .json("/location", json!({"name": "Narrow Stair", "description": "Up it goes.", "image": null}))
        .json("/location/items", json!([item("Rusty Sword")]))
        .json("/location/items", json!([item("Candle")]))
        .json("/move", json!({"result": "OK"}));
    let mut session = started(&api).await;
    assert_eq!(names(&session), vec!["Rusty Sword"]);

    let request = session.request_move(Direction::North).unwrap();
    drive(&mut session, &api, vec![request]).await;

    let calls = api.calls();
    let moved = calls.iter().position(|call| call == "POST /move n").unwrap();
    let after: Vec<_> = calls[moved + 1..].iter().map(String::as_str).collect();
    assert!(after.contains(&"GET /location"));
    assert!(after.contains(&"GET /location/items"));
    assert_eq!(session.location().entry().unwrap().name, "Narrow Stair");
    assert_eq!(names(&session), vec!["Candle"]);
    assert!(!session.panel().is_loading());
}

#[tokio::test]
async fn transport_failure_returns_movement_to_idle() {
    let api = ScriptedApi::default();
    api.json("/location", crypt()).json("/location/items", json!([]));
    let mut session = started(&api).await;

    let request = session.request_move(Direction::East).unwrap();
    let events = drive(&mut session, &api, vec![request]).await;

    assert!(matches!(
        events.as_slice(),
        [SessionEvent::MoveFailed {
            direction: Direction::East,
            error: ApiError::Transport(_)
        }]
    ));
    assert_eq!(session.location().movement(), MovementState::Idle);
    assert_eq!(session.location().entry().unwrap().name, "Dusty Crypt");
}

#[tokio::test]
async fn enemies_500_sets_error_and_leaves_gate_alone() {
    let api = ScriptedApi::default();
    api.json("/location", json!({"name": "Dusty Crypt", "description": "...", "image": null,
                                  "allowed_buttons": {"combat": true, "n": true}}))
        .json("/location/items", json!([item("Torch")]))
        .on("/enemies", Reply::Status(500));
    let mut session = started(&api).await;
    let gate_before = session.gate().clone();

    let request = session.select_panel(PanelPreset::Combat).unwrap();
    let events = drive(&mut session, &api, vec![request]).await;

    assert!(matches!(
        events.as_slice(),
        [SessionEvent::PanelFailed {
            error: ApiError::HttpStatus { status: 500, .. },
            ..
        }]
    ));
    assert!(session.panel().is_empty());
    assert!(session.panel().error().is_some());
    assert_eq!(session.gate(), &gate_before);
}

#[tokio::test]
async fn failed_reload_keeps_the_stale_list() {
    let api = ScriptedApi::default();
    api.json("/location", crypt())
        .json("/location/items", json!([item("Torch")]))
        .on("/location/items", Reply::Status(503));
    let mut session = started(&api).await;

    let request = session.reload_panel();
    drive(&mut session, &api, vec![request]).await;
    assert_eq!(names(&session), vec!["Torch"]);
    assert!(session.panel().error().is_some());
}

#[tokio::test]
async fn reload_twice_yields_identical_entries() {
    let api = ScriptedApi::default();
    api.json("/location", crypt())
        .json("/location/items", json!([item("Torch"), item("Rope")]));
    let mut session = started(&api).await;

    let request = session.reload_panel();
    drive(&mut session, &api, vec![request]).await;
    let first: Vec<_> = session.panel().entries().cloned().collect();
    let request = session.reload_panel();
    drive(&mut session, &api, vec![request]).await;
    let second: Vec<_> = session.panel().entries().cloned().collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn slow_response_for_previous_panel_is_discarded() {
    let api = ScriptedApi::default();
    api.json("/location", crypt())
        .json("/location/items", json!([item("Torch")]))
        .json("/location/items", json!([item("Lantern")]))
        .json("/inventory", json!([item("Gold Coin")]));
    let mut session = started(&api).await;

    let inventory_gate = api.hold("/inventory");
    let inventory = session.select_panel(PanelPreset::Inventory).unwrap();
    let items = session.select_panel(PanelPreset::LocalItems).unwrap();

    let mut in_flight = FuturesUnordered::new();
    in_flight.push(perform(api.clone(), inventory));
    in_flight.push(perform(api.clone(), items));

    // items answers first; inventory is still held
    let first = in_flight.next().await.unwrap();
    let settled = session.settle(first);
    assert!(matches!(settled.events.as_slice(), [SessionEvent::PanelLoaded { count: 1, .. }]));

    inventory_gate.notify_one();
    let second = in_flight.next().await.unwrap();
    let settled = session.settle(second);
    assert!(settled.events.is_empty(), "stale inventory response must not raise events");

    assert_eq!(names(&session), vec!["Lantern"]);
    assert_eq!(session.panel().selection().list_endpoint, "/location/items");
    assert!(!session.panel().is_loading());
}

#[tokio::test]
async fn exits_are_reported_verbatim() {
    let api = ScriptedApi::default();
    api.json("/location/exits", json!("North: a narrow stair. South: the crypt gate."));
    let mut session = Session::new();
    let request = session.request_exits();
    let events = drive(&mut session, &api, vec![request]).await;
    assert_eq!(
        events,
        vec![SessionEvent::Exits("North: a narrow stair. South: the crypt gate.".into())]
    );
}

#[tokio::test]
async fn backstory_failure_does_not_block() {
    let api = ScriptedApi::default();
    assert!(matches!(fetch_backstory(&api).await, Backstory::Unavailable(_)));
    api.json("/", json!("Long ago, the roads were safe."));
    assert_eq!(
        fetch_backstory(&api).await,
        Backstory::Text("Long ago, the roads were safe.".into())
    );
}
