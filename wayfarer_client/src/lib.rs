#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const WAYFARER_VERSION: &str = env!("CARGO_PKG_VERSION");

// Session core
pub mod api;
pub mod dispatch;
pub mod gate;
pub mod location;
pub mod panel;
pub mod session;

// Terminal front end
pub mod bootstrap;
pub mod command;
pub mod config;
pub mod repl;
pub mod spinners;
pub mod style;
pub mod view;

// Re-exports for convenience
pub use api::{ApiError, GameApi, HttpGameApi};
pub use config::ClientConfig;
pub use dispatch::{Request, RequestKind, Settlement, drive, perform};
pub use gate::ActionGate;
pub use location::{Direction, LocationController, MovementState};
pub use panel::{CollectionPanel, PanelPreset, PanelSelection};
pub use repl::run_repl;
pub use session::{Controls, Session, SessionError, SessionEvent};
pub use view::{View, ViewItem};
