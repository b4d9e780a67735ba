//! Session bootstrap: the backstory screen shown before play begins.

use log::{info, warn};

use crate::api::{ApiError, GameApi};

/// What the intro screen has to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backstory {
    Text(String),
    /// The server could not supply one. Play still goes ahead.
    Unavailable(ApiError),
}

/// The player's answer to "ready?".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Quit,
}

pub async fn fetch_backstory<A: GameApi>(api: &A) -> Backstory {
    match api.backstory().await {
        Ok(text) => {
            info!("backstory received ({} chars)", text.len());
            Backstory::Text(text)
        },
        Err(err) => {
            warn!("no backstory available: {err}");
            Backstory::Unavailable(err)
        },
    }
}

/// Anything but an explicit quit counts as readiness, including a bare Enter.
pub fn readiness(line: &str) -> Readiness {
    match line.trim().to_lowercase().as_str() {
        "quit" | "exit" | "q" => Readiness::Quit,
        _ => Readiness::Ready,
    }
}
