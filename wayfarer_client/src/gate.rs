//! Action gate.
//!
//! The client-held record of which mutating actions the server currently allows.
//! Only server payloads ever change it, and an action it has never heard of is forbidden.

use std::collections::BTreeMap;

use log::info;
use wayfarer_data::GatePayload;

/// Gate key for opening the enemies panel (and attacking within it).
pub const COMBAT: &str = "combat";
/// Gate key for opening the local items panel (and taking from it).
pub const LOCAL_ITEMS: &str = "local_items";
/// Gate key for opening the inventory panel (and dropping from it).
pub const INVENTORY: &str = "inventory";

/// Mapping of action identifiers to "currently permitted".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionGate {
    allowed: BTreeMap<String, bool>,
}

impl ActionGate {
    /// An empty gate; permits nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// True only if the latest server payload listed `action` as `true`.
    pub fn permits(&self, action: &str) -> bool {
        self.allowed.get(action).copied().unwrap_or(false)
    }

    /// Replace the whole mapping with `payload`.
    ///
    /// Not a deep merge: anything missing from `payload` becomes forbidden even
    /// if it was allowed a moment ago.
    pub fn merge(&mut self, payload: GatePayload) {
        self.allowed = payload.into_inner();
        info!("action gate replaced; now permits {:?}", self.permitted().collect::<Vec<_>>());
    }

    /// Identifiers currently permitted, in key order.
    pub fn permitted(&self) -> impl Iterator<Item = &str> {
        self.allowed
            .iter()
            .filter(|(_, allowed)| **allowed)
            .map(|(key, _)| key.as_str())
    }

    /// Every identifier the server mentioned, allowed or not.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.allowed.iter().map(|(key, allowed)| (key.as_str(), *allowed))
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
