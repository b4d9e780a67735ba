//! Shared wire model for the Wayfarer game server.
//!
//! Every type here mirrors a JSON body exchanged with the server. Nothing in
//! this crate performs I/O.

pub mod defs;

pub use defs::*;
