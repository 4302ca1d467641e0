//! Lockboard-api: HTTP API layer for the Lockboard dashboard
//!
//! Each dashboard panel maps to a route group. Panels are isolated: one
//! panel's read failure is answered with a structured error on its own
//! route and never crosses into a sibling. Writes come back as unsigned
//! calls for external signing; confirmed transactions are reported back
//! and turn into refresh signals.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;
pub mod watcher;

pub use server::*;
pub use state::{AppState, WalletState};
pub use watcher::{Operation, TxWatcher};
