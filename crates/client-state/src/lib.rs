//! Per-viewer, per-content reconciliation state for the engagement UI.
//!
//! Everything here is sans-IO: state machines hand out intents describing the
//! request the host must issue, and the host feeds the response (or failure)
//! back in. The backend's response always wins over the optimistic guess, and
//! every failure path restores the exact pre-mutation state, so the UI can
//! never permanently diverge from the server.

pub mod comments;
pub mod follow;
pub mod like;

mod deadline;

pub use deadline::default_timeout;
