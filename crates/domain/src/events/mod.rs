//! Domain events
//!
//! Return types from named sheet operations, communicating what happened
//! when the snapshot was (or was not) modified.

pub mod sheet_events;

pub use sheet_events::*;
