//! Pathsheet Engine library.
//!
//! Hosts the pure rules engine from `pathsheet-domain`: loads snapshots,
//! applies one named operation, recalculates, saves and logs.
//!
//! ## Structure
//!
//! - `use_cases/` - One struct per area of the sheet, orchestrating ports and domain
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `cli` - Command-line surface
//! - `app` - Application composition

pub mod app;
pub mod cli;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
