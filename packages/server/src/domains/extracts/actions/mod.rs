//! Extract domain actions - business logic functions
//!
//! Actions are async functions called from HTTP handlers and the scheduler.
//! They take `ServerDeps` and never touch concrete infrastructure directly.

mod history;
mod submit_extract;
mod sweep;

pub use history::{delete_history, list_history, HistoryEntry};
pub use submit_extract::{submit_extract, Requester};
pub use sweep::{sweep_extract_jobs, SweepReport};
