//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod errors;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GeoprocessingAdapter, ServerDeps, SmtpNotifier};
pub use errors::{MailError, StoreError};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::TestDependencies;
pub use traits::*;
