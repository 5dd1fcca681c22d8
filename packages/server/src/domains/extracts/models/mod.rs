pub mod area_of_interest;
pub mod extract_job;

pub use area_of_interest::{AreaOfInterest, Geom, PgHistoryStore};
pub use extract_job::{ExtractJob, PgExtractJobStore, STATUS_PENDING};
