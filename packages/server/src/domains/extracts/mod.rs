//! Extracts domain - asynchronous data extract jobs
//!
//! Responsibilities:
//! - Submitting areas of interest to the geoprocessing service
//! - Tracking accepted jobs until the service reports a terminal status
//! - Notifying the job owner by e-mail and retiring the tracking record
//! - The user's history of submitted areas

pub mod actions;
pub mod client;
pub mod errors;
pub mod models;
pub mod notifications;
pub mod outcome;
pub mod policy;

pub use actions::{submit_extract, sweep_extract_jobs, Requester, SweepReport};
pub use client::ExtractJobClient;
pub use errors::ExtractError;
pub use models::{ExtractJob, Geom};
pub use notifications::NotificationTemplate;
pub use outcome::{JobOutcome, PollError, SubmitOutcome};
pub use policy::{DeliveryPolicy, SweepPolicy};
