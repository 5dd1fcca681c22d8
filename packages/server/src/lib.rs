// NMWRAP Data Extracts - API Core
//
// This crate accepts area-of-interest extract requests, hands them to the
// geoprocessing service, and tracks each job until its owner has been e-mailed.
//
// Business logic lives in domains/*/actions; infrastructure sits behind the
// Base* traits in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
