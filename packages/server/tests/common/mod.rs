// Common test utilities

pub mod harness;

pub use harness::*;

use server_core::domains::extracts::models::Geom;

/// A small closed ring near Albuquerque
pub fn sample_geom(title: &str) -> Geom {
    Geom {
        rings: vec![vec![
            vec![-106.65, 35.08],
            vec![-106.60, 35.08],
            vec![-106.60, 35.12],
            vec![-106.65, 35.08],
        ]],
        title: title.to_string(),
        skip_history: false,
    }
}
