//! Employee performance appraisals ranked with Simple Additive Weighting (SAW).
//!
//! The scoring engine in [`workflows::performance::scoring`] is a pure transformation from
//! evaluation rows and weighted criteria to a ranked result list. Everything else in the crate
//! (criteria management, CSV import, the snapshot service and its HTTP router) feeds or
//! consumes that engine.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
