//! Cross-marketplace comparison via the remote backend.

pub mod client;
pub mod models;

pub use client::{ComparisonBackend, ComparisonClient, FETCH_ERROR, SERVER_ERROR};
pub use models::{ComparisonOutcome, ComparisonRequest, ComparisonResult};
