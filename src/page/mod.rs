//! Page-side behaviour: fetching pages and running extraction sessions.

pub mod client;
pub mod session;

pub use client::{PageClient, PageFetcher};
pub use session::{PageSession, Settle};
