//! CLI command implementations.

pub mod compare;
pub mod extract;
pub mod scan;

pub use extract::ExtractCommand;
pub use scan::ScanCommand;
