//! Product extraction from marketplace pages.

pub mod document;
pub mod extractor;
pub mod models;

pub use document::{ExtractionRule, PageDocument, RuleKind};
pub use extractor::{extract, extract_at};
pub use models::ProductRecord;
