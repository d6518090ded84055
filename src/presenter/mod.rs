//! Presentation models for the in-page overlay and the toolbar popup.

pub mod overlay;
pub mod popup;
pub mod rows;

pub use overlay::{Overlay, OverlayChannel, OverlayState};
pub use popup::{BestDeal, PopupView};
pub use rows::{PriceClass, ResultRow};
