//! Overlay rendering for operator display and snapshots.
//!
//! Rendering only reads the engine's results and trail; it never feeds back
//! into a decision.

pub mod font;
pub mod overlay;

pub use overlay::{OverlayStyle, render_overlay};
