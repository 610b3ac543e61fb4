//! Frame handling and obstacle mask construction.

pub mod filter;
pub mod frame;
pub mod mask;

pub use frame::Frame;
pub use mask::{MaskBuilder, ObstacleMask};
