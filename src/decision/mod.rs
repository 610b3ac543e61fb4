//! Direction decisions and their rolling trail.
//!
//! - [`policy`]: free-space vector → command
//! - [`history`]: bounded FIFO of past decisions, read by the renderer only

pub mod history;
pub mod policy;

pub use history::{DEFAULT_HISTORY_CAPACITY, DecisionRecord, PathHistory};
pub use policy::{Command, Decision, decide};
