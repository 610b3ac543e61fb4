//! MargaNav - Camera free-space scanner and direction controller
//!
//! Turns each camera frame into one of three steering commands ("Move Left",
//! "Move Forward", "Move Right") by splitting a binary obstacle mask into
//! vertical slices and steering toward the slice with the most free space.
//!
//! ## Pipeline
//!
//! ```text
//! Frame ─► grayscale ─► inverted threshold ─► blur ─► ObstacleMask
//!                                                          │
//!                                  SliceLayout ─► FreeSpaceVector ─► argmax ─► Command
//!                                                                                 │
//!                                                               PathHistory ◄─────┘
//! ```
//!
//! - [`source`]: where frames come from (image directory, synthetic camera)
//! - [`engine`]: per-frame mask, slice scan and decision
//! - [`render`]: annotated overlay with bars, highlight and decision trail
//! - [`runner`]: the frame loop tying source, engine, sink and operator control

pub mod config;
pub mod control;
pub mod decision;
pub mod engine;
pub mod error;
pub mod render;
pub mod runner;
pub mod scanner;
pub mod sink;
pub mod snapshot;
pub mod source;
pub mod vision;

// Re-export commonly used types
pub use config::{Config, FreeCriterion};
pub use decision::{Command, Decision, DecisionRecord, PathHistory};
pub use engine::{DecisionEngine, FrameAnalysis};
pub use error::{Error, Result};
pub use runner::{RunSummary, Runner, StopReason};
pub use scanner::{FreeSpaceVector, SliceLayout};
pub use source::{FrameSource, create_source};
pub use vision::{Frame, ObstacleMask};
