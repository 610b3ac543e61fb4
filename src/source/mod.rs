//! Frame sources.
//!
//! - [`FrameSource`]: trait to implement for new cameras or recordings
//! - [`images::ImageSequenceSource`]: image files from a directory
//! - [`synthetic::SyntheticSource`]: generated scene, no hardware needed
//! - [`scripted::ScriptedSource`]: fixed frames and failures for tests
//!
//! A source holds its device for as long as it lives; dropping it releases
//! the device, so every exit path of the frame loop gives it back.

pub mod images;
pub mod scripted;
pub mod synthetic;

use crate::config::{SourceConfig, SourceKind};
use crate::error::{Error, Result};
use crate::vision::Frame;
use std::str::FromStr;

pub use images::ImageSequenceSource;
pub use scripted::ScriptedSource;
pub use synthetic::SyntheticSource;

/// Supplier of frames for the decision loop
pub trait FrameSource {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Block until the next frame is available.
    ///
    /// Returns [`Error::EndOfStream`] when the source is exhausted and
    /// [`Error::FrameGrab`] when a single frame fails to arrive.
    fn next_frame(&mut self) -> Result<Frame>;
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "synthetic" | "mock" => Ok(SourceKind::Synthetic),
            "images" | "sequence" => Ok(SourceKind::Images),
            other => Err(Error::UnknownSource(other.to_string())),
        }
    }
}

/// Open the frame source named by configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn FrameSource>> {
    match config.kind {
        SourceKind::Synthetic => {
            let source = SyntheticSource::new(
                config.width,
                config.height,
                config.frame_limit,
                config.seed,
            )?;
            Ok(Box::new(source))
        }
        SourceKind::Images => {
            let source = ImageSequenceSource::open(&config.path, config.looping)?;
            Ok(Box::new(source))
        }
    }
}
