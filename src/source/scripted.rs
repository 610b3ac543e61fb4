//! Scripted source: replays a fixed list of frames and grab failures.

use std::collections::VecDeque;

use super::FrameSource;
use crate::error::{Error, Result};
use crate::vision::Frame;

/// One step of a script
#[derive(Clone, Debug)]
pub enum ScriptStep {
    /// Deliver this frame
    Frame(Frame),
    /// Fail this grab
    GrabFailure(String),
}

/// Frame source driven by a prepared script
#[derive(Default)]
pub struct ScriptedSource {
    steps: VecDeque<ScriptStep>,
}

impl ScriptedSource {
    /// Empty script (immediately at end of stream)
    pub fn new() -> Self {
        Self::default()
    }

    /// Script that delivers the given frames in order
    pub fn from_frames<I: IntoIterator<Item = Frame>>(frames: I) -> Self {
        Self {
            steps: frames.into_iter().map(ScriptStep::Frame).collect(),
        }
    }

    /// Append a frame
    pub fn push_frame(&mut self, frame: Frame) -> &mut Self {
        self.steps.push_back(ScriptStep::Frame(frame));
        self
    }

    /// Append a grab failure
    pub fn push_failure(&mut self, reason: impl Into<String>) -> &mut Self {
        self.steps.push_back(ScriptStep::GrabFailure(reason.into()));
        self
    }

    /// Steps not yet consumed
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl FrameSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn next_frame(&mut self) -> Result<Frame> {
        match self.steps.pop_front() {
            Some(ScriptStep::Frame(frame)) => Ok(frame),
            Some(ScriptStep::GrabFailure(reason)) => Err(Error::FrameGrab(reason)),
            None => Err(Error::EndOfStream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_script_order() {
        let frame = Frame::new(RgbImage::new(2, 2)).unwrap();
        let mut source = ScriptedSource::new();
        source.push_frame(frame.clone()).push_failure("cable").push_frame(frame);

        assert!(source.next_frame().is_ok());
        assert!(matches!(source.next_frame(), Err(Error::FrameGrab(r)) if r == "cable"));
        assert!(source.next_frame().is_ok());
        assert!(matches!(source.next_frame(), Err(Error::EndOfStream)));
        assert_eq!(source.remaining(), 0);
    }
}
