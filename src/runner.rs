//! The frame loop.
//!
//! ```text
//! loop {
//!     frame    = source.next_frame()        // blocks
//!     decision = engine.process(frame)      // mask → slices → policy → trail
//!     overlay  = render(frame, decision)    // kept for snapshots
//!     sink.send(decision)                   // hand-off to the actuator side
//!     control.poll(wait)                    // quit / snapshot
//! }
//! ```
//!
//! Single-threaded; stopping is cooperative and checked once per frame. The
//! source is owned by [`Runner::run`] and dropped on every exit path.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use image::RgbImage;

use crate::config::Config;
use crate::control::{ControlInput, ControlSignal};
use crate::decision::{Command, DecisionRecord};
use crate::engine::DecisionEngine;
use crate::error::{Error, Result};
use crate::render::{OverlayStyle, render_overlay};
use crate::sink::CommandSink;
use crate::snapshot::save_snapshot;
use crate::source::FrameSource;

/// Why the loop ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Source ran out of frames
    EndOfStream,
    /// Operator asked to quit
    Quit,
    /// Configured frame count reached
    FrameLimit,
    /// Frame grab failed more often than the retry policy allows
    GrabFailure(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndOfStream => write!(f, "end of stream"),
            StopReason::Quit => write!(f, "quit requested"),
            StopReason::FrameLimit => write!(f, "frame limit reached"),
            StopReason::GrabFailure(reason) => write!(f, "frame grab failed: {}", reason),
        }
    }
}

/// Totals for one run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames that went through the pipeline
    pub frames_processed: u64,
    /// Snapshots written
    pub snapshots_saved: u64,
    /// Why the loop ended
    pub stop_reason: StopReason,
    /// Final decision, if any
    pub last_record: Option<DecisionRecord>,
    left: u64,
    forward: u64,
    right: u64,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            frames_processed: 0,
            snapshots_saved: 0,
            stop_reason: StopReason::EndOfStream,
            last_record: None,
            left: 0,
            forward: 0,
            right: 0,
        }
    }

    fn record(&mut self, record: &DecisionRecord) {
        self.frames_processed += 1;
        match record.command {
            Command::Left => self.left += 1,
            Command::Forward => self.forward += 1,
            Command::Right => self.right += 1,
        }
        self.last_record = Some(*record);
    }

    /// How many frames produced `command`
    pub fn count(&self, command: Command) -> u64 {
        match command {
            Command::Left => self.left,
            Command::Forward => self.forward,
            Command::Right => self.right,
        }
    }
}

/// Drives the engine from a source to a sink
pub struct Runner {
    engine: DecisionEngine,
    style: OverlayStyle,
    snapshot_path: PathBuf,
    poll_wait: Duration,
    max_grab_retries: u32,
    max_frames: u64,
    last_render: Option<RgbImage>,
}

impl Runner {
    /// Build a runner from validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: DecisionEngine::from_config(config)?,
            style: OverlayStyle::from_config(&config.overlay),
            snapshot_path: config.snapshot_path(),
            poll_wait: Duration::from_millis(config.control.poll_interval_ms),
            max_grab_retries: config.control.max_grab_retries,
            max_frames: config.control.max_frames,
            last_render: None,
        })
    }

    /// The decision engine and its trail
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Most recently rendered overlay
    pub fn last_render(&self) -> Option<&RgbImage> {
        self.last_render.as_ref()
    }

    /// Where snapshots are written
    pub fn snapshot_path(&self) -> &std::path::Path {
        &self.snapshot_path
    }

    /// Run until the source ends, the operator quits, the frame limit is hit
    /// or grabbing fails past the retry budget.
    ///
    /// Sink errors abort the run and are returned.
    pub fn run(
        &mut self,
        mut source: Box<dyn FrameSource>,
        sink: &mut dyn CommandSink,
        control: &mut dyn ControlInput,
    ) -> Result<RunSummary> {
        log::info!("Frame loop started on {}", source.name());

        let mut summary = RunSummary::new();
        let mut consecutive_failures = 0u32;

        let stop_reason = loop {
            if self.max_frames > 0 && summary.frames_processed >= self.max_frames {
                break StopReason::FrameLimit;
            }

            let frame = match source.next_frame() {
                Ok(frame) => {
                    consecutive_failures = 0;
                    frame
                }
                Err(Error::EndOfStream) => break StopReason::EndOfStream,
                Err(e @ (Error::FrameGrab(_) | Error::InvalidFrame(_))) => {
                    consecutive_failures += 1;
                    if consecutive_failures > self.max_grab_retries {
                        log::error!("Failed to grab frame: {}", e);
                        break StopReason::GrabFailure(e.to_string());
                    }
                    log::warn!(
                        "Failed to grab frame ({}/{} retries): {}",
                        consecutive_failures,
                        self.max_grab_retries,
                        e
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            let (analysis, record) = self.engine.process(&frame);
            self.last_render = Some(render_overlay(
                &frame,
                &analysis,
                self.engine.history(),
                &self.style,
            ));

            sink.send(&record)?;
            summary.record(&record);

            match control.poll(self.poll_wait) {
                Some(ControlSignal::Quit) => break StopReason::Quit,
                Some(ControlSignal::Snapshot) => {
                    if self.snapshot() {
                        summary.snapshots_saved += 1;
                    }
                }
                None => {}
            }
        };

        log::info!(
            "Frame loop stopped after {} frames: {}",
            summary.frames_processed,
            stop_reason
        );
        summary.stop_reason = stop_reason;
        drop(source);
        Ok(summary)
    }

    /// Save the last rendered overlay. Returns false when nothing has been
    /// rendered yet or the write failed; write failures are logged, not fatal.
    fn snapshot(&self) -> bool {
        let Some(image) = &self.last_render else {
            log::warn!("Snapshot requested before any frame was rendered");
            return false;
        };
        match save_snapshot(image, &self.snapshot_path) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save snapshot: {}", e);
                false
            }
        }
    }
}
