//! Per-frame decision engine.
//!
//! Owns the scanner configuration and the decision trail. Each call to
//! [`DecisionEngine::process`] runs mask → slices → decision on one frame and
//! appends the result to the trail; nothing else carries across frames.

use crate::config::{Config, FreeCriterion, ScannerConfig};
use crate::decision::{Decision, DecisionRecord, PathHistory, decide};
use crate::error::Result;
use crate::scanner::{FreeSpaceVector, SliceLayout, estimate_free_space};
use crate::vision::{Frame, MaskBuilder};

/// Everything computed for one frame
#[derive(Clone, Debug)]
pub struct FrameAnalysis {
    /// Slice geometry for the frame width
    pub layout: SliceLayout,
    /// Free pixels per slice
    pub free_space: FreeSpaceVector,
    /// Chosen slice and command
    pub decision: Decision,
}

/// Decision engine with its own trail
#[derive(Debug)]
pub struct DecisionEngine {
    mask_builder: MaskBuilder,
    num_slices: usize,
    criterion: FreeCriterion,
    history: PathHistory,
    sequence: u64,
    layout: Option<SliceLayout>,
}

impl DecisionEngine {
    /// Create an engine from scanner settings and a trail capacity.
    pub fn new(scanner: &ScannerConfig, history_capacity: usize) -> Result<Self> {
        scanner.validate()?;
        Ok(Self {
            mask_builder: MaskBuilder::from_config(scanner)?,
            num_slices: scanner.num_slices,
            criterion: scanner.free_criterion,
            history: PathHistory::new(history_capacity),
            sequence: 0,
            layout: None,
        })
    }

    /// Create an engine from the full configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.scanner, config.history.capacity)
    }

    /// Number of slices scanned per frame
    pub fn num_slices(&self) -> usize {
        self.num_slices
    }

    /// Decision trail, oldest first
    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    /// Frames processed so far
    pub fn frames_processed(&self) -> u64 {
        self.sequence
    }

    /// Analyze a frame without touching the trail.
    pub fn analyze(&self, frame: &Frame) -> FrameAnalysis {
        let layout = match &self.layout {
            Some(layout) if layout.frame_width() == frame.width() => layout.clone(),
            _ => SliceLayout::new(frame.width(), self.num_slices),
        };
        self.analyze_with_layout(frame, layout)
    }

    /// Analyze a frame and append the decision to the trail.
    pub fn process(&mut self, frame: &Frame) -> (FrameAnalysis, DecisionRecord) {
        let layout = self.layout_for(frame.width());
        let analysis = self.analyze_with_layout(frame, layout);

        self.sequence += 1;
        let record = DecisionRecord {
            slice_index: analysis.decision.best_index,
            command: analysis.decision.command,
            sequence: self.sequence,
        };
        self.history.push(record);

        log::debug!(
            "frame {}: free={:?} -> slice {} ({})",
            record.sequence,
            analysis.free_space.as_slice(),
            record.slice_index,
            record.command
        );

        (analysis, record)
    }

    fn layout_for(&mut self, width: u32) -> SliceLayout {
        match &self.layout {
            Some(layout) if layout.frame_width() == width => layout.clone(),
            _ => {
                let layout = SliceLayout::new(width, self.num_slices);
                if layout.slice_width() == 0 {
                    log::warn!(
                        "Frame width {} is narrower than {} slices; every slice is empty",
                        width,
                        self.num_slices
                    );
                } else if layout.excluded_columns() > 0 {
                    log::debug!(
                        "Frame width {}: {} trailing columns outside any slice",
                        width,
                        layout.excluded_columns()
                    );
                }
                self.layout = Some(layout.clone());
                layout
            }
        }
    }

    fn analyze_with_layout(&self, frame: &Frame, layout: SliceLayout) -> FrameAnalysis {
        let mask = self.mask_builder.build(frame);
        let free_space = estimate_free_space(&mask, &layout, self.criterion);
        let decision = decide(&free_space);
        FrameAnalysis {
            layout,
            free_space,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Command;
    use image::{Rgb, RgbImage};

    /// Bright frame with a dark (free) band covering `[x0, x1)`.
    fn corridor_frame(width: u32, height: u32, x0: u32, x1: u32) -> Frame {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x >= x0 && x < x1 {
                Rgb([10, 10, 10])
            } else {
                Rgb([250, 250, 250])
            }
        });
        Frame::new(img).unwrap()
    }

    fn engine() -> DecisionEngine {
        DecisionEngine::new(&ScannerConfig::default(), 30).unwrap()
    }

    #[test]
    fn test_corridor_positions() {
        let mut engine = engine();

        let (a, _) = engine.process(&corridor_frame(500, 40, 200, 300));
        assert_eq!(a.layout.slice_width(), 100);
        assert_eq!(a.decision.best_index, 2);
        assert_eq!(a.decision.command, Command::Forward);

        let (a, _) = engine.process(&corridor_frame(500, 40, 0, 100));
        assert_eq!(a.decision.command, Command::Left);

        let (a, _) = engine.process(&corridor_frame(500, 40, 400, 500));
        assert_eq!(a.decision.best_index, 4);
        assert_eq!(a.decision.command, Command::Right);
    }

    #[test]
    fn test_all_obstacle_picks_leftmost() {
        let mut engine = engine();
        let (a, record) = engine.process(&corridor_frame(100, 20, 0, 0));
        assert!(a.free_space.iter().all(|&c| c == 0));
        assert_eq!(record.slice_index, 0);
        assert_eq!(record.command, Command::Left);
    }

    #[test]
    fn test_sequence_and_history() {
        let mut engine = DecisionEngine::new(&ScannerConfig::default(), 3).unwrap();
        let frame = corridor_frame(50, 10, 20, 30);
        for _ in 0..5 {
            engine.process(&frame);
        }
        assert_eq!(engine.frames_processed(), 5);
        let seqs: Vec<u64> = engine.history().iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![3, 4, 5]);
    }

    #[test]
    fn test_analyze_leaves_history_alone() {
        let engine = engine();
        let a = engine.analyze(&corridor_frame(50, 10, 20, 30));
        assert_eq!(a.free_space.len(), 5);
        assert!(engine.history().is_empty());
        assert_eq!(engine.frames_processed(), 0);
    }

    #[test]
    fn test_width_change_rebuilds_layout() {
        let mut engine = engine();
        let (a, _) = engine.process(&corridor_frame(500, 10, 0, 100));
        assert_eq!(a.layout.slice_width(), 100);
        let (b, _) = engine.process(&corridor_frame(250, 10, 0, 50));
        assert_eq!(b.layout.slice_width(), 50);
    }

    #[test]
    fn test_invalid_scanner_config_rejected() {
        let scanner = ScannerConfig {
            num_slices: 0,
            ..ScannerConfig::default()
        };
        assert!(DecisionEngine::new(&scanner, 30).is_err());

        let scanner = ScannerConfig {
            num_slices: crate::config::MAX_NUM_SLICES + 1,
            ..ScannerConfig::default()
        };
        assert!(DecisionEngine::new(&scanner, 30).is_err());
    }
}
