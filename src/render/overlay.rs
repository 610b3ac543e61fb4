//! Decision overlay drawn on top of the source frame.
//!
//! Layers, in drawing order:
//! 1. Label bar across the top of each slice with its free-pixel count
//! 2. Outline around the chosen slice, full height
//! 3. Trail of past decisions (optional), oldest marker at the bottom
//! 4. Command text near the bottom-left corner

use image::{Rgb, RgbImage};

use super::font;
use crate::config::{OverlayConfig, OverlayStyleName};
use crate::decision::PathHistory;
use crate::engine::FrameAnalysis;
use crate::vision::Frame;

/// Colors and geometry of the overlay
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Label bar fill
    pub label_bar: Rgb<u8>,
    /// Free-count label color
    pub label_text: Rgb<u8>,
    /// Chosen slice outline
    pub highlight: Rgb<u8>,
    /// Command text color
    pub command_text: Rgb<u8>,
    /// Trail marker color
    pub trail: Rgb<u8>,
    /// Draw the decision trail
    pub draw_trail: bool,
    /// Label bar height in pixels
    pub label_bar_height: u32,
    /// Outline thickness in pixels
    pub highlight_thickness: u32,
    /// Vertical spacing between trail markers
    pub trail_spacing: u32,
    /// Trail marker radius
    pub trail_radius: u32,
    /// Label font scale
    pub label_scale: u32,
    /// Command font scale
    pub command_scale: u32,
}

impl OverlayStyle {
    /// Blue label bar with green counts, no trail
    pub fn obstacle_avoidance() -> Self {
        Self {
            label_bar: Rgb([0, 0, 255]),
            label_text: Rgb([0, 255, 0]),
            draw_trail: false,
            ..Self::path_planning()
        }
    }

    /// Yellow label bar with black counts and a magenta decision trail
    pub fn path_planning() -> Self {
        Self {
            label_bar: Rgb([255, 255, 0]),
            label_text: Rgb([0, 0, 0]),
            highlight: Rgb([0, 255, 0]),
            command_text: Rgb([255, 0, 0]),
            trail: Rgb([255, 0, 255]),
            draw_trail: true,
            label_bar_height: 20,
            highlight_thickness: 2,
            trail_spacing: 5,
            trail_radius: 2,
            label_scale: 2,
            command_scale: 3,
        }
    }

    /// Preset selected by configuration, with the trail override applied
    pub fn from_config(config: &OverlayConfig) -> Self {
        let mut style = match config.style {
            OverlayStyleName::ObstacleAvoidance => Self::obstacle_avoidance(),
            OverlayStyleName::PathPlanning => Self::path_planning(),
        };
        if let Some(draw_trail) = config.draw_trail {
            style.draw_trail = draw_trail;
        }
        style
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::path_planning()
    }
}

/// Render the overlay onto a copy of the frame.
pub fn render_overlay(
    frame: &Frame,
    analysis: &FrameAnalysis,
    history: &PathHistory,
    style: &OverlayStyle,
) -> RgbImage {
    let mut image = frame.pixels().clone();
    let height = image.height();
    let layout = &analysis.layout;
    let slice_width = layout.slice_width();

    let bar = style.label_bar_height.min(height);
    let label_top = bar as i64 - 5 - font::text_height(style.label_scale) as i64;
    for (slice, count) in layout.slices().iter().zip(analysis.free_space.iter()) {
        fill_rect(&mut image, slice.x_start, 0, slice.x_end, bar, style.label_bar);
        font::draw_text(
            &mut image,
            &count.to_string(),
            slice.x_start as i64 + 5,
            label_top,
            style.label_scale,
            style.label_text,
        );
    }

    if let Some(best) = layout.get(analysis.decision.best_index) {
        draw_rect_outline(
            &mut image,
            best.x_start,
            0,
            best.x_end,
            height,
            style.highlight_thickness,
            style.highlight,
        );
    }

    if style.draw_trail {
        for (i, record) in history.iter().enumerate() {
            let x = (record.slice_index as u32 * slice_width + slice_width / 2) as i64;
            let y = height as i64 - (i as u32 * style.trail_spacing) as i64;
            fill_circle(&mut image, x, y, style.trail_radius, style.trail);
        }
    }

    let text = format!("Direction: {}", analysis.decision.command);
    let text_top = height as i64 - 10 - font::text_height(style.command_scale) as i64;
    font::draw_text(
        &mut image,
        &text,
        10,
        text_top,
        style.command_scale,
        style.command_text,
    );

    image
}

/// Fill `[x0, x1) x [y0, y1)`, clipped to the image.
fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

/// Outline `[x0, x1) x [y0, y1)` with the border drawn inside the box.
fn draw_rect_outline(
    image: &mut RgbImage,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    thickness: u32,
    color: Rgb<u8>,
) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let t = thickness.max(1);
    fill_rect(image, x0, y0, x1, (y0 + t).min(y1), color);
    fill_rect(image, x0, y1.saturating_sub(t).max(y0), x1, y1, color);
    fill_rect(image, x0, y0, (x0 + t).min(x1), y1, color);
    fill_rect(image, x1.saturating_sub(t).max(x0), y0, x1, y1, color);
}

/// Filled disc centered at (cx, cy), clipped to the image.
fn fill_circle(image: &mut RgbImage, cx: i64, cy: i64, radius: u32, color: Rgb<u8>) {
    let r = radius as i64;
    let (w, h) = (image.width() as i64, image.height() as i64);
    for y in (cy - r).max(0)..(cy + r + 1).min(h) {
        for x in (cx - r).max(0)..(cx + r + 1).min(w) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScannerConfig;
    use crate::engine::DecisionEngine;

    const BACKGROUND: Rgb<u8> = Rgb([250, 250, 250]);

    fn frame_with_corridor(x0: u32, x1: u32) -> Frame {
        let img = RgbImage::from_fn(200, 120, |x, _| {
            if x >= x0 && x < x1 {
                Rgb([10, 10, 10])
            } else {
                BACKGROUND
            }
        });
        Frame::new(img).unwrap()
    }

    #[test]
    fn test_highlight_and_label_bar() {
        let mut engine = DecisionEngine::new(&ScannerConfig::default(), 30).unwrap();
        let frame = frame_with_corridor(120, 160);
        let (analysis, _) = engine.process(&frame);
        assert_eq!(analysis.decision.best_index, 3);

        let style = OverlayStyle::path_planning();
        let out = render_overlay(&frame, &analysis, engine.history(), &style);

        // Label bar on every slice, below the text and inside any outline
        for slice in analysis.layout.slices() {
            assert_eq!(*out.get_pixel(slice.x_end - 3, 18), style.label_bar);
        }
        // Outline on the chosen slice's left edge, halfway down
        assert_eq!(*out.get_pixel(120, 60), style.highlight);
        assert_eq!(*out.get_pixel(121, 60), style.highlight);
        // Interior of a different slice untouched at mid height
        assert_eq!(*out.get_pixel(20, 60), BACKGROUND);
    }

    #[test]
    fn test_trail_drawn_only_when_enabled() {
        let mut engine = DecisionEngine::new(&ScannerConfig::default(), 30).unwrap();
        let frame = frame_with_corridor(0, 40);
        let mut analysis = None;
        for _ in 0..3 {
            analysis = Some(engine.process(&frame).0);
        }
        let analysis = analysis.unwrap();

        // Second-oldest marker sits 5 px above the bottom at slice 0 center
        let (mx, my) = (20, 120 - 5);

        let with_trail = render_overlay(
            &frame,
            &analysis,
            engine.history(),
            &OverlayStyle::path_planning(),
        );
        assert_eq!(*with_trail.get_pixel(mx, my), Rgb([255, 0, 255]));

        let without = render_overlay(
            &frame,
            &analysis,
            engine.history(),
            &OverlayStyle::obstacle_avoidance(),
        );
        assert_ne!(*without.get_pixel(mx, my), Rgb([255, 0, 255]));
    }

    #[test]
    fn test_source_frame_untouched() {
        let engine = DecisionEngine::new(&ScannerConfig::default(), 30).unwrap();
        let frame = frame_with_corridor(0, 40);
        let analysis = engine.analyze(&frame);
        let before = frame.pixels().clone();
        let _ = render_overlay(&frame, &analysis, engine.history(), &OverlayStyle::default());
        assert_eq!(frame.pixels().as_raw(), before.as_raw());
    }

    #[test]
    fn test_style_from_config() {
        let config = OverlayConfig {
            style: OverlayStyleName::ObstacleAvoidance,
            draw_trail: Some(true),
        };
        let style = OverlayStyle::from_config(&config);
        assert_eq!(style.label_bar, Rgb([0, 0, 255]));
        assert!(style.draw_trail);
    }

    #[test]
    fn test_tiny_frame_does_not_panic() {
        let mut engine = DecisionEngine::new(&ScannerConfig::default(), 30).unwrap();
        let frame = Frame::new(RgbImage::from_pixel(3, 2, BACKGROUND)).unwrap();
        let (analysis, _) = engine.process(&frame);
        let out = render_overlay(&frame, &analysis, engine.history(), &OverlayStyle::default());
        assert_eq!(out.dimensions(), (3, 2));
    }
}
