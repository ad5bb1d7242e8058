//! Board renderer.
//!
//! Lays out one line per record on a fixed-width canvas whose height grows
//! with the record count, then encodes the raster as PNG:
//!
//! ```text
//! ┌──────────────────────────────────────────── 600 px ─┐
//! │ Title (bold 24)                          header 60   │
//! │ Ana: hello                        10/18/2026, ...    │  30 px per line
//! │ Ben: ahoj                         10/18/2026, ...    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Records are drawn in the order given. The store hands them over newest
//! first and the renderer does not re-sort.

mod fonts;

use std::fmt::Write as _;
use std::io::Cursor;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

pub use fonts::{FontSet, Weight};

use crate::error::RenderError;
use crate::record::MessageRecord;

pub const CANVAS_WIDTH: u32 = 600;
pub const LINE_HEIGHT: u32 = 30;
pub const PADDING: u32 = 20;
pub const HEADER_HEIGHT: u32 = 60;
/// Extra space below the message block, present only when there are records.
pub const MESSAGE_BLOCK_MARGIN: u32 = 20;
/// Horizontal gap between the name label and the message body.
pub const LABEL_GAP: u32 = 10;
/// Width reserved at the right edge for the timestamp column.
pub const TIMESTAMP_ZONE: u32 = 150;

const TITLE_BASELINE: i32 = 40;
const TITLE_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 16.0;
const TIMESTAMP_SIZE: f32 = 12.0;

const BACKGROUND: Rgba<u8> = Rgba([0xf0, 0xf0, 0xf0, 0xff]);
const TITLE_COLOR: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 0xff]);
const NAME_COLOR: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);
const BODY_COLOR: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 0xff]);
const MUTED_COLOR: Rgba<u8> = Rgba([0x99, 0x99, 0x99, 0xff]);

/// Canvas height for `records` lines.
pub fn canvas_height(records: usize) -> u32 {
    let records = records as u32;
    let message_height = if records > 0 {
        records * LINE_HEIGHT + MESSAGE_BLOCK_MARGIN
    } else {
        0
    };
    HEADER_HEIGHT + message_height + PADDING * 2
}

/// Static texts and formats drawn on the board.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    /// Shown instead of message lines when the board is empty.
    pub empty_text: String,
    /// `chrono` strftime pattern, applied in the server's local timezone.
    pub timestamp_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Jendova epická Nástěnka".to_owned(),
            empty_text: "Žádné zprávy, buď první!".to_owned(),
            timestamp_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_owned(),
        }
    }
}

/// Pixel positions of one record's line. `x` values are left edges,
/// `baseline` is the shared text baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    pub baseline: i32,
    pub label: String,
    pub label_x: i32,
    pub label_width: u32,
    pub body_x: i32,
    pub timestamp: String,
    pub timestamp_x: i32,
}

/// Canvas size plus the placement of every record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<LineLayout>,
}

/// Draws message records onto a PNG.
#[derive(Debug, Clone)]
pub struct BoardRenderer {
    fonts: FontSet,
    options: RenderOptions,
}

impl BoardRenderer {
    /// Fails when `options.timestamp_format` is not a valid strftime pattern,
    /// so a bad format is caught at startup instead of on every request.
    pub fn new(fonts: FontSet, options: RenderOptions) -> Result<Self, RenderError> {
        if StrftimeItems::new(&options.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(RenderError::InvalidTimestampFormat(options.timestamp_format));
        }
        Ok(Self { fonts, options })
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Human-readable local time for a record.
    pub fn format_timestamp(&self, ts: DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", ts.with_timezone(&Local).format(&self.options.timestamp_format)).is_err() {
            return ts.with_timezone(&Local).to_rfc2822();
        }
        out
    }

    /// Compute where every line goes without drawing anything.
    pub fn layout(&self, records: &[MessageRecord]) -> BoardLayout {
        let first_baseline = (HEADER_HEIGHT + PADDING) as i32;
        let timestamp_x = (CANVAS_WIDTH - PADDING - TIMESTAMP_ZONE) as i32;

        let lines = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let label = format!("{}:", record.name);
                let label_width = self.fonts.measure(&label, BODY_SIZE, Weight::Bold);
                LineLayout {
                    baseline: first_baseline + (index as u32 * LINE_HEIGHT) as i32,
                    label_x: PADDING as i32,
                    body_x: (PADDING + label_width + LABEL_GAP) as i32,
                    label,
                    label_width,
                    timestamp: self.format_timestamp(record.created_at),
                    timestamp_x,
                }
            })
            .collect();

        BoardLayout {
            width: CANVAS_WIDTH,
            height: canvas_height(records.len()),
            lines,
        }
    }

    /// Render `records` (already newest first) and return PNG bytes.
    pub fn render(&self, records: &[MessageRecord]) -> Result<Vec<u8>, RenderError> {
        let layout = self.layout(records);
        let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, BACKGROUND);

        self.draw(
            &mut canvas,
            &self.options.title,
            PADDING as i32,
            TITLE_BASELINE,
            TITLE_SIZE,
            Weight::Bold,
            TITLE_COLOR,
        );

        if records.is_empty() {
            self.draw(
                &mut canvas,
                &self.options.empty_text,
                PADDING as i32,
                (HEADER_HEIGHT + PADDING) as i32,
                BODY_SIZE,
                Weight::Regular,
                MUTED_COLOR,
            );
        }

        for (line, record) in layout.lines.iter().zip(records) {
            self.draw(&mut canvas, &line.label, line.label_x, line.baseline, BODY_SIZE, Weight::Bold, NAME_COLOR);
            self.draw(&mut canvas, &record.body, line.body_x, line.baseline, BODY_SIZE, Weight::Regular, BODY_COLOR);
            self.draw(
                &mut canvas,
                &line.timestamp,
                line.timestamp_x,
                line.baseline,
                TIMESTAMP_SIZE,
                Weight::Regular,
                MUTED_COLOR,
            );
        }

        encode_png(canvas)
    }

    /// Draw `text` with its left edge at `x` and its baseline at `baseline`.
    #[allow(clippy::too_many_arguments)]
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        baseline: i32,
        size: f32,
        weight: Weight,
        color: Rgba<u8>,
    ) {
        let face = self.fonts.face(weight);
        let top = baseline - self.fonts.ascent(size, weight);
        for strike in 0..=self.fonts.extra_strikes(weight) {
            draw_text_mut(canvas, color, x + strike as i32, top, size, face, text);
        }
    }
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod test {
    use super::*;

    fn renderer() -> BoardRenderer {
        BoardRenderer::new(FontSet::embedded().unwrap(), RenderOptions::default()).unwrap()
    }

    fn record(id: i64, name: &str, body: &str) -> MessageRecord {
        MessageRecord {
            id,
            name: name.to_owned(),
            body: body.to_owned(),
            created_at: "2026-10-18T12:00:00Z".parse().unwrap(),
        }
    }

    /// `true` if any pixel in the given box differs from the background.
    fn has_ink(image: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
        (y0..y1.min(image.height()))
            .flat_map(|y| (x0..x1.min(image.width())).map(move |x| (x, y)))
            .any(|(x, y)| *image.get_pixel(x, y) != BACKGROUND)
    }

    #[test]
    fn height_formula() {
        assert_eq!(canvas_height(0), 100);
        assert_eq!(canvas_height(1), 150);
        assert_eq!(canvas_height(2), 180);
        assert_eq!(canvas_height(10), 60 + 10 * 30 + 20 + 40);
    }

    #[test]
    fn empty_board_draws_placeholder() {
        let png = renderer().render(&[]).unwrap();
        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (CANVAS_WIDTH, 100));
        // Placeholder sits on baseline 80, left-aligned at the padding.
        assert!(has_ink(&image, PADDING, 64, 300, 85));
        // Nothing is drawn below its descenders.
        assert!(!has_ink(&image, 0, 90, CANVAS_WIDTH, 100));
    }

    #[test]
    fn rendered_size_matches_layout() {
        let records: Vec<_> = (0..5).map(|i| record(i, "Ana", "hello")).collect();
        let png = renderer().render(&records).unwrap();
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!(image.width(), CANVAS_WIDTH);
        assert_eq!(image.height(), canvas_height(5));
    }

    #[test]
    fn body_starts_after_measured_label() {
        let renderer = renderer();
        let long_name = "W".repeat(100);
        let records = vec![record(2, "i", "short"), record(1, &long_name, "long")];
        let layout = renderer.layout(&records);

        for line in &layout.lines {
            let measured = renderer.fonts().measure(&line.label, BODY_SIZE, Weight::Bold);
            assert_eq!(line.label_width, measured);
            assert!(line.body_x >= (PADDING + measured + LABEL_GAP) as i32);
        }
        assert!(layout.lines[1].body_x > layout.lines[0].body_x);
    }

    #[test]
    fn lines_step_by_line_height_in_input_order() {
        let records = vec![record(3, "C", "c"), record(2, "B", "b"), record(1, "A", "a")];
        let layout = renderer().layout(&records);
        let baselines: Vec<i32> = layout.lines.iter().map(|l| l.baseline).collect();
        assert_eq!(baselines, vec![80, 110, 140]);
        let labels: Vec<&str> = layout.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["C:", "B:", "A:"]);
    }

    #[test]
    fn timestamp_column_is_fixed() {
        let records = vec![record(1, "Ana", "hello"), record(2, &"x".repeat(100), "y")];
        let layout = renderer().layout(&records);
        for line in &layout.lines {
            assert_eq!(line.timestamp_x, 430);
            assert!(!line.timestamp.is_empty());
        }
    }

    #[test]
    fn message_line_draws_label_body_and_timestamp() {
        let renderer = renderer();
        let records = vec![record(1, "Ana", "hello")];
        let layout = renderer.layout(&records);
        let line = &layout.lines[0];
        let png = renderer.render(&records).unwrap();
        let image = image::load_from_memory(&png).unwrap().to_rgba8();

        let label_end = line.label_x as u32 + line.label_width;
        assert!(has_ink(&image, line.label_x as u32, 64, label_end, 85));
        assert!(has_ink(&image, line.body_x as u32, 64, line.body_x as u32 + 60, 85));
        assert!(has_ink(&image, line.timestamp_x as u32, 64, CANVAS_WIDTH, 85));
        // The gap between label and body stays clear.
        assert!(!has_ink(&image, label_end + 3, 64, line.body_x as u32 - 2, 85));
    }

    #[test]
    fn long_body_overflows_without_error() {
        let records = vec![record(1, "Ana", &"ž".repeat(500))];
        let png = renderer().render(&records).unwrap();
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!(image.width(), CANVAS_WIDTH);
    }

    #[test]
    fn invalid_timestamp_format_is_rejected() {
        let options = RenderOptions {
            timestamp_format: "%Q".to_owned(),
            ..RenderOptions::default()
        };
        let err = BoardRenderer::new(FontSet::embedded().unwrap(), options).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTimestampFormat(_)));
    }

    #[test]
    fn timestamp_uses_configured_format() {
        let options = RenderOptions {
            timestamp_format: "%Y".to_owned(),
            ..RenderOptions::default()
        };
        let renderer = BoardRenderer::new(FontSet::embedded().unwrap(), options).unwrap();
        let ts: DateTime<Utc> = "2026-06-15T12:00:00Z".parse().unwrap();
        assert_eq!(renderer.format_timestamp(ts), "2026");
    }
}
