//! Drawing primitives produced by the geometry engine
//!
//! Every primitive knows its bounding box and can be moved, which is all the
//! page placement step needs. Coordinates are points, y grows downward, and
//! text positions are baselines.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::defaults;
use crate::types::{BBox, Offset, Pt, PtPoint, Rgb, Size};

/// Common behavior for all drawing primitives
#[enum_dispatch]
pub trait Primitive {
    /// Smallest box covering everything the primitive paints
    fn bounds(&self) -> BBox<Pt>;

    /// Move the primitive by `by`
    fn translate(&mut self, by: Offset<Pt>);
}

/// One drawing step, in painting order
#[enum_dispatch(Primitive)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    Rectangle(Rectangle),
    Line(Line),
    DashedLine(DashedLine),
    Text(Text),
    PostalCodeBoxRow(PostalCodeBoxRow),
}

// ============================================================================
// Rectangle
// ============================================================================

/// Stroked, unfilled rectangle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Top-left corner
    pub origin: PtPoint,
    pub size: Size<Pt>,
    pub stroke: Rgb,
    pub line_width: Pt,
}

impl Primitive for Rectangle {
    fn bounds(&self) -> BBox<Pt> {
        BBox::from_origin_size(self.origin, self.size)
    }

    fn translate(&mut self, by: Offset<Pt>) {
        self.origin += by;
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Solid straight line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: PtPoint,
    pub to: PtPoint,
    pub stroke: Rgb,
    pub line_width: Pt,
}

impl Primitive for Line {
    fn bounds(&self) -> BBox<Pt> {
        segment_bounds(self.from, self.to)
    }

    fn translate(&mut self, by: Offset<Pt>) {
        self.from += by;
        self.to += by;
    }
}

/// Dashed straight line (`dash` on, `gap` off)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashedLine {
    pub from: PtPoint,
    pub to: PtPoint,
    pub stroke: Rgb,
    pub line_width: Pt,
    pub dash: Pt,
    pub gap: Pt,
}

impl Primitive for DashedLine {
    fn bounds(&self) -> BBox<Pt> {
        segment_bounds(self.from, self.to)
    }

    fn translate(&mut self, by: Offset<Pt>) {
        self.from += by;
        self.to += by;
    }
}

fn segment_bounds(from: PtPoint, to: PtPoint) -> BBox<Pt> {
    let mut bb = BBox::new();
    bb.expand_point(from);
    bb.expand_point(to);
    bb
}

// ============================================================================
// Text
// ============================================================================

/// Horizontal alignment of a text run relative to its position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// A single-line text run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Baseline point; x meaning depends on `anchor`
    pub position: PtPoint,
    pub text: String,
    pub size: Pt,
    pub fill: Rgb,
    pub anchor: TextAnchor,
}

impl Text {
    /// Estimated advance width. Full-width glyphs are one em, ASCII half.
    pub fn width(&self) -> Pt {
        text_width(&self.text, self.size)
    }
}

/// Estimate the advance width of `text` at `size`
pub fn text_width(text: &str, size: Pt) -> Pt {
    let ems: f64 = text
        .chars()
        .map(|c| {
            if c.is_ascii() {
                defaults::HALF_WIDTH_EM
            } else {
                defaults::FULL_WIDTH_EM
            }
        })
        .sum();
    size * ems
}

impl Primitive for Text {
    fn bounds(&self) -> BBox<Pt> {
        let width = self.width();
        let left = match self.anchor {
            TextAnchor::Start => self.position.x,
            TextAnchor::Middle => self.position.x - width / 2.0,
            TextAnchor::End => self.position.x - width,
        };
        let top = self.position.y - self.size * defaults::ASCENT_EM;
        let height = self.size * (defaults::ASCENT_EM + defaults::DESCENT_EM);
        BBox::from_origin_size(PtPoint::new(left, top), Size::new(width, height))
    }

    fn translate(&mut self, by: Offset<Pt>) {
        self.position += by;
    }
}

// ============================================================================
// Postal-code boxes
// ============================================================================

/// Seven digit boxes, 3 + 4, with a hyphen in the wider gap between them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostalCodeBoxRow {
    /// Top-left corner of the first box
    pub origin: PtPoint,
    pub box_size: Pt,
    pub box_spacing: Pt,
    pub hyphen_gap: Pt,
    pub digits: [char; 7],
    pub font_size: Pt,
    /// Distance from the box bottom up to the digit baseline
    pub text_vertical_offset: Pt,
    pub line_width: Pt,
    pub stroke: Rgb,
    pub fill: Rgb,
}

impl PostalCodeBoxRow {
    /// Left edge of box `i` (0-based)
    fn box_left(&self, i: usize) -> Pt {
        let pitch = self.box_size + self.box_spacing;
        if i < 3 {
            self.origin.x + pitch * i as f64
        } else {
            self.second_group_left() + pitch * (i - 3) as f64
        }
    }

    fn second_group_left(&self) -> Pt {
        self.origin.x + self.box_size * 3.0 + self.box_spacing * 2.0 + self.hyphen_gap
    }

    /// Total width from the first box's left edge to the last box's right edge
    pub fn width(&self) -> Pt {
        self.box_size * 7.0 + self.box_spacing * 5.0 + self.hyphen_gap
    }

    /// The seven boxes as rectangles, left to right
    pub fn box_rects(&self) -> Vec<Rectangle> {
        (0..7)
            .map(|i| Rectangle {
                origin: PtPoint::new(self.box_left(i), self.origin.y),
                size: Size::new(self.box_size, self.box_size),
                stroke: self.stroke,
                line_width: self.line_width,
            })
            .collect()
    }

    /// Hyphen stroke centred in the gap between the two groups
    pub fn hyphen_line(&self) -> Line {
        let gap_left = self.second_group_left() - self.hyphen_gap;
        let inset = self.hyphen_gap * defaults::HYPHEN_INSET_RATIO;
        let y = self.origin.y + self.box_size / 2.0;
        Line {
            from: PtPoint::new(gap_left + inset, y),
            to: PtPoint::new(gap_left + self.hyphen_gap - inset, y),
            stroke: self.stroke,
            line_width: self.line_width,
        }
    }

    /// Digits centred in their boxes
    pub fn digit_texts(&self) -> Vec<Text> {
        let baseline = self.origin.y + self.box_size - self.text_vertical_offset;
        self.digits
            .iter()
            .enumerate()
            .map(|(i, digit)| Text {
                position: PtPoint::new(self.box_left(i) + self.box_size / 2.0, baseline),
                text: digit.to_string(),
                size: self.font_size,
                fill: self.fill,
                anchor: TextAnchor::Middle,
            })
            .collect()
    }
}

impl Primitive for PostalCodeBoxRow {
    fn bounds(&self) -> BBox<Pt> {
        BBox::from_origin_size(self.origin, Size::new(self.width(), self.box_size))
    }

    fn translate(&mut self, by: Offset<Pt>) {
        self.origin += by;
    }
}
