//! The seam between the geometry engine and a drawing backend
//!
//! A PDF writer, an SVG preview or a test recorder all implement [`Canvas`];
//! [`replay`] feeds them rendered pages in painting order.

use super::Page;
use super::instructions::{DashedLine, Line, PostalCodeBoxRow, Rectangle, RenderInstruction, Text};
use crate::types::{Pt, Size};

/// A drawing backend
pub trait Canvas {
    type Error;

    fn begin_page(&mut self, size: Size<Pt>) -> Result<(), Self::Error>;

    fn rectangle(&mut self, rect: &Rectangle) -> Result<(), Self::Error>;

    fn line(&mut self, line: &Line) -> Result<(), Self::Error>;

    fn dashed_line(&mut self, line: &DashedLine) -> Result<(), Self::Error>;

    fn text(&mut self, text: &Text) -> Result<(), Self::Error>;

    /// Backends without a native box-row primitive get boxes, the hyphen and
    /// the digits as individual shapes.
    fn postal_code_boxes(&mut self, row: &PostalCodeBoxRow) -> Result<(), Self::Error> {
        for rect in row.box_rects() {
            self.rectangle(&rect)?;
        }
        self.line(&row.hyphen_line())?;
        for digit in row.digit_texts() {
            self.text(&digit)?;
        }
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), Self::Error>;
}

/// Drive `canvas` through every page, stopping at the first backend error
pub fn replay<C: Canvas + ?Sized>(pages: &[Page], canvas: &mut C) -> Result<(), C::Error> {
    for page in pages {
        canvas.begin_page(page.size)?;
        for instruction in &page.instructions {
            match instruction {
                RenderInstruction::Rectangle(rect) => canvas.rectangle(rect)?,
                RenderInstruction::Line(line) => canvas.line(line)?,
                RenderInstruction::DashedLine(line) => canvas.dashed_line(line)?,
                RenderInstruction::Text(text) => canvas.text(text)?,
                RenderInstruction::PostalCodeBoxRow(row) => canvas.postal_code_boxes(row)?,
            }
        }
        canvas.end_page()?;
    }
    Ok(())
}
