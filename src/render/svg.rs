//! SVG preview backend
//!
//! Each page becomes one standalone SVG document sized in millimetres with a
//! point-based viewBox, so instruction coordinates are written unchanged.

use std::fmt::{self, Write};

use super::Page;
use super::canvas::{Canvas, replay};
use super::instructions::{DashedLine, Line, Rectangle, Text, TextAnchor};
use crate::types::{PT_PER_MM, Pt, Size};

/// Font families tried in order by the SVG renderer
pub const FONT_FALLBACKS: &[&str] =
    &["HeiseiKakuGo-W5", "Noto Sans CJK JP", "IPAexGothic", "sans-serif"];

/// Collects one SVG document per page
#[derive(Debug, Default)]
pub struct SvgCanvas {
    documents: Vec<String>,
    current: Option<String>,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished documents, one per page
    pub fn into_documents(self) -> Vec<String> {
        self.documents
    }

    fn out(&mut self) -> Result<&mut String, fmt::Error> {
        self.current.as_mut().ok_or(fmt::Error)
    }
}

/// Render pages straight to SVG documents
pub fn to_svg(pages: &[Page]) -> Result<Vec<String>, fmt::Error> {
    let mut canvas = SvgCanvas::new();
    replay(pages, &mut canvas)?;
    Ok(canvas.into_documents())
}

impl Canvas for SvgCanvas {
    type Error = fmt::Error;

    fn begin_page(&mut self, size: Size<Pt>) -> Result<(), fmt::Error> {
        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}mm" height="{}mm" viewBox="0 0 {} {}">"#,
            fmt_num(size.w.raw() / PT_PER_MM),
            fmt_num(size.h.raw() / PT_PER_MM),
            fmt_num(size.w.raw()),
            fmt_num(size.h.raw()),
        )?;
        let families: Vec<String> = FONT_FALLBACKS
            .iter()
            .map(|f| if f.contains(' ') { format!("'{f}'") } else { f.to_string() })
            .collect();
        writeln!(out, r#"<g font-family="{}">"#, families.join(", "))?;
        self.current = Some(out);
        Ok(())
    }

    fn rectangle(&mut self, rect: &Rectangle) -> Result<(), fmt::Error> {
        writeln!(
            self.out()?,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            fmt_num(rect.origin.x.raw()),
            fmt_num(rect.origin.y.raw()),
            fmt_num(rect.size.w.raw()),
            fmt_num(rect.size.h.raw()),
            rect.stroke.to_css(),
            fmt_num(rect.line_width.raw()),
        )
    }

    fn line(&mut self, line: &Line) -> Result<(), fmt::Error> {
        writeln!(
            self.out()?,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            fmt_num(line.from.x.raw()),
            fmt_num(line.from.y.raw()),
            fmt_num(line.to.x.raw()),
            fmt_num(line.to.y.raw()),
            line.stroke.to_css(),
            fmt_num(line.line_width.raw()),
        )
    }

    fn dashed_line(&mut self, line: &DashedLine) -> Result<(), fmt::Error> {
        writeln!(
            self.out()?,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-dasharray="{} {}"/>"#,
            fmt_num(line.from.x.raw()),
            fmt_num(line.from.y.raw()),
            fmt_num(line.to.x.raw()),
            fmt_num(line.to.y.raw()),
            line.stroke.to_css(),
            fmt_num(line.line_width.raw()),
            fmt_num(line.dash.raw()),
            fmt_num(line.gap.raw()),
        )
    }

    fn text(&mut self, text: &Text) -> Result<(), fmt::Error> {
        let anchor = match text.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        writeln!(
            self.out()?,
            r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}">{}</text>"#,
            fmt_num(text.position.x.raw()),
            fmt_num(text.position.y.raw()),
            fmt_num(text.size.raw()),
            text.fill.to_css(),
            anchor,
            escape_text(&text.text),
        )
    }

    fn end_page(&mut self) -> Result<(), fmt::Error> {
        let mut out = self.current.take().ok_or(fmt::Error)?;
        out.push_str("</g>\n</svg>\n");
        self.documents.push(out);
        Ok(())
    }
}

/// Format a coordinate with at most three decimals, trailing zeros trimmed
fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    s.to_string()
}

fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
