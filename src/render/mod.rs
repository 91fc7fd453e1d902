//! Label geometry engine
//!
//! This module is organized into submodules:
//! - `defaults`: fixed page size, captions and glyph metrics
//! - `instructions`: `RenderInstruction` and its primitives
//! - `label`: single-label layout in label-local coordinates
//! - `placement`: label slots on the page for each layout mode
//! - `canvas`: the seam to a drawing backend
//! - `svg`: SVG preview backend
//!
//! Rendering never fails: it takes an already-validated configuration and
//! address records and is a pure function of them.

pub mod canvas;
pub mod defaults;
pub mod instructions;
pub mod label;
pub mod placement;
pub mod svg;

pub use canvas::{Canvas, replay};
pub use instructions::{
    DashedLine, Line, PostalCodeBoxRow, Primitive, Rectangle, RenderInstruction, Text, TextAnchor,
};
pub use svg::SvgCanvas;

use serde::{Deserialize, Serialize};

use crate::address::AddressRecord;
use crate::config::{LayoutConfig, LayoutMode};
use crate::effective::EffectiveLayout;
use crate::log::debug;
use crate::types::{BBox, Offset, Pt, Size};

/// One printed page, instructions in page coordinates and painting order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub size: Size<Pt>,
    pub instructions: Vec<RenderInstruction>,
}

impl Page {
    /// Bounding box of everything painted on the page
    pub fn bounds(&self) -> BBox<Pt> {
        let mut bb = BBox::new();
        for instruction in &self.instructions {
            bb.expand_bbox(&instruction.bounds());
        }
        bb
    }
}

/// Render one label pair onto a single page.
///
/// In `Grid4Up` mode the pair takes the first slot and the other three stay
/// blank.
pub fn render(
    to: &AddressRecord,
    from: &AddressRecord,
    config: &LayoutConfig,
    mode: LayoutMode,
) -> Page {
    compose_page([(to, from)], config, mode)
}

/// Render a batch of label pairs: one page per pair in `Center` mode, one
/// page per four pairs in `Grid4Up` mode. Unused slots on the last page are
/// left blank. An empty batch produces no pages.
pub fn render_batch(
    pairs: &[(AddressRecord, AddressRecord)],
    config: &LayoutConfig,
    mode: LayoutMode,
) -> Vec<Page> {
    let pages: Vec<Page> = pairs
        .chunks(mode.slots())
        .map(|chunk| compose_page(chunk.iter().map(|(to, from)| (to, from)), config, mode))
        .collect();
    debug!(labels = pairs.len(), pages = pages.len(), ?mode, "rendered batch");
    pages
}

fn compose_page<'a>(
    labels: impl IntoIterator<Item = (&'a AddressRecord, &'a AddressRecord)>,
    config: &LayoutConfig,
    mode: LayoutMode,
) -> Page {
    let effective = EffectiveLayout::resolve(config);
    let page_size = defaults::PAGE_SIZE.to_pt();
    let label_size = Size::new(config.layout.label_width, config.layout.label_height).to_pt();
    let origins = placement::slot_origins(page_size, label_size, mode);

    let mut instructions = Vec::new();
    for (origin, (to, from)) in origins.into_iter().zip(labels) {
        let offset = Offset::new(origin.x, origin.y);
        for mut instruction in label::layout_label(to, from, config, &effective) {
            instruction.translate(offset);
            instructions.push(instruction);
        }
    }

    Page { size: page_size, instructions }
}
