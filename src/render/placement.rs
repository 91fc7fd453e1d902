//! Where labels sit on the printed page

use glam::{DVec2, dvec2};

use crate::config::LayoutMode;
use crate::log::warn;
use crate::types::{Pt, PtPoint, Size};

/// Top-left corner of every label slot on a page, in filling order.
///
/// `Center` has one slot in the middle of the page. `Grid4Up` centres a
/// 2 x 2 block of labels and fills it row-major.
pub fn slot_origins(page: Size<Pt>, label: Size<Pt>, mode: LayoutMode) -> Vec<PtPoint> {
    let page = dvec2(page.w.raw(), page.h.raw());
    let label = dvec2(label.w.raw(), label.h.raw());

    let (block, cells): (DVec2, &[DVec2]) = match mode {
        LayoutMode::Center => (label, &[DVec2::ZERO]),
        LayoutMode::Grid4Up => (label * 2.0, &[DVec2::ZERO, DVec2::X, DVec2::Y, DVec2::ONE]),
    };

    let block_origin = (page - block) / 2.0;
    if block_origin.min_element() < 0.0 {
        warn!(?mode, "labels do not fit on the page and will be clipped");
    }

    cells
        .iter()
        .map(|cell| {
            let origin = block_origin + *cell * label;
            PtPoint::new(Pt(origin.x), Pt(origin.y))
        })
        .collect()
}
