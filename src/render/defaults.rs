//! Fixed drawing constants that are not part of the tunable configuration

use crate::types::{Mm, Pt, Size};

/// Printed page (A4 portrait)
pub const PAGE_SIZE: Size<Mm> = Size { w: Mm(210.0), h: Mm(297.0) };

pub const TO_CAPTION: &str = "お届け先";
pub const FROM_CAPTION: &str = "ご依頼主";
pub const POSTAL_MARK: &str = "〒";
pub const PHONE_CAPTION: &str = "TEL";

/// Gap between the third and fourth postal box, relative to the box size
pub const HYPHEN_GAP_RATIO: f64 = 0.6;
/// Share of the hyphen gap left empty on each side of the hyphen stroke
pub const HYPHEN_INSET_RATIO: f64 = 0.2;

/// Stroke width of dashed writing guides
pub const DASHED_LINE_WIDTH: Pt = Pt(0.5);

/// Width of a full-width glyph in ems; half-width ASCII uses `HALF_WIDTH_EM`
pub const FULL_WIDTH_EM: f64 = 1.0;
pub const HALF_WIDTH_EM: f64 = 0.5;
/// Glyph extent above and below the baseline, in ems
pub const ASCENT_EM: f64 = 0.88;
pub const DESCENT_EM: f64 = 0.12;
