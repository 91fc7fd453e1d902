//! Layout configuration: ten named groups of tunable parameters.
//!
//! A `LayoutConfig` is built once per render request by [`resolve`] from
//! built-in defaults, an optional YAML file and an optional override mapping,
//! and is read-only afterwards. Geometry code only ever sees validated values.
//!
//! - `schema`: field table (type, range) and leaf validation
//! - `loader`: layered merge and the section-height invariant

pub mod loader;
pub mod schema;

pub use loader::{resolve, set_override};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{Mm, Pt, Rgb};

/// Placement of labels on the printed page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// One label centered on the page
    #[default]
    Center,
    /// Four label slots in a 2x2 grid
    #[serde(rename = "grid_4up")]
    Grid4Up,
}

impl LayoutMode {
    pub const CHOICES: &'static [&'static str] = &["center", "grid_4up"];

    /// Number of label slots per page
    pub fn slots(self) -> usize {
        match self {
            LayoutMode::Center => 1,
            LayoutMode::Grid4Up => 4,
        }
    }
}

/// The complete, validated layout configuration
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub layout: Layout,
    pub fonts: Fonts,
    pub spacing: Spacing,
    pub postal_box: PostalBox,
    pub address: AddressLayout,
    pub dotted_line: DottedLine,
    pub sama: Sama,
    pub border: Border,
    pub phone: Phone,
    pub section_height: SectionHeights,
}

impl LayoutConfig {
    /// Re-run the schema and invariant checks on a configuration built in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let value = serde_json::to_value(self).map_err(|e| schema::internal_shape_error(&e))?;
        schema::validate(&value)?;
        loader::check_invariants(self)?;
        Ok(())
    }
}

/// Label size, margins and page placement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub label_width: Mm,
    pub label_height: Mm,
    pub margin_top: Mm,
    pub margin_left: Mm,
    pub draw_border: bool,
    pub layout_mode: LayoutMode,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            label_width: Mm(105.0),
            label_height: Mm(122.0),
            margin_top: Mm(7.0),
            margin_left: Mm(5.0),
            draw_border: true,
            layout_mode: LayoutMode::Center,
        }
    }
}

/// Font sizes in whole points
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fonts {
    /// Section caption ("お届け先" / "ご依頼主")
    pub label: u32,
    pub postal_code: u32,
    pub address: u32,
    pub name: u32,
    /// Honorific suffix; `None` derives `name - 2`
    pub honorific: Option<u32>,
    pub phone: u32,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            label: 9,
            postal_code: 13,
            address: 11,
            name: 14,
            honorific: None,
            phone: 13,
        }
    }
}

/// Vertical gaps and horizontal offsets in points
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub section_spacing: i32,
    pub address_line_height: i32,
    pub address_name_gap: i32,
    pub name_phone_gap: i32,
    pub postal_box_offset_x: i32,
    pub postal_box_offset_y: i32,
    pub dotted_line_text_offset: i32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            section_spacing: 15,
            address_line_height: 18,
            address_name_gap: 27,
            name_phone_gap: 36,
            postal_box_offset_x: 15,
            postal_box_offset_y: -2,
            dotted_line_text_offset: 4,
        }
    }
}

/// Postal-code digit boxes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalBox {
    pub box_size: Mm,
    pub box_spacing: Mm,
    pub line_width: Pt,
    pub text_vertical_offset: Pt,
}

impl Default for PostalBox {
    fn default() -> Self {
        Self {
            box_size: Mm(5.0),
            box_spacing: Mm(1.0),
            line_width: Pt(0.5),
            text_vertical_offset: Pt(2.0),
        }
    }
}

/// Address wrapping limits for the "to" section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressLayout {
    pub max_length: u32,
    pub max_lines: u32,
}

impl Default for AddressLayout {
    fn default() -> Self {
        Self { max_length: 35, max_lines: 3 }
    }
}

/// Dashed underlines
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DottedLine {
    pub dash_length: Pt,
    pub dash_spacing: Pt,
    pub color_r: f64,
    pub color_g: f64,
    pub color_b: f64,
}

impl DottedLine {
    pub fn color(&self) -> Rgb {
        Rgb::new(self.color_r, self.color_g, self.color_b)
    }
}

impl Default for DottedLine {
    fn default() -> Self {
        Self {
            dash_length: Pt(2.0),
            dash_spacing: Pt(2.0),
            color_r: 0.5,
            color_g: 0.5,
            color_b: 0.5,
        }
    }
}

/// Space reserved at the end of the name line for the honorific ("様")
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sama {
    pub width: Mm,
    pub offset: Mm,
}

impl Default for Sama {
    fn default() -> Self {
        Self { width: Mm(8.0), offset: Mm(2.0) }
    }
}

/// Label outline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub color_r: f64,
    pub color_g: f64,
    pub color_b: f64,
    pub line_width: Pt,
}

impl Border {
    pub fn color(&self) -> Rgb {
        Rgb::new(self.color_r, self.color_g, self.color_b)
    }
}

impl Default for Border {
    fn default() -> Self {
        Self {
            color_r: 0.8,
            color_g: 0.8,
            color_b: 0.8,
            line_width: Pt(0.5),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phone {
    /// Distance from the "TEL" caption to the number, in points
    pub offset_x: i32,
}

impl Default for Phone {
    fn default() -> Self {
        Self { offset_x: 30 }
    }
}

/// Split of the label into the "to" (upper) and "from" (lower) sections
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionHeights {
    pub to_section_height: Mm,
    pub from_section_height: Mm,
    pub divider_line_width: Pt,
    pub from_section_font_scale: f64,
    pub from_address_max_lines: u32,
    pub from_address_name_gap: i32,
    pub from_name_phone_gap: i32,
    pub from_address_font_size_adjust: i32,
}

impl Default for SectionHeights {
    fn default() -> Self {
        Self {
            to_section_height: Mm(69.0),
            from_section_height: Mm(53.0),
            divider_line_width: Pt(1.0),
            from_section_font_scale: 0.7,
            from_address_max_lines: 2,
            from_address_name_gap: 9,
            from_name_phone_gap: 12,
            from_address_font_size_adjust: 2,
        }
    }
}
