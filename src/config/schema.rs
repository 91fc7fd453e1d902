//! Field table for the layout configuration.
//!
//! Every leaf is declared once here with its semantic type and closed range.
//! Defaults live on the `Default` impls in `config`; the table only knows
//! what a *valid* value looks like. Validation walks the table in order and
//! reports the first offending field.

use serde_json::{Map, Value};

use super::LayoutConfig;
use crate::errors::ValidationError;
use crate::log::warn;

/// Semantic type and closed range of one configuration leaf
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Float { min: f64, max: f64 },
    Int { min: i64, max: i64 },
    /// Integer that may be `null` (meaning "derive it")
    OptionalInt { min: i64, max: i64 },
    Bool,
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Human-readable valid range
    pub fn range(&self) -> String {
        match self {
            FieldKind::Float { min, max } => format!("{}..={}", min, max),
            FieldKind::Int { min, max } => format!("{}..={}", min, max),
            FieldKind::OptionalInt { min, max } => format!("{}..={} or null", min, max),
            FieldKind::Bool => "true | false".to_string(),
            FieldKind::Choice(choices) => choices.join(" | "),
        }
    }

    /// Type name for documentation
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Float { .. } => "float",
            FieldKind::Int { .. } => "int",
            FieldKind::OptionalInt { .. } => "int | null",
            FieldKind::Bool => "bool",
            FieldKind::Choice(_) => "enum",
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Float { .. } => "a number",
            FieldKind::Int { .. } => "an integer",
            FieldKind::OptionalInt { .. } => "an integer or null",
            FieldKind::Bool => "a boolean",
            FieldKind::Choice(_) => "a string",
        }
    }
}

/// Unit a leaf is expressed in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Mm,
    Pt,
    Chars,
    Lines,
    Ratio,
    None,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Pt => "pt",
            Unit::Chars => "chars",
            Unit::Lines => "lines",
            Unit::Ratio | Unit::None => "",
        }
    }
}

/// Declaration of one configuration leaf
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub group: &'static str,
    pub name: &'static str,
    pub kind: FieldKind,
    pub unit: Unit,
    pub description: &'static str,
}

impl FieldSpec {
    /// Dotted path, e.g. `fonts.name`
    pub fn path(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }
}

/// Groups in file order, with their documentation titles
pub const GROUPS: &[(&str, &str)] = &[
    ("layout", "Layout"),
    ("fonts", "Fonts"),
    ("spacing", "Spacing"),
    ("postal_box", "Postal box"),
    ("address", "Address layout"),
    ("dotted_line", "Dotted line"),
    ("sama", "Honorific space"),
    ("border", "Border"),
    ("phone", "Phone"),
    ("section_height", "Section heights"),
];

macro_rules! field {
    ($group:literal . $name:literal, $kind:expr, $unit:ident, $desc:literal) => {
        FieldSpec {
            group: $group,
            name: $name,
            kind: $kind,
            unit: Unit::$unit,
            description: $desc,
        }
    };
}

const fn float(min: f64, max: f64) -> FieldKind {
    FieldKind::Float { min, max }
}

const fn int(min: i64, max: i64) -> FieldKind {
    FieldKind::Int { min, max }
}

#[rustfmt::skip]
pub const FIELDS: &[FieldSpec] = &[
    field!("layout"."label_width", float(50.0, 210.0), Mm, "Label width"),
    field!("layout"."label_height", float(50.0, 297.0), Mm, "Label height"),
    field!("layout"."margin_top", float(0.0, 50.0), Mm, "Top margin inside each section"),
    field!("layout"."margin_left", float(0.0, 50.0), Mm, "Left and right margin inside the label"),
    field!("layout"."draw_border", FieldKind::Bool, None, "Draw the label outline"),
    field!("layout"."layout_mode", FieldKind::Choice(super::LayoutMode::CHOICES), None, "Page placement: one centered label or a 2x2 grid"),

    field!("fonts"."label", int(6, 24), Pt, "Section caption size"),
    field!("fonts"."postal_code", int(6, 36), Pt, "Postal code digit size"),
    field!("fonts"."address", int(6, 36), Pt, "Address text size"),
    field!("fonts"."name", int(6, 48), Pt, "Name size"),
    field!("fonts"."honorific", FieldKind::OptionalInt { min: 6, max: 48 }, Pt, "Honorific size (null: name size - 2)"),
    field!("fonts"."phone", int(6, 36), Pt, "Phone number size"),

    field!("spacing"."section_spacing", int(0, 100), Pt, "Gap between caption, postal row and address block"),
    field!("spacing"."address_line_height", int(1, 100), Pt, "Baseline distance between address lines"),
    field!("spacing"."address_name_gap", int(0, 200), Pt, "Last address baseline to name baseline"),
    field!("spacing"."name_phone_gap", int(0, 200), Pt, "Name baseline to phone baseline"),
    field!("spacing"."postal_box_offset_x", int(-100, 200), Pt, "Horizontal offset of the first postal box"),
    field!("spacing"."postal_box_offset_y", int(-100, 100), Pt, "Vertical nudge of the postal box row"),
    field!("spacing"."dotted_line_text_offset", int(-50, 50), Pt, "Baseline to dashed underline distance"),

    field!("postal_box"."box_size", float(2.0, 15.0), Mm, "Side of one postal digit box"),
    field!("postal_box"."box_spacing", float(0.0, 10.0), Mm, "Gap between adjacent boxes"),
    field!("postal_box"."line_width", float(0.1, 5.0), Pt, "Box stroke width"),
    field!("postal_box"."text_vertical_offset", float(-10.0, 10.0), Pt, "Digit baseline distance above the box bottom"),

    field!("address"."max_length", int(5, 100), Chars, "Characters per address line"),
    field!("address"."max_lines", int(1, 10), Lines, "Address lines in the \"to\" section"),

    field!("dotted_line"."dash_length", float(0.5, 20.0), Pt, "Dash length"),
    field!("dotted_line"."dash_spacing", float(0.5, 20.0), Pt, "Gap between dashes"),
    field!("dotted_line"."color_r", float(0.0, 1.0), Ratio, "Dash color, red"),
    field!("dotted_line"."color_g", float(0.0, 1.0), Ratio, "Dash color, green"),
    field!("dotted_line"."color_b", float(0.0, 1.0), Ratio, "Dash color, blue"),

    field!("sama"."width", float(0.0, 50.0), Mm, "Blank space kept after the name underline"),
    field!("sama"."offset", float(0.0, 20.0), Mm, "Honorific indent inside that space"),

    field!("border"."color_r", float(0.0, 1.0), Ratio, "Outline color, red"),
    field!("border"."color_g", float(0.0, 1.0), Ratio, "Outline color, green"),
    field!("border"."color_b", float(0.0, 1.0), Ratio, "Outline color, blue"),
    field!("border"."line_width", float(0.1, 5.0), Pt, "Outline stroke width"),

    field!("phone"."offset_x", int(0, 200), Pt, "Distance from the TEL caption to the number"),

    field!("section_height"."to_section_height", float(10.0, 287.0), Mm, "Height of the \"to\" section"),
    field!("section_height"."from_section_height", float(10.0, 287.0), Mm, "Height of the \"from\" section"),
    field!("section_height"."divider_line_width", float(0.1, 5.0), Pt, "Divider stroke width"),
    field!("section_height"."from_section_font_scale", float(0.3, 1.5), Ratio, "Scale applied to \"from\" section sizes"),
    field!("section_height"."from_address_max_lines", int(1, 10), Lines, "Address lines in the \"from\" section"),
    field!("section_height"."from_address_name_gap", int(0, 200), Pt, "\"from\" address to name gap"),
    field!("section_height"."from_name_phone_gap", int(0, 200), Pt, "\"from\" name to phone gap"),
    field!("section_height"."from_address_font_size_adjust", int(-10, 10), Pt, "Added to the address size before scaling"),
];

/// Look up a field by dotted path
pub fn field(path: &str) -> Option<&'static FieldSpec> {
    let (group, name) = path.split_once('.')?;
    FIELDS.iter().find(|f| f.group == group && f.name == name)
}

/// Validate a (possibly partial) configuration mapping.
///
/// Returns the normalized mapping: only known groups and fields, integers
/// written as `14.0` turned into `14`. Missing fields stay missing and take
/// their defaults when the mapping is turned into a `LayoutConfig`.
pub fn validate(value: &Value) -> Result<Value, ValidationError> {
    let root = as_mapping("<root>", value)?;

    for key in root.keys() {
        if !GROUPS.iter().any(|(group, _)| group == key) {
            warn!(group = %key, "ignoring unknown configuration group");
        }
    }

    let mut normalized = Map::new();
    for (group, _) in GROUPS {
        let Some(group_value) = root.get(*group) else {
            continue;
        };
        let fields = as_mapping(group, group_value)?;

        for key in fields.keys() {
            if field(&format!("{}.{}", group, key)).is_none() {
                warn!(group = %group, field = %key, "ignoring unknown configuration field");
            }
        }

        let mut out = Map::new();
        for spec in FIELDS.iter().filter(|f| f.group == *group) {
            if let Some(leaf) = fields.get(spec.name) {
                out.insert(spec.name.to_string(), check_leaf(spec, leaf)?);
            }
        }
        normalized.insert(group.to_string(), Value::Object(out));
    }

    Ok(Value::Object(normalized))
}

/// Turn a validated mapping into the typed configuration
pub(crate) fn into_config(normalized: Value) -> Result<LayoutConfig, ValidationError> {
    serde_json::from_value(normalized).map_err(|e| internal_shape_error(&e))
}

pub(crate) fn internal_shape_error(e: &serde_json::Error) -> ValidationError {
    ValidationError::Shape { message: e.to_string() }
}

fn as_mapping<'a>(
    field: &str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::NotAMapping {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn check_leaf(spec: &FieldSpec, value: &Value) -> Result<Value, ValidationError> {
    let wrong_type = || ValidationError::WrongType {
        field: spec.path(),
        value: value.to_string(),
        expected: spec.kind.expected(),
        range: spec.kind.range(),
    };
    let out_of_range = || ValidationError::OutOfRange {
        field: spec.path(),
        value: value.to_string(),
        range: spec.kind.range(),
    };

    match spec.kind {
        FieldKind::Float { min, max } => {
            let v = value.as_f64().ok_or_else(wrong_type)?;
            if !(min..=max).contains(&v) {
                return Err(out_of_range());
            }
            Ok(value.clone())
        }
        FieldKind::OptionalInt { .. } if value.is_null() => Ok(Value::Null),
        FieldKind::Int { min, max } | FieldKind::OptionalInt { min, max } => {
            let v = as_integer(value).ok_or_else(wrong_type)?;
            if !(min..=max).contains(&v) {
                return Err(out_of_range());
            }
            Ok(Value::from(v))
        }
        FieldKind::Bool => {
            value.as_bool().ok_or_else(wrong_type)?;
            Ok(value.clone())
        }
        FieldKind::Choice(choices) => {
            let v = value.as_str().ok_or_else(wrong_type)?;
            if !choices.contains(&v) {
                return Err(ValidationError::UnknownChoice {
                    field: spec.path(),
                    value: value.to_string(),
                    allowed: choices.join(", "),
                });
            }
            Ok(value.clone())
        }
    }
}

/// Integers, or floats with no fractional part
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(v) = value.as_i64() {
        return Some(v);
    }
    let v = value.as_f64()?;
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}
