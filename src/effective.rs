//! Effective values derived from a validated [`LayoutConfig`].
//!
//! Nothing here is stored back into the configuration. The geometry engine
//! asks for an [`EffectiveLayout`] on every render; it is a handful of
//! multiplications.

use crate::config::{Fonts, LayoutConfig};
use crate::types::{Pt, Rgb};

/// Grey used for section captions and the "TEL" marker
pub const CAPTION_GRAY: f64 = 0.3;

/// Sizes and limits for one section of a label, all in points
#[derive(Clone, Debug, PartialEq)]
pub struct SectionMetrics {
    pub caption_size: Pt,
    pub postal_code_size: Pt,
    pub address_size: Pt,
    pub name_size: Pt,
    pub honorific_size: Pt,
    pub phone_size: Pt,
    pub address_line_height: Pt,
    pub address_name_gap: Pt,
    pub name_phone_gap: Pt,
    pub box_size: Pt,
    pub box_spacing: Pt,
    pub max_length: usize,
    pub max_lines: usize,
}

/// Colors for every kind of mark on the label
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub border: Rgb,
    pub dashed: Rgb,
    pub divider: Rgb,
    pub boxes: Rgb,
    pub text: Rgb,
    pub caption: Rgb,
}

/// Everything the geometry engine needs beyond the raw configuration
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveLayout {
    pub to: SectionMetrics,
    pub from: SectionMetrics,
    pub colors: Palette,
}

impl EffectiveLayout {
    pub fn resolve(config: &LayoutConfig) -> Self {
        Self {
            to: to_section(config),
            from: from_section(config),
            colors: Palette {
                border: config.border.color(),
                dashed: config.dotted_line.color(),
                divider: Rgb::BLACK,
                boxes: Rgb::BLACK,
                text: Rgb::BLACK,
                caption: Rgb::gray(CAPTION_GRAY),
            },
        }
    }
}

/// Honorific font size: the configured one, or two points below the name.
pub fn honorific_size(fonts: &Fonts) -> Pt {
    match fonts.honorific {
        Some(size) => Pt::from(size),
        None => Pt::from(fonts.name) - Pt(2.0),
    }
}

/// `(address + from_address_font_size_adjust) × from_section_font_scale`
pub fn from_address_size(config: &LayoutConfig) -> Pt {
    let heights = &config.section_height;
    let adjust = Pt(f64::from(heights.from_address_font_size_adjust));
    let adjusted = Pt::from(config.fonts.address) + adjust;
    adjusted * heights.from_section_font_scale
}

fn to_section(config: &LayoutConfig) -> SectionMetrics {
    let fonts = &config.fonts;
    let spacing = &config.spacing;
    SectionMetrics {
        caption_size: Pt::from(fonts.label),
        postal_code_size: Pt::from(fonts.postal_code),
        address_size: Pt::from(fonts.address),
        name_size: Pt::from(fonts.name),
        honorific_size: honorific_size(fonts),
        phone_size: Pt::from(fonts.phone),
        address_line_height: Pt(f64::from(spacing.address_line_height)),
        address_name_gap: Pt(f64::from(spacing.address_name_gap)),
        name_phone_gap: Pt(f64::from(spacing.name_phone_gap)),
        box_size: config.postal_box.box_size.to_pt(),
        box_spacing: config.postal_box.box_spacing.to_pt(),
        max_length: config.address.max_length as usize,
        max_lines: config.address.max_lines as usize,
    }
}

fn from_section(config: &LayoutConfig) -> SectionMetrics {
    let fonts = &config.fonts;
    let heights = &config.section_height;
    let scale = heights.from_section_font_scale;
    SectionMetrics {
        caption_size: Pt::from(fonts.label) * scale,
        postal_code_size: Pt::from(fonts.postal_code) * scale,
        address_size: from_address_size(config),
        name_size: Pt::from(fonts.name) * scale,
        honorific_size: honorific_size(fonts) * scale,
        phone_size: Pt::from(fonts.phone) * scale,
        address_line_height: Pt(f64::from(config.spacing.address_line_height)) * scale,
        address_name_gap: Pt(f64::from(heights.from_address_name_gap)),
        name_phone_gap: Pt(f64::from(heights.from_name_phone_gap)),
        box_size: config.postal_box.box_size.to_pt() * scale,
        box_spacing: config.postal_box.box_spacing.to_pt() * scale,
        max_length: config.address.max_length as usize,
        max_lines: heights.from_address_max_lines as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Pt, expected: f64) {
        assert!(
            (actual.raw() - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn honorific_defaults_to_name_minus_two() {
        let config = LayoutConfig::default();
        assert_eq!(config.fonts.name, 14);
        assert_eq!(config.fonts.honorific, None);
        assert_eq!(honorific_size(&config.fonts), Pt(12.0));
    }

    #[test]
    fn explicit_honorific_wins() {
        let mut config = LayoutConfig::default();
        config.fonts.honorific = Some(10);
        assert_eq!(honorific_size(&config.fonts), Pt(10.0));
    }

    #[test]
    fn from_address_size_is_adjusted_then_scaled() {
        let config = LayoutConfig::default();
        assert_close(from_address_size(&config), 9.1);
    }

    #[test]
    fn from_section_scales_everything_but_gaps() {
        let config = LayoutConfig::default();
        let effective = EffectiveLayout::resolve(&config);

        assert_close(effective.from.name_size, 14.0 * 0.7);
        assert_close(effective.from.honorific_size, 12.0 * 0.7);
        assert_close(effective.from.phone_size, 13.0 * 0.7);
        assert_close(effective.from.address_line_height, 18.0 * 0.7);
        assert_close(effective.from.box_size, config.postal_box.box_size.to_pt().raw() * 0.7);
        assert_eq!(effective.from.address_name_gap, Pt(9.0));
        assert_eq!(effective.from.name_phone_gap, Pt(12.0));
        assert_eq!(effective.from.max_lines, 2);
    }

    #[test]
    fn to_section_uses_configured_sizes() {
        let effective = EffectiveLayout::resolve(&LayoutConfig::default());
        assert_eq!(effective.to.address_size, Pt(11.0));
        assert_eq!(effective.to.address_name_gap, Pt(27.0));
        assert_eq!(effective.to.max_lines, 3);
        assert_eq!(effective.to.max_length, 35);
    }

    #[test]
    fn palette_follows_configuration() {
        let mut config = LayoutConfig::default();
        config.border.color_r = 1.0;
        let colors = EffectiveLayout::resolve(&config).colors;
        assert_eq!(colors.border, Rgb::new(1.0, 0.8, 0.8));
        assert_eq!(colors.dashed, Rgb::gray(0.5));
        assert_eq!(colors.divider, Rgb::BLACK);
        assert_eq!(colors.caption, Rgb::gray(CAPTION_GRAY));
    }
}
