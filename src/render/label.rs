//! Geometry of a single label in label-local coordinates
//!
//! Origin is the label's top-left corner. Each section is laid out top to
//! bottom with explicit configured gaps; nothing reflows, so content that is
//! too long for its section simply runs past it.

use super::defaults;
use super::instructions::{
    DashedLine, Line, PostalCodeBoxRow, Rectangle, RenderInstruction, Text, TextAnchor,
};
use crate::address::AddressRecord;
use crate::config::LayoutConfig;
use crate::effective::{EffectiveLayout, SectionMetrics};
use crate::log::trace;
use crate::types::{Pt, PtPoint, Rgb, Size};
use crate::wrap::wrap_lines;

/// Lay out one label: border, "to" section, divider, "from" section.
pub fn layout_label(
    to: &AddressRecord,
    from: &AddressRecord,
    config: &LayoutConfig,
    effective: &EffectiveLayout,
) -> Vec<RenderInstruction> {
    let width = config.layout.label_width.to_pt();
    let height = config.layout.label_height.to_pt();
    let divider_y = config.section_height.to_section_height.to_pt();

    let mut out = Vec::new();

    if config.layout.draw_border {
        out.push(
            Rectangle {
                origin: PtPoint::new(Pt::ZERO, Pt::ZERO),
                size: Size::new(width, height),
                stroke: effective.colors.border,
                line_width: config.border.line_width,
            }
            .into(),
        );
    }

    let mut section = SectionBuilder { config, effective, out: &mut out };
    section.layout(Pt::ZERO, defaults::TO_CAPTION, &effective.to, to);

    out.push(
        Line {
            from: PtPoint::new(Pt::ZERO, divider_y),
            to: PtPoint::new(width, divider_y),
            stroke: effective.colors.divider,
            line_width: config.section_height.divider_line_width,
        }
        .into(),
    );

    let mut section = SectionBuilder { config, effective, out: &mut out };
    section.layout(divider_y, defaults::FROM_CAPTION, &effective.from, from);

    trace!(count = out.len(), "label instructions");
    out
}

struct SectionBuilder<'a> {
    config: &'a LayoutConfig,
    effective: &'a EffectiveLayout,
    out: &'a mut Vec<RenderInstruction>,
}

impl SectionBuilder<'_> {
    fn layout(
        &mut self,
        top: Pt,
        caption: &str,
        metrics: &SectionMetrics,
        record: &AddressRecord,
    ) {
        let cfg = self.config;
        let colors = self.effective.colors;
        let spacing = &cfg.spacing;
        let section_spacing = Pt(f64::from(spacing.section_spacing));
        let underline_drop = Pt(f64::from(spacing.dotted_line_text_offset));
        let left = cfg.layout.margin_left.to_pt();
        let right = cfg.layout.label_width.to_pt() - left;
        let margin_top = cfg.layout.margin_top.to_pt();

        // Caption
        self.text(
            PtPoint::new(left, top + margin_top + metrics.caption_size),
            caption,
            metrics.caption_size,
            colors.caption,
        );

        // Postal code
        let postal_top =
            top + margin_top + section_spacing + Pt(f64::from(spacing.postal_box_offset_y));
        let text_vertical_offset = cfg.postal_box.text_vertical_offset;
        self.text(
            PtPoint::new(left, postal_top + metrics.box_size - text_vertical_offset),
            defaults::POSTAL_MARK,
            metrics.postal_code_size,
            colors.text,
        );
        self.out.push(
            PostalCodeBoxRow {
                origin: PtPoint::new(left + Pt(f64::from(spacing.postal_box_offset_x)), postal_top),
                box_size: metrics.box_size,
                box_spacing: metrics.box_spacing,
                hyphen_gap: metrics.box_size * defaults::HYPHEN_GAP_RATIO,
                digits: record.postal_code.digits(),
                font_size: metrics.postal_code_size,
                text_vertical_offset,
                line_width: cfg.postal_box.line_width,
                stroke: colors.boxes,
                fill: colors.text,
            }
            .into(),
        );

        // Address block
        let lines = wrap_lines(&record.address_lines, metrics.max_length, metrics.max_lines);
        let first_baseline = postal_top + metrics.box_size + section_spacing + metrics.address_size;
        let mut baseline = first_baseline;
        for (i, line) in lines.iter().enumerate() {
            baseline = first_baseline + metrics.address_line_height * i as f64;
            self.text(PtPoint::new(left, baseline), line, metrics.address_size, colors.text);
            self.underline(left, right, baseline + underline_drop);
        }

        // Name and honorific
        let name_baseline = baseline + metrics.address_name_gap;
        self.text(PtPoint::new(left, name_baseline), &record.name, metrics.name_size, colors.text);
        let sama_width = cfg.sama.width.to_pt();
        let name_line_end = match &record.honorific {
            Some(honorific) => {
                self.text(
                    PtPoint::new(right - sama_width + cfg.sama.offset.to_pt(), name_baseline),
                    honorific,
                    metrics.honorific_size,
                    colors.text,
                );
                right - sama_width
            }
            None => right,
        };
        self.underline(left, name_line_end, name_baseline + underline_drop);

        // Phone
        let phone_baseline = name_baseline + metrics.name_phone_gap;
        self.text(
            PtPoint::new(left, phone_baseline),
            defaults::PHONE_CAPTION,
            metrics.phone_size,
            colors.caption,
        );
        if let Some(phone) = &record.phone {
            let x = left + Pt(f64::from(cfg.phone.offset_x));
            self.text(PtPoint::new(x, phone_baseline), phone, metrics.phone_size, colors.text);
        }
    }

    fn text(&mut self, position: PtPoint, text: &str, size: Pt, fill: Rgb) {
        self.out.push(
            Text {
                position,
                text: text.to_string(),
                size,
                fill,
                anchor: TextAnchor::Start,
            }
            .into(),
        );
    }

    fn underline(&mut self, from_x: Pt, to_x: Pt, y: Pt) {
        let dotted = &self.config.dotted_line;
        self.out.push(
            DashedLine {
                from: PtPoint::new(from_x, y),
                to: PtPoint::new(to_x, y),
                stroke: self.effective.colors.dashed,
                line_width: defaults::DASHED_LINE_WIDTH,
                dash: dotted.dash_length,
                gap: dotted.dash_spacing,
            }
            .into(),
        );
    }
}
