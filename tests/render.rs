//! End-to-end rendering through the public API

use letterpack::render::svg::to_svg;
use letterpack::render::{Primitive, TextAnchor};
use letterpack::types::{BBox, Pt, PtPoint};
use letterpack::{
    AddressRecord, LabelPair, LayoutConfig, LayoutMode, Page, RenderInstruction, render,
    render_batch, resolve,
};
use serde_json::json;

fn recipient() -> AddressRecord {
    AddressRecord::new(
        "100-0001",
        ["東京都千代田区千代田1-1", "千代田マンション101"],
        "山田太郎",
    )
    .unwrap()
    .with_phone("03-1234-5678")
    .with_honorific("様")
}

fn sender() -> AddressRecord {
    AddressRecord::new("530-0001", ["大阪府大阪市北区梅田1-1"], "佐藤花子")
        .unwrap()
        .with_phone("06-1234-5678")
}

fn texts(page: &Page) -> Vec<&str> {
    page.instructions
        .iter()
        .filter_map(|i| match i {
            RenderInstruction::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn label_text_in_painting_order() {
    let page = render(&recipient(), &sender(), &LayoutConfig::default(), LayoutMode::Center);
    insta::assert_snapshot!(
        texts(&page).join(" / "),
        @"お届け先 / 〒 / 東京都千代田区千代田1-1 / 千代田マンション101 / 山田太郎 / 様 / TEL / 03-1234-5678 / ご依頼主 / 〒 / 大阪府大阪市北区梅田1-1 / 佐藤花子 / TEL / 06-1234-5678"
    );
}

#[test]
fn same_inputs_same_instructions() {
    let config = resolve(None, Some(&json!({ "fonts": { "name": 16 } }))).unwrap();
    let first = render(&recipient(), &sender(), &config, LayoutMode::Grid4Up);
    let second = render(&recipient(), &sender(), &config, LayoutMode::Grid4Up);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn grid_of_six_fills_one_page_and_a_half() {
    let config = LayoutConfig::default();
    let pairs: Vec<_> = (0..6).map(|_| (recipient(), sender())).collect();
    let pages = render_batch(&pairs, &config, LayoutMode::Grid4Up);
    assert_eq!(pages.len(), 2);

    let per_label = render(&recipient(), &sender(), &config, LayoutMode::Center)
        .instructions
        .len();
    assert_eq!(pages[0].instructions.len(), 4 * per_label);
    assert_eq!(pages[1].instructions.len(), 2 * per_label);

    // The two labels on the last page sit in the top row
    let tops: Vec<Pt> = pages[1]
        .instructions
        .iter()
        .filter_map(|i| match i {
            RenderInstruction::Rectangle(r) => Some(r.origin.y),
            _ => None,
        })
        .collect();
    assert_eq!(tops.len(), 2);
    assert_eq!(tops[0], tops[1]);
}

#[test]
fn everything_lands_on_the_page() {
    for mode in [LayoutMode::Center, LayoutMode::Grid4Up] {
        let page = render(&recipient(), &sender(), &LayoutConfig::default(), mode);
        let sheet = BBox::from_origin_size(PtPoint::new(Pt::ZERO, Pt::ZERO), page.size);
        for instruction in &page.instructions {
            assert!(
                sheet.contains(&instruction.bounds(), Pt(1e-6)),
                "{instruction:?} is off the page in {mode:?}"
            );
        }
    }
}

#[test]
fn long_addresses_are_truncated_not_rejected() {
    let long: String = "北海道札幌市中央区北一条西".chars().cycle().take(200).collect();
    let to = AddressRecord::new("060-0001", [long.as_str()], "山田太郎").unwrap();
    let page = render(&to, &sender(), &LayoutConfig::default(), LayoutMode::Center);

    let to_lines: Vec<&str> = texts(&page)
        .into_iter()
        .filter(|t| t.chars().count() == 35)
        .collect();
    assert_eq!(to_lines.len(), 3);
    assert_eq!(to_lines.concat(), long.chars().take(105).collect::<String>());
}

#[test]
fn from_section_respects_its_own_line_limit() {
    let from = AddressRecord::new("530-0001", ["一行目", "二行目", "三行目"], "佐藤花子").unwrap();
    let page = render(&recipient(), &from, &LayoutConfig::default(), LayoutMode::Center);
    let all = texts(&page);
    assert!(all.contains(&"二行目"));
    assert!(!all.contains(&"三行目"));
}

#[test]
fn postal_digits_come_from_the_record() {
    let page = render(&recipient(), &sender(), &LayoutConfig::default(), LayoutMode::Center);
    let rows: Vec<String> = page
        .instructions
        .iter()
        .filter_map(|i| match i {
            RenderInstruction::PostalCodeBoxRow(row) => Some(row.digits.iter().collect()),
            _ => None,
        })
        .collect();
    assert_eq!(rows, vec!["1000001", "5300001"]);
}

#[test]
fn svg_preview_contains_every_text_run() {
    let page = render(&recipient(), &sender(), &LayoutConfig::default(), LayoutMode::Center);
    let svg = to_svg(std::slice::from_ref(&page)).unwrap().remove(0);
    for text in texts(&page) {
        assert!(svg.contains(&format!(">{text}</text>")), "missing {text}");
    }
    // Postal digits are expanded into individual centred text runs
    assert_eq!(svg.matches(r#"text-anchor="middle""#).count(), 14);
}

#[test]
fn text_runs_are_start_anchored() {
    let page = render(&recipient(), &sender(), &LayoutConfig::default(), LayoutMode::Center);
    for instruction in &page.instructions {
        if let RenderInstruction::Text(t) = instruction {
            assert_eq!(t.anchor, TextAnchor::Start);
        }
    }
}

#[test]
fn yaml_batch_renders_one_svg_document_per_page() {
    let entry = r#"
- to:
    postal_code: 100-0001
    address_lines: [東京都千代田区千代田1-1]
    name: 山田太郎
    honorific: 様
  from:
    postal_code: 530-0001
    address_lines: [大阪府大阪市北区梅田1-1]
    name: 佐藤花子
"#;
    let batch = entry.repeat(5);
    let pairs: Vec<(AddressRecord, AddressRecord)> = serde_yaml::from_str::<Vec<LabelPair>>(&batch)
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();
    assert_eq!(pairs.len(), 5);

    let pages = render_batch(&pairs, &LayoutConfig::default(), LayoutMode::Grid4Up);
    let documents = to_svg(&pages).unwrap();
    assert_eq!(documents.len(), 2);
    for document in &documents {
        assert_eq!(document.matches("<svg ").count(), 1);
        assert!(document.trim_end().ends_with("</svg>"));
    }
    assert_eq!(documents[0].matches(">山田太郎</text>").count(), 4);
    assert_eq!(documents[1].matches(">山田太郎</text>").count(), 1);
}
