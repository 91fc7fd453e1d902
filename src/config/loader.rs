//! Layered configuration loading.
//!
//! Precedence, highest first: override mapping, file contents, built-in
//! defaults. Layers are deep-merged per leaf, so overriding `fonts.name`
//! keeps every other `fonts` value from the lower layers.

use std::fs;
use std::path::Path;

use miette::{NamedSource, SourceSpan};
use serde_json::{Map, Value};

use super::{LayoutConfig, schema};
use crate::errors::{ConfigError, FileError, InvariantError, ValidationError};
use crate::log::debug;

/// Allowed drift between the section-height sum and the label height
const SECTION_SUM_TOLERANCE_MM: f64 = 1e-6;

/// Smallest address size, before scaling, the "from" section may end up with
const MIN_FROM_ADDRESS_SIZE_PT: i64 = 1;

/// Build a validated configuration from defaults, an optional YAML file and
/// an optional override mapping.
pub fn resolve(
    file: Option<&Path>,
    overrides: Option<&Value>,
) -> Result<LayoutConfig, ConfigError> {
    let mut merged = serde_json::to_value(LayoutConfig::default())
        .map_err(|e| schema::internal_shape_error(&e))?;

    if let Some(path) = file {
        let layer = read_file(path)?;
        debug!(path = %path.display(), "merging configuration file");
        deep_merge(&mut merged, &layer);
    }

    if let Some(overrides) = overrides {
        if !overrides.is_object() {
            return Err(ValidationError::NotAMapping {
                field: "<overrides>".to_string(),
                value: overrides.to_string(),
            }
            .into());
        }
        debug!(overrides = %overrides, "merging configuration overrides");
        deep_merge(&mut merged, overrides);
    }

    let normalized = schema::validate(&merged)?;
    let config = schema::into_config(normalized)?;
    check_invariants(&config)?;
    debug!(
        label_width = config.layout.label_width.raw(),
        label_height = config.layout.label_height.raw(),
        mode = ?config.layout.layout_mode,
        "resolved layout configuration"
    );
    Ok(config)
}

/// Read and parse a YAML (or JSON) configuration file into a mapping
pub fn read_file(path: &Path) -> Result<Value, FileError> {
    let name = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| FileError::Unreadable {
        path: name.clone(),
        source,
    })?;
    parse_source(&name, text)
}

/// Parse configuration text. An empty document means "no values".
pub fn parse_source(name: &str, text: String) -> Result<Value, FileError> {
    let parsed: Option<Value> = match serde_yaml::from_str(&text) {
        Ok(parsed) => parsed,
        Err(e) => {
            let span = e.location().map(|loc| {
                let len = if loc.index() < text.len() { 1 } else { 0 };
                SourceSpan::from((loc.index(), len))
            });
            return Err(FileError::Malformed {
                path: name.to_string(),
                message: e.to_string(),
                src: NamedSource::new(name, text),
                span,
            });
        }
    };

    match parsed {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(value @ Value::Object(_)) => Ok(value),
        Some(_) => Err(FileError::NotAMapping { path: name.to_string() }),
    }
}

/// Enforce cross-field contracts that the per-leaf schema cannot express
pub(crate) fn check_invariants(config: &LayoutConfig) -> Result<(), InvariantError> {
    let to = config.section_height.to_section_height.raw();
    let from = config.section_height.from_section_height.raw();
    let label = config.layout.label_height.raw();
    if (to + from - label).abs() > SECTION_SUM_TOLERANCE_MM {
        return Err(InvariantError::SectionHeights {
            to_section_height: to,
            from_section_height: from,
            label_height: label,
        });
    }

    let address = i64::from(config.fonts.address);
    let adjust = i64::from(config.section_height.from_address_font_size_adjust);
    if address + adjust < MIN_FROM_ADDRESS_SIZE_PT {
        return Err(InvariantError::FromAddressSize {
            address,
            adjust,
            min: MIN_FROM_ADDRESS_SIZE_PT,
        });
    }
    Ok(())
}

/// Set `value` at a dotted path (`fonts.name`), creating groups as needed.
///
/// The path is turned into a one-leaf layer and merged like any other, so
/// sibling values already in `root` are kept.
pub fn set_override(root: &mut Value, dotted_path: &str, value: Value) {
    let layer = dotted_path.rsplit('.').fold(value, |inner, segment| {
        let mut group = Map::new();
        group.insert(segment.to_string(), inner);
        Value::Object(group)
    });
    deep_merge(root, &layer);
}

/// Recursive per-leaf merge. A `null` arriving on top of a group is treated
/// as "no values" (an emptied YAML section), not as a replacement.
fn deep_merge(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (Value::Object(_), Value::Null) => {}
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutMode;
    use crate::types::Mm;
    use serde_json::json;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn no_layers_gives_defaults() {
        assert_eq!(resolve(None, None).unwrap(), LayoutConfig::default());
    }

    #[test]
    fn partial_group_override_keeps_file_siblings() {
        let file = config_file("fonts:\n  address: 13\n");
        let overrides = json!({ "fonts": { "name": 16 } });
        let config = resolve(Some(file.path()), Some(&overrides)).unwrap();
        assert_eq!(config.fonts.name, 16);
        assert_eq!(config.fonts.address, 13);
        assert_eq!(config.fonts.phone, 13);
    }

    #[test]
    fn overrides_beat_file_beat_defaults() {
        let file = config_file("fonts:\n  name: 12\nlayout:\n  draw_border: false\n");
        let overrides = json!({ "fonts": { "name": 16 } });
        let config = resolve(Some(file.path()), Some(&overrides)).unwrap();
        assert_eq!(config.fonts.name, 16);
        assert!(!config.layout.draw_border);
        assert_eq!(config.layout.label_width, Mm(105.0));
    }

    #[test]
    fn grid_mode_from_file() {
        let file = config_file("layout:\n  layout_mode: grid_4up\n");
        let config = resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.layout.layout_mode, LayoutMode::Grid4Up);
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let err = resolve(Some(Path::new("/nonexistent/label_layout.yaml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::File(FileError::Unreadable { .. })));
    }

    #[test]
    fn malformed_yaml_carries_a_span() {
        let file = config_file("fonts:\n  name: [16\n");
        match resolve(Some(file.path()), None) {
            Err(ConfigError::File(FileError::Malformed { span, .. })) => assert!(span.is_some()),
            other => panic!("expected malformed file error, got {:?}", other),
        }
    }

    #[test]
    fn top_level_sequence_is_rejected() {
        let file = config_file("- fonts\n- layout\n");
        let err = resolve(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::File(FileError::NotAMapping { .. })));
    }

    #[test]
    fn empty_file_and_empty_group_mean_defaults() {
        let file = config_file("# nothing configured yet\n");
        assert_eq!(resolve(Some(file.path()), None).unwrap(), LayoutConfig::default());

        let file = config_file("fonts:\n");
        assert_eq!(resolve(Some(file.path()), None).unwrap(), LayoutConfig::default());
    }

    #[test]
    fn json_files_are_accepted() {
        let file = config_file(r#"{"fonts": {"phone": 10}}"#);
        assert_eq!(resolve(Some(file.path()), None).unwrap().fonts.phone, 10);
    }

    #[test]
    fn out_of_range_file_value_is_a_validation_error() {
        let file = config_file("postal_box:\n  box_size: 40\n");
        match resolve(Some(file.path()), None) {
            Err(ConfigError::Validation(err)) => assert_eq!(err.field(), "postal_box.box_size"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn section_heights_must_sum_to_label_height() {
        let overrides = json!({ "section_height": { "from_section_height": 50 } });
        let err = resolve(None, Some(&overrides)).unwrap_err();
        let ConfigError::Invariant(err) = err else {
            panic!("expected invariant error, got {:?}", err);
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"section heights do not add up: 69 + 50 = 119 mm, but layout.label_height is 122 mm"
        );

        let overrides = json!({
            "layout": { "label_height": 120 },
            "section_height": { "to_section_height": 70, "from_section_height": 50 }
        });
        let config = resolve(None, Some(&overrides)).unwrap();
        assert_eq!(
            config.section_height.to_section_height + config.section_height.from_section_height,
            config.layout.label_height
        );
    }

    #[test]
    fn fractional_heights_within_tolerance_pass() {
        let overrides = json!({
            "layout": { "label_height": 100.3 },
            "section_height": { "to_section_height": 60.1, "from_section_height": 40.2 }
        });
        assert!(resolve(None, Some(&overrides)).is_ok());
    }

    #[test]
    fn from_address_size_must_stay_positive() {
        let overrides = json!({
            "fonts": { "address": 6 },
            "section_height": { "from_address_font_size_adjust": -10 }
        });
        let err = resolve(None, Some(&overrides)).unwrap_err();
        let ConfigError::Invariant(err) = err else {
            panic!("expected invariant error, got {:?}", err);
        };
        assert!(matches!(
            err,
            InvariantError::FromAddressSize { address: 6, adjust: -10, min: 1 }
        ));

        // Smallest size that still draws something
        let overrides = json!({
            "fonts": { "address": 11 },
            "section_height": { "from_address_font_size_adjust": -10 }
        });
        let config = resolve(None, Some(&overrides)).unwrap();
        assert!(crate::effective::from_address_size(&config).raw() > 0.0);
    }

    #[test]
    fn non_mapping_overrides_are_rejected() {
        let err = resolve(None, Some(&json!(16))).unwrap_err();
        match err {
            ConfigError::Validation(err) => assert_eq!(err.field(), "<overrides>"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn set_override_builds_nested_groups() {
        let mut overrides = Value::Null;
        set_override(&mut overrides, "fonts.name", json!(16));
        set_override(&mut overrides, "fonts.address", json!(12));
        set_override(&mut overrides, "layout.draw_border", json!(false));
        assert_eq!(
            overrides,
            json!({ "fonts": { "name": 16, "address": 12 }, "layout": { "draw_border": false } })
        );
    }

    #[test]
    fn set_override_keeps_siblings_and_replaces_scalars() {
        let mut overrides = json!({ "fonts": { "name": 16 }, "layout": 3 });
        set_override(&mut overrides, "fonts.address", json!(12));
        set_override(&mut overrides, "layout.draw_border", json!(false));
        assert_eq!(
            overrides,
            json!({ "fonts": { "name": 16, "address": 12 }, "layout": { "draw_border": false } })
        );
    }

    #[test]
    fn deep_merge_replaces_leaves_only() {
        let mut base = json!({
            "fonts": { "name": 14, "address": 11 },
            "layout": { "margin_top": 7 }
        });
        deep_merge(&mut base, &json!({ "fonts": { "name": 16 }, "layout": null }));
        assert_eq!(
            base,
            json!({ "fonts": { "name": 16, "address": 11 }, "layout": { "margin_top": 7 } })
        );
    }
}
