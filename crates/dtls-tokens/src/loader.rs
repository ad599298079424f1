//! DTCG token tree loading and flattening.

use dtls_color::DtcgColor;
use serde_json::Value;

use crate::error::TokenError;
use crate::file::{SchemaVersion, TokenFileFormat, TokenFileSpec};

/// A flattened design token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Dash-joined path with the spec prefix applied; no leading dashes.
    pub name: String,
    /// Raw `$value`: a string, a DTCG color object, a number, ...
    pub value: Value,
    /// `$type`, own or inherited from the nearest ancestor group.
    pub ty: Option<String>,
    pub description: Option<String>,
    /// Unfiltered tree path of the node, group markers included.
    pub path: Vec<String>,
}

impl Token {
    /// The name as written in CSS, with its two leading dashes.
    pub fn dashed_name(&self) -> String {
        format!("--{}", self.name)
    }

    pub fn is_color(&self) -> bool {
        self.ty.as_deref() == Some("color")
    }

    /// Render the raw `$value` as a CSS-ish string: strings pass through,
    /// DTCG color objects serialize to their CSS form, scalars print
    /// plainly, and anything else falls back to JSON.
    pub fn value_string(&self) -> String {
        render_value(&self.value)
    }
}

pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => match DtcgColor::from_value(other) {
            Some(color) => color.to_css_string(),
            None => serde_json::to_string(other).unwrap_or_default(),
        },
    }
}

/// The result of parsing one token file.
#[derive(Clone, Debug)]
pub struct LoadedTokens {
    pub tokens: Vec<Token>,
    /// The grouped tree as parsed; reference resolution walks this.
    pub tree: Value,
    pub schema: SchemaVersion,
}

/// Parse token file content and flatten it against `spec`.
///
/// Group paths join with `-`, skipping segments in the spec's group
/// markers; the spec prefix is prepended with a `-` separator. A node with
/// both `$value` and nested children yields a token for itself and for its
/// children. Tokens sort alphabetically by final name unless `skip_sort`;
/// the sort is stable, so ties keep tree order.
///
/// The detected schema gates the color entity: the object form
/// `{colorSpace, components, ...}` only parses under 2025.10. A Draft (or
/// unrecognized-schema) file carrying one has that token dropped with a
/// logged warning; string colors parse under every schema.
pub fn load_str(
    text: &str,
    format: TokenFileFormat,
    spec: &TokenFileSpec,
    skip_sort: bool,
) -> Result<LoadedTokens, TokenError> {
    let tree: Value = match format {
        TokenFileFormat::Json => serde_json::from_str(text)?,
        TokenFileFormat::Yaml => serde_yaml::from_str(text)?,
    };
    let root = tree.as_object().ok_or(TokenError::NotAnObject)?;
    let schema = SchemaVersion::detect(root.get("$schema").and_then(Value::as_str));

    let mut tokens = Vec::new();
    let mut raw_path = Vec::new();
    let mut name_path = Vec::new();
    collect(&tree, spec, schema, None, &mut raw_path, &mut name_path, &mut tokens);
    if !skip_sort {
        tokens.sort_by(|a, b| a.name.cmp(&b.name));
    }
    Ok(LoadedTokens { tokens, tree, schema })
}

fn collect(
    node: &Value,
    spec: &TokenFileSpec,
    schema: SchemaVersion,
    inherited_ty: Option<&str>,
    raw_path: &mut Vec<String>,
    name_path: &mut Vec<String>,
    out: &mut Vec<Token>,
) {
    let Some(object) = node.as_object() else { return };
    let ty = object.get("$type").and_then(Value::as_str).or(inherited_ty);

    if let Some(value) = object.get("$value") {
        let name = token_name(spec, name_path);
        if !name.is_empty() {
            if ty == Some("color") && value.is_object() && schema != SchemaVersion::V2025_10 {
                log::warn!(
                    "{}: dropping color token `{name}`: object color values require the 2025.10 schema",
                    spec.path.display()
                );
            } else {
                out.push(Token {
                    name,
                    value: value.clone(),
                    ty: ty.map(str::to_string),
                    description: object
                        .get("$description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    path: raw_path.clone(),
                });
            }
        }
    }

    // Groups and token-that-is-also-a-group nodes both recurse; metadata
    // keys never name children.
    for (key, child) in object {
        if key.starts_with('$') || !child.is_object() {
            continue;
        }
        raw_path.push(key.clone());
        let filtered = !spec.is_marker(key);
        if filtered {
            name_path.push(key.clone());
        }
        collect(child, spec, schema, ty, raw_path, name_path, out);
        if filtered {
            name_path.pop();
        }
        raw_path.pop();
    }
}

fn token_name(spec: &TokenFileSpec, name_path: &[String]) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if let Some(prefix) = spec.prefix.as_deref() {
        segments.push(prefix);
    }
    segments.extend(name_path.iter().map(String::as_str));
    segments.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec() -> TokenFileSpec {
        TokenFileSpec::new("/tokens.json")
    }

    fn load(value: Value, spec: &TokenFileSpec) -> LoadedTokens {
        load_str(&value.to_string(), TokenFileFormat::Json, spec, false).unwrap()
    }

    #[test]
    fn flattens_groups_with_dashes() {
        let loaded = load(
            json!({
                "color": {
                    "primary": { "$value": "#ff0000", "$type": "color" },
                    "secondary": { "$value": "#00ff00", "$type": "color" }
                }
            }),
            &spec(),
        );
        let names: Vec<_> = loaded.tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["color-primary", "color-secondary"]);
    }

    #[test]
    fn group_markers_are_filtered() {
        let loaded = load(
            json!({
                "button": {
                    "_": { "$value": "#111111", "$type": "color" },
                    "hover": { "$value": "#222222", "$type": "color" }
                }
            }),
            &spec(),
        );
        let names: Vec<_> = loaded.tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["button", "button-hover"]);
    }

    #[test]
    fn prefix_prepends_with_dash() {
        let loaded = load(
            json!({ "spacing": { "sm": { "$value": "8px" } } }),
            &spec().with_prefix("ds"),
        );
        assert_eq!(loaded.tokens[0].name, "ds-spacing-sm");
    }

    #[test]
    fn token_that_is_also_a_group() {
        let loaded = load(
            json!({
                "radius": {
                    "$value": "4px",
                    "$type": "dimension",
                    "large": { "$value": "12px" }
                }
            }),
            &spec(),
        );
        let names: Vec<_> = loaded.tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["radius", "radius-large"]);
        // The child inherits the group's $type.
        assert_eq!(loaded.tokens[1].ty.as_deref(), Some("dimension"));
    }

    #[test]
    fn type_inherited_from_nearest_ancestor() {
        let loaded = load(
            json!({
                "c": {
                    "$type": "color",
                    "deep": {
                        "$type": "dimension",
                        "x": { "$value": "1px" }
                    },
                    "y": { "$value": "#123123" }
                }
            }),
            &spec(),
        );
        let x = loaded.tokens.iter().find(|t| t.name == "c-deep-x").unwrap();
        assert_eq!(x.ty.as_deref(), Some("dimension"));
        let y = loaded.tokens.iter().find(|t| t.name == "c-y").unwrap();
        assert_eq!(y.ty.as_deref(), Some("color"));
    }

    #[test]
    fn sorted_by_name_unless_skipped() {
        let text = r#"{ "z": { "$value": "1" }, "a": { "$value": "2" } }"#;
        let sorted = load_str(text, TokenFileFormat::Json, &spec(), false).unwrap();
        assert_eq!(sorted.tokens[0].name, "a");
        let unsorted = load_str(text, TokenFileFormat::Json, &spec(), true).unwrap();
        assert_eq!(unsorted.tokens[0].name, "z");
    }

    #[test]
    fn yaml_input() {
        let text = "color:\n  primary:\n    $value: \"#ff0000\"\n    $type: color\n";
        let loaded = load_str(text, TokenFileFormat::Yaml, &spec(), false).unwrap();
        assert_eq!(loaded.tokens.len(), 1);
        assert_eq!(loaded.tokens[0].name, "color-primary");
        assert_eq!(loaded.tokens[0].value_string(), "#ff0000");
    }

    #[test]
    fn schema_version_detected() {
        let text = r#"{
            "$schema": "https://www.designtokens.org/schemas/2025.10/tokens.json",
            "c": { "$value": { "colorSpace": "srgb", "components": [1, 0, 0] }, "$type": "color" }
        }"#;
        let loaded = load_str(text, TokenFileFormat::Json, &spec(), false).unwrap();
        assert_eq!(loaded.schema, SchemaVersion::V2025_10);
        assert_eq!(loaded.tokens[0].value_string(), "#ff0000");
    }

    #[test]
    fn draft_file_rejects_object_colors() {
        // No $schema means Draft rules: the object color form does not
        // parse, and the token contributes nothing. String colors and
        // non-color objects are untouched.
        let loaded = load(
            json!({
                "bad": {
                    "$value": { "colorSpace": "srgb", "components": [1, 0, 0] },
                    "$type": "color"
                },
                "good": { "$value": "#ff0000", "$type": "color" },
                "shadow": {
                    "$value": { "offsetX": "1px", "offsetY": "1px" },
                    "$type": "shadow"
                }
            }),
            &spec(),
        );
        let names: Vec<_> = loaded.tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["good", "shadow"]);
    }

    #[test]
    fn v2025_10_file_still_accepts_string_colors() {
        let text = r##"{
            "$schema": "https://www.designtokens.org/schemas/2025.10/tokens.json",
            "c": { "$value": "#ff0000", "$type": "color" }
        }"##;
        let loaded = load_str(text, TokenFileFormat::Json, &spec(), false).unwrap();
        assert_eq!(loaded.tokens.len(), 1);
        assert_eq!(loaded.tokens[0].value_string(), "#ff0000");
    }

    #[test]
    fn unknown_schema_parses_with_draft_rules() {
        let text = r#"{
            "$schema": "https://example.com/some-other-schema.json",
            "c": {
                "$value": { "colorSpace": "srgb", "components": [0, 0, 1] },
                "$type": "color"
            }
        }"#;
        let loaded = load_str(text, TokenFileFormat::Json, &spec(), false).unwrap();
        assert_eq!(loaded.schema, SchemaVersion::Unknown);
        assert!(loaded.tokens.is_empty());
    }

    #[test]
    fn description_and_dashed_name() {
        let loaded = load(
            json!({ "gap": { "$value": "2px", "$description": "Smallest gap." } }),
            &spec(),
        );
        assert_eq!(loaded.tokens[0].description.as_deref(), Some("Smallest gap."));
        assert_eq!(loaded.tokens[0].dashed_name(), "--gap");
    }

    #[test]
    fn root_must_be_object() {
        assert!(matches!(
            load_str("[1,2]", TokenFileFormat::Json, &spec(), false),
            Err(TokenError::NotAnObject)
        ));
    }
}
