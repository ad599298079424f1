//! Text scanning for YAML token documents.
//!
//! serde_yaml decodes values but carries no node spans, so YAML documents
//! recover positions by scanning the raw text: `$value` strings are walked
//! out of the decoded tree and located as literal substrings, and member
//! paths are followed through the indentation structure.

use dtls_syntax::Span;
use serde_json::Value;

/// Every `$value` string of a YAML token document, with the byte span of
/// its occurrence in the raw text.
///
/// Occurrences are searched left to right so repeated values land on
/// successive matches.
pub fn yaml_value_strings(text: &str) -> Vec<(String, Span)> {
    let Ok(tree) = serde_yaml::from_str::<Value>(text) else {
        return Vec::new();
    };
    let mut values = Vec::new();
    gather(&tree, &mut values);

    let mut out = Vec::new();
    let mut from = 0;
    for value in values {
        let Some(found) = text[from..].find(&value).map(|i| from + i) else { continue };
        out.push((value.clone(), Span::new(found, found + value.len())));
        from = found + value.len();
    }
    out
}

fn gather(node: &Value, out: &mut Vec<String>) {
    let Some(object) = node.as_object() else { return };
    if let Some(value) = object.get("$value").and_then(Value::as_str) {
        out.push(value.to_string());
    }
    for (key, child) in object {
        if !key.starts_with('$') {
            gather(child, out);
        }
    }
}

/// Span of the key naming the member reached by walking `path` through the
/// document's indentation structure.
pub fn yaml_member_span(text: &str, path: &[&str]) -> Option<Span> {
    let mut offset = 0;
    let mut min_indent = 0usize;
    let mut result = None;
    let mut segments = path.iter();
    let mut current = segments.next()?;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if !trimmed.is_empty() && !trimmed.starts_with('#') && indent >= min_indent {
            if let Some(key) = key_of(trimmed) {
                if key == *current {
                    let key_start = offset + indent + key_offset(trimmed);
                    result = Some(Span::new(key_start, key_start + key.len()));
                    min_indent = indent + 1;
                    match segments.next() {
                        Some(next) => current = next,
                        None => return result,
                    }
                }
            }
        }
        offset += line.len();
    }
    None
}

/// The mapping key of a YAML line, unquoted.
fn key_of(trimmed: &str) -> Option<&str> {
    let (key, _) = trimmed.split_once(':')?;
    let key = key.trim_end();
    Some(key.trim_matches('"').trim_matches('\''))
}

/// Byte offset of the key content within the trimmed line (skips quotes).
fn key_offset(trimmed: &str) -> usize {
    usize::from(trimmed.starts_with('"') || trimmed.starts_with('\''))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "base:\n  red:\n    $value: \"#ff0000\"\n    $type: color\nalias:\n  danger:\n    $value: \"{base.red}\"\n";

    #[test]
    fn value_strings_with_spans() {
        let values = yaml_value_strings(DOC);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].0, "#ff0000");
        assert_eq!(values[0].1.text(DOC), "#ff0000");
        assert_eq!(values[1].0, "{base.red}");
        assert_eq!(values[1].1.text(DOC), "{base.red}");
    }

    #[test]
    fn member_span_walks_indentation() {
        let span = yaml_member_span(DOC, &["base", "red"]).unwrap();
        assert_eq!(span.text(DOC), "red");
        assert!(yaml_member_span(DOC, &["base", "blue"]).is_none());
    }

    #[test]
    fn repeated_values_land_on_successive_occurrences() {
        let text = "a:\n  $value: \"1px\"\nb:\n  $value: \"1px\"\n";
        let values = yaml_value_strings(text);
        assert_eq!(values.len(), 2);
        assert!(values[0].1.start < values[1].1.start);
    }

    #[test]
    fn invalid_yaml_contributes_nothing() {
        assert!(yaml_value_strings(": : :").is_empty());
    }
}
