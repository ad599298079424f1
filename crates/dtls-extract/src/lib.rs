//! Embedded CSS extraction.
//!
//! Non-CSS host documents (HTML, JS/TS and their JSX variants) contain CSS
//! in style tags, style attributes, and css\`...\`/html\`...\` tagged
//! templates. This crate locates those spans and returns them as
//! [`CssRegion`]s: each region's content lives in its own coordinate frame,
//! with the embedding point recorded in host UTF-16 coordinates.
//!
//! Parse failures are non-fatal throughout: a host or region that fails to
//! parse contributes nothing, and the remaining regions are still returned.

#![deny(unsafe_code)]

use dtls_position::LineIndex;
use dtls_syntax::{ScriptLang, Span, SyntaxPools};

/// What kind of embedding produced a region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionKind {
    StyleTag,
    StyleAttribute,
    TaggedTemplateCss,
    TaggedTemplateHtml,
}

/// A contiguous span of embedded CSS within a host document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CssRegion {
    /// The CSS text, in its own coordinate frame. Style attributes are
    /// wrapped as `x{...}` so declarations parse; [`CssRegion::to_host`]
    /// compensates for the two wrapper characters.
    pub content: String,
    /// Host line of the region's first character.
    pub start_line: u32,
    /// Host UTF-16 column of the region's first content character on its
    /// first line.
    pub start_col: u32,
    pub kind: RegionKind,
}

impl CssRegion {
    /// Translate region-local coordinates to host-document coordinates.
    ///
    /// Lines are offset by the region start; only local line 0 has its
    /// column offset by `start_col` (later lines already start at host
    /// column 0).
    pub fn to_host(&self, line: u32, col: u32) -> (u32, u32) {
        if line == 0 {
            (self.start_line, self.start_col + col)
        } else {
            (self.start_line + line, col)
        }
    }
}

/// Extract every CSS region of a host document.
///
/// `language_id` selects the host grammar (`html`, `javascript`,
/// `javascriptreact`, `typescript`, `typescriptreact`). Unknown ids yield
/// no regions.
pub fn extract_regions(language_id: &str, text: &str, pools: &SyntaxPools) -> Vec<CssRegion> {
    match language_id {
        "html" => html_regions(text, pools),
        "javascript" | "javascriptreact" => script_regions(text, ScriptLang::Javascript, pools),
        "typescript" => script_regions(text, ScriptLang::Typescript, pools),
        "typescriptreact" => script_regions(text, ScriptLang::Tsx, pools),
        _ => Vec::new(),
    }
}

fn html_regions(text: &str, pools: &SyntaxPools) -> Vec<CssRegion> {
    let mut html = match pools.html() {
        Ok(html) => html,
        Err(err) => {
            log::warn!("html parser unavailable: {err}");
            return Vec::new();
        }
    };
    let Some(tree) = html.parse(text) else {
        return Vec::new();
    };
    let index = LineIndex::new(text);
    let mut regions = Vec::new();
    for span in html.style_elements(&tree, text) {
        let (line, col) = index.byte_to_position(text, span.start);
        regions.push(CssRegion {
            content: span.text(text).to_string(),
            start_line: line,
            start_col: col,
            kind: RegionKind::StyleTag,
        });
    }
    for attr in html.style_attributes(&tree, text) {
        regions.push(style_attribute_region(text, &index, attr.value_span));
    }
    regions.sort_by_key(|r| (r.start_line, r.start_col));
    regions
}

/// Attribute values are not valid CSS on their own; wrap as `x{...}` so the
/// declarations parse, and shift the recorded column two characters left so
/// the standard remap cancels the wrapper out.
fn style_attribute_region(text: &str, index: &LineIndex, value_span: Span) -> CssRegion {
    let (line, col) = index.byte_to_position(text, value_span.start);
    CssRegion {
        content: format!("x{{{}}}", value_span.text(text)),
        start_line: line,
        start_col: col.saturating_sub(2),
        kind: RegionKind::StyleAttribute,
    }
}

fn script_regions(text: &str, lang: ScriptLang, pools: &SyntaxPools) -> Vec<CssRegion> {
    let mut script = match pools.script(lang) {
        Ok(script) => script,
        Err(err) => {
            log::warn!("script parser unavailable: {err}");
            return Vec::new();
        }
    };
    let Some(tree) = script.parse(text) else {
        return Vec::new();
    };
    let index = LineIndex::new(text);
    let mut regions = Vec::new();
    for template in script.css_templates(&tree, text) {
        for segment in &template.segments {
            let (line, col) = index.byte_to_position(text, segment.span.start);
            let content = segment.span.text(text);
            if template.tag == "css" {
                regions.push(CssRegion {
                    content: content.to_string(),
                    start_line: line,
                    start_col: col,
                    kind: RegionKind::TaggedTemplateCss,
                });
            } else {
                // html`...` segments host their own style tags and
                // attributes; re-extract and compose the offsets.
                for nested in html_regions(content, pools) {
                    regions.push(compose(line, col, nested));
                }
            }
        }
    }
    regions.sort_by_key(|r| (r.start_line, r.start_col));
    regions
}

/// Rebase a region extracted from a template segment onto the segment's
/// position in the outer document.
fn compose(segment_line: u32, segment_col: u32, nested: CssRegion) -> CssRegion {
    let (start_line, start_col) = if nested.start_line == 0 {
        (segment_line, segment_col + nested.start_col)
    } else {
        (segment_line + nested.start_line, nested.start_col)
    };
    CssRegion {
        content: nested.content,
        start_line,
        start_col,
        kind: RegionKind::TaggedTemplateHtml,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pools() -> SyntaxPools {
        SyntaxPools::new()
    }

    #[test]
    fn style_tag_region_offsets() {
        let text = "<html><style>x{color:var(--c)}</style></html>";
        let pools = pools();
        let regions = extract_regions("html", text, &pools);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::StyleTag);
        assert_eq!(regions[0].content, "x{color:var(--c)}");
        assert_eq!((regions[0].start_line, regions[0].start_col), (0, 13));
        // Remap the parsed `--c` name span rather than a hand-counted
        // column: `x{color:var(` puts it at local col 12.
        let mut css = pools.css().unwrap();
        let tree = css.parse(&regions[0].content).unwrap();
        let calls = css.var_calls(&tree, &regions[0].content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name_span.text(&regions[0].content), "--c");
        assert_eq!(calls[0].name_span.start, 12);
        assert_eq!(regions[0].to_host(0, 12), (0, 25));
    }

    #[test]
    fn multiline_style_tag_keeps_columns_on_later_lines() {
        let text = "<style>\n.a {\n  color: var(--x);\n}\n</style>";
        let regions = extract_regions("html", text, &pools());
        assert_eq!(regions.len(), 1);
        // The region starts at line 0 col 7 and its content begins with a
        // newline, so later local lines keep their own columns.
        assert_eq!(regions[0].to_host(2, 2), (2, 2));
    }

    #[test]
    fn style_attribute_wrapping_compensates_two_columns() {
        let text = r#"<div style="color:var(--c)">x</div>"#;
        let regions = extract_regions("html", text, &pools());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::StyleAttribute);
        assert_eq!(regions[0].content, "x{color:var(--c)}");
        // The value starts at host col 12; wrapped content shifts local
        // columns right by 2, so the recorded start compensates.
        assert_eq!(regions[0].start_col, 10);
        // "--c" at local col 12 inside `x{color:var(--c)}` → host col 22.
        assert_eq!(regions[0].to_host(0, 12), (0, 22));
    }

    #[test]
    fn css_tagged_template_region() {
        let text = "const s = css`\n  .x { color: var(--c-p); }\n`;";
        let regions = extract_regions("javascript", text, &pools());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::TaggedTemplateCss);
        assert_eq!((regions[0].start_line, regions[0].start_col), (0, 14));
        assert_eq!(regions[0].content, "\n  .x { color: var(--c-p); }\n");
    }

    #[test]
    fn template_substitution_splits_regions() {
        let text = "const s = css`.a{${x}color:var(--c)}`;";
        let regions = extract_regions("javascript", text, &pools());
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].content, ".a{");
        assert_eq!(regions[1].content, "color:var(--c)}");
    }

    #[test]
    fn html_template_reextracts_styles() {
        let text = "const t = html`<style>x{color:var(--c)}</style>`;";
        let regions = extract_regions("javascript", text, &pools());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::TaggedTemplateHtml);
        assert_eq!(regions[0].content, "x{color:var(--c)}");
        // Template content starts at host col 15; style raw text at
        // nested col 7 → host col 22.
        assert_eq!((regions[0].start_line, regions[0].start_col), (0, 22));
    }

    #[test]
    fn unknown_language_yields_nothing() {
        assert!(extract_regions("markdown", "# x", &pools()).is_empty());
    }

    #[test]
    fn empty_style_tag_yields_zero_regions() {
        let regions = extract_regions("html", "<style></style>", &pools());
        assert!(regions.is_empty());
    }
}
