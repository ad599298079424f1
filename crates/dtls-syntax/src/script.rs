//! JS/TS syntax wrapper: locating css`...` and html`...` tagged templates.

use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator, Tree};

use crate::error::SyntaxError;
use crate::span::Span;

/// Tagged templates parse as a call whose function is a bare identifier
/// and whose arguments are the template itself.
const TAGGED_TEMPLATE_QUERY: &str = r#"
(call_expression
  function: (identifier) @tag
  arguments: (template_string) @template)
"#;

/// The script grammars that can host embedded CSS.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScriptLang {
    Javascript,
    Typescript,
    Tsx,
}

impl ScriptLang {
    fn language(self) -> Language {
        match self {
            ScriptLang::Javascript => tree_sitter_javascript::LANGUAGE.into(),
            ScriptLang::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            ScriptLang::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A contiguous literal run of a template string. Substitutions split the
/// template into multiple segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateSegment {
    pub span: Span,
}

/// A `css`- or `html`-tagged template with its literal segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedTemplate {
    pub tag: String,
    pub segments: Vec<TemplateSegment>,
}

/// One tree-sitter JS/TS parser plus its compiled query.
pub struct ScriptSyntax {
    lang: ScriptLang,
    parser: Parser,
    template_query: Query,
    tag_capture: u32,
    template_capture: u32,
}

impl ScriptSyntax {
    pub fn new(lang: ScriptLang) -> Result<Self, SyntaxError> {
        let language = lang.language();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let template_query = Query::new(&language, TAGGED_TEMPLATE_QUERY)?;
        let tag_capture = template_query.capture_index_for_name("tag").unwrap_or(0);
        let template_capture = template_query.capture_index_for_name("template").unwrap_or(0);
        Ok(Self { lang, parser, template_query, tag_capture, template_capture })
    }

    pub fn lang(&self) -> ScriptLang {
        self.lang
    }

    pub fn parse(&mut self, text: &str) -> Option<Tree> {
        self.parser.parse(text, None)
    }

    pub(crate) fn reset_parser(&mut self) {
        self.parser.reset();
    }

    /// Templates tagged `css` or `html`, with their literal segments.
    pub fn css_templates(&mut self, tree: &Tree, text: &str) -> Vec<TaggedTemplate> {
        let mut cursor = QueryCursor::new();
        let mut matches =
            cursor.matches(&self.template_query, tree.root_node(), text.as_bytes());
        let mut out = Vec::new();
        while let Some(m) = matches.next() {
            let mut tag: Option<&str> = None;
            let mut template: Option<Node> = None;
            for capture in m.captures {
                if capture.index == self.tag_capture {
                    tag = Some(Span::of(&capture.node).text(text));
                } else if capture.index == self.template_capture {
                    template = Some(capture.node);
                }
            }
            let (Some(tag), Some(template)) = (tag, template) else { continue };
            if tag != "css" && tag != "html" {
                continue;
            }
            out.push(TaggedTemplate {
                tag: tag.to_string(),
                segments: segments_of(&template),
            });
        }
        out.sort_by_key(|t| t.segments.first().map(|s| s.span.start).unwrap_or(0));
        out
    }
}

/// Literal fragments of a template string, between its substitutions.
fn segments_of(template: &Node) -> Vec<TemplateSegment> {
    let mut cursor = template.walk();
    template
        .children(&mut cursor)
        .filter(|c| c.kind() == "string_fragment")
        .map(|c| TemplateSegment { span: Span::of(&c) })
        .collect()
}
