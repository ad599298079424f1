//! Tree-sitter syntax layer for the token server.
//!
//! Each supported language gets a wrapper owning one parser and its
//! pre-compiled queries, exposing a small method surface instead of raw
//! query captures. Wrappers are reused through [`SyntaxPools`], a
//! free-list pool per language; queries are compiled once per pooled
//! parser and never shared across parsers.

#![deny(unsafe_code)]

mod css;
mod error;
mod html;
mod json;
mod pool;
mod script;
mod span;

pub use css::{CssSyntax, Fallback, VarCall};
pub use error::SyntaxError;
pub use html::{HtmlSyntax, StyleAttribute};
pub use json::{JsonSyntax, ValueString};
pub use pool::{PoolGuard, PoolItem, SyntaxPools};
pub use script::{ScriptLang, ScriptSyntax, TaggedTemplate, TemplateSegment};
pub use span::{Span, point_of};

pub use tree_sitter::{InputEdit, Point, Tree};
