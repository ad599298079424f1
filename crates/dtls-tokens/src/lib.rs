//! DTCG design-token ingestion and lookup.
//!
//! Token files (JSON or YAML) are flattened into dash-joined names, indexed
//! by a registry, and resolved across `{a.b.c}` references. The grouped
//! tree that accompanied each registration stays the source of truth for
//! reference resolution; the flat map exists for name lookups.

#![deny(unsafe_code)]

mod error;
mod file;
mod loader;
mod reference;
mod registry;

pub use error::TokenError;
pub use file::{SchemaVersion, TokenFileFormat, TokenFileSpec};
pub use loader::{LoadedTokens, Token, load_str};
pub use reference::{Reference, references};
pub use registry::TokenRegistry;
