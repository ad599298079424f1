//! CSS and DTCG color handling.
//!
//! Two input shapes flow through this crate: plain CSS color strings found
//! in token values, and the DTCG 2025.10 color object
//! `{colorSpace, components, alpha, hex?}`. Both can be rendered as a CSS
//! string and sampled as a normalized [`Rgba`] for
//! `textDocument/documentColor`.

#![deny(unsafe_code)]

mod css;
mod dtcg;

pub use css::{ParseColorError, Rgba, parse_css_color};
pub use dtcg::{ColorSpace, Component, DtcgColor};
