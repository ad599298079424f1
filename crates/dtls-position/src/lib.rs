//! UTF-8/UTF-16 position conversion for LSP coordinates.
//!
//! LSP positions count UTF-16 code units; the document store keeps UTF-8
//! text. This crate provides the conversions between the two, plus a
//! [`LineIndex`] for whole-document `(line, character)` mapping.

#![deny(unsafe_code)]

mod convert;
mod line_index;

pub use convert::{byte_to_utf16, utf16_len, utf16_to_byte};
pub use line_index::LineIndex;
