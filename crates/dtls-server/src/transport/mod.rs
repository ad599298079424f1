//! Transport layer: LSP Base Protocol framing.

mod framing;

pub use framing::{ReadOutcome, read_message, write_message, write_notification};
