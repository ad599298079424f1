//! Server state: documents and their derived analysis.

mod document;
mod scan;
mod store;
mod yaml_scan;

pub use document::{Document, DocumentKind};
pub use scan::{ScannedFallback, ScannedVarCall, scan_var_calls};
pub use store::DocumentStore;
pub use yaml_scan::{yaml_member_span, yaml_value_strings};

pub(crate) use scan::contains as range_contains;
