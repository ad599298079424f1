//! Token file descriptors and schema detection.

use std::path::PathBuf;

/// Path segments treated as "default" and filtered out of flat names.
pub const DEFAULT_GROUP_MARKERS: &[&str] = &["_", "@", "DEFAULT"];

/// One token file registered from a workspace manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenFileSpec {
    /// Absolute path, after `~`/workspace-relative/`npm:` resolution.
    pub path: PathBuf,
    /// Prepended to every token name with a `-` separator.
    pub prefix: Option<String>,
    pub group_markers: Vec<String>,
}

impl TokenFileSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: None,
            group_markers: DEFAULT_GROUP_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Registration identity: re-registering the same `(path, prefix)`
    /// replaces the prior contribution.
    pub fn key(&self) -> (PathBuf, Option<String>) {
        (self.path.clone(), self.prefix.clone())
    }

    pub fn is_marker(&self, segment: &str) -> bool {
        self.group_markers.iter().any(|m| m == segment)
    }

    /// Pick the parse format from the file extension; JSON is the default.
    pub fn format(&self) -> TokenFileFormat {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => TokenFileFormat::Yaml,
            _ => TokenFileFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenFileFormat {
    Json,
    Yaml,
}

/// DTCG schema flavor, detected from the `$schema` URL.
///
/// Draft accepts string color values; 2025.10 adds the color object
/// `{colorSpace, components, alpha, hex?}`. Files without a `$schema`
/// default to Draft; unrecognized URLs are [`SchemaVersion::Unknown`] and
/// parse with Draft rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SchemaVersion {
    #[default]
    Draft,
    V2025_10,
    Unknown,
}

impl SchemaVersion {
    pub fn detect(schema_url: Option<&str>) -> Self {
        match schema_url {
            None => SchemaVersion::Draft,
            Some(url) if url.contains("2025.10") || url.contains("2025-10") => {
                SchemaVersion::V2025_10
            }
            Some(url)
                if url.contains("design-tokens") || url.contains("designtokens") =>
            {
                SchemaVersion::Draft
            }
            Some(_) => SchemaVersion::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_detection() {
        assert_eq!(SchemaVersion::detect(None), SchemaVersion::Draft);
        assert_eq!(
            SchemaVersion::detect(Some("https://www.designtokens.org/schemas/2025.10/tokens.json")),
            SchemaVersion::V2025_10
        );
        assert_eq!(
            SchemaVersion::detect(Some("https://design-tokens.github.io/community-group/format/")),
            SchemaVersion::Draft
        );
        assert_eq!(SchemaVersion::detect(Some("https://example.com/x.json")), SchemaVersion::Unknown);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(TokenFileSpec::new("/a/tokens.json").format(), TokenFileFormat::Json);
        assert_eq!(TokenFileSpec::new("/a/tokens.yaml").format(), TokenFileFormat::Yaml);
        assert_eq!(TokenFileSpec::new("/a/tokens.yml").format(), TokenFileFormat::Yaml);
        assert_eq!(TokenFileSpec::new("/a/tokens").format(), TokenFileFormat::Json);
    }

    #[test]
    fn empty_prefix_is_none() {
        assert_eq!(TokenFileSpec::new("/a.json").with_prefix("").prefix, None);
        assert_eq!(
            TokenFileSpec::new("/a.json").with_prefix("my-ds").prefix,
            Some("my-ds".to_string())
        );
    }
}
