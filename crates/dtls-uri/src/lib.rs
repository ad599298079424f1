//! URI ↔ filesystem path conversion and normalization utilities.
//!
//! Consistent `file://` URI handling for the token server:
//!
//! - Converting between `file://` URIs and filesystem paths
//! - Windows drive-letter normalization and UNC authority handling
//! - Percent encoding/decoding
//!
//! The path form is detected from the input rather than the compile-time
//! OS, so a server running on Linux still round-trips `C:\...` paths a
//! Windows client sends it.
//!
//! # Examples
//!
//! ```
//! use dtls_uri::{path_to_uri, uri_to_path};
//!
//! assert_eq!(path_to_uri("/home/user/tokens.json"), "file:///home/user/tokens.json");
//! assert_eq!(uri_to_path("file:///home/user/tokens.json"), "/home/user/tokens.json");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

/// Characters percent-encoded in path segments. RFC 3986 pchar minus the
/// segment delimiters we keep verbatim.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'|')
    .add(b'\\');

/// Convert an absolute filesystem path to a `file://` URI.
///
/// POSIX paths yield the three-slash form. Windows drive-letter paths keep
/// the drive unencoded and uppercased (`file:///C:/...`). UNC paths put the
/// host in the authority position (`file://server/share/...`).
pub fn path_to_uri(path: &str) -> String {
    if let Some(unc) = path.strip_prefix("\\\\").or_else(|| path.strip_prefix("//")) {
        let mut parts = unc.splitn(2, ['\\', '/']);
        let host = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().replace('\\', "/");
        return format!("file://{}/{}", host, encode_path(&rest));
    }
    if let Some((drive, rest)) = split_drive(path) {
        let rest = rest.replace('\\', "/");
        let rest = rest.strip_prefix('/').unwrap_or(&rest);
        return format!("file:///{}:/{}", drive.to_ascii_uppercase(), encode_path(rest));
    }
    let rest = path.strip_prefix('/').unwrap_or(path);
    format!("file:///{}", encode_path(rest))
}

/// Convert a `file://` URI back to a filesystem path.
///
/// The inverse of [`path_to_uri`]: percent-decodes, reassembles drive
/// letters and UNC hosts, and converts separators for Windows-shaped
/// results. URIs that fail to parse fall back to stripping the `file://`
/// prefix verbatim.
pub fn uri_to_path(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => {
            let path = decode(url.path());
            if let Some(host) = url.host_str().filter(|h| !h.is_empty()) {
                // UNC: authority becomes the server name.
                return format!("\\\\{}{}", host, path.replace('/', "\\"));
            }
            // file:///C:/... → C:\...
            if let Some(rest) = windows_drive_path(&path) {
                return rest;
            }
            path
        }
        _ => decode(uri.strip_prefix("file://").unwrap_or(uri)),
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| utf8_percent_encode(seg, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Split a `C:\...` or `C:/...` path into drive letter and remainder.
fn split_drive(path: &str) -> Option<(char, &str)> {
    let mut chars = path.chars();
    let drive = chars.next()?;
    if drive.is_ascii_alphabetic() && chars.next() == Some(':') {
        Some((drive, &path[2..]))
    } else {
        None
    }
}

/// Recognize a decoded URI path of the form `/C:/...` and render it as a
/// backslashed Windows path.
fn windows_drive_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix('/')?;
    let (drive, tail) = split_drive(rest)?;
    Some(format!("{}:{}", drive.to_ascii_uppercase(), tail.replace('/', "\\")))
}
