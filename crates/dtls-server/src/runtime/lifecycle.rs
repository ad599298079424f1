//! Server lifecycle: the initialize handshake and workspace token loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use dtls_protocol::{JsonRpcError, invalid_params, server_capabilities};
use dtls_tokens::{TokenFileSpec, load_str};

use super::LspServer;

/// Manifest key holding the token file declarations.
const MANIFEST_KEY: &str = "designTokensLanguageServer";

impl LspServer {
    /// `initialize`: record workspace folders, load their token files, and
    /// advertise capabilities.
    pub(crate) fn handle_initialize(
        &mut self,
        params: Option<Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let params = params.ok_or_else(|| invalid_params("initialize requires params"))?;

        self.workspace_folders = workspace_folders(&params);
        for folder in self.workspace_folders.clone() {
            self.register_workspace_tokens(&folder);
        }
        self.initialized = true;

        log::info!(
            "initialized with {} workspace folder(s), {} token(s)",
            self.workspace_folders.len(),
            self.registry.read().len()
        );

        Ok(Some(json!({
            "capabilities": server_capabilities(),
            "serverInfo": {
                "name": "design-tokens-language-server",
                "version": env!("CARGO_PKG_VERSION")
            }
        })))
    }

    pub(crate) fn handle_shutdown(&mut self) -> Result<Option<Value>, JsonRpcError> {
        self.shutdown_received = true;
        Ok(Some(Value::Null))
    }

    pub(crate) fn handle_set_trace(
        &mut self,
        params: Option<Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        if let Some(value) = params.as_ref().and_then(|p| p.get("value")).and_then(Value::as_str)
        {
            *self.trace_level.lock() = value.to_string();
        }
        Ok(None)
    }

    /// Load `package.json` token declarations for one workspace folder.
    ///
    /// A missing manifest or key is normal; a token file that fails to
    /// read or parse is logged and contributes nothing.
    pub(crate) fn register_workspace_tokens(&mut self, folder: &Path) {
        let manifest_path = folder.join("package.json");
        let Ok(manifest_text) = fs::read_to_string(&manifest_path) else {
            return;
        };
        let manifest: Value = match serde_json::from_str(&manifest_text) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::error!("unreadable manifest {}: {err}", manifest_path.display());
                return;
            }
        };
        let Some(entries) = manifest
            .get(MANIFEST_KEY)
            .and_then(|v| v.get("tokensFiles"))
            .and_then(Value::as_array)
        else {
            return;
        };

        for entry in entries {
            match token_file_spec(entry, folder) {
                Some(spec) => self.register_token_file(spec),
                None => log::error!("ignoring malformed tokensFiles entry: {entry}"),
            }
        }
    }

    fn register_token_file(&mut self, spec: TokenFileSpec) {
        let text = match fs::read_to_string(&spec.path) {
            Ok(text) => text,
            Err(err) => {
                log::error!("cannot read token file {}: {err}", spec.path.display());
                return;
            }
        };
        match load_str(&text, spec.format(), &spec, false) {
            Ok(loaded) => {
                log::info!("loaded {} token(s) from {}", loaded.tokens.len(), spec.path.display());
                self.registry.write().register(spec, loaded);
            }
            Err(err) => {
                log::error!("cannot load token file {}: {err}", spec.path.display());
            }
        }
    }
}

/// Workspace roots from `workspaceFolders`, falling back to `rootUri`.
fn workspace_folders(params: &Value) -> Vec<PathBuf> {
    let mut folders: Vec<PathBuf> = params
        .get("workspaceFolders")
        .and_then(Value::as_array)
        .map(|folders| {
            folders
                .iter()
                .filter_map(|f| f.get("uri").and_then(Value::as_str))
                .map(|uri| PathBuf::from(dtls_uri::uri_to_path(uri)))
                .collect()
        })
        .unwrap_or_default();
    if folders.is_empty() {
        if let Some(root) = params.get("rootUri").and_then(Value::as_str) {
            folders.push(PathBuf::from(dtls_uri::uri_to_path(root)));
        }
    }
    folders
}

/// Decode one `tokensFiles` entry: a path string or
/// `{path, prefix?, groupMarkers?}`.
fn token_file_spec(entry: &Value, folder: &Path) -> Option<TokenFileSpec> {
    match entry {
        Value::String(path) => Some(TokenFileSpec::new(normalize_path(path, folder))),
        Value::Object(fields) => {
            let path = fields.get("path").and_then(Value::as_str)?;
            let mut spec = TokenFileSpec::new(normalize_path(path, folder));
            if let Some(prefix) = fields.get("prefix").and_then(Value::as_str) {
                spec = spec.with_prefix(prefix);
            }
            if let Some(markers) = fields.get("groupMarkers").and_then(Value::as_array) {
                spec.group_markers =
                    markers.iter().filter_map(Value::as_str).map(str::to_string).collect();
            }
            Some(spec)
        }
        _ => None,
    }
}

/// Path normalization for manifest entries: `~` expands to home, `npm:`
/// resolves the way host module resolution does, and relative paths anchor
/// at the workspace folder.
fn normalize_path(path: &str, folder: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("npm:") {
        return resolve_npm(rest, folder);
    }
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| folder.to_path_buf());
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        folder.join(path)
    }
}

/// Resolve an `npm:` entry against `node_modules` in the workspace folder
/// and each of its ancestors, nearest first. An entry found nowhere still
/// yields the folder's own `node_modules` path, so the load failure is
/// reported against a concrete location.
fn resolve_npm(rest: &str, folder: &Path) -> PathBuf {
    for dir in folder.ancestors() {
        let candidate = dir.join("node_modules").join(rest);
        if candidate.exists() {
            return candidate;
        }
    }
    folder.join("node_modules").join(rest)
}
