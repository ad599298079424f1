//! Server capability advertisement for the initialize response.

use serde_json::{Value, json};

/// The capability set returned from `initialize`.
///
/// Text sync is incremental; completion and code actions resolve lazily;
/// diagnostics are pull-model only, scoped to single documents.
pub fn server_capabilities() -> Value {
    json!({
        "positionEncoding": "utf-16",
        "textDocumentSync": {
            "openClose": true,
            "change": 2
        },
        "hoverProvider": true,
        "completionProvider": {
            "resolveProvider": true,
            "triggerCharacters": ["-", "(", ","],
            "completionItem": {
                "labelDetailsSupport": true
            }
        },
        "codeActionProvider": {
            "codeActionKinds": ["quickfix", "refactor.rewrite", "source.fixAll"],
            "resolveProvider": true
        },
        "colorProvider": true,
        "definitionProvider": true,
        "diagnosticProvider": {
            "interFileDependencies": false,
            "workspaceDiagnostics": false
        }
    })
}
