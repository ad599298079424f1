//! textDocument/documentColor.

use serde_json::{Value, json};

use dtls_color::{DtcgColor, Rgba, parse_css_color};
use dtls_protocol::JsonRpcError;
use dtls_tokens::{Token, TokenRegistry};

use super::params_uri;
use crate::runtime::LspServer;
use crate::state::scan_var_calls;

impl LspServer {
    /// One color sample per `var(--name)` whose token has `$type: color`.
    /// The returned range covers the `--name` argument, not the whole
    /// `var(...)`.
    pub(crate) fn handle_document_color(
        &self,
        params: Option<Value>,
        id: Option<&Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let uri = params_uri(&params)?;
        let Some(document) = self.documents.get(&uri) else {
            return Ok(Some(json!([])));
        };
        let document = document.read();
        self.cancellations.checkpoint(id, "textDocument/documentColor")?;

        let registry = self.registry.read();
        let colors: Vec<Value> = scan_var_calls(&document, &self.pools)
            .into_iter()
            .filter_map(|call| {
                let token = registry.token(&call.token_name)?;
                if !token.is_color() {
                    return None;
                }
                let sample = color_sample(token, &registry)?;
                Some(json!({
                    "range": call.name_range,
                    "color": {
                        "red": sample.red,
                        "green": sample.green,
                        "blue": sample.blue,
                        "alpha": sample.alpha
                    }
                }))
            })
            .collect();

        self.cancellations.checkpoint(id, "textDocument/documentColor")?;
        Ok(Some(Value::Array(colors)))
    }
}

/// Sample a color token: the resolved CSS string when it parses, falling
/// back to the DTCG color object itself.
fn color_sample(token: &Token, registry: &TokenRegistry) -> Option<Rgba> {
    if let Some(resolved) = registry.resolved_value(&token.name) {
        if let Some(sample) = parse_css_color(resolved) {
            return Some(sample);
        }
    }
    DtcgColor::from_value(&token.value).and_then(|color| color.to_rgba())
}
