//! The name-indexed token registry and reference resolution.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::TokenError;
use crate::file::TokenFileSpec;
use crate::loader::{LoadedTokens, Token, render_value};
use crate::reference::references;

struct Registered {
    spec: TokenFileSpec,
    loaded: LoadedTokens,
}

/// All registered tokens, indexed by name.
///
/// Registration is expected at initialize and on explicit re-register;
/// lookups and resolution dominate. The grouped trees stay authoritative
/// for `{a.b.c}` resolution; resolved values are memoized per token until
/// the next registration invalidates them.
#[derive(Default)]
pub struct TokenRegistry {
    specs: Vec<Registered>,
    flat: Arc<Vec<Token>>,
    index: FxHashMap<String, usize>,
    origin: FxHashMap<String, usize>,
    resolved: FxHashMap<String, String>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self { flat: Arc::new(Vec::new()), ..Default::default() }
    }

    /// Register one token file's contribution.
    ///
    /// Idempotent on `(path, prefix)`: a spec seen before has its prior
    /// contribution replaced before the new tokens merge in.
    pub fn register(&mut self, spec: TokenFileSpec, loaded: LoadedTokens) {
        self.specs.retain(|r| r.spec.key() != spec.key());
        self.specs.push(Registered { spec, loaded });
        self.rebuild();
    }

    /// Look up a token by name. Any number of leading dashes is accepted;
    /// storage is undashed and matching is case-sensitive.
    pub fn token(&self, name: &str) -> Option<&Token> {
        let name = name.trim_start_matches('-');
        self.index.get(name).map(|&i| &self.flat[i])
    }

    /// The file spec that supplied a token.
    pub fn file_spec(&self, name: &str) -> Option<&TokenFileSpec> {
        let name = name.trim_start_matches('-');
        self.origin.get(name).map(|&i| &self.specs[i].spec)
    }

    /// Look up a token by its raw tree path (as referenced with `{a.b.c}`).
    pub fn token_by_path(&self, path: &[String]) -> Option<&Token> {
        self.flat.iter().find(|t| t.path == path)
    }

    /// Whether `path` is one of the registered token files.
    pub fn is_registered_path(&self, path: &std::path::Path) -> bool {
        self.specs.iter().any(|r| r.spec.path == path)
    }

    /// Memoized resolved `$value` of a token, free of `{...}` references.
    /// `None` when the token is unknown or its value does not resolve.
    pub fn resolved_value(&self, name: &str) -> Option<&str> {
        let name = name.trim_start_matches('-');
        self.resolved.get(name).map(String::as_str)
    }

    /// Substitute every `{a.b.c}` reference in `value`, transitively.
    ///
    /// Paths match the grouped trees that accompanied registration, with
    /// later registrations taking precedence. A missing path yields
    /// [`TokenError::UnknownReference`]; revisiting a node yields
    /// [`TokenError::ReferenceCycle`] naming the first repeat.
    pub fn resolve(&self, value: &str) -> Result<String, TokenError> {
        let mut visiting = Vec::new();
        self.resolve_inner(value, &mut visiting)
    }

    /// Immutable snapshot of the flat token list, sorted by name.
    /// Rebuilt only by [`TokenRegistry::register`], so handlers can hold it
    /// without blocking writers.
    pub fn snapshot(&self) -> Arc<Vec<Token>> {
        Arc::clone(&self.flat)
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    fn resolve_inner(&self, value: &str, visiting: &mut Vec<String>) -> Result<String, TokenError> {
        let refs = references(value);
        if refs.is_empty() {
            return Ok(value.to_string());
        }
        let mut out = String::new();
        let mut last = 0;
        for reference in refs {
            out.push_str(&value[last..reference.start]);
            let dotted = reference.dotted();
            if visiting.contains(&dotted) {
                return Err(TokenError::ReferenceCycle { at: dotted });
            }
            let target = self
                .lookup_path(&reference.path)
                .ok_or_else(|| TokenError::UnknownReference { reference: dotted.clone() })?;
            visiting.push(dotted);
            let resolved = self.resolve_inner(&render_value(&target), visiting)?;
            visiting.pop();
            out.push_str(&resolved);
            last = reference.end;
        }
        out.push_str(&value[last..]);
        Ok(out)
    }

    /// Walk a dotted path through the registered trees; later specs win.
    fn lookup_path(&self, path: &[String]) -> Option<Value> {
        for registered in self.specs.iter().rev() {
            let mut node = &registered.loaded.tree;
            let mut found = true;
            for segment in path {
                match node.get(segment) {
                    Some(child) => node = child,
                    None => {
                        found = false;
                        break;
                    }
                }
            }
            if found {
                if let Some(value) = node.get("$value") {
                    return Some(value.clone());
                }
            }
        }
        None
    }

    fn rebuild(&mut self) {
        let mut merged: FxHashMap<String, (Token, usize)> = FxHashMap::default();
        for (spec_idx, registered) in self.specs.iter().enumerate() {
            for token in &registered.loaded.tokens {
                merged.insert(token.name.clone(), (token.clone(), spec_idx));
            }
        }
        let mut flat: Vec<(Token, usize)> = merged.into_values().collect();
        flat.sort_by(|a, b| a.0.name.cmp(&b.0.name));

        self.index.clear();
        self.origin.clear();
        self.resolved.clear();
        let mut tokens = Vec::with_capacity(flat.len());
        for (i, (token, spec_idx)) in flat.into_iter().enumerate() {
            self.index.insert(token.name.clone(), i);
            self.origin.insert(token.name.clone(), spec_idx);
            tokens.push(token);
        }
        self.flat = Arc::new(tokens);
        // Memoize resolution; tokens that fail to resolve surface through
        // document diagnostics instead.
        let flat = Arc::clone(&self.flat);
        for token in flat.iter() {
            if let Ok(resolved) = self.resolve(&token.value_string()) {
                self.resolved.insert(token.name.clone(), resolved);
            }
        }
    }
}
